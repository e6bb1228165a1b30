//! Wallet account state.

use serde::{Deserialize, Serialize};
use testament_types::{Address, TokenAmount};

/// The active wallet account with its balances as of the last refresh.
///
/// Rebuilt wholesale on every refresh tick by a single writer; readers only
/// ever see a complete snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    /// Native-coin balance in raw units.
    pub native_balance: TokenAmount,
    /// Fee-token balance in raw units.
    pub token_balance: TokenAmount,
}
