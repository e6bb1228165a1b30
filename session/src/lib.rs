//! Wallet session state for the testament engine.
//!
//! Resolves the active account and its balances, gates spending operations
//! on the fee-token allowance granted to the burner contract, and submits
//! the approval transaction when the user asks for authorization.

pub mod account;
pub mod error;
pub mod session;

pub use account::Account;
pub use error::SessionError;
pub use session::{required_allowance, UserSession, REQUIRED_ALLOWANCE_TOKENS};
