//! Logical contract name → per-network binding resolution.

use crate::abi;
use crate::error::ContractError;
use std::fmt;
use testament_types::{Address, BlockNumber, Network};

/// Logical names of the contracts the engine talks to.
///
/// `Trust` is special: the factory deploys one instance per beneficiary, so
/// its binding is only complete once the caller supplies the instance
/// address recovered from the factory's event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractName {
    Wills,
    Trust,
    TrustFactory,
    MyBitBurner,
    MyBitToken,
}

impl ContractName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractName::Wills => "Wills",
            ContractName::Trust => "Trust",
            ContractName::TrustFactory => "TrustFactory",
            ContractName::MyBitBurner => "MyBitBurner",
            ContractName::MyBitToken => "MyBitToken",
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable ABI + address pair for one contract on one network.
#[derive(Clone, Debug)]
pub struct ContractBinding {
    pub name: ContractName,
    pub address: Address,
    pub abi: &'static str,
}

// ── Deployed addresses ──────────────────────────────────────────────────────

const MAIN_WILLS: &str = "0xe15b5222c67624e2ca7e26902e598067762dbf56";
const MAIN_TRUST: &str = "0xc33d6d5495813497bf3ef50f7a03c2642721a8c3";
const MAIN_TRUST_FACTORY: &str = "0xa1b370c760bd592c719d4e5e8e38f290d6072160";
const MAIN_MYBIT_BURNER: &str = "0x482b6b636c56dc236b4fadbb6153835e518fa321";
const MAIN_MYBIT_TOKEN: &str = "0xc83a2090314c966f1b0a77a930a7e5c652d36e2b";

const TEST_WILLS: &str = "0x6f8859eb47d051056f892f8b57f7cae41530f555";
const TEST_TRUST: &str = "0x993535b429a8c80f07933a929d91c9c10bd77f4c";
const TEST_TRUST_FACTORY: &str = "0x125b27a16e15233016a6620a9742825462db2a20";
const TEST_MYBIT_BURNER: &str = "0xd64e35f107e0bae26eca0e9a6c5792d59dd1cd91";
const TEST_MYBIT_TOKEN: &str = "0x2fe5838a001e9befcce4c875290389be969dc0fd";

// Private deployments carry only the wills suite; there is no trust factory.
const PRIVATE_WILLS: &str = "0xaf6f1ec89869a67f894d6f4fcaef036e99839bfd";
const PRIVATE_MYBIT_BURNER: &str = "0x80c99436c70fb29d0a4c6030e05c2b3e272108b3";
const PRIVATE_MYBIT_TOKEN: &str = "0x7db8070e77c49f1a857fcc34202a323351a45810";

// ── Log scan floors ─────────────────────────────────────────────────────────

const MAIN_WILLS_FLOOR: u64 = 5_767_250;
const MAIN_TRUST_FLOOR: u64 = 6_018_430;
const TEST_WILLS_FLOOR: u64 = 3_104_550;
const TEST_TRUST_FLOOR: u64 = 6_205_610;

/// Resolve a logical contract on a network to its binding.
///
/// An explicit `override_address` substitutes the network default; per-instance
/// `Trust` contracts are bound this way, with the address taken from the
/// factory log. Networks outside the known set borrow the `Main` table.
pub fn bind(
    name: ContractName,
    network: Network,
    override_address: Option<&Address>,
) -> Result<ContractBinding, ContractError> {
    let address = match override_address {
        Some(explicit) => explicit.clone(),
        None => Address::parse(default_address(name, network)?)?,
    };
    Ok(ContractBinding {
        name,
        address,
        abi: abi_of(name),
    })
}

/// First block worth scanning for a contract's logs on a network.
///
/// The wills contract and the token predate the trust factory, so the two
/// groups carry separate floors. Private chains start at zero.
pub fn log_floor(name: ContractName, network: Network) -> BlockNumber {
    let floor = match (network, name) {
        (Network::Private, _) => 0,
        (Network::Test, ContractName::Trust | ContractName::TrustFactory) => TEST_TRUST_FLOOR,
        (Network::Test, _) => TEST_WILLS_FLOOR,
        (_, ContractName::Trust | ContractName::TrustFactory) => MAIN_TRUST_FLOOR,
        (_, _) => MAIN_WILLS_FLOOR,
    };
    BlockNumber::new(floor)
}

fn abi_of(name: ContractName) -> &'static str {
    match name {
        ContractName::Wills => abi::WILLS_ABI,
        ContractName::Trust => abi::TRUST_ABI,
        ContractName::TrustFactory => abi::TRUST_FACTORY_ABI,
        ContractName::MyBitBurner => abi::MYBIT_BURNER_ABI,
        ContractName::MyBitToken => abi::MYBIT_TOKEN_ABI,
    }
}

fn default_address(name: ContractName, network: Network) -> Result<&'static str, ContractError> {
    match (network, name) {
        (Network::Private, ContractName::Wills) => Ok(PRIVATE_WILLS),
        (Network::Private, ContractName::MyBitBurner) => Ok(PRIVATE_MYBIT_BURNER),
        (Network::Private, ContractName::MyBitToken) => Ok(PRIVATE_MYBIT_TOKEN),
        (Network::Private, _) => Err(ContractError::MissingBinding { name, network }),

        (Network::Test, ContractName::Wills) => Ok(TEST_WILLS),
        (Network::Test, ContractName::Trust) => Ok(TEST_TRUST),
        (Network::Test, ContractName::TrustFactory) => Ok(TEST_TRUST_FACTORY),
        (Network::Test, ContractName::MyBitBurner) => Ok(TEST_MYBIT_BURNER),
        (Network::Test, ContractName::MyBitToken) => Ok(TEST_MYBIT_TOKEN),

        // Main, and anything unrecognized, resolves against the main table.
        (_, ContractName::Wills) => Ok(MAIN_WILLS),
        (_, ContractName::Trust) => Ok(MAIN_TRUST),
        (_, ContractName::TrustFactory) => Ok(MAIN_TRUST_FACTORY),
        (_, ContractName::MyBitBurner) => Ok(MAIN_MYBIT_BURNER),
        (_, ContractName::MyBitToken) => Ok(MAIN_MYBIT_TOKEN),
    }
}
