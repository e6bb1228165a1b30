//! Chain network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The deployment target a session is bound to.
///
/// Resolved once from the chain client's reported network name at session
/// start and immutable afterwards. Any name outside the three known
/// deployments maps to `Unknown`, which borrows the `Main` contract bindings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Private,
    #[default]
    Unknown,
}

impl Network {
    /// Map a chain client's reported network name to an identifier.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "main" => Network::Main,
            "test" => Network::Test,
            "private" => Network::Private,
            _ => Network::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Private => "private",
            Network::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(Network::from_name("main"), Network::Main);
        assert_eq!(Network::from_name("test"), Network::Test);
        assert_eq!(Network::from_name("private"), Network::Private);
    }

    #[test]
    fn resolution_ignores_case_and_whitespace() {
        assert_eq!(Network::from_name(" Main "), Network::Main);
        assert_eq!(Network::from_name("TEST"), Network::Test);
    }

    #[test]
    fn unknown_names_fall_through() {
        assert_eq!(Network::from_name("ropsten"), Network::Unknown);
        assert_eq!(Network::from_name("kovan"), Network::Unknown);
        assert_eq!(Network::from_name(""), Network::Unknown);
    }

    #[test]
    fn serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Network::Main).unwrap(), "\"main\"");
        let parsed: Network = serde_json::from_str("\"test\"").unwrap();
        assert_eq!(parsed, Network::Test);
    }
}
