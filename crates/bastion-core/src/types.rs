//! Core type definitions for Bastion

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Subnet identifier
pub type Netuid = u16;

/// Extrinsic hash (32 bytes, hex-encoded with 0x prefix)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SS58 account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the address is a well-formed SS58 string.
    ///
    /// Decodes the base58 payload and checks the length: 1-byte prefix +
    /// 32-byte public key + 2-byte checksum. Does not verify the checksum.
    pub fn is_wellformed(&self) -> bool {
        match bs58::decode(&self.0).into_vec() {
            Ok(bytes) => bytes.len() == 35,
            Err(_) => false,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Balance in rao (1 tao = 1_000_000_000 rao).
///
/// Stored as an integer count of base units; add/sub/compare are exact.
/// Conversion to a decimal tao value is lossy and used only for display.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn from_rao(rao: u64) -> Self {
        Self(rao)
    }

    /// Lossy construction from a decimal tao value (presentation input only).
    pub fn from_tao(tao: f64) -> Self {
        Self((tao * constants::RAO_PER_TAO as f64).round() as u64)
    }

    pub fn rao(&self) -> u64 {
        self.0
    }

    /// Lossy decimal view for display.
    pub fn as_tao(&self) -> f64 {
        self.0 as f64 / constants::RAO_PER_TAO as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Balance) -> Option<Balance> {
        self.0.checked_add(other.0).map(Balance)
    }

    pub fn checked_sub(self, other: Balance) -> Option<Balance> {
        self.0.checked_sub(other.0).map(Balance)
    }

    pub fn saturating_sub(self, other: Balance) -> Balance {
        Balance(self.0.saturating_sub(other.0))
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, other: Balance) -> Balance {
        Balance(self.0 + other.0)
    }
}

impl Sub for Balance {
    type Output = Balance;

    fn sub(self, other: Balance) -> Balance {
        Balance(self.0 - other.0)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "τ{:.9}", self.as_tao())
    }
}

/// Named network with a default RPC endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Test,
    Finney,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Finney => "finney",
        }
    }

    /// Default RPC endpoint for this network
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Test => "https://test.chain.opentensor.ai",
            Self::Finney => "https://entrypoint-finney.opentensor.ai",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "test" => Some(Self::Test),
            "finney" => Some(Self::Finney),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants
pub mod constants {
    /// 1 tao in rao
    pub const RAO_PER_TAO: u64 = 1_000_000_000;

    /// Fixed-point scale for prices and tolerances (parts per billion)
    pub const PPB: u64 = 1_000_000_000;

    /// Expected block time of the chain (seconds)
    pub const BLOCK_TIME_SECS: u64 = 12;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_arithmetic_is_exact() {
        let a = Balance::from_rao(1_500_000_000);
        let b = Balance::from_rao(500_000_000);
        assert_eq!((a + b).rao(), 2_000_000_000);
        assert_eq!((a - b).rao(), 1_000_000_000);
        assert_eq!(a.checked_sub(b), Some(Balance::from_rao(1_000_000_000)));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_balance_tao_conversion() {
        let b = Balance::from_tao(1.5);
        assert_eq!(b.rao(), 1_500_000_000);
        assert!((b.as_tao() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_balance_display() {
        let b = Balance::from_rao(1_234_000_000);
        assert_eq!(b.to_string(), "τ1.234000000");
    }

    #[test]
    fn test_address_wellformed() {
        let addr = Address::new("5CF3fFYemt9A4DfdPGQiE8rqMYEeG3ioL3dQHkbX97MqmNBE");
        assert!(addr.is_wellformed());

        let bad = Address::new("not-an-address-0OIl");
        assert!(!bad.is_wellformed());
    }

    #[test]
    fn test_network_endpoints() {
        assert_eq!(Network::Finney.as_str(), "finney");
        assert!(Network::Test.default_endpoint().starts_with("https://"));
        assert_eq!(Network::parse("finney"), Some(Network::Finney));
        assert_eq!(Network::parse("mainnet"), None);
    }
}
