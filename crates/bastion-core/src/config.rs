//! Configuration types for Bastion

use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_TIME_SECS;
use crate::Network;

/// Chain RPC connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Node RPC URL (e.g., "https://entrypoint-finney.opentensor.ai")
    pub url: String,

    /// Per-request timeout for queries (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl RpcConfig {
    /// Configuration pointing at a network's default endpoint
    pub fn for_network(network: Network) -> Self {
        Self {
            url: network.default_endpoint().to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::for_network(Network::Finney)
    }
}

/// Submission and quote-freshness bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Upper bound on waiting for inclusion (seconds)
    #[serde(default = "default_submission_timeout")]
    pub timeout_secs: u64,

    /// Maximum age of a pool/fee snapshot at submission time (seconds)
    #[serde(default = "default_max_quote_age")]
    pub max_quote_age_secs: u64,
}

fn default_submission_timeout() -> u64 {
    BLOCK_TIME_SECS * 5
}

fn default_max_quote_age() -> u64 {
    BLOCK_TIME_SECS * 3
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_submission_timeout(),
            max_quote_age_secs: default_max_quote_age(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Named network (selects the default endpoint)
    pub network: Network,

    /// RPC settings; url may override the network default
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Submission bounds
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Principal (delegator) address the proxy acts for
    #[serde(default)]
    pub delegator: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::Finney,
            rpc: RpcConfig::default(),
            submission: SubmissionConfig::default(),
            delegator: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.network, Network::Finney);
        assert_eq!(config.rpc.url, Network::Finney.default_endpoint());
        assert_eq!(config.submission.timeout_secs, 60);
        assert_eq!(config.submission.max_quote_age_secs, 36);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rpc.url, config.rpc.url);
        assert_eq!(parsed.network, config.network);
    }

    #[test]
    fn test_rpc_config_for_test_network() {
        let rpc = RpcConfig::for_network(Network::Test);
        assert_eq!(rpc.url, Network::Test.default_endpoint());
    }
}
