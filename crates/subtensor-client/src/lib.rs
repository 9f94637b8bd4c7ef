//! subtensor-client: Thin JSON-RPC client for a subtensor node
//!
//! This crate provides the chain gateway the staking protocol builds on:
//! state queries (balances, stake positions, subnet pools, fees), call
//! composition, and signed extrinsic submission with wait-for-inclusion.
//! Wire-level details beyond the node's RPC surface are out of scope.

pub mod calls;
pub mod signer;

use std::time::Duration;

use bastion_core::{Address, Balance, Netuid, RpcConfig, RpcError, TxHash};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub use calls::Call;
pub use signer::{ExtrinsicSigner, SignedExtrinsic};

/// Result type for client operations
pub type Result<T> = std::result::Result<T, RpcError>;

// RPC method names exposed by the node.
const RPC_DYNAMIC_INFO: &str = "subnetInfo_getDynamicInfo";
const RPC_FREE_BALANCE: &str = "accountInfo_getFreeBalance";
const RPC_STAKE: &str = "stakeInfo_getStakeForColdkeyHotkeyNetuid";
const RPC_ADD_STAKE_FEE: &str = "stakeInfo_getAddStakeFee";
const RPC_REMOVE_STAKE_FEE: &str = "stakeInfo_getRemoveStakeFee";
const RPC_SUBMIT: &str = "author_submitExtrinsic";
const RPC_SUBMIT_AND_WATCH: &str = "author_submitAndWatchExtrinsic";

/// Raw subnet pool data as reported by the node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicInfo {
    pub netuid: Netuid,
    /// Base-currency reserve (rao)
    pub tao_in: u64,
    /// Subnet-currency reserve (alpha base units)
    pub alpha_in: u64,
    /// Dynamic subnets price via the AMM curve; static subnets peg 1:1
    pub is_dynamic: bool,
}

/// Node response to a submitted extrinsic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub is_success: bool,
    /// Node-reported failure reason, verbatim
    pub error_message: Option<String>,
    pub extrinsic_hash: TxHash,
}

/// JSON-RPC client for a subtensor node
#[derive(Clone)]
pub struct SubtensorClient {
    http: reqwest::Client,
    url: String,
    request_timeout: Duration,
}

impl SubtensorClient {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::Unreachable {
                url: format!("{}: {}", config.url, e),
            })?;
        Ok(Self {
            http,
            url: config.url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Free balance of an account (rao)
    pub async fn get_balance(&self, address: &Address) -> Result<Balance> {
        let result = self
            .rpc(RPC_FREE_BALANCE, json!([address.as_str()]))
            .await?;
        parse_rao(&result).map(Balance::from_rao)
    }

    /// Stake position for (coldkey, hotkey, netuid), in alpha base units
    pub async fn get_stake(
        &self,
        coldkey: &Address,
        hotkey: &Address,
        netuid: Netuid,
    ) -> Result<Balance> {
        let result = self
            .rpc(
                RPC_STAKE,
                json!([coldkey.as_str(), hotkey.as_str(), netuid]),
            )
            .await?;
        parse_rao(&result).map(Balance::from_rao)
    }

    /// Pool reserves and classification for a subnet
    pub async fn get_dynamic_info(&self, netuid: Netuid) -> Result<DynamicInfo> {
        let result = self.rpc(RPC_DYNAMIC_INFO, json!([netuid])).await?;
        parse_dynamic_info(netuid, &result)
    }

    /// Fee the chain would charge for staking `amount` into `netuid`
    pub async fn get_stake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance> {
        let result = self
            .rpc(
                RPC_ADD_STAKE_FEE,
                json!([amount.rao(), netuid, coldkey.as_str(), hotkey.as_str()]),
            )
            .await?;
        parse_rao(&result).map(Balance::from_rao)
    }

    /// Fee the chain would charge for unstaking `amount` from `netuid`
    pub async fn get_unstake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance> {
        let result = self
            .rpc(
                RPC_REMOVE_STAKE_FEE,
                json!([amount.rao(), netuid, coldkey.as_str(), hotkey.as_str()]),
            )
            .await?;
        parse_rao(&result).map(Balance::from_rao)
    }

    /// Submit a signed extrinsic.
    ///
    /// With `wait_for_inclusion` the call blocks until the node reports the
    /// extrinsic included in a block (or rejected); without it the receipt
    /// only acknowledges pool acceptance. No retry in either mode.
    pub async fn submit_extrinsic(
        &self,
        extrinsic: &SignedExtrinsic,
        wait_for_inclusion: bool,
    ) -> Result<SubmissionReceipt> {
        let method = if wait_for_inclusion {
            RPC_SUBMIT_AND_WATCH
        } else {
            RPC_SUBMIT
        };
        let params = json!([{
            "payload": extrinsic.payload,
            "signature": extrinsic.signature,
            "signer": extrinsic.signer.as_str(),
        }]);
        let result = self.rpc(method, params).await?;
        Ok(parse_receipt(&result, &extrinsic.hash))
    }

    /// One JSON-RPC round trip with the configured timeout.
    async fn rpc(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, "rpc request");

        let response = tokio::time::timeout(
            self.request_timeout,
            self.http.post(&self.url).json(&body).send(),
        )
        .await
        .map_err(|_| RpcError::Timeout {
            secs: self.request_timeout.as_secs(),
        })?
        .map_err(|e| RpcError::Unreachable {
            url: format!("{}: {}", self.url, e),
        })?;

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RpcError::ParseError(e.to_string()))?;

        if let Some(err) = envelope.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown node error")
                .to_string();
            return Err(RpcError::ApiError { message });
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::ParseError("missing result field".to_string()))
    }
}

/// Parse a rao amount the node may report as a number or a decimal string.
fn parse_rao(value: &serde_json::Value) -> Result<u64> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    if let Some(s) = value.as_str() {
        return s
            .parse()
            .map_err(|_| RpcError::ParseError(format!("invalid rao amount: {}", s)));
    }
    Err(RpcError::ParseError(format!(
        "expected rao amount, got: {}",
        value
    )))
}

fn parse_dynamic_info(netuid: Netuid, value: &serde_json::Value) -> Result<DynamicInfo> {
    let tao_in = parse_rao(
        value
            .get("tao_in")
            .ok_or_else(|| RpcError::ParseError("missing tao_in".to_string()))?,
    )?;
    let alpha_in = parse_rao(
        value
            .get("alpha_in")
            .ok_or_else(|| RpcError::ParseError("missing alpha_in".to_string()))?,
    )?;
    let is_dynamic = value
        .get("is_dynamic")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| RpcError::ParseError("missing is_dynamic".to_string()))?;

    Ok(DynamicInfo {
        netuid,
        tao_in,
        alpha_in,
        is_dynamic,
    })
}

fn parse_receipt(value: &serde_json::Value, fallback_hash: &TxHash) -> SubmissionReceipt {
    let is_success = value
        .get("status")
        .and_then(|s| s.as_str())
        .map(|s| s == "included" || s == "finalized")
        .unwrap_or(false);
    let error_message = value
        .get("error")
        .and_then(|e| e.as_str())
        .map(|s| s.to_string());
    let extrinsic_hash = value
        .get("hash")
        .and_then(|h| h.as_str())
        .map(TxHash::new)
        .unwrap_or_else(|| fallback_hash.clone());

    SubmissionReceipt {
        is_success,
        error_message,
        extrinsic_hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rao_number_and_string() {
        assert_eq!(parse_rao(&json!(1_500_000_000u64)).unwrap(), 1_500_000_000);
        assert_eq!(parse_rao(&json!("1500000000")).unwrap(), 1_500_000_000);
        assert!(parse_rao(&json!("12.5")).is_err());
        assert!(parse_rao(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_dynamic_info() {
        let info = parse_dynamic_info(
            19,
            &json!({
                "tao_in": 250_000_000_000u64,
                "alpha_in": "500000000000",
                "is_dynamic": true,
            }),
        )
        .unwrap();
        assert_eq!(info.netuid, 19);
        assert_eq!(info.tao_in, 250_000_000_000);
        assert_eq!(info.alpha_in, 500_000_000_000);
        assert!(info.is_dynamic);
    }

    #[test]
    fn test_parse_dynamic_info_missing_field() {
        let result = parse_dynamic_info(1, &json!({ "tao_in": 1u64 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_receipt_included() {
        let hash = TxHash::new("0xfallback");
        let receipt = parse_receipt(
            &json!({ "status": "included", "hash": "0xabc123" }),
            &hash,
        );
        assert!(receipt.is_success);
        assert_eq!(receipt.extrinsic_hash.as_str(), "0xabc123");
        assert!(receipt.error_message.is_none());
    }

    #[test]
    fn test_parse_receipt_failure_keeps_node_message() {
        let hash = TxHash::new("0xfallback");
        let receipt = parse_receipt(
            &json!({ "status": "failed", "error": "Custom error: SlippageTooHigh" }),
            &hash,
        );
        assert!(!receipt.is_success);
        assert_eq!(
            receipt.error_message.as_deref(),
            Some("Custom error: SlippageTooHigh")
        );
        assert_eq!(receipt.extrinsic_hash.as_str(), "0xfallback");
    }
}
