//! Proxy Authority Setup
//!
//! One-time registration of a delegate as a proxy for an account. Unlike
//! the staking operations, these calls are signed directly by the account
//! granting (or revoking) the authority, not by the proxy.

use std::time::Duration;

use serde::Serialize;

use bastion_core::Address;
use subtensor_client::{Call, ExtrinsicSigner, SubmissionReceipt};

use crate::chain::StakingChain;
use crate::state::StakeError;
use crate::submit::PROXY_MODULE;

/// Authority classes a delegate can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProxyType {
    Staking,
    Registration,
}

impl ProxyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staking => "Staking",
            Self::Registration => "Registration",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "staking" => Some(Self::Staking),
            "registration" => Some(Self::Registration),
            _ => None,
        }
    }
}

/// Build the call granting `delegate` proxy authority, with no
/// announcement delay.
pub fn build_add_proxy(delegate: &Address, proxy_type: ProxyType) -> Call {
    Call::new(PROXY_MODULE, "add_proxy")
        .param("delegate", delegate.as_str())
        .param("proxy_type", proxy_type.as_str())
        .param("delay", 0)
}

/// Build the call revoking a delegate's proxy authority.
pub fn build_remove_proxy(delegate: &Address, proxy_type: ProxyType) -> Call {
    Call::new(PROXY_MODULE, "remove_proxy")
        .param("delegate", delegate.as_str())
        .param("proxy_type", proxy_type.as_str())
        .param("delay", 0)
}

/// Sign a proxy-authority call with the granting account and submit it,
/// waiting for inclusion under `timeout`. Unlike the staking pipeline, a
/// node rejection here is an error: there is no quote to renegotiate.
pub async fn submit_authority_change(
    chain: &dyn StakingChain,
    granting_signer: &ExtrinsicSigner,
    call: &Call,
    timeout: Duration,
) -> Result<SubmissionReceipt, StakeError> {
    let extrinsic = granting_signer.sign_call(call);

    tracing::info!(
        call = %format!("{}::{}", call.module, call.function),
        signer = %granting_signer.address(),
        "submitting proxy authority change"
    );

    let receipt = tokio::time::timeout(timeout, chain.submit_extrinsic(&extrinsic, true))
        .await
        .map_err(|_| StakeError::Timeout {
            secs: timeout.as_secs(),
        })?
        .map_err(StakeError::Chain)?;

    if !receipt.is_success {
        return Err(StakeError::SubmissionRejected {
            message: receipt
                .error_message
                .unwrap_or_else(|| "node reported failure without message".to_string()),
        });
    }

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_proxy_call_shape() {
        let delegate = Address::new("5CHLb1prLQ4MjA6bYbpPfx1gzvaGpeSfXkk84sMDcNXRQDPd");
        let call = build_add_proxy(&delegate, ProxyType::Staking);
        assert_eq!(call.module, "Proxy");
        assert_eq!(call.function, "add_proxy");
        assert_eq!(call.params["delegate"], json!(delegate.as_str()));
        assert_eq!(call.params["proxy_type"], json!("Staking"));
        assert_eq!(call.params["delay"], json!(0));
    }

    #[test]
    fn test_remove_proxy_call_shape() {
        let delegate = Address::new("5CHLb1prLQ4MjA6bYbpPfx1gzvaGpeSfXkk84sMDcNXRQDPd");
        let call = build_remove_proxy(&delegate, ProxyType::Registration);
        assert_eq!(call.function, "remove_proxy");
        assert_eq!(call.params["proxy_type"], json!("Registration"));
    }

    #[test]
    fn test_proxy_type_parse() {
        assert_eq!(ProxyType::parse("staking"), Some(ProxyType::Staking));
        assert_eq!(ProxyType::parse("Registration"), Some(ProxyType::Registration));
        assert_eq!(ProxyType::parse("governance"), None);
    }
}
