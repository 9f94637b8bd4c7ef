//! Proxy Transaction Submission
//!
//! Wraps an inner call in a `Proxy::proxy` envelope, signs it with the
//! proxy signer's own key, and submits it, blocking until the node reports
//! inclusion or the configured bound expires. The signer authenticates as
//! itself; the chain enforces its delegated authority for the principal at
//! execution time. A rejected inclusion is a business outcome and is never
//! retried here.

use std::time::Duration;

use bastion_core::Address;
use subtensor_client::{Call, ExtrinsicSigner, SubmissionReceipt};

use crate::chain::StakingChain;
use crate::state::StakeError;

/// Pallet carrying the proxy envelope
pub const PROXY_MODULE: &str = "Proxy";

/// Proxy type the envelope is forced to
pub const PROXY_TYPE_STAKING: &str = "Staking";

/// Wrap an inner call so it executes with the principal's authority.
pub fn wrap_as_proxy(inner: &Call, principal: &Address) -> Call {
    Call::new(PROXY_MODULE, "proxy")
        .param("real", principal.as_str())
        .param("force_proxy_type", PROXY_TYPE_STAKING)
        .param(
            "call",
            serde_json::to_value(inner).expect("call serialization cannot fail"),
        )
}

/// Sign and submit a proxy-wrapped call, waiting for inclusion.
///
/// The timeout covers the full submit-and-watch round trip; expiry
/// surfaces as `Timeout`, distinct from a node rejection, and the caller
/// decides whether to retry with fresh parameters.
pub async fn submit_as_proxy(
    chain: &dyn StakingChain,
    signer: &ExtrinsicSigner,
    inner: &Call,
    principal: &Address,
    timeout: Duration,
) -> Result<SubmissionReceipt, StakeError> {
    let envelope = wrap_as_proxy(inner, principal);
    let extrinsic = signer.sign_call(&envelope);

    tracing::info!(
        call = %format!("{}::{}", inner.module, inner.function),
        principal = %principal,
        signer = %signer.address(),
        hash = %extrinsic.hash,
        "submitting proxy extrinsic"
    );

    let receipt = tokio::time::timeout(timeout, chain.submit_extrinsic(&extrinsic, true))
        .await
        .map_err(|_| StakeError::Timeout {
            secs: timeout.as_secs(),
        })?
        .map_err(|e| match e {
            bastion_core::RpcError::Timeout { secs } => StakeError::Timeout { secs },
            other => StakeError::Chain(other),
        })?;

    if receipt.is_success {
        tracing::info!(hash = %receipt.extrinsic_hash, "extrinsic included");
    } else {
        tracing::warn!(
            hash = %receipt.extrinsic_hash,
            error = receipt.error_message.as_deref().unwrap_or("unknown"),
            "extrinsic rejected"
        );
    }

    Ok(receipt)
}
