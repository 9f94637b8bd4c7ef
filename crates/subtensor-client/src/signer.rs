//! Extrinsic signing
//!
//! The proxy signer authenticates as itself; delegated authority for the
//! principal is enforced on-chain by the Proxy pallet, not here. Address
//! derivation (SS58) is wallet tooling and stays outside this crate: the
//! signer is constructed with its own address alongside the seed.

use bastion_core::{Address, RpcError, TxHash};
use ed25519_dalek::{Signer as _, SigningKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::calls::Call;

/// A signed extrinsic ready for submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedExtrinsic {
    /// Hex-encoded call payload
    pub payload: String,
    /// Hex-encoded ed25519 signature over the payload bytes
    pub signature: String,
    /// Signing account (the proxy, never the principal)
    pub signer: Address,
    /// Hash identifying this extrinsic
    pub hash: TxHash,
}

/// Keypair wrapper used to sign proxy extrinsics
pub struct ExtrinsicSigner {
    key: SigningKey,
    address: Address,
}

impl ExtrinsicSigner {
    /// Build a signer from a 32-byte hex seed and its SS58 address.
    pub fn from_seed_hex(seed_hex: &str, address: Address) -> Result<Self, RpcError> {
        let bytes = hex::decode(seed_hex.trim_start_matches("0x"))
            .map_err(|e| RpcError::InvalidSeed(format!("seed is not valid hex: {}", e)))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| RpcError::InvalidSeed("seed must be exactly 32 bytes".to_string()))?;
        if seed.iter().all(|&b| b == 0) {
            return Err(RpcError::InvalidSeed("all-zero seed rejected".to_string()));
        }
        Ok(Self {
            key: SigningKey::from_bytes(&seed),
            address,
        })
    }

    /// The signer's own account address
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    /// Sign a composed call, producing a submittable extrinsic.
    pub fn sign_call(&self, call: &Call) -> SignedExtrinsic {
        let payload = call.encode();
        let signature = self.key.sign(&payload);

        let mut hasher = Sha256::new();
        hasher.update(&payload);
        hasher.update(signature.to_bytes());
        let hash = hex::encode(hasher.finalize());

        SignedExtrinsic {
            payload: hex::encode(&payload),
            signature: hex::encode(signature.to_bytes()),
            signer: self.address.clone(),
            hash: TxHash::new(format!("0x{}", hash)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    fn test_signer() -> ExtrinsicSigner {
        ExtrinsicSigner::from_seed_hex(
            TEST_SEED,
            Address::new("5CHLb1prLQ4MjA6bYbpPfx1gzvaGpeSfXkk84sMDcNXRQDPd"),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_seeds() {
        let addr = Address::new("5CHLb1prLQ4MjA6bYbpPfx1gzvaGpeSfXkk84sMDcNXRQDPd");
        assert!(ExtrinsicSigner::from_seed_hex("zzzz", addr.clone()).is_err());
        assert!(ExtrinsicSigner::from_seed_hex("deadbeef", addr.clone()).is_err());
        assert!(ExtrinsicSigner::from_seed_hex(&"00".repeat(32), addr).is_err());
    }

    #[test]
    fn test_sign_call_is_deterministic() {
        let signer = test_signer();
        let call = Call::new("SubtensorModule", "add_stake").param("netuid", 1);
        let a = signer.sign_call(&call);
        let b = signer.sign_call(&call);
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_signed_extrinsic_carries_signer_address() {
        let signer = test_signer();
        let ext = signer.sign_call(&Call::new("Proxy", "proxy"));
        assert_eq!(ext.signer, *signer.address());
        assert!(ext.hash.as_str().starts_with("0x"));
    }
}
