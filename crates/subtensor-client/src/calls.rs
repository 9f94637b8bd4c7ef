//! Call composition
//!
//! Builds unsigned protocol calls from a pallet name, a function name, and
//! named parameters. Parameters are kept in a sorted map so the encoded
//! payload, and therefore the content hash, is deterministic for a given
//! call regardless of insertion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An unsigned protocol call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub module: String,
    pub function: String,
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Call {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a named parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Canonical byte encoding of the call (sorted params)
    pub fn encode(&self) -> Vec<u8> {
        // BTreeMap serializes in key order, so this is stable.
        serde_json::to_vec(self).expect("call serialization cannot fail")
    }

    /// Deterministic content hash of the call, hex-encoded
    pub fn call_hash(&self) -> String {
        let digest = Sha256::digest(self.encode());
        hex::encode(digest)
    }
}
