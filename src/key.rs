//! Signing seam.
//!
//! Key generation and signature algorithms live outside this crate; callers
//! plug in any implementation of [`Signer`].

use crate::ids::AccountId;
use crate::wire::SignaturePair;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Encoded public key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(#[serde(with = "crate::wire::base64_bytes")] Vec<u8>);

impl PublicKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        PublicKey(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Produces signatures over serialized transaction bodies.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> PublicKey;
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// The caller's signing identity and fee-paying account.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    signer: Arc<dyn Signer>,
}

impl Operator {
    pub fn new(account_id: AccountId, signer: Arc<dyn Signer>) -> Self {
        Self { account_id, signer }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub(crate) fn sign(&self, body_bytes: &[u8]) -> SignaturePair {
        SignaturePair {
            public_key: self.signer.public_key(),
            signature: self.signer.sign(body_bytes),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("public_key", &self.public_key().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn public_key(&self) -> PublicKey {
            PublicKey::from_bytes(vec![0xab, 0x01])
        }

        fn sign(&self, message: &[u8]) -> Vec<u8> {
            message.iter().rev().copied().collect()
        }
    }

    #[test]
    fn public_key_displays_as_hex() {
        assert_eq!(FixedSigner.public_key().to_string(), "ab01");
    }

    #[test]
    fn operator_signs_with_its_key() {
        let op = Operator::new(AccountId::new(0, 0, 2), Arc::new(FixedSigner));
        let pair = op.sign(b"abc");
        assert_eq!(pair.signature, b"cba".to_vec());
        assert_eq!(pair.public_key, op.public_key());
        assert!(format!("{:?}", op).contains("ab01"));
    }
}
