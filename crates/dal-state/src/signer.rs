use ed25519_dalek::{Signer, Verifier};

use crate::error::{StateError, StateResult};
use crate::types::{AccAddress, Address, Tx, TxBody};

/// Ed25519 key that signs transactions on behalf of the node's account.
pub struct KeyringSigner {
    key_name: String,
    key: ed25519_dalek::SigningKey,
}

impl KeyringSigner {
    /// Generate a new random key under `key_name`.
    pub fn generate(key_name: impl Into<String>) -> Self {
        let mut csprng = rand::thread_rng();
        Self {
            key_name: key_name.into(),
            key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Restore a key from its raw 32-byte secret.
    pub fn from_bytes(key_name: impl Into<String>, secret: [u8; 32]) -> Self {
        Self {
            key_name: key_name.into(),
            key: ed25519_dalek::SigningKey::from_bytes(&secret),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Account address controlled by this key.
    pub fn address(&self) -> AccAddress {
        AccAddress(Address::from_public_key(&self.public_key()))
    }

    /// Encode and sign a transaction body.
    pub fn sign_tx(&self, body: &TxBody) -> StateResult<Tx> {
        let body = serde_json::to_vec(body).map_err(|e| StateError::Serialization(e.to_string()))?;
        let signature = self.key.sign(&body);
        Ok(Tx {
            body,
            public_key: self.public_key(),
            signature: signature.to_bytes().to_vec(),
        })
    }
}

impl std::fmt::Debug for KeyringSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyringSigner({}, <redacted>)", self.key_name)
    }
}

/// Check a transaction's signature and decode its body.
pub fn verify_tx(tx: &Tx) -> StateResult<TxBody> {
    let key = ed25519_dalek::VerifyingKey::from_bytes(&tx.public_key)
        .map_err(|_| StateError::Signature("invalid public key".into()))?;
    let signature = ed25519_dalek::Signature::from_slice(&tx.signature)
        .map_err(|_| StateError::Signature("malformed signature".into()))?;
    key.verify(&tx.body, &signature)
        .map_err(|_| StateError::Signature("signature does not match body".into()))?;
    serde_json::from_slice(&tx.body).map_err(|e| StateError::Serialization(e.to_string()))
}
