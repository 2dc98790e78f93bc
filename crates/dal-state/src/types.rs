use std::fmt;

use dal_types::{Namespace, TypeError};
use serde::{Deserialize, Serialize};

/// Width of an account or validator address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Raw 20-byte address shared by accounts and validators.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn from_raw(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Derive an address from a 32-byte public key: the first 20 bytes of
    /// its BLAKE3 digest.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let digest = blake3::hash(public_key);
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest.as_bytes()[..ADDRESS_SIZE]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; ADDRESS_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| TypeError::InvalidLength {
                    expected: ADDRESS_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Address of a user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccAddress(pub Address);

/// Address of a validator operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValAddress(pub Address);

impl From<AccAddress> for Address {
    fn from(addr: AccAddress) -> Self {
        addr.0
    }
}

impl From<ValAddress> for Address {
    fn from(addr: ValAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acc:{}", self.0.to_hex())
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "val:{}", self.0.to_hex())
    }
}

/// An amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub denom: String,
    pub amount: u128,
}

impl Balance {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// A message carried inside a transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    Send {
        from: AccAddress,
        to: AccAddress,
        amount: u128,
    },
    PayForBlob {
        signer: AccAddress,
        namespace: Namespace,
        blob_size: u32,
        share_count: u32,
        share_version: u8,
    },
    Delegate {
        delegator: AccAddress,
        validator: ValAddress,
        amount: u128,
    },
    Undelegate {
        delegator: AccAddress,
        validator: ValAddress,
        amount: u128,
    },
    BeginRedelegate {
        delegator: AccAddress,
        src_validator: ValAddress,
        dst_validator: ValAddress,
        amount: u128,
    },
    CancelUnbondingDelegation {
        delegator: AccAddress,
        validator: ValAddress,
        amount: u128,
        creation_height: u64,
    },
}

impl Msg {
    /// The account that must sign a transaction carrying this message.
    pub fn signer(&self) -> AccAddress {
        match self {
            Self::Send { from, .. } => *from,
            Self::PayForBlob { signer, .. } => *signer,
            Self::Delegate { delegator, .. }
            | Self::Undelegate { delegator, .. }
            | Self::BeginRedelegate { delegator, .. }
            | Self::CancelUnbondingDelegation { delegator, .. } => *delegator,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Send { .. } => "Send",
            Self::PayForBlob { .. } => "PayForBlob",
            Self::Delegate { .. } => "Delegate",
            Self::Undelegate { .. } => "Undelegate",
            Self::BeginRedelegate { .. } => "BeginRedelegate",
            Self::CancelUnbondingDelegation { .. } => "CancelUnbondingDelegation",
        }
    }
}

/// Unsigned transaction contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBody {
    pub msgs: Vec<Msg>,
    pub gas_limit: u64,
    pub memo: String,
}

/// A signed transaction ready for broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Encoded [`TxBody`].
    pub body: Vec<u8>,
    pub public_key: [u8; 32],
    pub signature: Vec<u8>,
}

impl Tx {
    /// BLAKE3 digest over body and signature.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"dal-tx-v1:");
        hasher.update(&self.body);
        hasher.update(&self.signature);
        *hasher.finalize().as_bytes()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// Address of the key that signed this transaction.
    pub fn signer(&self) -> AccAddress {
        AccAddress(Address::from_public_key(&self.public_key))
    }
}

/// Outcome of a transaction included in a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub height: u64,
    pub txhash: String,
    pub code: u32,
    pub raw_log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
}

impl TxResponse {
    pub fn is_ok(&self) -> bool {
        self.code == crate::error::CODE_OK
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: AccAddress,
    pub validator: ValAddress,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDelegationResponse {
    pub delegation: Delegation,
    pub balance: Balance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingEntry {
    pub creation_height: u64,
    pub balance: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUnbondingDelegationResponse {
    pub delegator: AccAddress,
    pub validator: ValAddress,
    pub entries: Vec<UnbondingEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntry {
    pub creation_height: u64,
    pub balance: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRedelegationsResponse {
    pub delegator: AccAddress,
    pub src_validator: ValAddress,
    pub dst_validator: ValAddress,
    pub entries: Vec<RedelegationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_from_public_key_is_deterministic() {
        let a = Address::from_public_key(&[7u8; 32]);
        let b = Address::from_public_key(&[7u8; 32]);
        let c = Address::from_public_key(&[8u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn address_hex_roundtrip() {
        let addr = Address::from_raw([0xAB; ADDRESS_SIZE]);
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
        assert_eq!(Address::from_hex(&addr.to_string()).unwrap(), addr);
    }

    #[test]
    fn address_rejects_wrong_length() {
        let err = Address::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: ADDRESS_SIZE,
                actual: 2
            }
        );
    }

    #[test]
    fn msg_signer() {
        let acc = AccAddress(Address::from_raw([1; ADDRESS_SIZE]));
        let val = ValAddress(Address::from_raw([2; ADDRESS_SIZE]));
        let msg = Msg::Delegate {
            delegator: acc,
            validator: val,
            amount: 10,
        };
        assert_eq!(msg.signer(), acc);
        assert_eq!(msg.type_name(), "Delegate");
    }

    #[test]
    fn tx_hash_covers_signature() {
        let tx = Tx {
            body: b"body".to_vec(),
            public_key: [0; 32],
            signature: vec![1; 64],
        };
        let mut other = tx.clone();
        other.signature = vec![2; 64];
        assert_ne!(tx.hash(), other.hash());
        assert_eq!(tx.hash_hex().len(), 64);
    }

    #[test]
    fn msg_serde_roundtrip() {
        let msg = Msg::PayForBlob {
            signer: AccAddress(Address::from_raw([3; ADDRESS_SIZE])),
            namespace: Namespace::new_v0(&[1, 2, 3]).unwrap(),
            blob_size: 100,
            share_count: 1,
            share_version: 0,
        };
        let json = serde_json::to_vec(&msg).unwrap();
        let parsed: Msg = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
