use dal_shares::ShareError;
use dal_types::TypeError;
use thiserror::Error;

/// Response code for a successfully executed transaction.
pub const CODE_OK: u32 = 0;
/// Response code when the signer does not own a message.
pub const CODE_UNAUTHORIZED: u32 = 4;
/// Response code when an account balance cannot cover a transfer.
pub const CODE_INSUFFICIENT_FUNDS: u32 = 5;
/// Response code when execution needs more gas than the limit allows.
pub const CODE_OUT_OF_GAS: u32 = 11;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state accessor not started")]
    NotStarted,

    #[error("network error: {0}")]
    Network(String),

    #[error("transaction rejected: code={code}, log={log}")]
    Consensus { code: u32, log: String },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(#[from] TypeError),

    #[error("share codec error: {0}")]
    Codec(#[from] ShareError),

    #[error("signature error: {0}")]
    Signature(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("state lock poisoned")]
    LockPoisoned,
}

impl StateError {
    /// ABCI-style response code for errors produced by transaction execution.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Consensus { code, .. } => Some(*code),
            Self::InsufficientFunds { .. } => Some(CODE_INSUFFICIENT_FUNDS),
            _ => None,
        }
    }
}

pub type StateResult<T> = Result<T, StateError>;
