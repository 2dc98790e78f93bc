use std::io;

use dal_shares::ShareError;
use dal_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("sampler metrics already initialized")]
    MetricsAlreadyInitialized,

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("share codec error: {0}")]
    Codec(#[from] ShareError),
}

pub type NodeResult<T> = Result<T, NodeError>;
