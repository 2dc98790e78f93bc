use std::fmt;
use std::sync::Arc;

use dal_state::KeyringSigner;

/// A startup hook applied by [`NodeBuilder`](crate::NodeBuilder), in the
/// order given.
#[derive(Clone)]
pub enum NodeOption {
    /// Initialize the DA sampler's metrics.
    Metrics,
    /// Replace the signer the node would otherwise generate.
    KeyringSigner(Arc<KeyringSigner>),
}

/// Register sampler metrics during build.
pub fn with_metrics() -> NodeOption {
    NodeOption::Metrics
}

/// Override the default keyring signer.
pub fn with_keyring_signer(signer: KeyringSigner) -> NodeOption {
    NodeOption::KeyringSigner(Arc::new(signer))
}

impl fmt::Debug for NodeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics => f.write_str("Metrics"),
            Self::KeyringSigner(signer) => write!(f, "KeyringSigner({})", signer.key_name()),
        }
    }
}
