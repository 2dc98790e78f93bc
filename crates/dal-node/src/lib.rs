//! Startup wiring for a data-availability node.
//!
//! - [`NodeConfig`]: TOML configuration with defaults for every section
//! - [`DataAvailabilitySampler`] / [`DaSampler`]: the sampler and its metrics hook
//! - [`NodeOption`]: startup hooks ([`with_metrics`], [`with_keyring_signer`])
//! - [`NodeBuilder`] / [`Node`]: applies options in order and wires the
//!   sampler, signer and state accessor together

pub mod config;
pub mod error;
pub mod node;
pub mod options;
pub mod sampler;

pub use config::{CoreConfig, DasConfig, NodeConfig, NodeType, ShareConfig, StateConfig};
pub use error::{NodeError, NodeResult};
pub use node::{Node, NodeBuilder};
pub use options::{with_keyring_signer, with_metrics, NodeOption};
pub use sampler::{DaSampler, DataAvailabilitySampler, SamplerMetrics, SamplerStats};
