use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Role a node plays on the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Light,
    Full,
    Bridge,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Light => "light",
            Self::Full => "full",
            Self::Bridge => "bridge",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeType {
    type Err = NodeError;

    fn from_str(s: &str) -> NodeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "full" => Ok(Self::Full),
            "bridge" => Ok(Self::Bridge),
            other => Err(NodeError::Config(format!("unknown node type: {other}"))),
        }
    }
}

/// Top-level node configuration, stored as TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node_type: NodeType,
    pub core: CoreConfig,
    pub state: StateConfig,
    pub das: DasConfig,
    pub share: ShareConfig,
}

/// Connection to the consensus node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub grpc_endpoint: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            grpc_endpoint: "127.0.0.1:9090".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Name of the keyring entry used to sign transactions.
    pub key_name: String,
    pub denom: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            key_name: "my_dal_key".into(),
            denom: "utia".into(),
        }
    }
}

/// Data-availability sampling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DasConfig {
    /// Number of headers sampled in parallel.
    pub concurrency: usize,
    /// Register sampler metrics at startup.
    pub metrics: bool,
}

impl Default for DasConfig {
    fn default() -> Self {
        Self {
            concurrency: 16,
            metrics: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Row width of the original data square used to place shares.
    pub row_width: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self { row_width: 64 }
    }
}

impl NodeConfig {
    /// Default configuration for a node of the given type.
    pub fn for_node_type(node_type: NodeType) -> Self {
        Self {
            node_type,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> NodeResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> NodeResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> NodeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> NodeResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> NodeResult<()> {
        if self.share.row_width == 0 {
            return Err(NodeError::Config("share.row_width must be positive".into()));
        }
        if self.das.concurrency == 0 {
            return Err(NodeError::Config("das.concurrency must be positive".into()));
        }
        if self.state.key_name.is_empty() {
            return Err(NodeError::Config("state.key_name must not be empty".into()));
        }
        if self.state.denom.is_empty() {
            return Err(NodeError::Config("state.denom must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = NodeConfig::default();
        assert_eq!(c.node_type, NodeType::Light);
        assert_eq!(c.core.grpc_endpoint, "127.0.0.1:9090");
        assert_eq!(c.state.denom, "utia");
        assert_eq!(c.das.concurrency, 16);
        assert!(!c.das.metrics);
        assert_eq!(c.share.row_width, 64);
        c.validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = NodeConfig::from_toml_str(
            r#"
            node_type = "bridge"

            [das]
            metrics = true
            "#,
        )
        .unwrap();
        assert_eq!(c.node_type, NodeType::Bridge);
        assert!(c.das.metrics);
        assert_eq!(c.das.concurrency, 16);
        assert_eq!(c.state, StateConfig::default());
    }

    #[test]
    fn zero_row_width_rejected() {
        let err = NodeConfig::from_toml_str("[share]\nrow_width = 0\n").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = NodeConfig::from_toml_str("node_type = [").unwrap_err();
        assert!(matches!(err, NodeError::ConfigParse(_)));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = NodeConfig::for_node_type(NodeType::Full);
        config.share.row_width = 128;
        config.save(&path).unwrap();

        let loaded = NodeConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = NodeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, NodeError::Io(_)));
    }

    #[test]
    fn node_type_parse() {
        assert_eq!("FULL".parse::<NodeType>().unwrap(), NodeType::Full);
        assert_eq!(NodeType::Bridge.to_string(), "bridge");
        assert!("archive".parse::<NodeType>().is_err());
    }
}
