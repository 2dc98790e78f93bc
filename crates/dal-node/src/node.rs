use std::sync::Arc;

use bytes::Bytes;
use dal_shares::locate;
use dal_state::{
    InMemoryAccessor, KeyringSigner, Lifecycle, StateAccessor, TxResponse, TxSubmitter,
};
use dal_types::Namespace;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::NodeResult;
use crate::options::NodeOption;
use crate::sampler::{DaSampler, DataAvailabilitySampler};

/// Assembles a [`Node`] from configuration and startup options.
pub struct NodeBuilder {
    config: NodeConfig,
    options: Vec<NodeOption>,
    sampler: Option<Arc<dyn DataAvailabilitySampler>>,
    genesis_funds: u128,
}

impl NodeBuilder {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            config,
            options: Vec::new(),
            sampler: None,
            genesis_funds: 0,
        }
    }

    pub fn option(mut self, option: NodeOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = NodeOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Use `sampler` instead of a [`DaSampler`] built from config.
    pub fn sampler(mut self, sampler: Arc<dyn DataAvailabilitySampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Fund the node's account in the genesis state.
    pub fn genesis_funds(mut self, amount: u128) -> Self {
        self.genesis_funds = amount;
        self
    }

    pub fn build(self) -> NodeResult<Node> {
        self.config.validate()?;

        let sampler: Arc<dyn DataAvailabilitySampler> = match self.sampler {
            Some(sampler) => sampler,
            None => Arc::new(DaSampler::new(self.config.das.concurrency)),
        };
        let mut signer = None;

        for option in self.options {
            match option {
                NodeOption::Metrics => sampler.init_metrics()?,
                NodeOption::KeyringSigner(replacement) => signer = Some(replacement),
            }
        }
        if self.config.das.metrics && !sampler.metrics_enabled() {
            sampler.init_metrics()?;
        }

        let signer = signer.unwrap_or_else(|| {
            Arc::new(KeyringSigner::generate(self.config.state.key_name.clone()))
        });
        let account = signer.address();
        let accessor = InMemoryAccessor::new(Arc::clone(&signer), self.config.state.denom.clone())
            .with_genesis_balance(account.0, self.genesis_funds);

        info!(
            node_type = %self.config.node_type,
            %account,
            key = signer.key_name(),
            metrics = sampler.metrics_enabled(),
            "node built"
        );

        Ok(Node {
            config: self.config,
            sampler,
            signer,
            state: Arc::new(accessor),
        })
    }
}

/// A wired node: configuration, DA sampler, signer and state access.
pub struct Node {
    config: NodeConfig,
    sampler: Arc<dyn DataAvailabilitySampler>,
    signer: Arc<KeyringSigner>,
    state: Arc<dyn StateAccessor>,
}

impl Node {
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn sampler(&self) -> &Arc<dyn DataAvailabilitySampler> {
        &self.sampler
    }

    pub fn signer(&self) -> &Arc<KeyringSigner> {
        &self.signer
    }

    pub fn state(&self) -> &Arc<dyn StateAccessor> {
        &self.state
    }

    pub async fn start(&self) -> NodeResult<()> {
        self.state.start().await?;
        info!(node_type = %self.config.node_type, "node started");
        Ok(())
    }

    pub async fn stop(&self) -> NodeResult<()> {
        self.state.stop().await?;
        info!("node stopped");
        Ok(())
    }

    /// Grid cell of the share at `flat_index` for the configured row width.
    pub fn place(&self, flat_index: usize) -> NodeResult<(usize, usize)> {
        Ok(locate(self.config.share.row_width, flat_index)?)
    }

    /// Pay for `data` to be published under `namespace`.
    pub async fn submit_blob(
        &self,
        namespace: Namespace,
        data: Bytes,
        gas_limit: u64,
    ) -> NodeResult<TxResponse> {
        Ok(self.state.submit_pay_for_blob(namespace, data, gas_limit).await?)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("config", &self.config)
            .field("signer", &self.signer)
            .field("metrics", &self.sampler.metrics_enabled())
            .finish()
    }
}
