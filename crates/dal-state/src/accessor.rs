use async_trait::async_trait;
use bytes::Bytes;
use dal_types::Namespace;

use crate::error::StateResult;
use crate::types::{
    AccAddress, Address, Balance, QueryDelegationResponse, QueryRedelegationsResponse,
    QueryUnbondingDelegationResponse, Tx, TxResponse, ValAddress,
};

/// Start/stop boundary of a state accessor.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    async fn start(&self) -> StateResult<()>;
    async fn stop(&self) -> StateResult<()>;
}

/// Read access to account balances.
#[async_trait]
pub trait BalanceQuerier: Send + Sync {
    /// Address of the account the node signs for.
    async fn account_address(&self) -> StateResult<AccAddress>;

    /// Balance of the node's own account.
    async fn balance(&self) -> StateResult<Balance>;

    /// Balance of `addr` as of the block before the current head.
    ///
    /// A block's state root commits to the transactions of the previous
    /// block, so head-1 is the latest height whose balance can be verified.
    async fn balance_for_address(&self, addr: &Address) -> StateResult<Balance>;
}

/// Transaction submission. Every call returns once the transaction is
/// included in a block.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn transfer(&self, to: AccAddress, amount: u128, gas_limit: u64)
        -> StateResult<TxResponse>;

    async fn submit_tx(&self, tx: Tx) -> StateResult<TxResponse>;

    /// Pay for a blob to be made available under `namespace`.
    async fn submit_pay_for_blob(
        &self,
        namespace: Namespace,
        data: Bytes,
        gas_limit: u64,
    ) -> StateResult<TxResponse>;
}

/// Delegation operations and queries against validators.
#[async_trait]
pub trait Staking: Send + Sync {
    async fn delegate(
        &self,
        validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse>;

    async fn undelegate(
        &self,
        validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse>;

    async fn begin_redelegate(
        &self,
        src_validator: ValAddress,
        dst_validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse>;

    /// Cancel part of the unbonding entry created at `creation_height`.
    async fn cancel_unbonding_delegation(
        &self,
        validator: ValAddress,
        amount: u128,
        creation_height: u64,
        gas_limit: u64,
    ) -> StateResult<TxResponse>;

    async fn query_delegation(&self, validator: ValAddress)
        -> StateResult<QueryDelegationResponse>;

    async fn query_unbonding(
        &self,
        validator: ValAddress,
    ) -> StateResult<QueryUnbondingDelegationResponse>;

    async fn query_redelegations(
        &self,
        src_validator: ValAddress,
        dst_validator: ValAddress,
    ) -> StateResult<QueryRedelegationsResponse>;
}

/// Full state-access capability set.
///
/// Implemented automatically for any type providing every capability, so
/// callers that need only one capability can depend on the narrower trait.
pub trait StateAccessor: Lifecycle + BalanceQuerier + TxSubmitter + Staking {}

impl<T> StateAccessor for T where T: Lifecycle + BalanceQuerier + TxSubmitter + Staking + ?Sized {}
