//! State access boundary for the data-availability node.
//!
//! The blob codec never calls into chain state; this crate describes what the
//! rest of the node may ask of it:
//! - Capability traits ([`Lifecycle`], [`BalanceQuerier`], [`TxSubmitter`],
//!   [`Staking`]) joined by the [`StateAccessor`] supertrait
//! - Transaction and query wire types
//! - [`KeyringSigner`] for signing transactions with the node's key
//! - [`InMemoryAccessor`], a single-node chain used in tests and local runs
//!
//! Balances returned by [`BalanceQuerier::balance_for_address`] are those of
//! the block before the current head, the latest state a light client can
//! verify against a header.

pub mod accessor;
pub mod error;
pub mod memory;
pub mod signer;
pub mod types;

pub use accessor::{BalanceQuerier, Lifecycle, StateAccessor, Staking, TxSubmitter};
pub use error::{
    StateError, StateResult, CODE_INSUFFICIENT_FUNDS, CODE_OK, CODE_OUT_OF_GAS, CODE_UNAUTHORIZED,
};
pub use memory::{msg_gas, InMemoryAccessor, GAS_PER_BLOB_BYTE, GAS_PER_MSG, PFB_GAS_FIXED_COST};
pub use signer::{verify_tx, KeyringSigner};
pub use types::{
    AccAddress, Address, Balance, Delegation, Msg, QueryDelegationResponse,
    QueryRedelegationsResponse, QueryUnbondingDelegationResponse, RedelegationEntry, Tx, TxBody,
    TxResponse, UnbondingEntry, ValAddress, ADDRESS_SIZE,
};
