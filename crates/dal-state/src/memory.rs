use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use dal_shares::{split_blobs, Blob, SHARE_SIZE, SHARE_VERSION_ZERO};
use dal_types::Namespace;
use tracing::{debug, info, warn};

use crate::accessor::{BalanceQuerier, Lifecycle, Staking, TxSubmitter};
use crate::error::{StateError, StateResult, CODE_OK, CODE_OUT_OF_GAS, CODE_UNAUTHORIZED};
use crate::signer::{verify_tx, KeyringSigner};
use crate::types::{
    AccAddress, Address, Balance, Delegation, Msg, QueryDelegationResponse,
    QueryRedelegationsResponse, QueryUnbondingDelegationResponse, RedelegationEntry, Tx, TxBody,
    TxResponse, UnbondingEntry, ValAddress,
};

/// Gas charged per byte of share space a blob occupies.
pub const GAS_PER_BLOB_BYTE: u64 = 8;
/// Fixed gas charged for every message.
pub const GAS_PER_MSG: u64 = 10_000;
/// Extra fixed gas charged for a pay-for-blob message.
pub const PFB_GAS_FIXED_COST: u64 = 75_000;

/// Gas consumed by executing `msg`.
pub fn msg_gas(msg: &Msg) -> u64 {
    match msg {
        Msg::PayForBlob { share_count, .. } => {
            let share_bytes = u64::from(*share_count) * SHARE_SIZE as u64;
            GAS_PER_MSG + PFB_GAS_FIXED_COST + share_bytes * GAS_PER_BLOB_BYTE
        }
        _ => GAS_PER_MSG,
    }
}

/// In-memory chain state for tests and local runs.
///
/// Every accepted transaction commits exactly one block. Execution applies
/// all messages to a copy of the state, so a failing message leaves no trace.
pub struct InMemoryAccessor {
    signer: Arc<KeyringSigner>,
    denom: String,
    started: AtomicBool,
    inner: RwLock<ChainState>,
}

#[derive(Clone, Default)]
struct ChainState {
    height: u64,
    balances: HashMap<Address, u128>,
    /// `history[h]` holds the balances committed at height `h`.
    history: Vec<HashMap<Address, u128>>,
    delegations: BTreeMap<(Address, Address), u128>,
    unbonding: BTreeMap<(Address, Address), Vec<UnbondingEntry>>,
    redelegations: BTreeMap<(Address, Address, Address), Vec<RedelegationEntry>>,
}

impl InMemoryAccessor {
    pub fn new(signer: Arc<KeyringSigner>, denom: impl Into<String>) -> Self {
        Self {
            signer,
            denom: denom.into(),
            started: AtomicBool::new(false),
            inner: RwLock::new(ChainState {
                history: vec![HashMap::new()],
                ..ChainState::default()
            }),
        }
    }

    /// Credit `amount` to `addr` in the genesis state.
    pub fn with_genesis_balance(mut self, addr: Address, amount: u128) -> Self {
        let state = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        *state.balances.entry(addr).or_default() += amount;
        if let Some(genesis) = state.history.first_mut() {
            *genesis.entry(addr).or_default() += amount;
        }
        self
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn signer(&self) -> &KeyringSigner {
        &self.signer
    }

    /// Height of the last committed block.
    pub fn height(&self) -> StateResult<u64> {
        Ok(self.inner.read().map_err(|_| StateError::LockPoisoned)?.height)
    }

    fn ensure_started(&self) -> StateResult<()> {
        if self.started.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StateError::NotStarted)
        }
    }

    fn account(&self) -> AccAddress {
        self.signer.address()
    }

    async fn sign_and_submit(&self, msg: Msg, gas_limit: u64) -> StateResult<TxResponse> {
        let body = TxBody {
            msgs: vec![msg],
            gas_limit,
            memo: String::new(),
        };
        let tx = self.signer.sign_tx(&body)?;
        self.submit_tx(tx).await
    }

    fn execute(&self, tx: &Tx) -> StateResult<TxResponse> {
        self.ensure_started()?;
        let body = verify_tx(tx)?;
        let signer = tx.signer();

        if let Some(msg) = body.msgs.iter().find(|m| m.signer() != signer) {
            return Err(reject(
                CODE_UNAUTHORIZED,
                format!("{} not signed by {}", msg.type_name(), msg.signer()),
            ));
        }

        let gas_used: u64 = body.msgs.iter().map(msg_gas).sum();
        if gas_used > body.gas_limit {
            return Err(reject(
                CODE_OUT_OF_GAS,
                format!("out of gas: wanted {}, used {gas_used}", body.gas_limit),
            ));
        }

        let mut state = self.inner.write().map_err(|_| StateError::LockPoisoned)?;
        let height = state.height + 1;
        let mut next = (*state).clone();
        for msg in &body.msgs {
            apply(&mut next, msg, height).map_err(rejected)?;
        }
        next.height = height;
        let snapshot = next.balances.clone();
        next.history.push(snapshot);
        *state = next;

        let txhash = tx.hash_hex();
        debug!(height, %txhash, msgs = body.msgs.len(), gas_used, "committed block");
        Ok(TxResponse {
            height,
            txhash,
            code: CODE_OK,
            raw_log: String::new(),
            gas_wanted: body.gas_limit,
            gas_used,
        })
    }

    fn unbonding_entries(
        &self,
        delegator: Address,
        validator: Address,
    ) -> StateResult<Vec<UnbondingEntry>> {
        let state = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(state
            .unbonding
            .get(&(delegator, validator))
            .cloned()
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemoryAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAccessor")
            .field("account", &self.account())
            .field("denom", &self.denom)
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}

fn reject(code: u32, log: String) -> StateError {
    rejected(StateError::Consensus { code, log })
}

/// Single logging point for every transaction that fails execution.
fn rejected(err: StateError) -> StateError {
    warn!(code = ?err.code(), error = %err, "transaction rejected");
    err
}

fn debit(balances: &mut HashMap<Address, u128>, addr: Address, amount: u128) -> StateResult<()> {
    let available = balances.get(&addr).copied().unwrap_or_default();
    if available < amount {
        return Err(StateError::InsufficientFunds {
            needed: amount,
            available,
        });
    }
    balances.insert(addr, available - amount);
    Ok(())
}

fn credit(balances: &mut HashMap<Address, u128>, addr: Address, amount: u128) {
    *balances.entry(addr).or_default() += amount;
}

fn take_delegation(
    state: &mut ChainState,
    delegator: Address,
    validator: Address,
    amount: u128,
) -> StateResult<()> {
    let key = (delegator, validator);
    let delegated = state.delegations.get(&key).copied().unwrap_or_default();
    if delegated < amount {
        return Err(StateError::InsufficientFunds {
            needed: amount,
            available: delegated,
        });
    }
    if delegated == amount {
        state.delegations.remove(&key);
    } else {
        state.delegations.insert(key, delegated - amount);
    }
    Ok(())
}

fn apply(state: &mut ChainState, msg: &Msg, height: u64) -> StateResult<()> {
    match msg {
        Msg::Send { from, to, amount } => {
            debit(&mut state.balances, from.0, *amount)?;
            credit(&mut state.balances, to.0, *amount);
        }
        Msg::PayForBlob { .. } => {}
        Msg::Delegate {
            delegator,
            validator,
            amount,
        } => {
            debit(&mut state.balances, delegator.0, *amount)?;
            *state
                .delegations
                .entry((delegator.0, validator.0))
                .or_default() += amount;
        }
        Msg::Undelegate {
            delegator,
            validator,
            amount,
        } => {
            take_delegation(state, delegator.0, validator.0, *amount)?;
            state
                .unbonding
                .entry((delegator.0, validator.0))
                .or_default()
                .push(UnbondingEntry {
                    creation_height: height,
                    balance: *amount,
                });
        }
        Msg::BeginRedelegate {
            delegator,
            src_validator,
            dst_validator,
            amount,
        } => {
            take_delegation(state, delegator.0, src_validator.0, *amount)?;
            *state
                .delegations
                .entry((delegator.0, dst_validator.0))
                .or_default() += amount;
            state
                .redelegations
                .entry((delegator.0, src_validator.0, dst_validator.0))
                .or_default()
                .push(RedelegationEntry {
                    creation_height: height,
                    balance: *amount,
                });
        }
        Msg::CancelUnbondingDelegation {
            delegator,
            validator,
            amount,
            creation_height,
        } => {
            let key = (delegator.0, validator.0);
            let entries = state.unbonding.get_mut(&key).ok_or_else(|| {
                StateError::NotFound(format!("no unbonding delegation to {validator}"))
            })?;
            let pos = entries
                .iter()
                .position(|e| e.creation_height == *creation_height)
                .ok_or_else(|| {
                    StateError::NotFound(format!(
                        "no unbonding entry at height {creation_height}"
                    ))
                })?;
            let entry = &mut entries[pos];
            if entry.balance < *amount {
                return Err(StateError::InsufficientFunds {
                    needed: *amount,
                    available: entry.balance,
                });
            }
            entry.balance -= amount;
            if entry.balance == 0 {
                entries.remove(pos);
            }
            if entries.is_empty() {
                state.unbonding.remove(&key);
            }
            *state.delegations.entry(key).or_default() += amount;
        }
    }
    Ok(())
}

#[async_trait]
impl Lifecycle for InMemoryAccessor {
    async fn start(&self) -> StateResult<()> {
        self.started.store(true, Ordering::SeqCst);
        info!(account = %self.account(), denom = %self.denom, "state accessor started");
        Ok(())
    }

    async fn stop(&self) -> StateResult<()> {
        self.started.store(false, Ordering::SeqCst);
        info!("state accessor stopped");
        Ok(())
    }
}

#[async_trait]
impl BalanceQuerier for InMemoryAccessor {
    async fn account_address(&self) -> StateResult<AccAddress> {
        Ok(self.account())
    }

    async fn balance(&self) -> StateResult<Balance> {
        self.balance_for_address(&self.account().0).await
    }

    async fn balance_for_address(&self, addr: &Address) -> StateResult<Balance> {
        self.ensure_started()?;
        let state = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        let verified = state.height.saturating_sub(1) as usize;
        let amount = state
            .history
            .get(verified)
            .and_then(|balances| balances.get(addr))
            .copied()
            .unwrap_or_default();
        Ok(Balance::new(self.denom.clone(), amount))
    }
}

#[async_trait]
impl TxSubmitter for InMemoryAccessor {
    async fn transfer(
        &self,
        to: AccAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        let msg = Msg::Send {
            from: self.account(),
            to,
            amount,
        };
        self.sign_and_submit(msg, gas_limit).await
    }

    async fn submit_tx(&self, tx: Tx) -> StateResult<TxResponse> {
        self.execute(&tx)
    }

    async fn submit_pay_for_blob(
        &self,
        namespace: Namespace,
        data: Bytes,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        namespace.validate_for_blob()?;
        let blob_size = data.len();
        let shares = split_blobs(&[Blob::new(namespace, data, SHARE_VERSION_ZERO)])?;
        let msg = Msg::PayForBlob {
            signer: self.account(),
            namespace,
            blob_size: blob_size as u32,
            share_count: shares.len() as u32,
            share_version: SHARE_VERSION_ZERO,
        };
        debug!(namespace = %namespace.short_hex(), blob_size, shares = shares.len(), "paying for blob");
        self.sign_and_submit(msg, gas_limit).await
    }
}

#[async_trait]
impl Staking for InMemoryAccessor {
    async fn delegate(
        &self,
        validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        let msg = Msg::Delegate {
            delegator: self.account(),
            validator,
            amount,
        };
        self.sign_and_submit(msg, gas_limit).await
    }

    async fn undelegate(
        &self,
        validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        let msg = Msg::Undelegate {
            delegator: self.account(),
            validator,
            amount,
        };
        self.sign_and_submit(msg, gas_limit).await
    }

    async fn begin_redelegate(
        &self,
        src_validator: ValAddress,
        dst_validator: ValAddress,
        amount: u128,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        let msg = Msg::BeginRedelegate {
            delegator: self.account(),
            src_validator,
            dst_validator,
            amount,
        };
        self.sign_and_submit(msg, gas_limit).await
    }

    async fn cancel_unbonding_delegation(
        &self,
        validator: ValAddress,
        amount: u128,
        creation_height: u64,
        gas_limit: u64,
    ) -> StateResult<TxResponse> {
        let msg = Msg::CancelUnbondingDelegation {
            delegator: self.account(),
            validator,
            amount,
            creation_height,
        };
        self.sign_and_submit(msg, gas_limit).await
    }

    async fn query_delegation(
        &self,
        validator: ValAddress,
    ) -> StateResult<QueryDelegationResponse> {
        self.ensure_started()?;
        let delegator = self.account();
        let state = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        let amount = state
            .delegations
            .get(&(delegator.0, validator.0))
            .copied()
            .ok_or_else(|| StateError::NotFound(format!("no delegation to {validator}")))?;
        Ok(QueryDelegationResponse {
            delegation: Delegation {
                delegator,
                validator,
                amount,
            },
            balance: Balance::new(self.denom.clone(), amount),
        })
    }

    async fn query_unbonding(
        &self,
        validator: ValAddress,
    ) -> StateResult<QueryUnbondingDelegationResponse> {
        self.ensure_started()?;
        let delegator = self.account();
        let entries = self.unbonding_entries(delegator.0, validator.0)?;
        Ok(QueryUnbondingDelegationResponse {
            delegator,
            validator,
            entries,
        })
    }

    async fn query_redelegations(
        &self,
        src_validator: ValAddress,
        dst_validator: ValAddress,
    ) -> StateResult<QueryRedelegationsResponse> {
        self.ensure_started()?;
        let delegator = self.account();
        let state = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        let entries = state
            .redelegations
            .get(&(delegator.0, src_validator.0, dst_validator.0))
            .cloned()
            .unwrap_or_default();
        Ok(QueryRedelegationsResponse {
            delegator,
            src_validator,
            dst_validator,
            entries,
        })
    }
}
