use common::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const UNSTAKE_QUEUE: Symbol = symbol_short!("UNSTK_Q");

/// Upper bound on outstanding requests per (pool, account).
///
/// `withdraw` walks the whole queue, so the length is capped; once full,
/// further unstakes are rejected until matured entries are withdrawn.
pub const MAX_UNSTAKE_REQUESTS: u32 = 32;

// ── Types ───────────────────────────────────────────────────────────────────

/// Principal waiting out the unstake lock.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeRequest {
    /// Number of tokens to be returned.
    pub amount: i128,
    /// Height from which the amount may be withdrawn.
    pub unlock_height: u32,
}

impl UnstakeRequest {
    pub fn is_matured(&self, now: u32) -> bool {
        self.unlock_height <= now
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn queue_key(pid: u32, account: &Address) -> (Symbol, u32, Address) {
    (UNSTAKE_QUEUE, pid, account.clone())
}

/// Outstanding requests in the order they were made.
pub fn load(env: &Env, pid: u32, account: &Address) -> Vec<UnstakeRequest> {
    env.storage()
        .persistent()
        .get(&queue_key(pid, account))
        .unwrap_or(Vec::new(env))
}

fn store(env: &Env, pid: u32, account: &Address, queue: &Vec<UnstakeRequest>) {
    let key = queue_key(pid, account);
    if queue.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, queue);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append a request, rejecting it once the queue is at capacity.
pub fn enqueue(
    env: &Env,
    pid: u32,
    account: &Address,
    request: UnstakeRequest,
) -> Result<(), ContractError> {
    let mut queue = load(env, pid, account);
    if queue.len() >= MAX_UNSTAKE_REQUESTS {
        return Err(ContractError::UnstakeQueueFull);
    }
    queue.push_back(request);
    store(env, pid, account, &queue);
    Ok(())
}

/// Remove every matured request in one pass and return their summed amount.
///
/// Immature requests keep their relative order.
pub fn drain_matured(
    env: &Env,
    pid: u32,
    account: &Address,
    now: u32,
) -> Result<i128, ContractError> {
    let queue = load(env, pid, account);
    let mut kept = Vec::new(env);
    let mut released: i128 = 0;

    for request in queue.iter() {
        if request.is_matured(now) {
            released = released
                .checked_add(request.amount)
                .ok_or(ContractError::MathOverflow)?;
        } else {
            kept.push_back(request);
        }
    }

    if kept.len() != queue.len() {
        store(env, pid, account, &kept);
    }
    Ok(released)
}

/// `(total requested, withdrawable now)` across the account's queue.
pub fn totals(
    env: &Env,
    pid: u32,
    account: &Address,
    now: u32,
) -> Result<(i128, i128), ContractError> {
    let mut requested: i128 = 0;
    let mut withdrawable: i128 = 0;
    for request in load(env, pid, account).iter() {
        requested = requested
            .checked_add(request.amount)
            .ok_or(ContractError::MathOverflow)?;
        if request.is_matured(now) {
            withdrawable = withdrawable
                .checked_add(request.amount)
                .ok_or(ContractError::MathOverflow)?;
        }
    }
    Ok((requested, withdrawable))
}
