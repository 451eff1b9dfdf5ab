use common::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, U256};

use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGT");

/// The only slot a native-asset pool may occupy.
pub const NATIVE_PID: u32 = 0;

// ── Types ───────────────────────────────────────────────────────────────────

/// What a pool accepts as stake.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StakeAsset {
    /// The network's native asset, moved through its asset contract.
    Native,
    /// A fungible token contract.
    Token(Address),
}

/// One stake-able bucket with its own weight and reward accumulator.
///
/// Pools live in a dense arena: ids are issued sequentially from zero and a
/// pool is never removed, so an id stays valid forever.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub id: u32,
    pub stake_asset: StakeAsset,
    /// Relative share of the per-block reward budget.
    pub weight: u64,
    /// Height the accumulator was last brought current at.
    pub last_reward_height: u32,
    /// Cumulative reward per staked unit, scaled by `ACC_PRECISION`.
    /// Never decreases. Held in 256 bits so a pool with a tiny stake can
    /// keep accruing for the whole window.
    pub acc_reward_per_share: U256,
    pub total_staked: i128,
    pub min_deposit: i128,
    /// Heights an unstake request waits before it can be withdrawn.
    pub unstake_lock_blocks: u32,
}

impl Pool {
    pub fn is_native(&self) -> bool {
        self.stake_asset == StakeAsset::Native
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn pool_key(pid: u32) -> (Symbol, u32) {
    (POOL, pid)
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn total_weight(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, weight: u64) {
    env.storage().instance().set(&TOTAL_WEIGHT, &weight);
}

/// Fetch a pool, failing with `InvalidPool` for ids that were never issued.
pub fn load(env: &Env, pid: u32) -> Result<Pool, ContractError> {
    if pid >= pool_count(env) {
        return Err(ContractError::InvalidPool);
    }
    let key = pool_key(pid);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::InvalidPool)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(pool)
}

pub fn save(env: &Env, pool: &Pool) {
    let key = pool_key(pool.id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append a fresh pool to the arena and add its weight to the total.
pub fn append(
    env: &Env,
    stake_asset: StakeAsset,
    weight: u64,
    min_deposit: i128,
    unstake_lock_blocks: u32,
    first_reward_height: u32,
) -> Result<Pool, ContractError> {
    let id = pool_count(env);
    let next_count = id.checked_add(1).ok_or(ContractError::MathOverflow)?;
    let new_total = total_weight(env)
        .checked_add(weight)
        .ok_or(ContractError::MathOverflow)?;

    let pool = Pool {
        id,
        stake_asset,
        weight,
        last_reward_height: first_reward_height,
        acc_reward_per_share: U256::from_u32(env, 0),
        total_staked: 0,
        min_deposit,
        unstake_lock_blocks,
    };
    save(env, &pool);
    env.storage().instance().set(&POOL_COUNT, &next_count);
    set_total_weight(env, new_total);

    Ok(pool)
}

/// Swap a pool's weight, keeping the aggregate in step with the delta.
pub fn reweight(env: &Env, pool: &mut Pool, new_weight: u64) -> Result<(), ContractError> {
    let new_total = total_weight(env)
        .checked_sub(pool.weight)
        .and_then(|rest| rest.checked_add(new_weight))
        .ok_or(ContractError::MathOverflow)?;
    pool.weight = new_weight;
    save(env, pool);
    set_total_weight(env, new_total);
    Ok(())
}
