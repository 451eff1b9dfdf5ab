use soroban_sdk::{Env, U256};

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// Every reward-per-share value is multiplied by this constant before storage
/// so sub-unit precision survives integer division.
pub const ACC_PRECISION: i128 = 1_000_000_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────
//
// The accumulator is a U256 and every product is formed in 256 bits. Helpers
// return `None` when a value leaves its range (a negative operand, a U256
// product that would wrap, or an amount that no longer fits in i128); callers
// map that to `ContractError::MathOverflow`. All divisions truncate toward
// zero, which loses at most one base unit per operation.

fn precision(env: &Env) -> U256 {
    U256::from_u128(env, ACC_PRECISION.unsigned_abs())
}

fn u256_max(env: &Env) -> U256 {
    U256::from_parts(env, u64::MAX, u64::MAX, u64::MAX, u64::MAX)
}

/// Widen a non-negative amount.
fn widen(env: &Env, amount: i128) -> Option<U256> {
    u128::try_from(amount)
        .ok()
        .map(|amount| U256::from_u128(env, amount))
}

/// Narrow back to an amount, if it fits.
fn narrow(value: &U256) -> Option<i128> {
    i128::try_from(value.to_u128()?).ok()
}

/// `a × b / divisor`, refusing products that would wrap 256 bits.
fn mul_div(env: &Env, a: &U256, b: &U256, divisor: &U256) -> Option<U256> {
    let zero = U256::from_u32(env, 0);
    if *divisor == zero {
        return None;
    }
    if *a == zero || *b == zero {
        return Some(zero);
    }
    if *b > u256_max(env).div(a) {
        return None;
    }
    Some(a.mul(b).div(divisor))
}

/// Reward owed to one pool for `elapsed` rewarded heights.
///
/// ```text
/// pool_reward = elapsed × reward_per_block × weight / total_weight
/// ```
///
/// A zero `total_weight` means no pool is entitled to anything.
pub fn pool_reward(
    env: &Env,
    elapsed: u32,
    reward_per_block: i128,
    weight: u64,
    total_weight: u64,
) -> Option<i128> {
    if total_weight == 0 {
        return Some(0);
    }
    let emitted = widen(env, i128::from(elapsed).checked_mul(reward_per_block)?)?;
    let weight = U256::from_u128(env, u128::from(weight));
    let total_weight = U256::from_u128(env, u128::from(total_weight));
    narrow(&mul_div(env, &emitted, &weight, &total_weight)?)
}

/// Fold `pool_reward` into the accumulator.
///
/// ```text
/// Δacc = pool_reward × ACC_PRECISION / total_staked
/// ```
///
/// An empty pool returns `acc` unchanged: the reward for that span is
/// forfeited rather than carried forward to the next depositor.
pub fn accrue(env: &Env, acc: &U256, pool_reward: i128, total_staked: i128) -> Option<U256> {
    if total_staked <= 0 || pool_reward <= 0 {
        return Some(acc.clone());
    }
    let delta = mul_div(
        env,
        &widen(env, pool_reward)?,
        &precision(env),
        &widen(env, total_staked)?,
    )?;
    if delta > u256_max(env).sub(acc) {
        return None;
    }
    Some(acc.add(&delta))
}

/// The accumulator value already priced into a position of size `staked`.
pub fn reward_debt(env: &Env, staked: i128, acc: &U256) -> Option<i128> {
    narrow(&mul_div(env, &widen(env, staked)?, acc, &precision(env))?)
}

/// Reward a position earned since its debt was last reset.
///
/// ```text
/// accrued = staked × acc / ACC_PRECISION − reward_debt
/// ```
pub fn accrued(env: &Env, staked: i128, acc: &U256, debt: i128) -> Option<i128> {
    reward_debt(env, staked, acc)?.checked_sub(debt)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
