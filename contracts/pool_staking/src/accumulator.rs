use soroban_sdk::{log, Env};

use crate::config::{self, RewardSchedule};
use crate::registry::{self, Pool};
use crate::rewards;
use crate::ContractError;

/// Bring `pool`'s accumulator current to height `now` without touching
/// storage.
///
/// Only heights inside the reward window count:
///
/// ```text
/// from = max(last_reward_height, start_height)
/// to   = min(now, end_height)
/// ```
///
/// `last_reward_height` always advances to `now`, so a later change to the
/// window or rate never reaches back over heights already processed.
///
/// Returns the reward credited to the pool, which is zero when the pool is
/// empty (that span's reward is forfeited).
pub fn advance(
    env: &Env,
    pool: &mut Pool,
    schedule: &RewardSchedule,
    total_weight: u64,
    now: u32,
) -> Result<i128, ContractError> {
    if now <= pool.last_reward_height {
        return Ok(0);
    }

    let from = pool.last_reward_height.max(schedule.start_height);
    let to = now.min(schedule.end_height);
    pool.last_reward_height = now;

    if to <= from || total_weight == 0 {
        return Ok(0);
    }

    let reward = rewards::pool_reward(
        env,
        to - from,
        schedule.reward_per_block,
        pool.weight,
        total_weight,
    )
    .ok_or(ContractError::MathOverflow)?;

    if pool.total_staked <= 0 {
        return Ok(0);
    }

    pool.acc_reward_per_share =
        rewards::accrue(env, &pool.acc_reward_per_share, reward, pool.total_staked)
            .ok_or(ContractError::MathOverflow)?;

    Ok(reward)
}

/// Load, advance and persist one pool. Returns the updated pool.
pub fn update(env: &Env, pid: u32) -> Result<Pool, ContractError> {
    let mut pool = registry::load(env, pid)?;
    let schedule = config::load_schedule(env)?;
    let now = env.ledger().sequence();

    let credited = advance(env, &mut pool, &schedule, registry::total_weight(env), now)?;
    registry::save(env, &pool);

    if credited > 0 {
        log!(
            env,
            "pool {} accrued {} at height {}",
            pid,
            credited,
            now
        );
    }

    Ok(pool)
}

/// Advance every pool to the current height.
///
/// Must run before any change to the rate, the window or a weight so the old
/// parameters settle everything up to now.
pub fn update_all(env: &Env) -> Result<(), ContractError> {
    for pid in 0..registry::pool_count(env) {
        update(env, pid)?;
    }
    Ok(())
}
