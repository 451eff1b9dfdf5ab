#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property tests for the fixed-point reward helpers.
//!
//! Invariants tested:
//! - The accumulator never decreases
//! - Splitting an interval never credits more than the whole interval
//! - Per-position rounding loses less than one base unit
//! - 18-decimal amounts stay representable across a full reward window

use pool_staking::rewards::{accrue, accrued, pool_reward, reward_debt, ACC_PRECISION};
use proptest::prelude::*;
use soroban_sdk::{Env, U256};

/// One whole token at 18 decimals.
const WAD: i128 = 1_000_000_000_000_000_000;

proptest! {
    /// `accrue` never lowers the accumulator, whatever the pool size.
    #[test]
    fn prop_accrue_is_monotone(
        acc in 0i128..=1_000_000 * ACC_PRECISION,
        reward in 0i128..=1_000_000_000_000i128,
        total_staked in 0i128..=1_000_000_000_000_000i128,
    ) {
        let env = Env::default();
        let acc = U256::from_u128(&env, acc as u128);
        let next = accrue(&env, &acc, reward, total_staked).unwrap();
        prop_assert!(next >= acc);
    }

    /// Crediting `a + b` heights at once is never less than crediting them in
    /// two steps: truncation only ever loses reward, it never invents it.
    #[test]
    fn prop_split_interval_never_exceeds_whole(
        a in 0u32..=5_000,
        b in 0u32..=5_000,
        rate in 0i128..=10_000_000_000i128,
        weight in 1u64..=1_000,
        extra_weight in 0u64..=1_000,
    ) {
        let env = Env::default();
        let total = weight + extra_weight;
        let whole = pool_reward(&env, a + b, rate, weight, total).unwrap();
        let split = pool_reward(&env, a, rate, weight, total).unwrap()
            + pool_reward(&env, b, rate, weight, total).unwrap();
        prop_assert!(split <= whole);
        prop_assert!(whole - split <= 1);
    }

    /// A single position's accrued reward is within one unit of the exact
    /// `staked × Δacc / ACC_PRECISION`.
    #[test]
    fn prop_accrued_rounding_bounded(
        staked in 1i128..=1_000_000_000_000i128,
        acc_before in 0i128..=1_000 * ACC_PRECISION,
        delta in 0i128..=1_000 * ACC_PRECISION,
    ) {
        let env = Env::default();
        let before = U256::from_u128(&env, acc_before as u128);
        let after = U256::from_u128(&env, (acc_before + delta) as u128);
        let debt = reward_debt(&env, staked, &before).unwrap();
        let got = accrued(&env, staked, &after, debt).unwrap();
        let exact_floor = staked * delta / ACC_PRECISION;
        prop_assert!(got >= exact_floor);
        prop_assert!(got - exact_floor <= 1);
    }

    /// With 18-decimal rates and stakes, a sole staker's reward over the
    /// whole window is computed without overflow. Accumulator truncation
    /// costs at most one base unit per whole staked token.
    #[test]
    fn prop_wad_scale_window_is_representable(
        rate_tokens in 1i128..=1_000,
        staked_tokens in 1i128..=1_000_000,
        heights in 1u32..=100_000,
    ) {
        let env = Env::default();
        let rate = rate_tokens * WAD;
        let staked = staked_tokens * WAD;

        let reward = pool_reward(&env, heights, rate, 1, 1).unwrap();
        let acc = accrue(&env, &U256::from_u32(&env, 0), reward, staked).unwrap();
        let earned = accrued(&env, staked, &acc, 0).unwrap();

        prop_assert!(earned <= reward);
        prop_assert!(reward - earned <= staked_tokens);
    }
}
