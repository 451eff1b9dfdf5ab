#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based ledger tests driving the contract with random call
//! sequences on a single native pool.
//!
//! Invariants tested:
//! - `acc_reward_per_share` never decreases across any call order
//! - Reward paid plus reward still pending equals the emission for every
//!   height the pool was non-empty, within one unit per reconciliation
//! - `total_staked` always equals the sum of position stakes
//! - A second claim at the same height pays nothing

use pool_staking::{registry::StakeAsset, PoolStakingContract, PoolStakingContractClient};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env, U256};

// ── Helpers ───────────────────────────────────────────────────────────────────

const UNIT: i128 = 10_000_000;
const START: u32 = 110;
const END: u32 = 3_000;
const RATE: i128 = 3 * UNIT;
const USERS: usize = 3;

struct Harness {
    env: Env,
    client: PoolStakingContractClient<'static>,
    reward: Address,
    users: std::vec::Vec<Address>,
}

fn setup() -> Harness {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(START);

    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(PoolStakingContract, ());
    let client = PoolStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward, &native, &START, &END, &RATE);
    client.add_pool(&admin, &StakeAsset::Native, &100, &1, &5, &false);
    StellarAssetClient::new(&env, &reward).mint(&contract_id, &(1_000_000_000 * UNIT));

    let users = (0..USERS)
        .map(|_| {
            let user = Address::generate(&env);
            StellarAssetClient::new(&env, &native).mint(&user, &(1_000 * UNIT));
            user
        })
        .collect();

    Harness {
        env,
        client,
        reward,
        users,
    }
}

#[derive(Clone, Debug)]
enum Action {
    Deposit { user: usize, amount: i128 },
    Unstake { user: usize, amount: i128 },
    Claim { user: usize },
    Withdraw { user: usize },
    Advance { heights: u32 },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..USERS, 1i128..=20 * UNIT).prop_map(|(user, amount)| Action::Deposit { user, amount }),
        (0..USERS, 1i128..=20 * UNIT).prop_map(|(user, amount)| Action::Unstake { user, amount }),
        (0..USERS).prop_map(|user| Action::Claim { user }),
        (0..USERS).prop_map(|user| Action::Withdraw { user }),
        (1u32..=25).prop_map(|heights| Action::Advance { heights }),
    ]
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_ledger_stays_consistent(actions in prop::collection::vec(action(), 1..30)) {
        let h = setup();
        let mut height = START;
        let mut staked = [0i128; USERS];
        let mut emitted: i128 = 0;
        let mut reconciliations: i128 = 0;
        let mut last_acc = U256::from_u32(&h.env, 0);

        for action in actions {
            match action {
                Action::Deposit { user, amount } => {
                    h.client.deposit_native(&h.users[user], &amount);
                    staked[user] += amount;
                    reconciliations += 1;
                }
                Action::Unstake { user, amount } => {
                    let amount = amount.min(staked[user]);
                    if amount > 0 {
                        h.client.unstake(&h.users[user], &0, &amount);
                        staked[user] -= amount;
                        reconciliations += 1;
                    }
                }
                Action::Claim { user } => {
                    h.client.claim(&h.users[user], &0);
                    reconciliations += 1;
                }
                Action::Withdraw { user } => {
                    h.client.withdraw(&h.users[user], &0);
                }
                Action::Advance { heights } => {
                    if staked.iter().sum::<i128>() > 0 {
                        emitted += RATE * i128::from(heights);
                    }
                    height += heights;
                    h.env.ledger().set_sequence_number(height);
                }
            }

            let pool = h.client.pool(&0);
            prop_assert!(pool.acc_reward_per_share >= last_acc);
            last_acc = pool.acc_reward_per_share;
            prop_assert_eq!(pool.total_staked, staked.iter().sum::<i128>());
        }

        let reward_token = TokenClient::new(&h.env, &h.reward);
        let mut distributed: i128 = 0;
        for (i, user) in h.users.iter().enumerate() {
            prop_assert_eq!(h.client.position(&0, user).staked_amount, staked[i]);
            distributed += reward_token.balance(user) + h.client.pending_reward(&0, user);
        }

        let tolerance = reconciliations + USERS as i128;
        prop_assert!(distributed <= emitted + tolerance);
        prop_assert!(emitted - distributed <= tolerance);
    }

    /// Claiming twice without the height moving pays 0 the second time.
    #[test]
    fn prop_claim_is_idempotent_at_same_height(
        amount in 1i128..=50 * UNIT,
        heights in 0u32..=200,
    ) {
        let h = setup();
        let user = &h.users[0];
        h.client.deposit_native(user, &amount);
        h.env.ledger().set_sequence_number(START + heights);

        let first = h.client.claim(user, &0);
        let second = h.client.claim(user, &0);

        prop_assert!(RATE * i128::from(heights) - first <= 1);
        prop_assert_eq!(second, 0);
    }

    /// Stakes in ratio k:1 earn rewards in ratio k:1 within rounding.
    #[test]
    fn prop_rewards_proportional_to_stake(
        base in 1i128..=10 * UNIT,
        ratio in 1i128..=5,
        heights in 1u32..=300,
    ) {
        let h = setup();
        h.client.deposit_native(&h.users[0], &(base * ratio));
        h.client.deposit_native(&h.users[1], &base);
        h.env.ledger().set_sequence_number(START + heights);

        let big = h.client.claim(&h.users[0], &0);
        let small = h.client.claim(&h.users[1], &0);

        prop_assert!((big - small * ratio).abs() <= ratio + 1);
    }
}
