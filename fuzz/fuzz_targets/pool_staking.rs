#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pool_staking::{
    registry::StakeAsset, ContractError, PoolStakingContract, PoolStakingContractClient,
};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::StellarAssetClient;
use soroban_sdk::{Address, Env};

/// One whole token at 18 decimals.
const WAD: i128 = 1_000_000_000_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { amount: u64 },
    Unstake { amount: u64 },
    Withdraw,
    Claim,
    Advance { heights: u8 },
    SetRate { rate: u32 },
}

/// Rejections are expected; arithmetic overflow on these input ranges is not.
fn check<T, E>(result: Result<T, Result<ContractError, E>>) {
    assert!(
        !matches!(result, Err(Ok(ContractError::MathOverflow))),
        "arithmetic overflow on in-range input"
    );
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(100);

    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(PoolStakingContract, ());
    let client = PoolStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward, &native, &100, &2_000, &WAD);
    client.add_pool(&admin, &StakeAsset::Native, &1, &(WAD / 10), &10, &false);
    StellarAssetClient::new(&env, &reward).mint(&contract_id, &(10_000_000 * WAD));

    let mut users = vec![admin.clone()];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }
    for user in &users {
        StellarAssetClient::new(&env, &native).mint(user, &(1_000_000 * WAD));
    }

    let mut height = 100u32;
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { amount } => {
                let amount = i128::from(amount) * 1_000_000;
                check(client.try_deposit_native(caller, &amount));
            }
            FuzzAction::Unstake { amount } => {
                let amount = i128::from(amount) * 1_000_000;
                check(client.try_unstake(caller, &0, &amount));
            }
            FuzzAction::Withdraw => {
                check(client.try_withdraw(caller, &0));
            }
            FuzzAction::Claim => {
                check(client.try_claim(caller, &0));
            }
            FuzzAction::Advance { heights } => {
                height = height.saturating_add(u32::from(heights));
                env.ledger().set_sequence_number(height);
            }
            FuzzAction::SetRate { rate } => {
                let rate = i128::from(rate) * 1_000_000_000;
                check(client.try_set_reward_per_block(&admin, &rate));
            }
        }
    }
});
