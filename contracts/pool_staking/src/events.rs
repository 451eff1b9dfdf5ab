#![allow(deprecated)] // events().publish migration tracked separately

use common::PauseFlag;
use soroban_sdk::{symbol_short, Address, Env};

use crate::registry::StakeAsset;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub native_token: Address,
    pub start_height: u32,
    pub end_height: u32,
    pub reward_per_block: i128,
}

/// Fired when stake enters a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub account: Address,
    pub pid: u32,
    pub amount: i128,
    pub height: u32,
}

/// Fired when reward is paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimEvent {
    pub account: Address,
    pub pid: u32,
    pub amount: i128,
    pub height: u32,
}

/// Fired when stake is moved into the unstake queue.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestUnstakeEvent {
    pub account: Address,
    pub pid: u32,
    pub amount: i128,
    pub unlock_height: u32,
    pub height: u32,
}

/// Fired on every withdraw, carrying the matured amount released.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub account: Address,
    pub pid: u32,
    pub amount: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub stake_asset: StakeAsset,
    pub weight: u64,
    pub min_deposit: i128,
    pub unstake_lock_blocks: u32,
    pub last_reward_height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pid: u32,
    pub weight: u64,
    pub total_pool_weight: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfigSetEvent {
    pub pid: u32,
    pub min_deposit: i128,
    pub unstake_lock_blocks: u32,
}

/// Fired when the reward window or rate changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleSetEvent {
    pub start_height: u32,
    pub end_height: u32,
    pub reward_per_block: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub flag: PauseFlag,
    pub admin: Address,
    pub height: u32,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    native_token: Address,
    start_height: u32,
    end_height: u32,
    reward_per_block: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            native_token,
            start_height,
            end_height,
            reward_per_block,
        },
    );
}

pub fn publish_deposit(env: &Env, account: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), account.clone(), pid),
        DepositEvent {
            account,
            pid,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_claim(env: &Env, account: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIM"), account.clone(), pid),
        ClaimEvent {
            account,
            pid,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_request_unstake(
    env: &Env,
    account: Address,
    pid: u32,
    amount: i128,
    unlock_height: u32,
) {
    env.events().publish(
        (symbol_short!("UNSTK_REQ"), account.clone(), pid),
        RequestUnstakeEvent {
            account,
            pid,
            amount,
            unlock_height,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, account: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), account.clone(), pid),
        WithdrawEvent {
            account,
            pid,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    stake_asset: StakeAsset,
    weight: u64,
    min_deposit: i128,
    unstake_lock_blocks: u32,
    last_reward_height: u32,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            stake_asset,
            weight,
            min_deposit,
            unstake_lock_blocks,
            last_reward_height,
        },
    );
}

pub fn publish_pool_weight_set(env: &Env, pid: u32, weight: u64, total_pool_weight: u64) {
    env.events().publish(
        (symbol_short!("POOL_WGT"), pid),
        PoolWeightSetEvent {
            pid,
            weight,
            total_pool_weight,
        },
    );
}

pub fn publish_pool_config_set(env: &Env, pid: u32, min_deposit: i128, unstake_lock_blocks: u32) {
    env.events().publish(
        (symbol_short!("POOL_CFG"), pid),
        PoolConfigSetEvent {
            pid,
            min_deposit,
            unstake_lock_blocks,
        },
    );
}

pub fn publish_schedule_set(
    env: &Env,
    start_height: u32,
    end_height: u32,
    reward_per_block: i128,
) {
    env.events().publish(
        (symbol_short!("SCHED_SET"),),
        ScheduleSetEvent {
            start_height,
            end_height,
            reward_per_block,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_paused(env: &Env, flag: PauseFlag, admin: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"), flag),
        PauseEvent {
            flag,
            admin,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_unpaused(env: &Env, flag: PauseFlag, admin: Address) {
    env.events().publish(
        (symbol_short!("UNPAUSED"), flag),
        PauseEvent {
            flag,
            admin,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
        },
    );
}
