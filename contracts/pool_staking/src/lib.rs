#![no_std]

pub mod accumulator;
pub mod config;
pub mod events;
pub mod position;
pub mod registry;
pub mod rewards;
pub mod timelock;

use common::{admin, extend_instance_ttl, pause, PauseFlag};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

use config::RewardSchedule;
use position::Position;
use registry::{Pool, StakeAsset, NATIVE_PID};
use timelock::UnstakeRequest;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidInitParams = 3,
    Unauthorized = 4,
    NoPendingAdmin = 5,
    InvalidPool = 6,
    DepositTooSmall = 7,
    InvalidAmount = 8,
    /// `deposit` was used on the native-asset pool.
    NativeAssetPool = 9,
    /// `deposit_native` was used while pool 0 holds a token.
    NotNativePool = 10,
    InvalidPoolAsset = 11,
    InvalidWeight = 12,
    InvalidLockBlocks = 13,
    InvalidWindow = 14,
    InvalidRewardRate = 15,
    InsufficientStake = 16,
    RewardWindowEnded = 17,
    UnstakeQueueFull = 18,
    ClaimPaused = 19,
    WithdrawPaused = 20,
    MathOverflow = 21,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct PoolStakingContract;

#[contractimpl]
impl PoolStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token`     – token contract paid out as reward.
    /// * `native_token`     – asset contract of the network's native asset.
    /// * `start_height`     – first ledger height that earns reward.
    /// * `end_height`       – first ledger height that no longer earns reward.
    /// * `reward_per_block` – base units emitted per height across all pools.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        native_token: Address,
        start_height: u32,
        end_height: u32,
        reward_per_block: i128,
    ) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        let schedule = RewardSchedule {
            start_height,
            end_height,
            reward_per_block,
        };
        if !schedule.has_valid_window() || reward_per_block < 0 || reward_token == native_token {
            return Err(ContractError::InvalidInitParams);
        }

        admin::set_admin(&env, &admin);
        config::set_tokens(&env, &reward_token, &native_token);
        config::save_schedule(&env, &schedule);
        config::mark_initialized(&env);
        extend_instance_ttl(&env);

        events::publish_initialized(
            &env,
            admin,
            reward_token,
            native_token,
            start_height,
            end_height,
            reward_per_block,
        );

        Ok(())
    }

    // ── Pool registry (admin) ───────────────────────────────────────────────

    /// Register a new pool and return its id.
    ///
    /// The native asset may only occupy pool 0. With `with_update` every
    /// existing pool is settled first, so none of them absorbs reward at the
    /// new, diluted weight for heights before this pool existed.
    pub fn add_pool(
        env: Env,
        caller: Address,
        stake_asset: StakeAsset,
        weight: u64,
        min_deposit: i128,
        unstake_lock_blocks: u32,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_admin(&env, &caller)?;

        if weight == 0 {
            return Err(ContractError::InvalidWeight);
        }
        if min_deposit < 0 {
            return Err(ContractError::InvalidAmount);
        }
        if unstake_lock_blocks == 0 {
            return Err(ContractError::InvalidLockBlocks);
        }
        let asset_ok = match &stake_asset {
            StakeAsset::Native => registry::pool_count(&env) == NATIVE_PID,
            StakeAsset::Token(address) => {
                *address != config::native_token(&env)? && *address != config::reward_token(&env)?
            }
        };
        if !asset_ok {
            return Err(ContractError::InvalidPoolAsset);
        }

        let schedule = config::load_schedule(&env)?;
        let now = env.ledger().sequence();
        if now >= schedule.end_height {
            return Err(ContractError::RewardWindowEnded);
        }

        if with_update {
            accumulator::update_all(&env)?;
        }

        let pool = registry::append(
            &env,
            stake_asset,
            weight,
            min_deposit,
            unstake_lock_blocks,
            now.max(schedule.start_height),
        )?;

        events::publish_pool_added(
            &env,
            pool.id,
            pool.stake_asset,
            pool.weight,
            pool.min_deposit,
            pool.unstake_lock_blocks,
            pool.last_reward_height,
        );

        Ok(pool.id)
    }

    /// Change a pool's weight, optionally settling all pools first.
    pub fn set_pool_weight(
        env: Env,
        caller: Address,
        pid: u32,
        new_weight: u64,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &caller)?;
        let mut pool = registry::load(&env, pid)?;

        if new_weight == 0 {
            return Err(ContractError::InvalidWeight);
        }
        if with_update {
            accumulator::update_all(&env)?;
            pool = registry::load(&env, pid)?;
        }

        registry::reweight(&env, &mut pool, new_weight)?;

        events::publish_pool_weight_set(&env, pid, new_weight, registry::total_weight(&env));

        Ok(())
    }

    /// Update a pool's minimum deposit and unstake lock.
    ///
    /// Requests already queued keep the unlock height they were given.
    pub fn set_pool_config(
        env: Env,
        caller: Address,
        pid: u32,
        min_deposit: i128,
        unstake_lock_blocks: u32,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &caller)?;
        let mut pool = registry::load(&env, pid)?;

        if min_deposit < 0 {
            return Err(ContractError::InvalidAmount);
        }
        if unstake_lock_blocks == 0 {
            return Err(ContractError::InvalidLockBlocks);
        }

        pool.min_deposit = min_deposit;
        pool.unstake_lock_blocks = unstake_lock_blocks;
        registry::save(&env, &pool);

        events::publish_pool_config_set(&env, pid, min_deposit, unstake_lock_blocks);

        Ok(())
    }

    // ── Schedule (admin) ────────────────────────────────────────────────────

    /// Move the start of the reward window. Must stay below the end height.
    pub fn set_start_block(env: Env, caller: Address, start_height: u32) -> Result<(), ContractError> {
        Self::require_admin(&env, &caller)?;
        let mut schedule = config::load_schedule(&env)?;
        schedule.start_height = start_height;
        Self::apply_schedule(&env, schedule)
    }

    /// Move the end of the reward window. Must stay above the start height.
    pub fn set_end_block(env: Env, caller: Address, end_height: u32) -> Result<(), ContractError> {
        Self::require_admin(&env, &caller)?;
        let mut schedule = config::load_schedule(&env)?;
        schedule.end_height = end_height;
        Self::apply_schedule(&env, schedule)
    }

    /// Change the per-height emission.
    ///
    /// All pools are settled at the old rate first, so the new rate only
    /// applies from the current height forward.
    pub fn set_reward_per_block(
        env: Env,
        caller: Address,
        reward_per_block: i128,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &caller)?;
        if reward_per_block < 0 {
            return Err(ContractError::InvalidRewardRate);
        }
        let mut schedule = config::load_schedule(&env)?;
        schedule.reward_per_block = reward_per_block;
        Self::apply_schedule(&env, schedule)
    }

    // ── Pause flags (admin) ─────────────────────────────────────────────────

    pub fn pause_claim(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_pause(&env, caller, PauseFlag::Claim, true)
    }

    pub fn unpause_claim(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_pause(&env, caller, PauseFlag::Claim, false)
    }

    /// Halts both unstake requests and withdrawals.
    pub fn pause_withdraw(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_pause(&env, caller, PauseFlag::Withdraw, true)
    }

    pub fn unpause_withdraw(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_pause(&env, caller, PauseFlag::Withdraw, false)
    }

    // ── Deposits ────────────────────────────────────────────────────────────

    /// Stake `amount` of the native asset into pool 0.
    ///
    /// The amount moves from `staker` through the native asset contract.
    pub fn deposit_native(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let pool = registry::load(&env, NATIVE_PID)?;
        if !pool.is_native() {
            return Err(ContractError::NotNativePool);
        }
        Self::check_deposit_amount(&pool, amount)?;

        Self::credit_stake(&env, &staker, NATIVE_PID, amount)?;

        // Interaction last: every ledger entry above is already final.
        let native = config::native_token(&env)?;
        token::Client::new(&env, &native).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_deposit(&env, staker, NATIVE_PID, amount);

        Ok(())
    }

    /// Stake `amount` of a token pool's asset.
    ///
    /// The contract pulls the tokens with `transfer_from`, so `staker` must
    /// have approved the contract as spender beforehand.
    pub fn deposit(env: Env, staker: Address, pid: u32, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let pool = registry::load(&env, pid)?;
        let stake_token = match &pool.stake_asset {
            StakeAsset::Native => return Err(ContractError::NativeAssetPool),
            StakeAsset::Token(address) => address.clone(),
        };
        Self::check_deposit_amount(&pool, amount)?;

        Self::credit_stake(&env, &staker, pid, amount)?;

        let contract = env.current_contract_address();
        token::Client::new(&env, &stake_token).transfer_from(&contract, &staker, &contract, &amount);

        events::publish_deposit(&env, staker, pid, amount);

        Ok(())
    }

    // ── Unstaking ───────────────────────────────────────────────────────────

    /// Move `amount` out of the active stake into the unstake queue.
    ///
    /// The stake stops earning immediately; the principal becomes
    /// withdrawable `unstake_lock_blocks` heights from now. Returns the
    /// unlock height.
    pub fn unstake(env: Env, staker: Address, pid: u32, amount: i128) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        registry::load(&env, pid)?;
        if pause::is_paused(&env, PauseFlag::Withdraw) {
            return Err(ContractError::WithdrawPaused);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = accumulator::update(&env, pid)?;
        let mut position = position::load(&env, pid, &staker);
        if amount > position.staked_amount {
            return Err(ContractError::InsufficientStake);
        }
        position.reconcile(&env, &pool)?;

        position.staked_amount -= amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        position.reset_debt(&env, &pool)?;

        let unlock_height = env
            .ledger()
            .sequence()
            .checked_add(pool.unstake_lock_blocks)
            .ok_or(ContractError::MathOverflow)?;
        timelock::enqueue(
            &env,
            pid,
            &staker,
            UnstakeRequest {
                amount,
                unlock_height,
            },
        )?;

        registry::save(&env, &pool);
        position::save(&env, pid, &staker, &position);
        extend_instance_ttl(&env);

        events::publish_request_unstake(&env, staker, pid, amount, unlock_height);

        Ok(unlock_height)
    }

    /// Release every matured unstake request for `pid` and return the total.
    ///
    /// Requests still inside their lock stay queued. Nothing matured is not an
    /// error: the call succeeds and releases 0.
    pub fn withdraw(env: Env, staker: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let pool = registry::load(&env, pid)?;
        if pause::is_paused(&env, PauseFlag::Withdraw) {
            return Err(ContractError::WithdrawPaused);
        }

        let now = env.ledger().sequence();
        let released = timelock::drain_matured(&env, pid, &staker, now)?;
        extend_instance_ttl(&env);

        if released > 0 {
            let asset = config::asset_address(&env, &pool.stake_asset)?;
            token::Client::new(&env, &asset).transfer(
                &env.current_contract_address(),
                &staker,
                &released,
            );
            log!(&env, "pool {} released {} at height {}", pid, released, now);
        }

        events::publish_withdraw(&env, staker, pid, released);

        Ok(released)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has earned in `pid` and return the amount.
    ///
    /// The contract must hold enough reward tokens (funded by the admin). A
    /// second claim at the same height pays 0.
    pub fn claim(env: Env, staker: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        registry::load(&env, pid)?;
        if pause::is_paused(&env, PauseFlag::Claim) {
            return Err(ContractError::ClaimPaused);
        }

        let pool = accumulator::update(&env, pid)?;
        let mut position = position::load(&env, pid, &staker);
        position.reconcile(&env, &pool)?;
        position.reset_debt(&env, &pool)?;
        let amount = position.take_pending();
        position::save(&env, pid, &staker, &position);
        extend_instance_ttl(&env);

        if amount > 0 {
            let reward_token = config::reward_token(&env)?;
            token::Client::new(&env, &reward_token).transfer(
                &env.current_contract_address(),
                &staker,
                &amount,
            );
        }

        events::publish_claim(&env, staker, pid, amount);

        Ok(amount)
    }

    /// Bring every pool's accumulator up to the current height.
    pub fn all_pool_update(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        accumulator::update_all(&env)?;
        extend_instance_ttl(&env);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        registry::load(&env, pid)
    }

    pub fn pool_count(env: Env) -> u32 {
        registry::pool_count(&env)
    }

    pub fn total_pool_weight(env: Env) -> u64 {
        registry::total_weight(&env)
    }

    /// Stored position of `account` in `pid`, as of its last interaction.
    pub fn position(env: Env, pid: u32, account: Address) -> Result<Position, ContractError> {
        registry::load(&env, pid)?;
        Ok(position::load(&env, pid, &account))
    }

    /// Reward `account` could claim from `pid` right now, computed without
    /// mutating state.
    pub fn pending_reward(env: Env, pid: u32, account: Address) -> Result<i128, ContractError> {
        let mut pool = registry::load(&env, pid)?;
        let schedule = config::load_schedule(&env)?;
        accumulator::advance(
            &env,
            &mut pool,
            &schedule,
            registry::total_weight(&env),
            env.ledger().sequence(),
        )?;

        let mut position = position::load(&env, pid, &account);
        position.reconcile(&env, &pool)?;
        Ok(position.pending_reward)
    }

    /// Outstanding unstake requests of `account` in `pid`, oldest first.
    pub fn unstake_requests(
        env: Env,
        pid: u32,
        account: Address,
    ) -> Result<Vec<UnstakeRequest>, ContractError> {
        registry::load(&env, pid)?;
        Ok(timelock::load(&env, pid, &account))
    }

    /// `(total requested, withdrawable now)` for `account` in `pid`.
    pub fn withdrawable(env: Env, pid: u32, account: Address) -> Result<(i128, i128), ContractError> {
        registry::load(&env, pid)?;
        timelock::totals(&env, pid, &account, env.ledger().sequence())
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        config::reward_token(&env)
    }

    pub fn get_native_token(env: Env) -> Result<Address, ContractError> {
        config::native_token(&env)
    }

    pub fn get_reward_per_block(env: Env) -> Result<i128, ContractError> {
        Ok(config::load_schedule(&env)?.reward_per_block)
    }

    pub fn get_start_height(env: Env) -> Result<u32, ContractError> {
        Ok(config::load_schedule(&env)?.start_height)
    }

    pub fn get_end_height(env: Env) -> Result<u32, ContractError> {
        Ok(config::load_schedule(&env)?.end_height)
    }

    pub fn is_claim_paused(env: Env) -> bool {
        pause::is_paused(&env, PauseFlag::Claim)
    }

    pub fn is_withdraw_paused(env: Env) -> bool {
        pause::is_paused(&env, PauseFlag::Withdraw)
    }

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        admin::get_admin(&env).ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &current_admin)?;

        admin::propose_admin(&env, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        if admin::get_pending_admin(&env).is_none() {
            return Err(ContractError::NoPendingAdmin);
        }
        let old_admin = admin::accept_admin(&env, &new_admin).ok_or(ContractError::Unauthorized)?;

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &current_admin)?;

        let pending = admin::cancel_admin_transfer(&env).ok_or(ContractError::NoPendingAdmin)?;

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        admin::get_pending_admin(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !config::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: authenticate `caller` and revert unless it is the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        if !admin::is_admin(env, caller) {
            return Err(ContractError::Unauthorized);
        }
        extend_instance_ttl(env);
        Ok(())
    }

    fn check_deposit_amount(pool: &Pool, amount: i128) -> Result<(), ContractError> {
        if amount < pool.min_deposit {
            return Err(ContractError::DepositTooSmall);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        Ok(())
    }

    /// Settle `pid`, reconcile the staker, then add `amount` to both the
    /// position and the pool. Everything is persisted before returning.
    fn credit_stake(
        env: &Env,
        staker: &Address,
        pid: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        let mut pool = accumulator::update(env, pid)?;
        let mut position = position::load(env, pid, staker);
        position.reconcile(env, &pool)?;

        position.staked_amount = position
            .staked_amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        position.reset_debt(env, &pool)?;

        registry::save(env, &pool);
        position::save(env, pid, staker, &position);
        extend_instance_ttl(env);
        Ok(())
    }

    /// Settle every pool under the current schedule, then store `schedule`.
    fn apply_schedule(env: &Env, schedule: RewardSchedule) -> Result<(), ContractError> {
        if !schedule.has_valid_window() {
            return Err(ContractError::InvalidWindow);
        }

        accumulator::update_all(env)?;
        config::save_schedule(env, &schedule);

        events::publish_schedule_set(
            env,
            schedule.start_height,
            schedule.end_height,
            schedule.reward_per_block,
        );

        Ok(())
    }

    fn set_pause(
        env: &Env,
        caller: Address,
        flag: PauseFlag,
        paused: bool,
    ) -> Result<(), ContractError> {
        Self::require_admin(env, &caller)?;

        if pause::set_paused(env, flag, paused) {
            if paused {
                events::publish_paused(env, flag, caller);
            } else {
                events::publish_unpaused(env, flag, caller);
            }
        }

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
