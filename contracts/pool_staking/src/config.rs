use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::registry::StakeAsset;
use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const SCHEDULE: Symbol = symbol_short!("SCHED");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const NATIVE_TOKEN: Symbol = symbol_short!("NTV_TOK");

// ── Types ───────────────────────────────────────────────────────────────────

/// The global emission schedule.
///
/// Reward accrues only for heights inside `[start_height, end_height)`, at
/// `reward_per_block` base units per height, split across pools by weight.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardSchedule {
    pub start_height: u32,
    pub end_height: u32,
    pub reward_per_block: i128,
}

impl RewardSchedule {
    /// `start_height < end_height` must hold after every mutation.
    pub fn has_valid_window(&self) -> bool {
        self.start_height < self.end_height
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
}

pub fn load_schedule(env: &Env) -> Result<RewardSchedule, ContractError> {
    env.storage()
        .instance()
        .get(&SCHEDULE)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_schedule(env: &Env, schedule: &RewardSchedule) {
    env.storage().instance().set(&SCHEDULE, schedule);
}

pub fn set_tokens(env: &Env, reward_token: &Address, native_token: &Address) {
    env.storage().instance().set(&REWARD_TOKEN, reward_token);
    env.storage().instance().set(&NATIVE_TOKEN, native_token);
}

pub fn reward_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&REWARD_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

pub fn native_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&NATIVE_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

/// Resolve a pool's stake asset to the token contract that moves it.
pub fn asset_address(env: &Env, asset: &StakeAsset) -> Result<Address, ContractError> {
    match asset {
        StakeAsset::Native => native_token(env),
        StakeAsset::Token(address) => Ok(address.clone()),
    }
}
