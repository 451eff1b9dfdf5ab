use common::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::registry::Pool;
use crate::rewards;
use crate::ContractError;

const POSITION: Symbol = symbol_short!("POS");

/// A depositor's stake in one pool.
///
/// Right after every reconciliation
/// `reward_debt == staked_amount × acc_reward_per_share / ACC_PRECISION`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub staked_amount: i128,
    pub reward_debt: i128,
    /// Reward credited but not yet transferred.
    pub pending_reward: i128,
}

impl Position {
    /// Credit everything earned since the last debt reset.
    ///
    /// The pool must have just been advanced to the current height. The
    /// debt is left untouched; callers reset it after changing the stake.
    pub fn reconcile(&mut self, env: &Env, pool: &Pool) -> Result<i128, ContractError> {
        let accrued = rewards::accrued(
            env,
            self.staked_amount,
            &pool.acc_reward_per_share,
            self.reward_debt,
        )
        .ok_or(ContractError::MathOverflow)?;
        self.pending_reward = self
            .pending_reward
            .checked_add(accrued)
            .ok_or(ContractError::MathOverflow)?;
        Ok(accrued)
    }

    /// Re-price the debt against the pool's current accumulator.
    pub fn reset_debt(&mut self, env: &Env, pool: &Pool) -> Result<(), ContractError> {
        self.reward_debt =
            rewards::reward_debt(env, self.staked_amount, &pool.acc_reward_per_share)
                .ok_or(ContractError::MathOverflow)?;
        Ok(())
    }

    /// Zero the pending reward and return what it held.
    pub fn take_pending(&mut self) -> i128 {
        core::mem::take(&mut self.pending_reward)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn position_key(pid: u32, account: &Address) -> (Symbol, u32, Address) {
    (POSITION, pid, account.clone())
}

/// Read a position. Accounts that never deposited read as all zeroes.
pub fn load(env: &Env, pid: u32, account: &Address) -> Position {
    let key = position_key(pid, account);
    let position: Option<Position> = env.storage().persistent().get(&key);
    match position {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            position
        }
        None => Position::default(),
    }
}

pub fn save(env: &Env, pid: u32, account: &Address, position: &Position) {
    let key = position_key(pid, account);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
