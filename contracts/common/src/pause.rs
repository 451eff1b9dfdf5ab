use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

// ── Types ────────────────────────────────────────────────────────────────────

/// Independently pausable operation groups.
///
/// Each flag guards its own set of entry points; pausing one never affects
/// the other.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PauseFlag {
    /// Reward claims.
    Claim,
    /// Unstake requests and principal withdrawals.
    Withdraw,
}

// ── Storage Keys ─────────────────────────────────────────────────────────────

fn pause_key(flag: PauseFlag) -> (Symbol, PauseFlag) {
    (symbol_short!("PAUSED"), flag)
}

// ── Core Functions ───────────────────────────────────────────────────────────

/// Returns `true` while `flag` is engaged. Unset flags read as not paused.
pub fn is_paused(env: &Env, flag: PauseFlag) -> bool {
    env.storage()
        .instance()
        .get(&pause_key(flag))
        .unwrap_or(false)
}

/// Sets `flag` to `paused`.
///
/// Idempotent: returns `true` only when the stored value actually changed.
pub fn set_paused(env: &Env, flag: PauseFlag, paused: bool) -> bool {
    if is_paused(env, flag) == paused {
        return false;
    }
    env.storage().instance().set(&pause_key(flag), &paused);
    true
}
