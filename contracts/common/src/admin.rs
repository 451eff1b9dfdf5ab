use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Stores `admin` as the single privileged identity.
/// Only callable internally; callers must verify authorization beforehand.
pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

/// Returns the current admin, if one has been set.
pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

/// Returns `true` if `caller` is the stored admin.
///
/// The caller must have already been authenticated via `require_auth()`.
pub fn is_admin(env: &Env, caller: &Address) -> bool {
    match get_admin(env) {
        Some(admin) => admin == *caller,
        None => false,
    }
}

// ── Two-step handover ────────────────────────────────────────────────────────

/// Records `new_admin` as the pending admin, replacing any earlier proposal.
pub fn propose_admin(env: &Env, new_admin: &Address) {
    env.storage().instance().set(&PENDING_ADMIN, new_admin);
}

/// Returns the pending admin, if a handover is in progress.
pub fn get_pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

/// Completes the handover if `caller` is the pending admin.
///
/// Returns the previous admin on success, `None` if no handover is pending
/// or `caller` is not the proposed address.
pub fn accept_admin(env: &Env, caller: &Address) -> Option<Address> {
    let pending = get_pending_admin(env)?;
    if pending != *caller {
        return None;
    }
    let old_admin = get_admin(env)?;
    set_admin(env, caller);
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(old_admin)
}

/// Drops a pending handover, returning the address that was proposed.
pub fn cancel_admin_transfer(env: &Env) -> Option<Address> {
    let pending = get_pending_admin(env)?;
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(pending)
}
