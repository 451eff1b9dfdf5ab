//! Shared helpers for the staking contract suite.
//!
//! This crate provides:
//! - [`admin`]: a single stored admin with a two-step handover.
//! - [`pause`]: independent, named pause flags.
//! - TTL constants and the instance-storage TTL bump used by every contract.

#![no_std]

use soroban_sdk::Env;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod admin;
pub mod pause;

pub use pause::PauseFlag;

// ── Storage TTL ──────────────────────────────────────────────────────────────

/// Ledgers left before an entry's TTL is bumped.
pub const TTL_THRESHOLD: u32 = 5184000;
/// Ledgers an entry lives for after a bump.
pub const TTL_EXTEND_TO: u32 = 10368000;

/// Extends the TTL of the contract's instance storage.
///
/// Instance storage TTL applies to every instance key, so a single bump per
/// mutating call keeps the global configuration alive.
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
