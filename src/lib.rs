/// Single account state: validated number, balance and the deposit/withdraw
/// rules. Balance changes are validated into events first, then applied.
pub mod account;

/// Credential value plus the verification interface used by the store.
pub mod credential;

/// Owns every account and keeps the snapshot on disk in sync after each
/// successful mutation.
///
/// NOTE: [`store::SnapshotStorage`] is the integration point for anything
/// other than a JSON file.
pub mod store;

/// Two-account money movement with a fee.
pub mod transfer;

/// Login and registration checks in front of the store.
pub mod auth;

/// Login state machine wrapping the account operations for one user.
pub mod session;

/// Teller settings from defaults, environment and command line.
pub mod config;

/// Interactive teller and report printer. Lives in the library so the
/// integration tests can drive it with scripted input.
pub mod bin_utils;
