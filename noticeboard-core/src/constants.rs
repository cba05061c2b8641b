//! Store constants for noticeboard.
//!
//! Defaults for the notice sequence and the eviction timer. All of them can be
//! overridden through `StoreConfig` except the id wrap bound.

// ═══════════════════════════════════════════════════════════════════════════════
// CAPACITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default number of most-recent notices kept in the store.
/// Publishing beyond this discards the oldest notices immediately.
pub const DEFAULT_CAPACITY: usize = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// EVICTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Default delay between dismissal and physical removal, in milliseconds.
/// This is a safety-net cleanup, not a user-visible display duration.
pub const DEFAULT_EVICTION_DELAY_MS: u64 = 1_000_000;

// ═══════════════════════════════════════════════════════════════════════════════
// ID ALLOCATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Modulus of the notice id counter (2^53 - 1).
/// Ids stay exactly representable as JSON numbers on any consumer.
pub const ID_WRAP: u64 = 9_007_199_254_740_991;

// ═══════════════════════════════════════════════════════════════════════════════
// CONVENIENCE NOTICES
// ═══════════════════════════════════════════════════════════════════════════════

/// Title used by [`crate::Notifier::report_error`].
pub const ERROR_TITLE: &str = "Error";

/// Title used by [`crate::Notifier::report_result`] on success.
pub const SUCCESS_TITLE: &str = "Success";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable overriding the store capacity.
pub const ENV_CAPACITY: &str = "NOTICEBOARD_CAPACITY";

/// Environment variable overriding the eviction delay (milliseconds).
pub const ENV_EVICTION_DELAY_MS: &str = "NOTICEBOARD_EVICTION_DELAY_MS";

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE-TIME CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

const _: () = {
    assert!(DEFAULT_CAPACITY > 0);
    assert!(DEFAULT_EVICTION_DELAY_MS > 0);
    assert!(ID_WRAP > 1);
};
