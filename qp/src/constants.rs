//! Centralized constants for the qp crate.
//!
//! All limits, layout tokens and environment variable names live here so the
//! output format stays greppable and consistent across every probe.
//!
//! # Environment Variables
//!
//! | Variable                | Default  | Description                                   |
//! |-------------------------|----------|-----------------------------------------------|
//! | `QP_SINK`               | `stderr` | `stderr`, `stdout`, `null`, `console`, `file:<path>` |
//! | `QP_TIME_HEADER`        | `none`   | `none`, `4_3`, `5_6`, `iso`                   |
//! | `QP_RATELIMIT_INTERVAL` | `1000`   | Rate-limit interval in milliseconds           |
//! | `QP_CHECK`              | `abort`  | `abort`, `panic`, `continue`                  |
//!
//! ## Example
//!
//! ```bash
//! # Millisecond timestamps, failed checks keep going
//! QP_TIME_HEADER=4_3 QP_CHECK=continue cargo test --features qp/enabled
//! ```

// ============================================================================
// TIME CONSTANTS
// ============================================================================

/// Seconds in a day (24 * 60 * 60).
pub const SECONDS_PER_DAY: u64 = 86400;

/// Seconds in an hour (60 * 60).
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Seconds in a minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

// ============================================================================
// LINE LAYOUT
// ============================================================================

/// Rendered in place of a value whose formatting implementation failed.
pub const PLACEHOLDER: &str = "<unrenderable>";

/// Message of a trace point without a label.
pub const TRACE_MESSAGE: &str = "trace";

/// Separator between the message and payload fields.
pub const FIELD_SEPARATOR: &str = ", ";

// ============================================================================
// RATE LIMITING
// ============================================================================

/// Default interval for rate-limited prints, in milliseconds.
pub const DEFAULT_RATELIMIT_INTERVAL_MS: u64 = 1000;

/// Interval for `qp_dump_stack_ratelimit!`, in milliseconds.
pub const STACK_RATELIMIT_INTERVAL_MS: u64 = 5000;

// ============================================================================
// DUMP LIMITS
// ============================================================================

/// Maximum number of frames printed by a stack dump.
pub const MAX_STACK_FRAMES: usize = 20;

/// Bytes per row in a hex block dump.
pub const HEX_ROW_BYTES: usize = 16;

/// Bytes per group in hex dumps; groups are separated by an extra space.
pub const HEX_GROUP_BYTES: usize = 8;

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Selects the default sink.
pub const ENV_SINK: &str = "QP_SINK";

/// Selects the time header.
pub const ENV_TIME_HEADER: &str = "QP_TIME_HEADER";

/// Overrides the rate-limit interval (milliseconds).
pub const ENV_RATELIMIT_INTERVAL: &str = "QP_RATELIMIT_INTERVAL";

/// Selects what a failed `qp_check!` does.
pub const ENV_CHECK: &str = "QP_CHECK";

/// Device written by the `console` sink.
pub const CONSOLE_PATH: &str = "/dev/console";
