//! Step tracing for macro development.
//!
//! Enable with `--features macro-trace` to see which items the derive and
//! attribute macros visit and what they decide for each.

/// Trace a macro step to stderr.
///
/// Only active when `macro-trace` feature is enabled.
/// Usage: `cargo build --features qp-macros/macro-trace 2>&1 | grep QP-MACRO`
#[cfg(feature = "macro-trace")]
macro_rules! trace {
    ($step:expr, $item:expr) => {
        eprintln!("[QP-MACRO:{}] {}", $step, $item);
    };
    ($step:expr, $item:expr, $detail:expr) => {
        eprintln!("[QP-MACRO:{}] {} -> {:?}", $step, $item, $detail);
    };
}

/// No-op when macro-trace feature is disabled.
#[cfg(not(feature = "macro-trace"))]
macro_rules! trace {
    ($step:expr, $item:expr) => {
        let _ = (&$step, &$item);
    };
    ($step:expr, $item:expr, $detail:expr) => {
        let _ = (&$step, &$item, &$detail);
    };
}

pub(crate) use trace;
