//! Shared constants for macro implementations.

/// Options accepted by `#[dump(...)]` on a field.
pub const DUMP_FIELD_OPTIONS: &[&str] = &["skip", "hex", "display", "nested", "rename"];

/// Options accepted by `#[trace_fn(...)]`.
pub const TRACE_FN_OPTIONS: &[&str] = &["args", "exit", "label"];

/// Message of the line emitted on function entry.
pub const ENTER_MESSAGE: &str = "enter";
