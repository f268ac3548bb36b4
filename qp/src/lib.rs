// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
// Pedantic lints - allow stylistic ones that don't affect correctness
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Event builders are consumed by emit
#![allow(clippy::module_name_repetitions)] // ConfigError, SinkSpec read better qualified
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::match_same_arms)] // Intentional for clarity
#![allow(clippy::format_push_string)] // String building style
// Byte views index after an explicit length check
#![allow(clippy::indexing_slicing)]
#![allow(clippy::double_must_use)] // Builder methods can have their own docs

//! qp - Quick Print debug macros
//!
//! # Overview
//!
//! qp is a set of throwaway debug macros for surgical insertion into code
//! under investigation: drop in a probe, read the line it prints, delete it.
//! Every probe prints one line that says where it sits and what it saw:
//!
//! ```text
//! src/engine.rs:42:compute: x = 5, y + 1 = 3
//! ```
//!
//! # Compile-Time Toggle
//!
//! Probes are active only with the `enabled` feature. Without it every macro
//! still type-checks its arguments but evaluates nothing and emits nothing:
//!
//! ```toml
//! [dependencies]
//! qp = "0.3"
//!
//! [features]
//! debug-probes = ["qp/enabled"]
//! ```
//!
//! Inside this workspace `cargo test --workspace` always builds with
//! `enabled` (the macro crate's tests turn it on). The compiled-out build is
//! tested with `cargo test-disabled` and the `nonfatal` default with
//! `cargo test-nonfatal`, both aliases from `.cargo/config.toml`.
//!
//! # Core Macros
//!
//! - [`qp_trace!`] - trace point, optionally labeled
//! - [`qp_dump!`] - `expr = value` pairs, rendered through `Debug`
//! - [`qp_check!`] - assertion probe; prints the failed condition
//! - [`qp_tap!`] - dump and pass the value through
//!
//! # More Macros
//!
//! - [`qp_dump_fmt!`], [`qp_dump_fields!`] (with `#[derive(Dump)]`)
//! - [`qp_print!`], [`qp_print_loc!`], [`qp_print_once!`], [`qp_print_loc_once!`]
//! - [`qp_ratelimit!`], [`qp_print_ratelimit!`], [`qp_trace_ratelimit!`],
//!   [`qp_print_hist_ratelimit!`]
//! - [`qp_dump_stack!`], [`qp_dump_stack_ratelimit!`], [`qp_run_system!`]
//! - [`qp_dump_bytes!`], [`qp_dump_hex!`], [`qp_dump_mac!`], [`qp_dump_ipv4!`],
//!   [`qp_dump_ipv6!`], [`qp_dump_eth_hdr!`], [`qp_dump_arp_hdr!`],
//!   [`qp_dump_ip_hdr!`], [`qp_dump_udp_hdr!`], [`qp_dump_tcp_hdr!`]
//! - `#[trace_fn]` - `enter`/`exit` lines for a whole function
//!
//! # Output
//!
//! Lines go to stderr unless redirected, see [`sink`]. Tests usually
//! capture them:
//!
//! ```
//! let x = 5;
//! let out = qp::capture(|| qp::qp_dump!(x));
//! assert_eq!(out.is_empty(), !qp::ENABLED);
//! ```
//!
//! A value that cannot be rendered is a build error:
//!
//! ```compile_fail
//! struct NoDebug;
//! let v = NoDebug;
//! qp::qp_dump!(v);
//! ```
//!
//! A `Debug` or `Display` implementation that fails at runtime prints
//! `<unrenderable>` for that value and keeps the rest of the line.

pub mod bytes;
mod capture;
pub mod check;
pub mod config;
pub mod constants;
pub mod dump;
pub mod emit;
pub mod event;
pub mod location;
pub mod net;
pub mod ratelimit;
pub mod render;
pub mod sink;
pub mod stack;
pub mod system;
pub mod time;

/// Whether probes are compiled in (the `enabled` feature).
pub const ENABLED: bool = cfg!(feature = "enabled");

pub use capture::ExitProbe;
pub use config::{CheckAction, Config, ConfigError, set_config, with_config};
pub use dump::{Dump, FieldWriter};
pub use emit::{emit, emit_raw};
pub use event::{CaptureEvent, Field};
pub use location::Location;
pub use sink::{
    BufferSink, CallbackSink, FileSink, NullSink, Sink, StderrSink, StdoutSink, WriterSink,
    capture, reset_sink, set_shared_sink, set_sink, with_sink,
};
pub use time::TimeHeader;

/// Derive [`Dump`] for a struct.
///
/// Field attributes: `#[dump(skip)]`, `#[dump(hex)]`, `#[dump(display)]`,
/// `#[dump(nested)]`, `#[dump(rename = "name")]`.
pub use qp_macros::Dump;

/// Emit `enter` when the function starts.
///
/// Options: `args` dumps every named argument, `exit` also emits `exit` when
/// the function returns or unwinds, `label = "..."` tags both lines.
///
/// ```
/// #[qp::trace_fn(args, exit)]
/// fn scale(value: u32, factor: u32) -> u32 {
///     value * factor
/// }
///
/// let out = qp::capture(|| assert_eq!(scale(3, 4), 12));
/// if qp::ENABLED {
///     let lines: Vec<_> = out.lines().collect();
///     assert!(lines[0].ends_with(":scale: enter, value = 3, factor = 4"));
///     assert!(lines[1].ends_with(":scale: exit"));
/// }
/// ```
pub use qp_macros::trace_fn;

/// Everything needed to sprinkle probes.
///
/// ```
/// use qp::prelude::*;
///
/// fn step(n: u32) -> u32 {
///     qp_trace!();
///     qp_dump!(n);
///     n + 1
/// }
/// assert_eq!(step(1), 2);
/// ```
pub mod prelude {
    pub use crate::{
        Dump, qp_check, qp_dump, qp_dump_fields, qp_dump_fmt, qp_print, qp_print_loc, qp_tap,
        qp_trace, trace_fn,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
