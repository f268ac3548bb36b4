// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
// Note: unreachable_pub is not applicable to proc-macro crates where internal
// functions need pub visibility for module organization but aren't exported
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION FOR PROC-MACRO CRATES
// =============================================================================
// These lints are relaxed for proc-macro crates where syn/quote patterns are used
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(elided_lifetimes_in_paths)] // Common pattern with ParseStream

//! Proc-macros for `qp` - struct dumps and function entry/exit probes.
//!
//! Use them through the `qp` re-exports (`qp::Dump`, `qp::trace_fn`); the
//! generated code refers to `::qp`.

use proc_macro::TokenStream;

mod constants;
mod debug;
mod derive;
mod errors;
mod trace;
mod trace_fn;

// ============================================================================
// Derive Macros
// ============================================================================

/// Derive `qp::Dump` for a struct, one field per member.
///
/// ```ignore
/// #[derive(qp::Dump)]
/// struct Conn {
///     peer: String,
///     #[dump(hex)]
///     flags: u32,
///     #[dump(display)]
///     addr: std::net::Ipv4Addr,
///     #[dump(rename = "tx")]
///     tx_bytes: u64,
///     #[dump(nested)]
///     stats: Stats,
///     #[dump(skip)]
///     socket: std::net::TcpStream,
/// }
///
/// qp_dump_fields!(conn);
/// // conn.peer = "db", conn.flags = 0x11, conn.addr = 10.0.0.2, conn.tx = 512, conn.stats.rtt = 3
/// ```
#[proc_macro_derive(Dump, attributes(dump))]
pub fn derive_dump(input: TokenStream) -> TokenStream {
    derive::derive_dump_impl(input)
}

// ============================================================================
// Attribute Macros
// ============================================================================

/// Emit `enter` when the function starts.
///
/// ```ignore
/// #[qp::trace_fn(args, exit, label = "io")]
/// fn read_block(fd: i32, len: usize) -> usize { ... }
///
/// // src/io.rs:12:read_block: [io] enter, fd = 3, len = 4096
/// // src/io.rs:12:read_block: [io] exit
/// ```
#[proc_macro_attribute]
pub fn trace_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    trace_fn::trace_fn_impl(attr, item)
}
