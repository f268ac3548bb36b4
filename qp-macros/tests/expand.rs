//! Macro expansion snapshot tests.
//!
//! These tests capture the expanded output of the derive and attribute
//! macros and compare against saved snapshots.
//!
//! To update snapshots after intentional changes:
//! ```bash
//! MACROTEST=overwrite cargo test --test expand -- --ignored
//! ```

/// Requires `cargo-expand` (install via `cargo install cargo-expand`).
/// Run with: `cargo test --test expand -- --ignored`
#[test]
#[ignore = "requires cargo-expand which is not installed in CI"]
fn expand_macros() {
    macrotest::expand("tests/expand/*.rs");
}
