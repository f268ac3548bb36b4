//! Expansion dumps for macro development.
//!
//! Enable with `--features debug-expand` to print every generated item,
//! pretty-printed, to stderr:
//!
//! ```text
//! cargo build --features qp-macros/debug-expand 2>&1 | grep -A40 EXPAND
//! ```

use proc_macro2::TokenStream as TokenStream2;

/// Print the expansion of `macro_name` when `debug-expand` is enabled.
#[cfg(feature = "debug-expand")]
pub fn debug_tokens(macro_name: &str, tokens: &TokenStream2) {
    match syn::parse2::<syn::File>(tokens.clone()) {
        Ok(file) => eprintln!("[EXPAND:{macro_name}]\n{}", prettyplease::unparse(&file)),
        // Not a sequence of items; print the raw tokens instead
        Err(_) => eprintln!("[EXPAND:{macro_name}]\n{tokens}"),
    }
}

/// No-op when debug-expand feature is disabled.
#[cfg(not(feature = "debug-expand"))]
pub fn debug_tokens(_macro_name: &str, _tokens: &TokenStream2) {}
