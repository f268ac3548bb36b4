//! Error helper utilities for consistent, informative compile-time errors.
//!
//! Every helper names what went wrong and shows a form that works.

use proc_macro2::Span;
use syn::Error;

/// Build an error for an unknown option with the valid ones listed.
///
/// # Examples
///
/// ```ignore
/// use crate::errors::unknown_error;
///
/// return Err(unknown_error(span, "#[dump] option", "hexx", DUMP_FIELD_OPTIONS));
/// ```
pub fn unknown_error(span: Span, kind: &str, got: &str, valid: &[&str]) -> Error {
    let valid_str = valid.join(", ");
    Error::new(
        span,
        format!("Unknown {kind} '{got}'.\n\nValid options: {valid_str}"),
    )
}

/// Build an error for an option given twice, or two options that exclude
/// each other.
pub fn conflicting_options(span: Span, first: &str, second: &str) -> Error {
    Error::new(
        span,
        format!("'{second}' conflicts with '{first}'. Pick one rendering per field."),
    )
}

/// Build an error for an option value of the wrong kind.
///
/// # Examples
///
/// ```ignore
/// use crate::errors::invalid_attr;
///
/// return Err(invalid_attr(span, "rename", "a string literal", "#[dump(rename = \"tx\")]"));
/// ```
pub fn invalid_attr(span: Span, attr: &str, expected: &str, example: &str) -> Error {
    Error::new(
        span,
        format!("'{attr}' expects {expected}.\n\n\u{2705} Correct: {example}"),
    )
}

/// Build an error for an unsupported construct.
pub fn unsupported(span: Span, what: &str, suggestion: &str) -> Error {
    Error::new(span, format!("{what}\n\n\u{2705} Try: {suggestion}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_error_lists_options() {
        let err = unknown_error(Span::call_site(), "#[dump] option", "hexx", &["skip", "hex"]);
        let msg = err.to_string();
        assert!(msg.contains("Unknown #[dump] option 'hexx'"));
        assert!(msg.contains("skip, hex"));
    }

    #[test]
    fn test_conflicting_options_names_both() {
        let msg = conflicting_options(Span::call_site(), "hex", "display").to_string();
        insta::assert_snapshot!(msg, @"'display' conflicts with 'hex'. Pick one rendering per field.");
    }

    #[test]
    fn test_invalid_attr_shows_example() {
        let msg = invalid_attr(
            Span::call_site(),
            "rename",
            "a string literal",
            "#[dump(rename = \"tx\")]",
        )
        .to_string();
        assert!(msg.contains("'rename' expects a string literal"));
        assert!(msg.contains("rename = \"tx\""));
    }

    #[test]
    fn test_unsupported_suggests() {
        let msg = unsupported(Span::call_site(), "Dump on enums", "a struct").to_string();
        assert!(msg.starts_with("Dump on enums"));
        assert!(msg.contains("Try: a struct"));
    }
}
