//! Call-site location capture.
//!
//! `file!()`, `line!()` and `column!()` come straight from the compiler. Rust
//! has no `__func__`, so the enclosing function is recovered from the type
//! name of a probe item declared inside it:
//!
//! ```
//! fn compute() -> &'static str {
//!     qp::__qp_location!().function_name()
//! }
//! assert_eq!(compute(), "compute");
//! ```

use std::fmt;

/// Name of the probe item declared by [`__qp_location!`](crate::__qp_location).
const PROBE_SUFFIX: &str = "::__qp_probe";

/// Suffix added to the type name of anything declared inside a closure or an
/// async block.
const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// Source location of a capture primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct Location {
    /// Source file as reported by `file!()`.
    pub file: &'static str,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// Module path as reported by `module_path!()`.
    pub module: &'static str,
    /// Full path of the enclosing function, e.g. `my_crate::parser::next_token`.
    pub function: &'static str,
}

impl Location {
    /// Create a location. Normally built by [`__qp_location!`](crate::__qp_location).
    #[inline]
    #[must_use]
    pub const fn new(
        file: &'static str,
        line: u32,
        column: u32,
        module: &'static str,
        function: &'static str,
    ) -> Self {
        Self {
            file,
            line,
            column,
            module,
            function,
        }
    }

    /// Last path segment of the enclosing function.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        self.function
            .rsplit_once("::")
            .map_or(self.function, |(_, name)| name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.function_name())
    }
}

/// Turn the type name of a probe item into the path of its enclosing function.
#[doc(hidden)]
#[must_use]
pub fn __function_from_probe(probe: &'static str) -> &'static str {
    let mut name = probe.strip_suffix(PROBE_SUFFIX).unwrap_or(probe);
    while let Some(outer) = name.strip_suffix(CLOSURE_SUFFIX) {
        name = outer;
    }
    name
}

/// Build a [`Location`] for the current call site.
#[doc(hidden)]
#[macro_export]
macro_rules! __qp_location {
    () => {
        $crate::Location::new(
            ::core::file!(),
            ::core::line!(),
            ::core::column!(),
            ::core::module_path!(),
            $crate::location::__function_from_probe({
                fn __qp_probe() {}
                ::core::any::type_name_of_val(&__qp_probe)
            }),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_from_probe_plain() {
        assert_eq!(
            __function_from_probe("app::parser::next_token::__qp_probe"),
            "app::parser::next_token"
        );
    }

    #[test]
    fn test_function_from_probe_strips_closures() {
        assert_eq!(
            __function_from_probe("app::run::{{closure}}::{{closure}}::__qp_probe"),
            "app::run"
        );
    }

    #[test]
    fn test_function_from_probe_unknown_shape_passes_through() {
        assert_eq!(__function_from_probe("something"), "something");
    }

    #[test]
    fn test_function_name_last_segment() {
        let loc = Location::new("probe.rs", 42, 5, "app", "app::Engine::compute");
        assert_eq!(loc.function_name(), "compute");

        let bare = Location::new("probe.rs", 1, 1, "app", "main");
        assert_eq!(bare.function_name(), "main");
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new("probe.rs", 42, 5, "app", "app::compute");
        assert_eq!(loc.to_string(), "probe.rs:42:compute");
    }

    #[test]
    fn test_location_macro_captures_this_function() {
        let loc = crate::__qp_location!();
        assert_eq!(loc.file, file!());
        assert_eq!(loc.function_name(), "test_location_macro_captures_this_function");
        assert_eq!(loc.module, module_path!());
        assert!(loc.function.starts_with(module_path!()));
    }

    #[test]
    fn test_location_macro_inside_closure() {
        let capture = || crate::__qp_location!();
        assert_eq!(capture().function_name(), "test_location_macro_inside_closure");
    }
}
