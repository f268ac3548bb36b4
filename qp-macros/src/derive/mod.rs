//! Derive macros: Dump.
//!
//! Generates `qp::Dump` implementations that list a struct's fields through
//! `qp::FieldWriter`.

mod dump_derive;

use syn::spanned::Spanned;
use syn::{Attribute, Lit};

use crate::constants::DUMP_FIELD_OPTIONS;
use crate::errors::{conflicting_options, invalid_attr, unknown_error};

pub use dump_derive::derive_dump_impl;

// ============================================================================
// FIELD ATTRIBUTE PARSING
// ============================================================================

/// How a field is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Render {
    #[default]
    Debug,
    Display,
    Hex,
    Nested,
}

impl Render {
    const fn option(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Display => "display",
            Self::Hex => "hex",
            Self::Nested => "nested",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct FieldAttrs {
    pub(crate) skip: bool,
    pub(crate) render: Render,
    pub(crate) rename: Option<String>,
}

impl FieldAttrs {
    fn set_render(&mut self, render: Render, span: proc_macro2::Span) -> syn::Result<()> {
        if self.render != Render::Debug {
            return Err(conflicting_options(span, self.render.option(), render.option()));
        }
        self.render = render;
        Ok(())
    }
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("dump") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let span = meta.path.span();
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("hex") {
                result.set_render(Render::Hex, span)?;
            } else if meta.path.is_ident("display") {
                result.set_render(Render::Display, span)?;
            } else if meta.path.is_ident("nested") {
                result.set_render(Render::Nested, span)?;
            } else if meta.path.is_ident("rename") {
                if result.rename.is_some() {
                    return Err(conflicting_options(span, "rename", "rename"));
                }
                let value: Lit = meta.value()?.parse()?;
                let Lit::Str(lit) = value else {
                    return Err(invalid_attr(
                        span,
                        "rename",
                        "a string literal",
                        "#[dump(rename = \"tx\")]",
                    ));
                };
                result.rename = Some(lit.value());
            } else {
                let got = meta
                    .path
                    .get_ident()
                    .map_or_else(|| "?".to_string(), ToString::to_string);
                return Err(unknown_error(span, "#[dump] option", &got, DUMP_FIELD_OPTIONS));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
