//! #[trace_fn] implementation.
//!
//! Wraps the function body so that an `enter` line is emitted first and,
//! with `exit`, an `ExitProbe` guard emits the matching `exit` line when the
//! body returns or unwinds.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{FnArg, ItemFn, Lit, Pat, parse_macro_input};

use crate::constants::{ENTER_MESSAGE, TRACE_FN_OPTIONS};
use crate::debug::debug_tokens;
use crate::errors::{invalid_attr, unknown_error, unsupported};
use crate::trace::trace;

#[derive(Debug, Default)]
pub(crate) struct TraceFnOptions {
    args: bool,
    exit: bool,
    label: Option<String>,
}

impl TraceFnOptions {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("args") {
            self.args = true;
        } else if meta.path.is_ident("exit") {
            self.exit = true;
        } else if meta.path.is_ident("label") {
            let value: Lit = meta.value()?.parse()?;
            let Lit::Str(lit) = value else {
                return Err(invalid_attr(
                    span,
                    "label",
                    "a string literal",
                    "#[trace_fn(label = \"io\")]",
                ));
            };
            self.label = Some(lit.value());
        } else {
            let got = meta
                .path
                .get_ident()
                .map_or_else(|| "?".to_string(), ToString::to_string);
            return Err(unknown_error(span, "#[trace_fn] option", &got, TRACE_FN_OPTIONS));
        }
        Ok(())
    }
}

pub fn trace_fn_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = TraceFnOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(&meta));
    parse_macro_input!(attr with parser);
    let function = parse_macro_input!(item as ItemFn);

    match expand(&options, function) {
        Ok(tokens) => {
            debug_tokens("trace_fn", &tokens);
            tokens.into()
        },
        Err(err) => err.to_compile_error().into(),
    }
}

pub(crate) fn expand(options: &TraceFnOptions, function: ItemFn) -> syn::Result<TokenStream2> {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = function;
    trace!("trace_fn", sig.ident, options);

    if let Some(constness) = &sig.constness {
        return Err(unsupported(
            constness.span(),
            "#[trace_fn] cannot instrument a const fn; output happens at run time.",
            "drop `const`, or put `qp_trace!()` in a non-const caller",
        ));
    }

    // Receivers and destructuring patterns have no single name to print
    let arg_fields: Vec<TokenStream2> = if options.args {
        sig.inputs
            .iter()
            .filter_map(|input| match input {
                FnArg::Typed(typed) => match typed.pat.as_ref() {
                    Pat::Ident(pat) => Some(&pat.ident),
                    _ => None,
                },
                FnArg::Receiver(_) => None,
            })
            .map(|ident| {
                let name = ident.to_string();
                quote!(.field(#name, &#ident))
            })
            .collect()
    } else {
        Vec::new()
    };

    let label = options.label.as_deref();
    let label_call = label.map(|label| quote!(.label(#label)));
    let exit_guard = options.exit.then(|| {
        let with_label = label.map(|label| quote!(.with_label(#label)));
        quote! {
            let __qp_exit = ::qp::ExitProbe::new(__qp_location) #with_label;
        }
    });

    // Point the captured line at the function name
    let location = quote_spanned!(sig.ident.span()=> ::qp::__qp_location!());

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            let __qp_location = #location;
            if ::qp::ENABLED {
                ::qp::emit(
                    ::qp::CaptureEvent::new(__qp_location)
                        #label_call
                        .message(#ENTER_MESSAGE)
                        #(#arg_fields)*
                );
            }
            #exit_guard
            #block
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn options(args: bool, exit: bool, label: Option<&str>) -> TraceFnOptions {
        TraceFnOptions {
            args,
            exit,
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_enter_only_by_default() {
        let out = expand(
            &TraceFnOptions::default(),
            parse_quote!(fn f(a: u8) -> u8 { a }),
        )
        .unwrap()
        .to_string();
        assert!(out.contains(". message (\"enter\")"));
        assert!(!out.contains("ExitProbe"));
        assert!(!out.contains(". field"));
    }

    #[test]
    fn test_args_and_exit() {
        let out = expand(
            &options(true, true, None),
            parse_quote!(fn f(a: u8, (b, c): (u8, u8)) -> u8 { a + b + c }),
        )
        .unwrap()
        .to_string();
        assert!(out.contains(". field (\"a\" , & a)"));
        // The tuple pattern is skipped
        assert!(!out.contains("\"b\""));
        assert!(out.contains(":: qp :: ExitProbe :: new (__qp_location)"));
    }

    #[test]
    fn test_receiver_skipped() {
        let out = expand(
            &options(true, false, None),
            parse_quote!(fn len(&self, extra: usize) -> usize { self.n + extra }),
        )
        .unwrap()
        .to_string();
        assert!(out.contains(". field (\"extra\" , & extra)"));
        assert!(!out.contains("\"self\""));
    }

    #[test]
    fn test_label_on_both_lines() {
        let out = expand(&options(false, true, Some("io")), parse_quote!(fn f() {}))
            .unwrap()
            .to_string();
        assert!(out.contains(". label (\"io\")"));
        assert!(out.contains(". with_label (\"io\")"));
    }

    #[test]
    fn test_signature_and_attrs_kept() {
        let out = expand(
            &TraceFnOptions::default(),
            parse_quote! {
                #[inline]
                pub async fn fetch(id: u32) -> Option<u32> { Some(id) }
            },
        )
        .unwrap()
        .to_string();
        assert!(out.starts_with("# [inline] pub async fn fetch (id : u32) -> Option < u32 >"));
    }

    #[test]
    fn test_const_fn_rejected() {
        let err = expand(&TraceFnOptions::default(), parse_quote!(const fn f() {})).unwrap_err();
        assert!(err.to_string().contains("cannot instrument a const fn"));
    }
}
