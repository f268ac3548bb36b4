//! #[derive(Dump)] implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, Index, Member, WherePredicate, parse_macro_input, parse_quote,
};

use super::{Render, parse_field_attrs};
use crate::debug::debug_tokens;
use crate::errors::unsupported;
use crate::trace::trace;

// ============================================================================
// DERIVE DUMP
// ============================================================================

pub fn derive_dump_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => {
            debug_tokens("Dump", &tokens);
            tokens.into()
        },
        Err(err) => err.to_compile_error().into(),
    }
}

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    trace!("derive(Dump)", name);

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) => {
            return Err(unsupported(
                name.span(),
                "Dump derive only supports structs; enums have no fixed set of fields.",
                "dump the enum as a whole with `qp_dump!(value)` (it only needs Debug)",
            ));
        },
        Data::Union(_) => {
            return Err(unsupported(
                name.span(),
                "Dump derive only supports structs; union fields cannot be read safely.",
                "implement `qp::Dump` by hand for the variant you know is active",
            ));
        },
    };

    let mut calls = Vec::new();
    let mut bounds: Vec<WherePredicate> = Vec::new();

    let members: Vec<(Member, String, &syn::Field)> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| {
                let ident = f.ident.as_ref()?;
                Some((Member::Named(ident.clone()), ident.to_string(), f))
            })
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| (Member::Unnamed(Index::from(i)), i.to_string(), f))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    for (member, default_name, field) in members {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            trace!("skip", default_name);
            continue;
        }
        let label = attrs.rename.unwrap_or(default_name);
        let ty = &field.ty;
        trace!("field", label, attrs.render);

        let (method, bound) = match attrs.render {
            Render::Debug => (quote!(debug), quote!(::core::fmt::Debug)),
            Render::Display => (quote!(display), quote!(::core::fmt::Display)),
            Render::Hex => (quote!(hex), quote!(::core::fmt::LowerHex)),
            Render::Nested => (quote!(nested), quote!(::qp::Dump)),
        };
        calls.push(quote! {
            __qp_out.#method(#label, &self.#member);
        });
        bounds.push(parse_quote!(#ty: #bound));
    }

    // Field bounds are only needed when a field type depends on a parameter
    let mut generics = input.generics.clone();
    if !generics.params.is_empty() && !bounds.is_empty() {
        generics.make_where_clause().predicates.extend(bounds);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::qp::Dump for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn dump_fields(&self, __qp_out: &mut ::qp::FieldWriter<'_>) {
                #(#calls)*
            }
        }
    })
}
