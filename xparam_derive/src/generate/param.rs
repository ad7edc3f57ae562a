use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;

use crate::model::{DeriveParam, DeriveValue, Occurrence, ParamKind};

impl From<DeriveParam> for TokenStream2 {
    fn from(value: DeriveParam) -> Self {
        let DeriveParam {
            field_name,
            name,
            kind,
            help,
            meta,
            capacity,
            range,
            hidden,
            hex,
            occurrence,
        } = value;
        let constructor = syn::Ident::new(kind.constructor(), Span::call_site());
        let mut param = if kind == ParamKind::String {
            let capacity = match capacity {
                Some(DeriveValue { tokens }) => tokens,
                None => quote! { usize::MAX },
            };
            quote! {
                ::xparam::Param::#constructor(&mut self.#field_name, #capacity, #name)
            }
        } else {
            quote! {
                ::xparam::Param::#constructor(&mut self.#field_name, #name)
            }
        };

        if let Some(DeriveValue { tokens }) = help {
            param = quote! { #param.help(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = meta {
            param = quote! { #param.meta(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = range {
            param = quote! { #param.range(#tokens) };
        }

        if hex {
            param = quote! { #param.hex() };
        }

        if hidden {
            param = quote! { #param.hidden() };
        }

        match occurrence {
            Occurrence::Optional => param,
            Occurrence::Required => quote! { #param.required() },
            Occurrence::Repeat => quote! { #param.given(0, u32::MAX) },
        }
    }
}
