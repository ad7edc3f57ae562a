use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::DeriveTable;

impl From<DeriveTable> for TokenStream2 {
    fn from(value: DeriveTable) -> Self {
        let DeriveTable {
            struct_name,
            params,
        } = value;
        let params = params.into_iter().map(TokenStream2::from);

        quote! {
            impl #struct_name {
                /// Bind each field to a `name=value` parameter.
                pub fn param_table(&mut self) -> ::std::result::Result<::xparam::ParamTable<'_>, ::xparam::ConfigError> {
                    ::xparam::ParamTable::new(::std::vec![ #( #params ),* ])
                }
            }
        }
    }
}
