extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::DeriveTable;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

#[proc_macro_derive(ParamTable, attributes(xparam))]
pub fn param_table(input: TokenStream) -> TokenStream {
    // https://doc.rust-lang.org/book/ch19-06-macros.html
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveTable::try_from(ast) {
        Ok(derive_table) => TokenStream2::from(derive_table).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
