use crate::load::param::skipped;
use crate::model::{DeriveParam, DeriveTable};
use std::collections::HashSet;

impl TryFrom<syn::DeriveInput> for DeriveTable {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let fields = match &value.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => fields,
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Unit,
                ..
            }) => {
                return Ok(DeriveTable {
                    struct_name: value.ident.clone(),
                    params: Vec::default(),
                });
            }
            _ => {
                return Err(syn::Error::new(
                    value.ident.span(),
                    "Invalid - ParamTable may only be derived for structs with named fields.",
                ));
            }
        };

        let mut params = Vec::default();

        for field in &fields.named {
            if !skipped(field)? {
                params.push(DeriveParam::try_from(field)?);
            }
        }

        let mut names = HashSet::new();

        for param in &params {
            if !names.insert(param.name.as_str()) {
                return Err(syn::Error::new(
                    param.field_name.span(),
                    format!("Invalid - parameter name '{}' is repeated.", param.name),
                ));
            }
        }

        Ok(DeriveTable {
            struct_name: value.ident.clone(),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Occurrence, ParamKind};
    use proc_macro2::Span;

    #[test]
    fn construct_table_empty() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(ParamTable)]
                struct Parameters { }
            "#,
        )
        .unwrap();

        // Execute
        let derive_table = DeriveTable::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_table,
            DeriveTable {
                struct_name: ident("Parameters"),
                params: Vec::default(),
            }
        );
    }

    #[test]
    fn construct_table_unit() {
        let input: syn::DeriveInput = syn::parse_str("struct Parameters;").unwrap();

        let derive_table = DeriveTable::try_from(input).unwrap();

        assert_eq!(derive_table.params, Vec::default());
    }

    #[test]
    fn construct_table() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(ParamTable)]
                struct Parameters {
                    #[xparam(kind = u64_size, required)]
                    size: u64,
                    #[xparam(skip)]
                    cache: Vec<u8>,
                    verbose: bool,
                }
            "#,
        )
        .unwrap();

        // Execute
        let derive_table = DeriveTable::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_table,
            DeriveTable {
                struct_name: ident("Parameters"),
                params: vec![
                    DeriveParam {
                        field_name: ident("size"),
                        name: "size".to_string(),
                        kind: ParamKind::U64Size,
                        help: None,
                        meta: None,
                        capacity: None,
                        range: None,
                        hidden: false,
                        hex: false,
                        occurrence: Occurrence::Required,
                    },
                    DeriveParam {
                        field_name: ident("verbose"),
                        name: "verbose".to_string(),
                        kind: ParamKind::Bool,
                        help: None,
                        meta: None,
                        capacity: None,
                        range: None,
                        hidden: false,
                        hex: false,
                        occurrence: Occurrence::Optional,
                    },
                ],
            }
        );
    }

    #[test]
    fn construct_table_repeated_name() {
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                struct Parameters {
                    size: u64,
                    #[xparam(name = "size")]
                    other: u64,
                }
            "#,
        )
        .unwrap();

        let error = DeriveTable::try_from(input).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid - parameter name 'size' is repeated."
        );
    }

    #[test]
    fn construct_table_tuple() {
        let input: syn::DeriveInput = syn::parse_str("struct Parameters(u8);").unwrap();

        let error = DeriveTable::try_from(input).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid - ParamTable may only be derived for structs with named fields."
        );
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
