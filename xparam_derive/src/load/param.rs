use crate::load::{incompatible_error, load_attributes};
use crate::model::{DeriveParam, DeriveValue, IntermediateAttributes, Occurrence, ParamKind};
use quote::ToTokens;
use syn::ext::IdentExt;

const SINGLETONS: [&str; 5] = ["hidden", "required", "repeat", "hex", "skip"];
const PAIRS: [&str; 6] = ["name", "help", "meta", "capacity", "range", "kind"];

/// Whether the field is marked `#[xparam(skip)]`.
pub(crate) fn skipped(value: &syn::Field) -> Result<bool, syn::Error> {
    Ok(load_attributes(&value.attrs)?.singletons.contains("skip"))
}

impl TryFrom<&syn::Field> for DeriveParam {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let attributes = load_attributes(&value.attrs)?;
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(value, "Invalid - field must be named."))?;

        for singleton in &attributes.singletons {
            if !SINGLETONS.contains(&singleton.as_str()) {
                return Err(unknown_error(&field_name, singleton));
            }
        }

        for key in attributes.pairs.keys() {
            if !PAIRS.contains(&key.as_str()) {
                return Err(unknown_error(&field_name, format!("{key} = ..")));
            }
        }

        let field_kind = field_kind(&field_name, &value.ty)?;
        let kind = match first(&attributes, "kind") {
            Some(DeriveValue { tokens }) => {
                let kind = explicit_kind(&field_name, &tokens.to_string())?;
                let required_kind = match kind {
                    ParamKind::U32Size | ParamKind::Uid | ParamKind::Gid | ParamKind::Mode => {
                        ParamKind::U32
                    }
                    ParamKind::U64Size => ParamKind::U64,
                    ParamKind::Pct => ParamKind::U8,
                    _ => kind,
                };

                if field_kind != required_kind {
                    return Err(syn::Error::new(
                        field_name.span(),
                        format!(
                            "Invalid - `kind = {}` requires a `{}` field.",
                            kind.constructor(),
                            rust_type(required_kind),
                        ),
                    ));
                }

                kind
            }
            None => field_kind,
        };
        let name = match first(&attributes, "name") {
            Some(DeriveValue { tokens }) => match syn::parse2::<syn::LitStr>(tokens.clone()) {
                Ok(literal) => literal.value(),
                Err(_) => {
                    return Err(syn::Error::new(
                        field_name.span(),
                        format!("Invalid - `name` expects a string literal, found `{tokens}`."),
                    ));
                }
            },
            None => field_name.unraw().to_string(),
        };
        let capacity = first(&attributes, "capacity");
        let hex = attributes.singletons.contains("hex");
        let required = attributes.singletons.contains("required");
        let repeat = attributes.singletons.contains("repeat");

        if capacity.is_some() && kind != ParamKind::String {
            return Err(incompatible_error(
                &field_name,
                rust_type(field_kind),
                "#[xparam(capacity = ..)]",
            ));
        }

        if hex && !matches!(kind, ParamKind::U8 | ParamKind::U16 | ParamKind::U32 | ParamKind::U64) {
            return Err(incompatible_error(
                &field_name,
                format!("{} parameter", kind.constructor()),
                "#[xparam(hex)]",
            ));
        }

        if required && repeat {
            return Err(incompatible_error(
                &field_name,
                "#[xparam(required)]",
                "#[xparam(repeat)]",
            ));
        }

        let occurrence = if required {
            Occurrence::Required
        } else if repeat {
            Occurrence::Repeat
        } else {
            Occurrence::Optional
        };

        Ok(DeriveParam {
            field_name,
            name,
            kind,
            help: first(&attributes, "help"),
            meta: first(&attributes, "meta"),
            capacity,
            range: first(&attributes, "range"),
            hidden: attributes.singletons.contains("hidden"),
            hex,
            occurrence,
        })
    }
}

fn first(attributes: &IntermediateAttributes, key: &str) -> Option<DeriveValue> {
    attributes
        .pairs
        .get(key)
        .and_then(|values| values.first())
        .cloned()
}

fn unknown_error(field_name: &syn::Ident, attribute: impl std::fmt::Display) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!("Invalid - unknown attribute `#[xparam({attribute})]`."),
    )
}

fn field_kind(field_name: &syn::Ident, ty: &syn::Type) -> Result<ParamKind, syn::Error> {
    let ident = match ty {
        syn::Type::Path(path) if path.qself.is_none() => match path.path.segments.last() {
            Some(segment) if segment.arguments.is_empty() => Some(segment.ident.to_string()),
            _ => None,
        },
        _ => None,
    };

    match ident.as_deref() {
        Some("u8") => Ok(ParamKind::U8),
        Some("u16") => Ok(ParamKind::U16),
        Some("u32") => Ok(ParamKind::U32),
        Some("u64") => Ok(ParamKind::U64),
        Some("i64") => Ok(ParamKind::S64),
        Some("bool") => Ok(ParamKind::Bool),
        Some("String") => Ok(ParamKind::String),
        _ => Err(syn::Error::new(
            field_name.span(),
            format!(
                "Invalid - unsupported field type `{}`; expected one of u8, u16, u32, u64, i64, bool, String.",
                ty.to_token_stream()
            ),
        )),
    }
}

fn explicit_kind(field_name: &syn::Ident, kind: &str) -> Result<ParamKind, syn::Error> {
    match kind {
        "u32_size" => Ok(ParamKind::U32Size),
        "u64_size" => Ok(ParamKind::U64Size),
        "uid" => Ok(ParamKind::Uid),
        "gid" => Ok(ParamKind::Gid),
        "mode" => Ok(ParamKind::Mode),
        "pct" => Ok(ParamKind::Pct),
        _ => Err(syn::Error::new(
            field_name.span(),
            format!(
                "Invalid - unknown `kind = {kind}`; expected one of u32_size, u64_size, uid, gid, mode, pct."
            ),
        )),
    }
}

fn rust_type(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::U8 | ParamKind::Pct => "u8",
        ParamKind::U16 => "u16",
        ParamKind::U32 | ParamKind::U32Size | ParamKind::Uid | ParamKind::Gid | ParamKind::Mode => {
            "u32"
        }
        ParamKind::U64 | ParamKind::U64Size => "u64",
        ParamKind::S64 => "i64",
        ParamKind::Bool => "bool",
        ParamKind::String => "String",
    }
}
