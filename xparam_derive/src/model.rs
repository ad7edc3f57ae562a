use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.to_string() == other.tokens.to_string()
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

/// The parameter constructor a field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    U8,
    U16,
    U32,
    U64,
    S64,
    Bool,
    String,
    U32Size,
    U64Size,
    Uid,
    Gid,
    Mode,
    Pct,
}

impl ParamKind {
    /// The `Param` constructor for this kind.
    pub fn constructor(&self) -> &'static str {
        match self {
            ParamKind::U8 => "u8",
            ParamKind::U16 => "u16",
            ParamKind::U32 => "u32",
            ParamKind::U64 => "u64",
            ParamKind::S64 => "s64",
            ParamKind::Bool => "bool",
            ParamKind::String => "string",
            ParamKind::U32Size => "u32_size",
            ParamKind::U64Size => "u64_size",
            ParamKind::Uid => "uid",
            ParamKind::Gid => "gid",
            ParamKind::Mode => "mode",
            ParamKind::Pct => "pct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Optional,
    Required,
    Repeat,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveParam {
    pub field_name: syn::Ident,
    pub name: String,
    pub kind: ParamKind,
    pub help: Option<DeriveValue>,
    pub meta: Option<DeriveValue>,
    pub capacity: Option<DeriveValue>,
    pub range: Option<DeriveValue>,
    pub hidden: bool,
    pub hex: bool,
    pub occurrence: Occurrence,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveTable {
    pub struct_name: syn::Ident,
    pub params: Vec<DeriveParam>,
}
