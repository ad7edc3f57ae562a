//! Derive Api for `xparam` parameter tables.
//!
//! ### Getting Started
//! Instrument a struct `S` with `#[derive(ParamTable)]`.
//! This generates the method `S::param_table(&mut self) -> Result<ParamTable<'_>, ConfigError>`, binding each field to a `name=value` parameter.
//! The table may be used on its own, or added to a [`CommandLine`](../struct.CommandLine.html) via `table`.
//!
//! ```no_run
#![doc = include_str!("../demos/derived.rs")]
//! ```
//!
//! ### Parameter Configuration
//! The parameter type is inferred from the field type:
//! ```console
//! Field     | Parameter
//! -----------------------------------------------
//! u8        | Param::u8(..)
//! u16       | Param::u16(..)
//! u32       | Param::u32(..)
//! u64       | Param::u64(..)
//! i64       | Param::s64(..)
//! bool      | Param::bool(..)
//! String    | Param::string(.., usize::MAX, ..)
//! ```
//!
//! The following field attributes may be combined as necessary.
//! * `#[xparam(kind = K)]` to use one of the storage domain types, where `K` is one of `u32_size`, `u64_size`, `uid`, `gid`, `mode` (on a `u32`/`u64` field as appropriate), or `pct` (on a `u8` field).
//! * `#[xparam(name = "..")]` to match a name other than the field name.
//! * `#[xparam(help = "..")]` and `#[xparam(meta = "..")]` to document the parameter.
//! * `#[xparam(capacity = N)]` to bound the byte length of a `String` field.
//! * `#[xparam(range = A..B)]` to restrict the value to the half-open range `[A, B)`.
//! * `#[xparam(hex)]` to display an integer field in hex.
//! * `#[xparam(hidden)]` to leave the parameter out of the default help message.
//! * `#[xparam(required)]` to require the parameter precisely once, or `#[xparam(repeat)]` to allow it any number of times.
//! By default, a parameter may be given at most once.
//! * `#[xparam(skip)]` to omit the field.
//!
//! ```
//! # use xparam::derive::*;
//! #[derive(Default, ParamTable)]
//! struct Parameters {
//!     #[xparam(kind = u64_size, required)]
//!     size: u64,
//!     #[xparam(kind = pct, name = "spare-pct")]
//!     spare: u8,
//! }
//!
//! let mut parameters = Parameters::default();
//! let mut table = parameters.param_table().unwrap();
//! let next_arg = table.process_params(&["size=4G", "spare-pct=10", "mp1"]).unwrap();
//! table.verify_params().unwrap();
//! drop(table);
//!
//! assert_eq!(next_arg, 2);
//! assert_eq!(parameters.size, 4 << 30);
//! assert_eq!(parameters.spare, 10);
//! ```
pub use xparam_derive::*;
