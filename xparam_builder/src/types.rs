//! The scalar type registry.
//!
//! Each [`TypeTag`] maps to a [`ParamType`]: a converter (`get`), a renderer (`show`), and an optional range checker (`check`).
//! Converters write into a typed [`Slot`], so a destination can never be written with the wrong width.
use std::ops::Range;
use thiserror::Error;

use crate::size::{parse_signed, parse_size, parse_unsigned, size_to_string};

/// The catalog of scalar types understood by parameters and flag arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// 8 bit unsigned integer.
    U8,
    /// 16 bit unsigned integer.
    U16,
    /// 32 bit unsigned integer.
    U32,
    /// 32 bit unsigned integer, accepting magnitude suffixes.
    U32Size,
    /// 64 bit unsigned integer.
    U64,
    /// 64 bit unsigned integer, accepting magnitude suffixes.
    U64Size,
    /// 64 bit signed integer.
    S64,
    /// Boolean.
    Bool,
    /// Bounded string.
    String,
    /// User id, numeric or by user name.
    Uid,
    /// Group id, numeric or by group name.
    Gid,
    /// File mode bits, in octal.
    Mode,
}

impl TypeTag {
    /// The slot kind this type writes into.
    pub fn slot_kind(&self) -> SlotKind {
        match self {
            TypeTag::U8 => SlotKind::U8,
            TypeTag::U16 => SlotKind::U16,
            TypeTag::U32 | TypeTag::U32Size | TypeTag::Uid | TypeTag::Gid | TypeTag::Mode => {
                SlotKind::U32
            }
            TypeTag::U64 | TypeTag::U64Size => SlotKind::U64,
            TypeTag::S64 => SlotKind::S64,
            TypeTag::Bool => SlotKind::Bool,
            TypeTag::String => SlotKind::Str,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U32Size => "u32_size",
            TypeTag::U64 => "u64",
            TypeTag::U64Size => "u64_size",
            TypeTag::S64 => "s64",
            TypeTag::Bool => "bool",
            TypeTag::String => "string",
            TypeTag::Uid => "uid",
            TypeTag::Gid => "gid",
            TypeTag::Mode => "mode",
        };
        write!(f, "{name}")
    }
}

/// The storage shape of a [`Slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// A `u8` variable.
    U8,
    /// A `u16` variable.
    U16,
    /// A `u32` variable.
    U32,
    /// A `u64` variable.
    U64,
    /// An `i64` variable.
    S64,
    /// A `bool` variable.
    Bool,
    /// A `String` variable.
    Str,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_ascii_lowercase())
    }
}

/// A typed destination owned by the caller.
///
/// The engine only ever writes through the slot; it never allocates the destination.
#[derive(Debug)]
pub enum Slot<'a> {
    /// Writes `u8`.
    U8(&'a mut u8),
    /// Writes `u16`.
    U16(&'a mut u16),
    /// Writes `u32`, including uid, gid and mode.
    U32(&'a mut u32),
    /// Writes `u64`.
    U64(&'a mut u64),
    /// Writes `i64`.
    S64(&'a mut i64),
    /// Writes `bool`.
    Bool(&'a mut bool),
    /// A string destination, along with its capacity in bytes.
    Str(&'a mut String, usize),
}

impl<'a> Slot<'a> {
    /// Create a string slot which accepts at most `capacity` bytes.
    pub fn string(variable: &'a mut String, capacity: usize) -> Self {
        Slot::Str(variable, capacity)
    }

    /// The storage shape of this slot.
    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::U8(_) => SlotKind::U8,
            Slot::U16(_) => SlotKind::U16,
            Slot::U32(_) => SlotKind::U32,
            Slot::U64(_) => SlotKind::U64,
            Slot::S64(_) => SlotKind::S64,
            Slot::Bool(_) => SlotKind::Bool,
            Slot::Str(..) => SlotKind::Str,
        }
    }

    /// Snapshot the current contents of the slot.
    pub fn value(&self) -> Value {
        match self {
            Slot::U8(v) => Value::U8(**v),
            Slot::U16(v) => Value::U16(**v),
            Slot::U32(v) => Value::U32(**v),
            Slot::U64(v) => Value::U64(**v),
            Slot::S64(v) => Value::S64(**v),
            Slot::Bool(v) => Value::Bool(**v),
            Slot::Str(v, _) => Value::Str((**v).clone()),
        }
    }
}

macro_rules! slot_from {
    ($t:ty, $variant:ident) => {
        impl<'a> From<&'a mut $t> for Slot<'a> {
            fn from(variable: &'a mut $t) -> Self {
                Slot::$variant(variable)
            }
        }
    };
}

slot_from!(u8, U8);
slot_from!(u16, U16);
slot_from!(u32, U32);
slot_from!(u64, U64);
slot_from!(i64, S64);
slot_from!(bool, Bool);

impl<'a> From<&'a mut String> for Slot<'a> {
    fn from(variable: &'a mut String) -> Self {
        Slot::Str(variable, usize::MAX)
    }
}

/// An owned snapshot of a slot's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// From a [`Slot::U8`].
    U8(u8),
    /// From a [`Slot::U16`].
    U16(u16),
    /// From a [`Slot::U32`].
    U32(u32),
    /// From a [`Slot::U64`].
    U64(u64),
    /// From a [`Slot::S64`].
    S64(i64),
    /// From a [`Slot::Bool`].
    Bool(bool),
    /// From a [`Slot::Str`].
    Str(String),
}

impl Value {
    /// The storage shape this value came from.
    pub fn kind(&self) -> SlotKind {
        match self {
            Value::U8(_) => SlotKind::U8,
            Value::U16(_) => SlotKind::U16,
            Value::U32(_) => SlotKind::U32,
            Value::U64(_) => SlotKind::U64,
            Value::S64(_) => SlotKind::S64,
            Value::Bool(_) => SlotKind::Bool,
            Value::Str(_) => SlotKind::Str,
        }
    }
}

/// Conversion, rendering, and range errors of the type registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The text is not a valid value of the type.
    #[error("cannot convert '{text}' to {tag}.")]
    Conversion {
        /// The rejected text.
        text: String,
        /// The target type.
        tag: TypeTag,
    },

    /// The slot or value is of a different storage shape than the type.
    #[error("cannot use a {slot} slot for {tag}.")]
    SlotMismatch {
        /// The type.
        tag: TypeTag,
        /// The mismatched storage shape.
        slot: SlotKind,
    },

    /// The destination cannot hold the text.
    #[error("buffer too small (needed={needed}, available={available}).")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// The value lies outside `[min, max)`.
    #[error("{value} is outside the range [{min}, {max}).")]
    Range {
        /// The checked value (the length, for strings).
        value: u64,
        /// The inclusive lower bound.
        min: u64,
        /// The exclusive upper bound.
        max: u64,
    },
}

/// Convert `src` and write it into the slot.
pub type GetFn = fn(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError>;

/// Render a value as text.
pub type ShowFn = fn(val: &Value) -> Result<String, TypeError>;

/// Validate a value against the half-open range `[min, max)`.
pub type CheckFn = fn(range: &Range<u64>, val: &Value) -> Result<(), TypeError>;

/// The description of one scalar type: how to convert, render, and range check it.
///
/// Ranges are half-open, `[min, max)`, for every type.
/// For instance, a percentage is a `u8` with the range `0..101`.
#[derive(Clone)]
pub struct ParamType {
    tag: TypeTag,
    range: Option<Range<u64>>,
    get: GetFn,
    show: ShowFn,
    check: Option<CheckFn>,
}

impl std::fmt::Debug for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamType")
            .field("tag", &self.tag)
            .field("range", &self.range)
            .finish()
    }
}

impl ParamType {
    /// Look up the registry entry for `tag`.
    pub fn of(tag: TypeTag) -> Self {
        let (get, show): (GetFn, ShowFn) = match tag {
            TypeTag::U8 => (get_u8, show_u8_dec),
            TypeTag::U16 => (get_u16, show_u16_dec),
            TypeTag::U32 => (get_u32, show_u32_dec),
            TypeTag::U32Size => (get_u32_size, show_u32_size),
            TypeTag::U64 => (get_u64, show_u64_dec),
            TypeTag::U64Size => (get_u64_size, show_u64_size),
            TypeTag::S64 => (get_s64, show_s64),
            TypeTag::Bool => (get_bool, show_bool),
            TypeTag::String => (get_string, show_string),
            TypeTag::Uid => (get_uid, show_uid),
            TypeTag::Gid => (get_gid, show_gid),
            TypeTag::Mode => (get_mode, show_mode),
        };

        Self {
            tag,
            range: None,
            get,
            show,
            check: None,
        }
    }

    /// A `u8` restricted to `[0, 101)`.
    pub fn pct() -> Self {
        Self::of(TypeTag::U8).range(0..101)
    }

    /// Restrict values to the half-open `range`.
    ///
    /// For strings, the range applies to the length in bytes.
    /// Types without a range checker (`s64`, `bool`) are rejected when the table is built.
    pub fn range(mut self, range: Range<u64>) -> Self {
        self.check = checker(self.tag);
        self.range.replace(range);
        self
    }

    /// Render unsigned integers in `0x` hex rather than decimal.
    pub fn hex(mut self) -> Self {
        match self.tag {
            TypeTag::U8 => self.show = show_u8,
            TypeTag::U16 => self.show = show_u16,
            TypeTag::U32 => self.show = show_u32,
            TypeTag::U64 => self.show = show_u64,
            _ => {}
        };
        self
    }

    /// The registry entry this type was created from.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// The slot kind this type writes into.
    pub fn slot_kind(&self) -> SlotKind {
        self.tag.slot_kind()
    }

    /// The half-open range of accepted values, if any.
    pub fn bounds(&self) -> Option<&Range<u64>> {
        self.range.as_ref()
    }

    /// Whether a range is configured that this type cannot check.
    pub(crate) fn unchecked_range(&self) -> bool {
        self.range.is_some() && self.check.is_none()
    }

    /// Convert `src` into `dst`.
    ///
    /// Fails without writing when `dst` is not of this type's slot kind, or when `src` is not a valid value.
    pub fn get(&self, src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
        (self.get)(src, dst)
    }

    /// Render `val` as text.
    pub fn render(&self, val: &Value) -> Result<String, TypeError> {
        (self.show)(val)
    }

    /// Render `val` into `buf`, returning the number of bytes written.
    pub fn show(&self, val: &Value, buf: &mut [u8]) -> Result<usize, TypeError> {
        let text = self.render(val)?;

        if text.len() > buf.len() {
            return Err(TypeError::BufferTooSmall {
                needed: text.len(),
                available: buf.len(),
            });
        }

        buf[..text.len()].copy_from_slice(text.as_bytes());
        Ok(text.len())
    }

    /// Check `val` against the configured range; succeeds when there is no range.
    pub fn check(&self, val: &Value) -> Result<(), TypeError> {
        match (&self.check, &self.range) {
            (Some(check), Some(range)) => check(range, val),
            _ => Ok(()),
        }
    }
}

fn checker(tag: TypeTag) -> Option<CheckFn> {
    match tag {
        TypeTag::U8
        | TypeTag::U16
        | TypeTag::U32
        | TypeTag::U32Size
        | TypeTag::U64
        | TypeTag::U64Size
        | TypeTag::Uid
        | TypeTag::Gid
        | TypeTag::Mode => Some(check_unsigned),
        TypeTag::String => Some(check_string),
        TypeTag::S64 | TypeTag::Bool => None,
    }
}

fn conversion(src: &str, tag: TypeTag) -> TypeError {
    TypeError::Conversion {
        text: src.to_string(),
        tag,
    }
}

fn mismatch(tag: TypeTag, slot: SlotKind) -> TypeError {
    TypeError::SlotMismatch { tag, slot }
}

fn parse_width<T: TryFrom<u64>>(src: &str, tag: TypeTag) -> Result<T, TypeError> {
    parse_unsigned(src)
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| conversion(src, tag))
}

fn get_u8(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U8(target) => {
            **target = parse_width(src, TypeTag::U8)?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U8, other.kind())),
    }
}

fn get_u16(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U16(target) => {
            **target = parse_width(src, TypeTag::U16)?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U16, other.kind())),
    }
}

fn get_u32(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U32(target) => {
            **target = parse_width(src, TypeTag::U32)?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U32, other.kind())),
    }
}

fn get_u64(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U64(target) => {
            **target = parse_width(src, TypeTag::U64)?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U64, other.kind())),
    }
}

fn get_u32_size(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U32(target) => {
            **target = parse_size(src)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| conversion(src, TypeTag::U32Size))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U32Size, other.kind())),
    }
}

fn get_u64_size(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U64(target) => {
            **target = parse_size(src).ok_or_else(|| conversion(src, TypeTag::U64Size))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::U64Size, other.kind())),
    }
}

fn get_s64(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::S64(target) => {
            **target = parse_signed(src).ok_or_else(|| conversion(src, TypeTag::S64))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::S64, other.kind())),
    }
}

fn get_bool(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::Bool(target) => {
            **target = match src.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => return Err(conversion(src, TypeTag::Bool)),
            };
            Ok(())
        }
        other => Err(mismatch(TypeTag::Bool, other.kind())),
    }
}

fn get_string(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::Str(target, capacity) => {
            if src.len() > *capacity {
                return Err(TypeError::BufferTooSmall {
                    needed: src.len(),
                    available: *capacity,
                });
            }

            target.clear();
            target.push_str(src);
            Ok(())
        }
        other => Err(mismatch(TypeTag::String, other.kind())),
    }
}

fn get_uid(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U32(target) => {
            **target = match parse_unsigned(src) {
                Some(id) => u32::try_from(id).ok(),
                None => lookup_user(src),
            }
            .ok_or_else(|| conversion(src, TypeTag::Uid))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::Uid, other.kind())),
    }
}

fn get_gid(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U32(target) => {
            **target = match parse_unsigned(src) {
                Some(id) => u32::try_from(id).ok(),
                None => lookup_group(src),
            }
            .ok_or_else(|| conversion(src, TypeTag::Gid))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::Gid, other.kind())),
    }
}

#[cfg(unix)]
fn lookup_user(name: &str) -> Option<u32> {
    nix::unistd::User::from_name(name)
        .ok()
        .flatten()
        .map(|user| user.uid.as_raw())
}

#[cfg(not(unix))]
fn lookup_user(_name: &str) -> Option<u32> {
    None
}

#[cfg(unix)]
fn lookup_group(name: &str) -> Option<u32> {
    nix::unistd::Group::from_name(name)
        .ok()
        .flatten()
        .map(|group| group.gid.as_raw())
}

#[cfg(not(unix))]
fn lookup_group(_name: &str) -> Option<u32> {
    None
}

const MODE_MAX: u32 = 0o7777;

fn get_mode(src: &str, dst: &mut Slot<'_>) -> Result<(), TypeError> {
    match dst {
        Slot::U32(target) => {
            if src.is_empty() || !src.chars().all(|c| c.is_digit(8)) {
                return Err(conversion(src, TypeTag::Mode));
            }

            **target = u32::from_str_radix(src, 8)
                .ok()
                .filter(|mode| *mode <= MODE_MAX)
                .ok_or_else(|| conversion(src, TypeTag::Mode))?;
            Ok(())
        }
        other => Err(mismatch(TypeTag::Mode, other.kind())),
    }
}

macro_rules! show_fn {
    ($name:ident, $tag:expr, $variant:ident, $v:ident => $render:expr) => {
        fn $name(val: &Value) -> Result<String, TypeError> {
            match val {
                Value::$variant($v) => Ok($render),
                other => Err(mismatch($tag, other.kind())),
            }
        }
    };
}

show_fn!(show_u8, TypeTag::U8, U8, v => format!("{v:#x}"));
show_fn!(show_u8_dec, TypeTag::U8, U8, v => v.to_string());
show_fn!(show_u16, TypeTag::U16, U16, v => format!("{v:#x}"));
show_fn!(show_u16_dec, TypeTag::U16, U16, v => v.to_string());
show_fn!(show_u32, TypeTag::U32, U32, v => format!("{v:#x}"));
show_fn!(show_u32_dec, TypeTag::U32, U32, v => v.to_string());
show_fn!(show_u64, TypeTag::U64, U64, v => format!("{v:#x}"));
show_fn!(show_u64_dec, TypeTag::U64, U64, v => v.to_string());
show_fn!(show_u32_size, TypeTag::U32Size, U32, v => size_to_string(u64::from(*v)));
show_fn!(show_u64_size, TypeTag::U64Size, U64, v => size_to_string(*v));
show_fn!(show_s64, TypeTag::S64, S64, v => v.to_string());
show_fn!(show_bool, TypeTag::Bool, Bool, v => v.to_string());
show_fn!(show_string, TypeTag::String, Str, v => v.clone());
show_fn!(show_uid, TypeTag::Uid, U32, v => v.to_string());
show_fn!(show_gid, TypeTag::Gid, U32, v => v.to_string());
show_fn!(show_mode, TypeTag::Mode, U32, v => format!("{v:04o}"));

fn check_unsigned(range: &Range<u64>, val: &Value) -> Result<(), TypeError> {
    let value = match val {
        Value::U8(v) => u64::from(*v),
        Value::U16(v) => u64::from(*v),
        Value::U32(v) => u64::from(*v),
        Value::U64(v) => *v,
        other => return Err(mismatch(TypeTag::U64, other.kind())),
    };
    check_bounds(range, value)
}

fn check_string(range: &Range<u64>, val: &Value) -> Result<(), TypeError> {
    match val {
        Value::Str(v) => check_bounds(range, v.len() as u64),
        other => Err(mismatch(TypeTag::String, other.kind())),
    }
}

fn check_bounds(range: &Range<u64>, value: u64) -> Result<(), TypeError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(TypeError::Range {
            value,
            min: range.start,
            max: range.end,
        })
    }
}
