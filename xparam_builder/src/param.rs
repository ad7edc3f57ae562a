use std::ops::{BitOr, Range};

use crate::types::{ParamType, Slot, TypeError, TypeTag, Value};

/// Flags on a [`Param`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParamFlags(u32);

impl ParamFlags {
    /// Exclude the parameter from default usage output.
    /// It remains parseable.
    pub const HIDDEN: ParamFlags = ParamFlags(0x1);

    /// No flags set.
    pub const fn empty() -> Self {
        ParamFlags(0)
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: ParamFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// The raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for ParamFlags {
    type Output = ParamFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        ParamFlags(self.0 | rhs.0)
    }
}

/// A `name=value` parameter, bound to a caller owned variable.
///
/// By default a parameter may be given at most once (`given(0, 1)`).
/// ```
/// # use xparam_builder::*;
/// let mut capacity: u64 = 0;
/// let param = Param::u64_size(&mut capacity, "capacity")
///     .help("Capacity of the pool.")
///     .required();
/// assert_eq!(param.name(), "capacity");
/// assert_eq!(param.token(), "capacity=<u64_size>");
/// ```
#[derive(Debug)]
pub struct Param<'a> {
    name: String,
    meta: Option<String>,
    param_type: ParamType,
    slot: Slot<'a>,
    help: Option<String>,
    flags: ParamFlags,
    given_min: u32,
    given_max: u32,
    given: u32,
}

impl<'a> Param<'a> {
    /// Create a parameter of any registry type.
    ///
    /// The slot must be of the type's slot kind; this is verified by [`ParamTable::new`](crate::ParamTable::new).
    pub fn new(param_type: ParamType, slot: impl Into<Slot<'a>>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: None,
            param_type,
            slot: slot.into(),
            help: None,
            flags: ParamFlags::empty(),
            given_min: 0,
            given_max: 1,
            given: 0,
        }
    }

    /// A `u8` parameter bound to `variable`.
    pub fn u8(variable: &'a mut u8, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U8), variable, name)
    }

    /// A `u16` parameter bound to `variable`.
    pub fn u16(variable: &'a mut u16, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U16), variable, name)
    }

    /// A `u32` parameter bound to `variable`.
    pub fn u32(variable: &'a mut u32, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U32), variable, name)
    }

    /// A `u64` parameter bound to `variable`.
    pub fn u64(variable: &'a mut u64, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U64), variable, name)
    }

    /// A signed 64 bit parameter bound to `variable`.
    pub fn s64(variable: &'a mut i64, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::S64), variable, name)
    }

    /// A boolean parameter bound to `variable`.
    pub fn bool(variable: &'a mut bool, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::Bool), variable, name)
    }

    /// A `u32` accepting magnitude suffixes (ex: `4k`).
    pub fn u32_size(variable: &'a mut u32, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U32Size), variable, name)
    }

    /// A `u64` accepting magnitude suffixes (ex: `10M`).
    pub fn u64_size(variable: &'a mut u64, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::U64Size), variable, name)
    }

    /// A string of at most `capacity` bytes.
    pub fn string(variable: &'a mut String, capacity: usize, name: impl Into<String>) -> Self {
        Self::new(
            ParamType::of(TypeTag::String),
            Slot::string(variable, capacity),
            name,
        )
    }

    /// A non-empty string of fewer than `capacity` bytes.
    pub fn xstring(variable: &'a mut String, capacity: usize, name: impl Into<String>) -> Self {
        Self::new(
            ParamType::of(TypeTag::String).range(1..capacity as u64),
            Slot::string(variable, capacity),
            name,
        )
    }

    /// A user id, given numerically or by user name.
    pub fn uid(variable: &'a mut u32, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::Uid), variable, name)
    }

    /// A group id, given numerically or by group name.
    pub fn gid(variable: &'a mut u32, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::Gid), variable, name)
    }

    /// File mode bits, given in octal.
    pub fn mode(variable: &'a mut u32, name: impl Into<String>) -> Self {
        Self::new(ParamType::of(TypeTag::Mode), variable, name)
    }

    /// A percentage: a `u8` in `[0, 101)`.
    pub fn pct(variable: &'a mut u8, name: impl Into<String>) -> Self {
        Self::new(ParamType::pct(), variable, name)
    }

    /// Document the parameter in the usage output.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Set the display template (defaults to `name=<type>`).
    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta.replace(meta.into());
        self
    }

    /// Exclude the parameter from default usage output.
    pub fn hidden(self) -> Self {
        self.flags(ParamFlags::HIDDEN)
    }

    /// Add to the parameter's flags.
    pub fn flags(mut self, flags: ParamFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    /// The parameter must be given at least `min` and at most `max` times (both inclusive).
    pub fn given(mut self, min: u32, max: u32) -> Self {
        self.given_min = min;
        self.given_max = max;
        self
    }

    /// The parameter must be given precisely once.
    pub fn required(self) -> Self {
        self.given(1, 1)
    }

    /// Restrict the value to the half-open `range`.
    pub fn range(mut self, range: Range<u64>) -> Self {
        self.param_type = self.param_type.range(range);
        self
    }

    /// Render unsigned integers in hex.
    pub fn hex(mut self) -> Self {
        self.param_type = self.param_type.hex();
        self
    }

    /// The literal name matched on the command line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display token for usage output.
    pub fn token(&self) -> String {
        match &self.meta {
            Some(meta) => meta.clone(),
            None => format!("{}=<{}>", self.name, self.param_type.tag()),
        }
    }

    /// The help text.
    pub fn description(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The type descriptor, including any range.
    pub fn param_type(&self) -> &ParamType {
        &self.param_type
    }

    /// Whether the parameter is left out of default usage.
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ParamFlags::HIDDEN)
    }

    /// The minimum number of occurrences.
    pub fn given_min(&self) -> u32 {
        self.given_min
    }

    /// The maximum number of occurrences.
    pub fn given_max(&self) -> u32 {
        self.given_max
    }

    /// The number of times this parameter was successfully matched.
    pub fn count(&self) -> u32 {
        self.given
    }

    /// Snapshot of the bound variable.
    pub fn value(&self) -> Value {
        self.slot.value()
    }

    /// Render the bound variable with the parameter's type.
    pub fn render(&self) -> Result<String, TypeError> {
        self.param_type.render(&self.slot.value())
    }

    pub(crate) fn slot_matches(&self) -> bool {
        self.slot.kind() == self.param_type.slot_kind()
    }

    /// Convert `text` into the bound variable.
    ///
    /// Does not count the occurrence; `accept` does, once the value is also range checked.
    pub(crate) fn convert(&mut self, text: &str) -> Result<(), TypeError> {
        self.param_type.get(text, &mut self.slot)
    }

    /// Count one successful occurrence.
    pub(crate) fn accept(&mut self) {
        self.given += 1;
    }

    pub(crate) fn check(&self) -> Result<(), TypeError> {
        self.param_type.check(&self.slot.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotKind;
    use rstest::rstest;

    #[test]
    fn flags() {
        assert!(!ParamFlags::empty().contains(ParamFlags::HIDDEN));
        assert!((ParamFlags::empty() | ParamFlags::HIDDEN).contains(ParamFlags::HIDDEN));
        assert!(ParamFlags::HIDDEN.contains(ParamFlags::empty()));
        assert_eq!(ParamFlags::HIDDEN.bits(), 1);
    }

    #[test]
    fn defaults() {
        let mut variable: u32 = 5;
        let param = Param::u32(&mut variable, "count");

        assert_eq!(param.name(), "count");
        assert_eq!(param.token(), "count=<u32>");
        assert_eq!(param.description(), None);
        assert!(!param.is_hidden());
        assert_eq!(param.given_min(), 0);
        assert_eq!(param.given_max(), 1);
        assert_eq!(param.count(), 0);
        assert_eq!(param.value(), Value::U32(5));
        assert_eq!(param.render().unwrap(), "5");
    }

    #[test]
    fn builder() {
        let mut variable: u8 = 0;
        let param = Param::u8(&mut variable, "ratio")
            .help("Ratio.")
            .meta("ratio=N")
            .hidden()
            .given(1, 3)
            .range(1..10)
            .hex();

        assert_eq!(param.token(), "ratio=N");
        assert_eq!(param.description(), Some("Ratio."));
        assert!(param.is_hidden());
        assert_eq!(param.given_min(), 1);
        assert_eq!(param.given_max(), 3);
        assert_eq!(param.param_type().bounds(), Some(&(1..10)));
        assert_eq!(param.render().unwrap(), "0x0");
    }

    #[test]
    fn required() {
        let mut variable = false;
        let param = Param::bool(&mut variable, "force").required();
        assert_eq!((param.given_min(), param.given_max()), (1, 1));
    }

    #[rstest]
    #[case(TypeTag::U8, SlotKind::U8)]
    #[case(TypeTag::Uid, SlotKind::U32)]
    #[case(TypeTag::Gid, SlotKind::U32)]
    #[case(TypeTag::Mode, SlotKind::U32)]
    #[case(TypeTag::U32Size, SlotKind::U32)]
    #[case(TypeTag::U64Size, SlotKind::U64)]
    fn constructors_match_slots(#[case] tag: TypeTag, #[case] kind: SlotKind) {
        let mut a: u8 = 0;
        let mut b: u32 = 0;
        let mut c: u64 = 0;
        let param = match tag {
            TypeTag::U8 => Param::u8(&mut a, "p"),
            TypeTag::Uid => Param::uid(&mut b, "p"),
            TypeTag::Gid => Param::gid(&mut b, "p"),
            TypeTag::Mode => Param::mode(&mut b, "p"),
            TypeTag::U32Size => Param::u32_size(&mut b, "p"),
            TypeTag::U64Size => Param::u64_size(&mut c, "p"),
            _ => unreachable!("un-planned test case"),
        };

        assert_eq!(param.param_type().tag(), tag);
        assert_eq!(param.param_type().slot_kind(), kind);
        assert!(param.slot_matches());
    }

    #[test]
    fn mismatched_slot() {
        let mut variable: u64 = 0;
        let param = Param::new(ParamType::of(TypeTag::U8), &mut variable, "p");
        assert!(!param.slot_matches());
    }

    #[test]
    fn convert_does_not_count() {
        let mut variable: u16 = 0;
        let mut param = Param::u16(&mut variable, "p");

        param.convert("7").unwrap();
        param.convert("0x10").unwrap();
        assert_matches!(param.convert("x"), Err(TypeError::Conversion { .. }));
        assert_eq!(param.count(), 0);
        assert_eq!(param.value(), Value::U16(16));

        param.accept();
        param.accept();
        assert_eq!(param.count(), 2);
    }

    #[test]
    fn xstring_bounds() {
        let mut variable = String::default();
        let mut param = Param::xstring(&mut variable, 4, "label");

        param.convert("").unwrap();
        assert_matches!(param.check(), Err(TypeError::Range { value: 0, min: 1, max: 4 }));

        param.convert("abc").unwrap();
        param.check().unwrap();

        assert_matches!(param.convert("abcde"), Err(TypeError::BufferTooSmall { .. }));
    }

    #[test]
    fn pct() {
        let mut variable: u8 = 0;
        let mut param = Param::pct(&mut variable, "pct");

        param.convert("100").unwrap();
        param.check().unwrap();

        param.convert("101").unwrap();
        assert_matches!(param.check(), Err(TypeError::Range { value: 101, .. }));
    }
}
