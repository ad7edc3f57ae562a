// Binary magnitude suffixes, smallest first.
const SUFFIXES: [(char, u32); 6] = [
    ('K', 10),
    ('M', 20),
    ('G', 30),
    ('T', 40),
    ('P', 50),
    ('E', 60),
];

/// Split an integer literal into its digits and radix.
///
/// Accepts the same forms as C's `strtoul(.., 0)`: `0x`/`0X` for hex, a leading `0` for octal, otherwise decimal.
fn radix_of(src: &str) -> (&str, u32) {
    if let Some(hex) = src.strip_prefix("0x").or_else(|| src.strip_prefix("0X")) {
        (hex, 16)
    } else if src.len() > 1 && src.starts_with('0') {
        (&src[1..], 8)
    } else {
        (src, 10)
    }
}

/// Parse an unsigned integer literal (decimal, `0x` hex, or leading-`0` octal).
///
/// The entire input must be consumed; signs and whitespace are rejected.
pub(crate) fn parse_unsigned(src: &str) -> Option<u64> {
    let (digits, radix) = radix_of(src);

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    u64::from_str_radix(digits, radix).ok()
}

/// Parse a signed integer literal: an optional `+`/`-` followed by an unsigned literal.
pub(crate) fn parse_signed(src: &str) -> Option<i64> {
    if let Some(magnitude) = src.strip_prefix('-') {
        let magnitude = parse_unsigned(magnitude)?;

        if magnitude == i64::MIN.unsigned_abs() {
            Some(i64::MIN)
        } else {
            i64::try_from(magnitude).ok().map(|m| -m)
        }
    } else {
        let src = src.strip_prefix('+').unwrap_or(src);
        parse_unsigned(src).and_then(|m| i64::try_from(m).ok())
    }
}

fn suffix_shift(letter: char) -> Option<u32> {
    let upper = letter.to_ascii_uppercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| *suffix == upper)
        .map(|(_, shift)| *shift)
}

/// Parse a size literal: an unsigned integer followed by an optional magnitude suffix.
///
/// Suffixes are `k m g t p e` (either case), binary multipliers from 2^10 to 2^60.
/// A trailing letter which is a digit of the literal's radix is a digit, not a suffix (ex: `0x1e` is `30`).
pub(crate) fn parse_size(src: &str) -> Option<u64> {
    let (_, radix) = radix_of(src);
    let (number, shift) = match src.char_indices().last() {
        Some((i, last)) if !last.is_digit(radix) => (&src[..i], suffix_shift(last)?),
        Some(_) => (src, 0),
        None => return None,
    };

    parse_unsigned(number)?.checked_mul(1u64 << shift)
}

/// Render a size using the largest suffix which represents it exactly (ex: `10M`, `1536K`, `7`).
pub(crate) fn size_to_string(size: u64) -> String {
    if size == 0 {
        return "0".to_string();
    }

    for (suffix, shift) in SUFFIXES.iter().rev() {
        if size.trailing_zeros() >= *shift {
            return format!("{}{suffix}", size >> shift);
        }
    }

    size.to_string()
}

/// Render a byte count approximately, with one decimal and a binary suffix (ex: `1.5G`).
///
/// Counts below 1024 are rendered verbatim.
pub fn space_to_string(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = None;

    for (suffix, _) in SUFFIXES {
        if value < 1024.0 {
            break;
        }

        value /= 1024.0;
        unit.replace(suffix);
    }

    match unit {
        Some(suffix) => format!("{value:.1}{suffix}"),
        None => bytes.to_string(),
    }
}
