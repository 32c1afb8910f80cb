//! String to integer conversion with explicit range checking.

use pcl_error::{Error, ErrorCode, Result};

/// Integer types [`parse_int`] can produce.
pub trait StrInt: TryFrom<i128> + Copy {
    const SIGNED: bool;
}

macro_rules! impl_strint {
    ($($t:ty => $signed:expr),*) => {
        $( impl StrInt for $t { const SIGNED: bool = $signed; } )*
    };
}

impl_strint!(i8 => true, i16 => true, i32 => true, i64 => true,
             u8 => false, u16 => false, u32 => false, u64 => false);

/// Parses an integer from the start of `s`, returning the value and the number of
/// bytes consumed.
///
/// Leading whitespace and a sign are accepted. With `base` 0 the base is taken from
/// the prefix: `0x` is hex, a leading `0` octal, anything else decimal. A `0x`
/// prefix is also allowed with base 16. Parsing stops at the first character that is
/// not a digit of the base.
///
/// Errors: `EINVAL` for a bad base or when no digits are found, `ERANGE` when the
/// value does not fit in `T` (including negative values for unsigned types).
pub fn parse_int<T: StrInt>(s: &str, base: u32) -> Result<(T, usize)> {
    if base == 1 || base > 36 {
        return Err(Error::with_msg(ErrorCode::Invalid, format!("invalid base {base}")));
    }
    let bytes = s.as_bytes();
    let mut i = bytes
        .iter()
        .take_while(|&&b| b.is_ascii_whitespace() || b == b'\x0b')
        .count();

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let has_hex_prefix = bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x' | b'X'))
        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
    let base = match base {
        0 | 16 if has_hex_prefix => {
            i += 2;
            16
        }
        0 if bytes.get(i) == Some(&b'0') => 8,
        0 => 10,
        b => b,
    };

    let start = i;
    let mut magnitude: u128 = 0;
    let mut overflow = false;
    while let Some(d) = bytes.get(i).and_then(|&b| (b as char).to_digit(base)) {
        match magnitude.checked_mul(base as u128).and_then(|m| m.checked_add(d as u128)) {
            Some(m) => magnitude = m,
            None => overflow = true,
        }
        i += 1;
    }
    if i == start {
        return Err(Error::with_msg(ErrorCode::Invalid, "no digits found"));
    }

    let range_err = || {
        Error::with_msg(
            ErrorCode::Range,
            format!("'{}' is out of range", &s[..i]),
        )
    };
    if overflow || magnitude > i128::MAX as u128 + 1 {
        return Err(range_err());
    }
    let value: i128 = if negative {
        if !T::SIGNED && magnitude != 0 {
            return Err(range_err());
        }
        (magnitude as i128).wrapping_neg()
    } else if magnitude > i128::MAX as u128 {
        return Err(range_err());
    } else {
        magnitude as i128
    };

    T::try_from(value).map(|v| (v, i)).map_err(|_| range_err())
}

pub fn strtoi(s: &str, base: u32) -> Result<(i32, usize)> {
    parse_int(s, base)
}

pub fn strtoui(s: &str, base: u32) -> Result<(u32, usize)> {
    parse_int(s, base)
}

pub fn strtol(s: &str, base: u32) -> Result<(i64, usize)> {
    parse_int(s, base)
}

pub fn strtoul(s: &str, base: u32) -> Result<(u64, usize)> {
    parse_int(s, base)
}

pub fn strtoll(s: &str, base: u32) -> Result<(i64, usize)> {
    parse_int(s, base)
}

pub fn strtoull(s: &str, base: u32) -> Result<(u64, usize)> {
    parse_int(s, base)
}
