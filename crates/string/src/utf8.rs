use pcl_error::{Error, ErrorCode, Result};

const ORDINALS: [&str; 4] = ["1st", "2nd", "3rd", "4th"];

/// Validates UTF-8, reporting the offending bytes on failure.
///
/// ```text
/// Code Points         1st      2nd      3rd      4th
/// U+0000..U+007F      00..7F
/// U+0080..U+07FF      C2..DF   80..BF
/// U+0800..U+0FFF      E0       A0..BF   80..BF
/// U+1000..U+CFFF      E1..EC   80..BF   80..BF
/// U+D000..U+D7FF      ED       80..9F   80..BF
/// U+E000..U+FFFF      EE..EF   80..BF   80..BF
/// U+10000..U+3FFFF    F0       90..BF   80..BF   80..BF
/// U+40000..U+FFFFF    F1..F3   80..BF   80..BF   80..BF
/// U+100000..U+10FFFF  F4       80..8F   80..BF   80..BF
/// ```
pub fn utf8_check(bytes: &[u8]) -> Result<()> {
    let mut i = 0;
    while i < bytes.len() {
        let first = bytes[i];
        let (width, second) = match first {
            0x00..=0x7f => {
                i += 1;
                continue;
            }
            0xc2..=0xdf => (2, 0x80..=0xbf),
            0xe0 => (3, 0xa0..=0xbf),
            0xed => (3, 0x80..=0x9f),
            0xe1..=0xef => (3, 0x80..=0xbf),
            0xf0 => (4, 0x90..=0xbf),
            0xf4 => (4, 0x80..=0x8f),
            0xf1..=0xf3 => (4, 0x80..=0xbf),
            _ => {
                return Err(Error::with_msg(
                    ErrorCode::IllegalSeq,
                    format!("invalid first byte: {first:02x} at offset {i}"),
                ));
            }
        };

        let seq = &bytes[i..bytes.len().min(i + width)];
        if seq.len() < width {
            return Err(Error::with_msg(
                ErrorCode::IllegalSeq,
                format!("{width}-byte sequence missing bytes: first={first:02x}"),
            ));
        }

        for (n, &b) in seq.iter().enumerate().skip(1) {
            let valid = if n == 1 {
                second.contains(&b)
            } else {
                (0x80..=0xbf).contains(&b)
            };
            if !valid {
                let shown: Vec<String> = seq[..=n].iter().map(|b| format!("{b:02x}")).collect();
                return Err(Error::with_msg(
                    ErrorCode::IllegalSeq,
                    format!(
                        "{width}-byte sequence has invalid {} byte: {}",
                        ORDINALS[n],
                        shown.join(", ")
                    ),
                ));
            }
        }
        i += width;
    }
    Ok(())
}

/// Encodes a Unicode code point as UTF-8.
///
/// Values above U+10FFFF are `EINVAL`; surrogate halves are `EINVCODEPT`.
pub fn utf8_from_code(code: u32) -> Result<String> {
    if code > 0x10ffff {
        return Err(Error::with_msg(
            ErrorCode::Invalid,
            format!("code point U+{code:X} is out of range"),
        ));
    }
    char::from_u32(code).map(String::from).ok_or_else(|| {
        Error::with_msg(
            ErrorCode::InvalidCodepoint,
            format!("U+{code:X} is a surrogate code point"),
        )
    })
}
