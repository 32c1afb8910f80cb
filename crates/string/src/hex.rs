use std::fmt::Write;

use pcl_error::{Error, ErrorCode, Result};

/// Lowercase hex encoding.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Decodes a hex string, with an optional `0x` prefix.
///
/// The input must hold an even number of characters, at least two. Non-hex digits
/// are an `EFORMAT` error.
pub fn hex_decode(hex: &str) -> Result<Vec<u8>> {
    if hex.len() < 2 || hex.len() % 2 != 0 {
        return Err(Error::with_msg(
            ErrorCode::Invalid,
            format!("hex string must have an even length of at least 2, got {}", hex.len()),
        ));
    }
    let digits = hex.strip_prefix("0x").unwrap_or(hex).as_bytes();
    digits
        .chunks(2)
        .map(|pair| match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(Error::with_msg(
                ErrorCode::Format,
                format!("invalid hex digits '{}'", String::from_utf8_lossy(pair)),
            )),
        })
        .collect()
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x00, 0xab, 0x10, 0xff]), "00ab10ff");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex_decode("00AB10ff").unwrap(), vec![0x00, 0xab, 0x10, 0xff]);
        assert_eq!(hex_decode("0x0102").unwrap(), vec![1, 2]);
        assert!(hex_decode("0x").unwrap().is_empty());
    }

    #[test]
    fn test_hex_decode_errors() {
        assert_eq!(hex_decode("a").unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(hex_decode("abc").unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(hex_decode("zz").unwrap_err().code(), ErrorCode::Format);
    }
}
