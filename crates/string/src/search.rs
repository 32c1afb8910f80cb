use pcl_error::{Error, ErrorCode, Result};

/// ASCII case-insensitive substring search. Returns the byte offset of the first
/// match; an empty needle matches at 0.
pub fn istr(haystack: &str, needle: &str) -> Option<usize> {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() {
        return Some(0);
    }
    if n.len() > h.len() {
        return None;
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}

type Finder = fn(&str, &str) -> Option<usize>;

fn split_with(s: &str, delim: &str, find: Finder) -> Vec<String> {
    let mut out = Vec::new();
    if delim.is_empty() {
        if !s.is_empty() {
            out.push(s.to_string());
        }
        return out;
    }
    let mut rest = s;
    while !rest.is_empty() {
        match find(rest, delim) {
            Some(at) => {
                out.push(rest[..at].to_string());
                rest = &rest[at + delim.len()..];
            }
            None => {
                out.push(rest.to_string());
                break;
            }
        }
    }
    out
}

/// Splits on every occurrence of `delim`.
///
/// Consecutive delimiters produce empty elements, but a trailing delimiter does not
/// produce a trailing empty element: `"a,,b,"` splits into `["a", "", "b"]`.
pub fn split(s: &str, delim: &str) -> Vec<String> {
    split_with(s, delim, |h, n| h.find(n))
}

/// Case-insensitive [`split`].
pub fn isplit(s: &str, delim: &str) -> Vec<String> {
    split_with(s, delim, istr)
}

fn replace_with(s: &str, from: &str, to: &str, find: Finder) -> Result<String> {
    if from.is_empty() {
        return Err(Error::with_msg(ErrorCode::Invalid, "empty search string"));
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(at) = find(rest, from) {
        out.push_str(&rest[..at]);
        out.push_str(to);
        rest = &rest[at + from.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Replaces every occurrence of `from` with `to`.
pub fn replace(s: &str, from: &str, to: &str) -> Result<String> {
    replace_with(s, from, to, |h, n| h.find(n))
}

/// Case-insensitive [`replace`].
pub fn ireplace(s: &str, from: &str, to: &str) -> Result<String> {
    replace_with(s, from, to, istr)
}

/// Like [`replace`], for callers with a fixed-size destination: fails with `EBUF`
/// when the result plus a terminator would not fit in `max` bytes.
pub fn replace_bounded(s: &str, max: usize, from: &str, to: &str) -> Result<String> {
    let out = replace(s, from, to)?;
    if out.len() >= max {
        return Err(Error::with_msg(
            ErrorCode::Buffer,
            format!("result needs {} bytes, buffer holds {max}", out.len() + 1),
        ));
    }
    Ok(out)
}
