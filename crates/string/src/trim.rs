/// Characters removed by [`trim`], [`ltrim`] and [`rtrim`].
pub const DEFAULT_TRIM_SET: &str = " \t\n\u{0b}\u{0c}\r";

/// Trims any character of `set` from the left and/or right side of `s`.
pub fn trim_set<'a>(s: &'a str, set: &str, left: bool, right: bool) -> &'a str {
    let in_set = |c: char| set.contains(c);
    let s = if left { s.trim_start_matches(in_set) } else { s };
    if right { s.trim_end_matches(in_set) } else { s }
}

pub fn trim(s: &str) -> &str {
    trim_set(s, DEFAULT_TRIM_SET, true, true)
}

pub fn ltrim(s: &str) -> &str {
    trim_set(s, DEFAULT_TRIM_SET, true, false)
}

pub fn rtrim(s: &str) -> &str {
    trim_set(s, DEFAULT_TRIM_SET, false, true)
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a character.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        assert_eq!(trim(" \t hi \r\n"), "hi");
        assert_eq!(ltrim("  hi  "), "hi  ");
        assert_eq!(rtrim("  hi  "), "  hi");
        assert_eq!(trim("\u{0b}\u{0c}"), "");
    }

    #[test]
    fn test_trim_set() {
        assert_eq!(trim_set("xxhixy", "xy", true, true), "hi");
        assert_eq!(trim_set("xxhixy", "xy", false, true), "xxhi");
        assert_eq!(trim_set("xxhixy", "", true, true), "xxhixy");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("héllo", 3), "hé");
        assert_eq!(truncate("abc", 0), "");
    }
}
