//! Recursive-descent JSON parser.
//!
//! Errors carry the specific syntax problem at the error site and an outer frame
//! with the line number and up to 16 characters of context where the failing value
//! started.

use pcl_error::{Error, ErrorCode, Result, trc};

use crate::value::{Object, Value};

const BOM: &str = "\u{feff}";
const CONTEXT_CHARS: usize = 16;
const MAX_DEPTH: usize = 512;

#[track_caller]
fn syntax(msg: impl Into<String>) -> Error {
    Error::with_msg(ErrorCode::Syntax, msg)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    // start of the value being parsed, used for error context
    ctx: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            pos,
            ctx: pos,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skips whitespace; reaching the end of input is an error.
    fn skip_ws(&mut self) -> Result<u8> {
        while let Some(c) = self.peek() {
            match c {
                b'\n' => self.line += 1,
                b' ' | b'\t' | b'\r' => {}
                _ => return Ok(c),
            }
            self.pos += 1;
        }
        Err(syntax("unexpected end of input"))
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(syntax("maximum nesting depth exceeded"));
        }
        self.ctx = self.pos;
        let c = self.skip_ws()?;
        self.ctx = self.pos;

        match c {
            b'{' => self.parse_object(depth),
            b'[' => self.parse_array(depth),
            b'"' => self.parse_string().map(Value::String),
            b't' => self.parse_literal("true", Value::Bool(true)),
            b'f' => self.parse_literal("false", Value::Bool(false)),
            b'n' => self.parse_literal("null", Value::Null),
            b'-' | b'.' | b'0'..=b'9' => self.parse_number(),
            _ => Err(syntax("expected json value")),
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value> {
        if !self.rest().starts_with(word) {
            return Err(syntax("invalid json value"));
        }
        self.pos += word.len();
        Ok(value)
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1;
        let mut obj = Object::new();

        if self.skip_ws()? == b'}' {
            self.pos += 1;
            return Ok(Value::Object(obj));
        }

        loop {
            self.ctx = self.pos;
            let key = self.parse_string()?;

            if self.skip_ws()? != b':' {
                return Err(syntax("expected value ':' separator"));
            }
            self.pos += 1;

            let value = self.parse_value(depth + 1)?;
            if let Err(e) = obj.put(key.clone(), value, true) {
                return Err(trc!(e, "failed to put '{}' key", key));
            }

            match self.skip_ws()? {
                b'}' => {
                    self.pos += 1;
                    return Ok(Value::Object(obj));
                }
                b',' => {
                    self.pos += 1;
                    self.skip_ws()?;
                }
                _ => return Err(syntax("missing comma after value")),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1;
        let mut arr = Vec::new();

        if self.skip_ws()? == b']' {
            self.pos += 1;
            return Ok(Value::Array(arr));
        }

        loop {
            arr.push(self.parse_value(depth + 1)?);

            match self.skip_ws()? {
                b']' => {
                    self.pos += 1;
                    return Ok(Value::Array(arr));
                }
                b',' => {
                    self.pos += 1;
                    self.skip_ws()?;
                }
                _ => return Err(syntax("missing comma after value")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        if self.peek() != Some(b'"') {
            return Err(syntax("expected opening quote"));
        }
        self.ctx = self.pos;
        self.pos += 1;

        let mut out = String::new();
        loop {
            let rest = self.rest();
            let Some(stop) = rest.find(|c: char| c == '"' || c == '\\' || c < ' ') else {
                self.pos = self.src.len();
                return Err(syntax("expected closing double quote"));
            };
            out.push_str(&rest[..stop]);
            self.pos += stop;

            match rest.as_bytes()[stop] {
                b'"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                }
                c => {
                    return Err(syntax(format!(
                        "invalid control character 0x{c:02x} in string"
                    )));
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let Some(c) = self.peek() else {
            return Err(syntax("expected closing double quote"));
        };
        self.pos += 1;
        let decoded = match c {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.parse_unicode_escape()?,
            other => {
                return Err(syntax(format!(
                    "invalid escape sequence '\\{}'",
                    other as char
                )));
            }
        };
        out.push(decoded);
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| syntax("invalid unicode escape: expected 4 hex digits"))?;
        self.pos += 4;
        u32::from_str_radix(digits, 16).map_err(|e| syntax(e.to_string()))
    }

    /// Decodes the `XXXX` of a `\uXXXX` escape, combining surrogate pairs.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let high = self.parse_hex4()?;
        let code = match high {
            0xd800..=0xdbff => {
                if !self.rest().starts_with("\\u") {
                    return Err(Error::with_msg(
                        ErrorCode::InvalidCodepoint,
                        format!("unpaired high surrogate \\u{high:04x}"),
                    ));
                }
                self.pos += 2;
                let low = self.parse_hex4()?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(Error::with_msg(
                        ErrorCode::InvalidCodepoint,
                        format!("invalid low surrogate \\u{low:04x}"),
                    ));
                }
                0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
            }
            0xdc00..=0xdfff => {
                return Err(Error::with_msg(
                    ErrorCode::InvalidCodepoint,
                    format!("unpaired low surrogate \\u{high:04x}"),
                ));
            }
            code => code,
        };
        char::from_u32(code).ok_or_else(|| {
            Error::with_msg(ErrorCode::InvalidCodepoint, format!("invalid code point {code:#x}"))
        })
    }

    fn parse_number(&mut self) -> Result<Value> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut p = start;
        let (mut decimal, mut exp, mut exp_sign) = (false, false, false);

        if bytes.get(p) == Some(&b'-') {
            p += 1;
        }
        let int_start = p;

        while let Some(&c) = bytes.get(p) {
            match c {
                b'e' | b'E' => {
                    if exp {
                        return Err(syntax(format!(
                            "invalid number format: multiple exponents '{}'",
                            c as char
                        )));
                    }
                    exp = true;
                }
                b'.' => {
                    if decimal {
                        return Err(syntax("invalid number format: multiple decimal signs"));
                    }
                    decimal = true;
                }
                b'+' | b'-' => {
                    if !exp {
                        return Err(syntax(format!(
                            "invalid number format: sign '{}' in wrong position",
                            c as char
                        )));
                    }
                    if exp_sign {
                        return Err(syntax("invalid number format: multiple exponent signs"));
                    }
                    exp_sign = true;
                }
                b'0'..=b'9' => {}
                _ => break,
            }
            p += 1;
        }

        if !bytes.get(int_start).is_some_and(u8::is_ascii_digit) {
            return Err(syntax("invalid number value: no digits found"));
        }
        if bytes[int_start] == b'0' && bytes.get(int_start + 1).is_some_and(u8::is_ascii_digit) {
            return Err(syntax("invalid number value: begins with 0"));
        }

        let text = &self.src[start..p];
        let value = if exp || decimal {
            let n: f64 = text
                .parse()
                .map_err(|_| syntax(format!("invalid number value '{text}'")))?;
            if n.is_infinite() {
                return Err(Error::with_msg(
                    ErrorCode::Range,
                    format!("invalid number value '{text}'"),
                ));
            }
            Value::Real(n)
        } else {
            let n: i64 = text.parse().map_err(|_| {
                Error::with_msg(ErrorCode::Range, format!("'{text}' is out of range"))
            })?;
            Value::Integer(n)
        };

        self.pos = p;
        Ok(value)
    }

    /// Up to 16 characters from where the failing value started, with control
    /// characters escaped so they don't break the trace output.
    fn context(&self) -> String {
        let mut out = String::new();
        for c in self.src[self.ctx.min(self.src.len())..].chars().take(CONTEXT_CHARS) {
            match c {
                '\u{0c}' => out.push_str("\\f"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                '\n' => out.push_str("\\n"),
                '\u{08}' => out.push_str("\\b"),
                c => out.push(c),
            }
        }
        out
    }
}

/// Parses one JSON value from the start of `text`.
///
/// Returns the value and the byte offset just past it; anything after that offset
/// is left for the caller. A leading UTF-8 byte order mark is skipped.
pub fn parse(text: &str) -> Result<(Value, usize)> {
    let start = if text.starts_with(BOM) { BOM.len() } else { 0 };
    if text.len() == start {
        return Err(Error::with_msg(ErrorCode::Invalid, "empty json string"));
    }

    let mut parser = Parser::new(text, start);
    match parser.parse_value(0) {
        Ok(value) => Ok((value, parser.pos)),
        Err(e) => Err(trc!(e, "line={}, context={}", parser.line, parser.context())),
    }
}

/// Parses a document that must contain exactly one value, optionally surrounded by
/// whitespace.
pub fn parse_all(text: &str) -> Result<Value> {
    let (value, end) = parse(text).map_err(|e| trc!(e))?;
    let trailing = &text[end..];
    if let Some(at) = trailing.find(|c: char| !matches!(c, ' ' | '\t' | '\n' | '\r')) {
        let line = 1 + text[..end + at].matches('\n').count();
        return Err(trc!(
            syntax("unexpected trailing data"),
            "line={}, offset={}",
            line,
            end + at
        ));
    }
    Ok(value)
}

/// Parses raw bytes, validating UTF-8 first.
pub fn parse_bytes(bytes: &[u8]) -> Result<(Value, usize)> {
    pcl_string::utf8_check(bytes).map_err(|e| trc!(e, "json input is not valid utf-8"))?;
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::with_msg(ErrorCode::IllegalSeq, e.to_string()))?;
    parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> Error {
        parse(text).unwrap_err()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("null").unwrap(), (Value::Null, 4));
        assert_eq!(parse(" true").unwrap().0, Value::Bool(true));
        assert_eq!(parse("false").unwrap().0, Value::Bool(false));
        assert_eq!(parse("-42").unwrap().0, Value::Integer(-42));
        assert_eq!(parse("0").unwrap().0, Value::Integer(0));
        assert_eq!(parse("1.5e2").unwrap().0, Value::Real(150.0));
        assert_eq!(parse("2E-1").unwrap().0, Value::Real(0.2));
        assert_eq!(parse("\"hi\"").unwrap().0, Value::from("hi"));
    }

    #[test]
    fn test_parse_containers_keep_order() {
        let (v, end) = parse("{\"b\": [1, 2.5, \"x\"], \"a\": {}, \"c\": []} tail").unwrap();
        assert_eq!(&"{\"b\": [1, 2.5, \"x\"], \"a\": {}, \"c\": []} tail"[end..], " tail");
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(v.get("b").unwrap().at(1), Some(&Value::Real(2.5)));
    }

    #[test]
    fn test_parse_string_escapes() {
        let (v, _) = parse(r#""a\"b\\c\/d\n\té😀""#).unwrap();
        assert_eq!(v.as_str(), Some("a\"b\\c/d\n\té😀"));
    }

    #[test]
    fn test_invalid_surrogates() {
        assert_eq!(parse(r#""\ud83d""#).unwrap_err().code(), ErrorCode::InvalidCodepoint);
        assert_eq!(parse(r#""\ude00""#).unwrap_err().code(), ErrorCode::InvalidCodepoint);
        assert_eq!(parse(r#""\u12G4""#).unwrap_err().code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_empty_input() {
        let err = parse_err("");
        assert_eq!(err.code(), ErrorCode::Invalid);
        assert_eq!(err.message(), Some("empty json string"));
        assert_eq!(parse_err("\u{feff}").code(), ErrorCode::Invalid);
        assert_eq!(parse("\u{feff}1").unwrap(), (Value::Integer(1), 4));
    }

    #[test]
    fn test_syntax_messages() {
        let cases = [
            ("{\"a\" 1}", "expected value ':' separator"),
            ("{\"a\":1 \"b\":2}", "missing comma after value"),
            ("[1 2]", "missing comma after value"),
            ("{a:1}", "expected opening quote"),
            ("\"abc", "expected closing double quote"),
            ("[1,", "unexpected end of input"),
            ("tru", "invalid json value"),
            ("nul", "invalid json value"),
            ("@", "expected json value"),
            ("01", "invalid number value: begins with 0"),
            ("-", "invalid number value: no digits found"),
            ("1.2.3", "invalid number format: multiple decimal signs"),
            ("1e2e3", "invalid number format: multiple exponents 'e'"),
            ("1-2", "invalid number format: sign '-' in wrong position"),
            ("1e+-2", "invalid number format: multiple exponent signs"),
        ];
        for (text, msg) in cases {
            let err = parse_err(text);
            assert_eq!(err.code(), ErrorCode::Syntax, "{text}");
            assert_eq!(err.message(), Some(msg), "{text}");
        }
    }

    #[test]
    fn test_error_trace_has_line_and_context() {
        let err = parse_err("{\n  \"a\": 1,\n  \"b\": tx\n}");
        let outer = err.traces().next().unwrap();
        assert_eq!(outer.msg.as_deref(), Some("line=3, context=tx\\n}"));
    }

    #[test]
    fn test_duplicate_keys() {
        let err = parse_err("{\"a\":1,\"a\":2}");
        assert_eq!(err.code(), ErrorCode::Exist);
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(
            parse("9223372036854775807").unwrap().0,
            Value::Integer(i64::MAX)
        );
        assert_eq!(parse_err("9223372036854775808").code(), ErrorCode::Range);
        assert_eq!(parse_err("1e999").code(), ErrorCode::Range);
    }

    #[test]
    fn test_raw_control_character() {
        assert_eq!(parse_err("\"a\nb\"").code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_parse_all_rejects_trailing_data() {
        assert_eq!(parse_all(" [1] \n").unwrap(), Value::Array(vec![Value::Integer(1)]));
        let err = parse_all("[1] x").unwrap_err();
        assert_eq!(err.message(), Some("unexpected trailing data"));
    }

    #[test]
    fn test_parse_bytes() {
        assert_eq!(parse_bytes(b"[true]").unwrap().1, 6);
        assert_eq!(
            parse_bytes(&[b'"', 0xff, b'"']).unwrap_err().code(),
            ErrorCode::IllegalSeq
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(MAX_DEPTH + 2);
        assert_eq!(parse_err(&deep).code(), ErrorCode::Syntax);
    }
}
