use std::fmt::Write;

use crate::value::Value;

/// Significant digits used for reals, matching C's `%1.15g`.
const REAL_PRECISION: usize = 15;

struct Encoder {
    out: String,
    tabs: usize,
    pretty: bool,
}

impl Encoder {
    fn newline_and_indent(&mut self) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..self.tabs {
                self.out.push('\t');
            }
        }
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => {
                let _ = write!(self.out, "{i}");
            }
            Value::Real(r) if r.is_finite() => self.out.push_str(&format_g(*r, REAL_PRECISION)),
            Value::Real(_) => self.out.push_str("null"),
            Value::String(s) => escape_into(&mut self.out, s),
            Value::Array(items) => {
                self.container('[', ']', items.len(), items.iter().map(|v| (None, v)));
            }
            Value::Object(obj) => {
                self.container('{', '}', obj.len(), obj.iter().map(|(k, v)| (Some(k.as_str()), v)));
            }
        }
    }

    fn container<'v>(
        &mut self,
        open: char,
        close: char,
        count: usize,
        items: impl Iterator<Item = (Option<&'v str>, &'v Value)>,
    ) {
        self.out.push(open);
        if count == 0 {
            self.out.push(close);
            return;
        }
        self.tabs += 1;
        for (i, (key, value)) in items.enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline_and_indent();
            if let Some(key) = key {
                escape_into(&mut self.out, key);
                self.out.push_str(if self.pretty { ": " } else { ":" });
            }
            self.value(value);
        }
        self.tabs -= 1;
        self.newline_and_indent();
        self.out.push(close);
    }
}

/// Encodes a value as JSON text.
///
/// Compact output has no whitespace at all. Pretty output puts every element on its
/// own line, indents with tabs and separates keys with `": "`; empty containers stay
/// `[]` and `{}`.
pub fn encode(value: &Value, pretty: bool) -> String {
    let mut enc = Encoder {
        out: String::new(),
        tabs: 0,
        pretty,
    };
    enc.value(value);
    enc.out
}

fn escape_into(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Formats a finite float like C's `%.{precision}g`: the shortest of fixed or
/// exponent notation for `precision` significant digits, trailing zeros removed.
pub fn format_g(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = strip_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
