//! Text and JSON serialization of an [`Error`] and its stack trace.

use std::fmt::Write;

use serde::Deserialize;

use crate::code::ErrorCode;
use crate::error::{Error, Result, Trace};

const INDENT_STEP: usize = 2;

impl Error {
    /// Renders the error and its stack trace as indented text.
    ///
    /// With a `message`, a `ERROR: message` header is written first at `indent`, and
    /// the trace starts at the same indent. Outer frames come first, each one indented
    /// deeper than the previous; the error site closes the report. An `EOKAY` error or one
    /// without frames renders as an empty string.
    pub fn report(&self, indent: usize, message: Option<&str>) -> String {
        self.write_report("ERROR: ", indent, message)
    }

    /// Same as [`Error::report`] but with a `PANIC: ` header.
    pub fn panic_report(&self, indent: usize, message: Option<&str>) -> String {
        self.write_report("PANIC: ", indent, message)
    }

    fn write_report(&self, header: &str, mut indent: usize, message: Option<&str>) -> String {
        let mut out = String::new();
        let frames = self.frames_site_first();
        let Some((site, outer)) = frames.split_first() else {
            return out;
        };
        if self.code() == ErrorCode::Okay {
            return out;
        }

        if let Some(msg) = message.filter(|m| !m.is_empty()) {
            let _ = write!(out, "{:indent$}{header}{msg}", "");
            if !msg.ends_with('\n') {
                out.push('\n');
            }
        }

        for frame in outer.iter().rev() {
            let loc = frame.location();
            out.push_str(&" ".repeat(indent));
            out.push_str(&loc);
            if let Some(msg) = frame.msg.as_deref().filter(|m| !m.is_empty()) {
                out.push_str(": ");
                out.push_str(msg);
            }
            out.push('\n');
            indent += INDENT_STEP;
        }

        let loc = site.location();
        let sep = if loc.is_empty() { "" } else { ": " };
        let _ = writeln!(
            out,
            "{:indent$}{loc}{sep}{} - {}",
            "",
            self.code().name(),
            self.code().message()
        );
        if let Some(msg) = &site.msg {
            let _ = writeln!(out, "{:width$}>{msg}", "", width = indent + INDENT_STEP);
        }
        out
    }

    /// Serializes the error as a JSON object:
    /// `{"err":N,"oserr":N,"msg":..,"strace":[{"file":..,"func":..,"line":N,"msg":..}]}`.
    ///
    /// Frames are listed outermost first. Empty strings are written as `null`.
    pub fn to_json(&self, message: Option<&str>) -> String {
        let mut out = String::with_capacity(128);
        let _ = write!(
            out,
            "{{\"err\":{},\"oserr\":{},\"msg\":",
            self.code().code(),
            self.os_error()
        );
        push_json_str(&mut out, message);
        out.push_str(",\"strace\":[");
        for (i, frame) in self.traces().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str("{\"file\":");
            push_json_str(&mut out, Some(&frame.file));
            out.push_str(",\"func\":");
            push_json_str(&mut out, Some(&frame.func));
            let _ = write!(out, ",\"line\":{},\"msg\":", frame.line);
            push_json_str(&mut out, frame.msg.as_deref());
            out.push('}');
        }
        out.push_str("]}");
        out
    }

    /// Parses the output of [`Error::to_json`], returning the error and the top-level
    /// message.
    pub fn from_json(text: &str) -> Result<(Error, Option<String>)> {
        let report: JsonReport = serde_json::from_str(text)
            .map_err(|e| Error::with_msg(ErrorCode::Format, format!("invalid error json: {e}")))?;

        let code = ErrorCode::from_i32(report.err).ok_or_else(|| {
            Error::with_msg(ErrorCode::Format, format!("unknown error code: {}", report.err))
        })?;

        let frames = report
            .strace
            .into_iter()
            .rev()
            .map(|f| {
                Trace::new(
                    f.file.unwrap_or_default(),
                    f.func.unwrap_or_default(),
                    f.line,
                    f.msg,
                )
            })
            .collect();

        Ok((Error::from_parts(code, report.oserr, frames), report.msg))
    }
}

#[derive(Deserialize)]
struct JsonReport {
    err: i32,
    #[serde(default)]
    oserr: i32,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    strace: Vec<JsonFrame>,
}

#[derive(Deserialize)]
struct JsonFrame {
    file: Option<String>,
    func: Option<String>,
    #[serde(default)]
    line: u32,
    msg: Option<String>,
}

fn push_json_str(out: &mut String, value: Option<&str>) {
    let Some(s) = value.filter(|s| !s.is_empty()) else {
        out.push_str("null");
        return;
    };
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Error {
        Error::at(
            ErrorCode::NoEntry,
            Trace::new("open.c", "open_file", 42, Some("missing /etc/x".into())),
        )
        .push(Trace::new("load.c", "", 10, None))
        .push(Trace::new("main.c", "main", 3, Some("startup".into())))
    }

    #[test]
    fn test_report_layout() {
        let text = sample().report(0, Some("failed"));
        let expected = "ERROR: failed\n\
                        main.c:main(3): startup\n\
                        \x20 load.c(10)\n\
                        \x20   open.c:open_file(42): PCL_ENOENT - No such file or directory.\n\
                        \x20     >missing /etc/x\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_without_header() {
        let e = Error::at(ErrorCode::Invalid, Trace::new("a.rs", "", 1, None));
        assert_eq!(e.report(2, None), "  a.rs(1): PCL_EINVAL - Invalid argument.\n");
    }

    #[test]
    fn test_report_site_without_location() {
        let e = Error::at(ErrorCode::Busy, Trace::default());
        assert_eq!(e.report(0, None), "PCL_EBUSY - Device or resource busy.\n");
    }

    #[test]
    fn test_outer_frame_message_without_location() {
        let e = Error::at(ErrorCode::Invalid, Trace::new("a.rs", "", 1, None))
            .push(Trace::new("", "", 0, Some("while saving".into())));
        assert_eq!(
            e.report(0, None),
            ": while saving\n  a.rs(1): PCL_EINVAL - Invalid argument.\n"
        );
    }

    #[test]
    fn test_header_keeps_trailing_newline() {
        let e = Error::at(ErrorCode::Invalid, Trace::new("a.rs", "", 1, None));
        assert_eq!(
            e.report(2, Some("bad input\n")),
            "  ERROR: bad input\n  a.rs(1): PCL_EINVAL - Invalid argument.\n"
        );
    }

    #[test]
    fn test_okay_report_is_empty() {
        let e = Error::new(ErrorCode::Okay);
        assert!(e.report(0, Some("nothing")).is_empty());
        assert_eq!(e.panic_report(0, None), "");
    }

    #[test]
    fn test_panic_header() {
        let text = sample().panic_report(4, Some("boom"));
        assert!(text.starts_with("    PANIC: boom\n    main.c:main(3): startup\n      load.c"));
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json(None);
        assert_eq!(
            json,
            "{\"err\":26,\"oserr\":0,\"msg\":null,\"strace\":[\
             {\"file\":\"main.c\",\"func\":\"main\",\"line\":3,\"msg\":\"startup\"},\
             {\"file\":\"load.c\",\"func\":null,\"line\":10,\"msg\":null},\
             {\"file\":\"open.c\",\"func\":\"open_file\",\"line\":42,\"msg\":\"missing \\/etc\\/x\"}]}"
        );
    }

    #[test]
    fn test_json_escapes_control_chars() {
        let mut out = String::new();
        push_json_str(&mut out, Some("a\u{1}b\t\"c\""));
        assert_eq!(out, "\"a\\u0001b\\t\\\"c\\\"\"");
    }

    #[test]
    fn test_from_json_restores_frames() {
        let e = sample().with_os_error(2);
        let (back, msg) = Error::from_json(&e.to_json(Some("top"))).unwrap();
        assert_eq!(msg.as_deref(), Some("top"));
        assert_eq!(back, e);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Error::from_json("{\"err\":").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Format);
        let err = Error::from_json("{\"err\":44}").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Format);
    }
}
