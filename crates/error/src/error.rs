use std::io;
use std::panic::Location;

use thiserror::Error;

use crate::code::ErrorCode;

/// One stack-trace frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub file: String,
    pub func: String,
    pub line: u32,
    pub msg: Option<String>,
}

impl Trace {
    pub fn new(file: impl Into<String>, func: impl Into<String>, line: u32, msg: Option<String>) -> Self {
        Self {
            file: file.into(),
            func: func.into(),
            line,
            msg: msg.filter(|m| !m.is_empty()),
        }
    }

    #[track_caller]
    fn here(msg: Option<String>) -> Self {
        let loc = Location::caller();
        Self::new(loc.file(), "", loc.line(), msg)
    }

    /// `file[:func][(line)]`, with empty parts left out.
    pub fn location(&self) -> String {
        let mut out = self.file.clone();
        if !self.func.is_empty() {
            if !out.is_empty() {
                out.push(':');
            }
            out.push_str(&self.func);
        }
        if self.line > 0 {
            out.push_str(&format!("({})", self.line));
        }
        out
    }
}

/// A PCL error: a code, the OS error it came from (0 if none) and the stack trace
/// that was built while it propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}{}", site_suffix(.frames))]
pub struct Error {
    code: ErrorCode,
    os_error: i32,
    // frames[0] is the error site, outer frames are pushed behind it
    frames: Vec<Trace>,
}

fn site_suffix(frames: &[Trace]) -> String {
    match frames.first().and_then(|t| t.msg.as_deref()) {
        Some(msg) => format!(": {msg}"),
        None => String::new(),
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Creates an error whose site frame is the caller's location.
    #[track_caller]
    pub fn new(code: ErrorCode) -> Self {
        Self::at(code, Trace::here(None))
    }

    #[track_caller]
    pub fn with_msg(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::at(code, Trace::here(Some(msg.into())))
    }

    /// Creates an error with an explicit site frame.
    pub fn at(code: ErrorCode, site: Trace) -> Self {
        Self {
            code,
            os_error: 0,
            frames: vec![site],
        }
    }

    /// Maps an I/O error to its PCL code, keeping the raw OS error number.
    #[track_caller]
    pub fn from_io(err: &io::Error) -> Self {
        let code = ErrorCode::from_io_kind(err.kind());
        let mut out = Self::at(code, Trace::here(Some(err.to_string())));
        out.os_error = err.raw_os_error().unwrap_or(0);
        out
    }

    /// Overrides the OS error number. Ignored for `EOKAY` errors.
    pub fn with_os_error(mut self, os_error: i32) -> Self {
        if self.code != ErrorCode::Okay {
            self.os_error = os_error;
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn os_error(&self) -> i32 {
        self.os_error
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    /// The error-site message, if any.
    pub fn message(&self) -> Option<&str> {
        self.site().and_then(|t| t.msg.as_deref())
    }

    /// The frame where the error was created.
    pub fn site(&self) -> Option<&Trace> {
        self.frames.first()
    }

    /// All frames, outermost first. The last frame is the error site.
    pub fn traces(&self) -> impl DoubleEndedIterator<Item = &Trace> + ExactSizeIterator {
        self.frames.iter().rev()
    }

    /// Adds an outer frame at the caller's location.
    #[track_caller]
    pub fn trace(self) -> Self {
        self.push(Trace::here(None))
    }

    #[track_caller]
    pub fn trace_msg(self, msg: impl Into<String>) -> Self {
        self.push(Trace::here(Some(msg.into())))
    }

    /// Adds an explicit outer frame.
    pub fn push(mut self, frame: Trace) -> Self {
        self.frames.push(frame);
        self
    }

    pub(crate) fn from_parts(code: ErrorCode, os_error: i32, frames: Vec<Trace>) -> Self {
        Self {
            code,
            os_error: if code == ErrorCode::Okay { 0 } else { os_error },
            frames,
        }
    }

    pub(crate) fn frames_site_first(&self) -> &[Trace] {
        &self.frames
    }
}

impl From<io::Error> for Error {
    #[track_caller]
    fn from(err: io::Error) -> Self {
        Error::from_io(&err)
    }
}

/// Adds stack frames to the error of a `Result` as it propagates.
pub trait ResultExt<T> {
    fn trace(self) -> Result<T>;
    fn trace_msg(self, msg: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[track_caller]
    fn trace(self) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.trace()),
        }
    }

    #[track_caller]
    fn trace_msg(self, msg: impl Into<String>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.trace_msg(msg)),
        }
    }
}

/// Expands to the bare name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__f);
        let name = name.strip_suffix("::__f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Creates an [`Error`] whose site frame records file, function and line.
///
/// ```
/// use pcl_error::{err, ErrorCode};
/// let e = err!(ErrorCode::Invalid, "bad size {}", 3);
/// assert_eq!(e.message(), Some("bad size 3"));
/// ```
#[macro_export]
macro_rules! err {
    ($code:expr) => {
        $crate::Error::at(
            $code,
            $crate::Trace::new(file!(), $crate::function_name!(), line!(), None),
        )
    };
    ($code:expr, $($arg:tt)+) => {
        $crate::Error::at(
            $code,
            $crate::Trace::new(file!(), $crate::function_name!(), line!(), Some(format!($($arg)+))),
        )
    };
}

/// Pushes an outer frame, with file, function and line, onto an [`Error`].
#[macro_export]
macro_rules! trc {
    ($err:expr) => {
        $err.push($crate::Trace::new(file!(), $crate::function_name!(), line!(), None))
    };
    ($err:expr, $($arg:tt)+) => {
        $err.push($crate::Trace::new(
            file!(),
            $crate::function_name!(),
            line!(),
            Some(format!($($arg)+)),
        ))
    };
}
