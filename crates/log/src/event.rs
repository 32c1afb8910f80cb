//! Log events and the sink that writes them.

use std::io::{self, Write};
use std::panic::Location;

use chrono::{DateTime, Local, Utc};
use pcl_error::{Error, Trace};

use crate::level::{Level, LevelSet};

pub const DEFAULT_FACILITY: &str = "libpcl";
const TIME_FORMAT: &str = "%b %d %H:%M:%S";

/// Everything about a log line except its message.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub facility: String,
    pub file: String,
    pub func: String,
    pub line: u32,
    pub when: DateTime<Utc>,
    pub level: Level,
    /// Append the attached error's stack trace to the line.
    pub trace: bool,
    /// Print the timestamp in UTC instead of local time.
    pub utc: bool,
    pub exit_code: i32,
    /// Levels that end the process after the line is written.
    pub exit_levels: LevelSet,
}

impl LogEvent {
    /// An event stamped with the caller's file and line and the current time.
    ///
    /// Traces are enabled for every level but `Info` and `Warn`, and only `Panic`
    /// exits the process (with status 1).
    #[track_caller]
    pub fn new(level: Level) -> Self {
        let loc = Location::caller();
        Self {
            facility: DEFAULT_FACILITY.to_string(),
            file: loc.file().to_string(),
            func: String::new(),
            line: loc.line(),
            when: Utc::now(),
            level,
            trace: !matches!(level, Level::Info | Level::Warn),
            utc: false,
            exit_code: 1,
            exit_levels: LevelSet::NONE.with(Level::Panic),
        }
    }

    pub fn func(mut self, func: impl Into<String>) -> Self {
        self.func = func.into();
        self
    }

    pub fn facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = facility.into();
        self
    }

    pub fn at(mut self, when: DateTime<Utc>) -> Self {
        self.when = when;
        self
    }

    pub fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn exit(mut self, levels: LevelSet, code: i32) -> Self {
        self.exit_levels = levels;
        self.exit_code = code;
        self
    }

    /// `file:func(line)`, with empty parts left out.
    pub fn location(&self) -> String {
        Trace::new(self.file.as_str(), self.func.as_str(), self.line, None).location()
    }

    fn timestamp(&self) -> String {
        if self.utc {
            self.when.format(TIME_FORMAT).to_string()
        } else {
            self.when.with_timezone(&Local).format(TIME_FORMAT).to_string()
        }
    }

    /// The first line of the event, including the trailing newline.
    pub fn format_line(&self, message: &str) -> String {
        let mut out = format!("[{} ", self.timestamp());
        if !self.facility.is_empty() {
            out.push_str(&self.facility);
            out.push('.');
        }
        out.push_str(self.level.name());
        out.push_str("] ");
        let loc = self.location();
        if !loc.is_empty() {
            out.push_str(&loc);
            out.push_str(": ");
        }
        out.push_str(message);
        out.push('\n');
        out
    }
}

/// Called when an event's level is one of its exit levels, before the process exits.
pub type ExitHandler<W> = Box<dyn FnMut(&LogEvent, &mut W) + Send>;

/// Writes `***PANIC at <location>***` to the sink.
pub fn panic_banner<W: Write>(event: &LogEvent, sink: &mut W) {
    let _ = writeln!(sink, "***PANIC at {}***", event.location());
}

fn exit_process(code: i32) {
    std::process::exit(code);
}

/// Formats events into a byte sink.
pub struct Logger<W: Write> {
    sink: W,
    on_exit: ExitHandler<W>,
    terminate: fn(i32),
}

impl<W: Write> Logger<W> {
    pub fn new(sink: W) -> Self
    where
        W: 'static,
    {
        Self {
            sink,
            on_exit: Box::new(panic_banner::<W>),
            terminate: exit_process,
        }
    }

    /// Replaces the exit handler. The process still exits with the event's
    /// `exit_code` once the handler returns.
    pub fn on_exit(mut self, handler: impl FnMut(&LogEvent, &mut W) + Send + 'static) -> Self {
        self.on_exit = Box::new(handler);
        self
    }

    #[cfg(test)]
    fn terminate_with(mut self, terminate: fn(i32)) -> Self {
        self.terminate = terminate;
        self
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Writes one event and returns the number of bytes written.
    ///
    /// When tracing is enabled for the event and an error is attached, its report
    /// follows the line at indent 2.
    pub fn event(&mut self, event: &LogEvent, message: &str, error: Option<&Error>) -> io::Result<usize> {
        let mut text = event.format_line(message);
        if event.trace {
            if let Some(err) = error {
                text.push_str(&err.report(2, None));
            }
        }
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()?;

        if event.exit_levels.contains(event.level) {
            (self.on_exit)(event, &mut self.sink);
            let _ = self.sink.flush();
            (self.terminate)(event.exit_code);
        }
        Ok(text.len())
    }
}
