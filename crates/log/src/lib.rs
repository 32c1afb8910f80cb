//! PCL logging: syslog-style lines with optional error traces and exit policies.
//!
//! [`Logger`] formats [`LogEvent`]s into any `io::Write` sink. [`PclLogger`] plugs the
//! same format into the `log` facade.

mod bridge;
mod event;
mod level;

pub use bridge::{LOG_ENV, PclLogger, level_filter};
pub use event::{DEFAULT_FACILITY, ExitHandler, LogEvent, Logger, panic_banner};
pub use level::{Level, LevelSet};
