use std::fmt;
use std::str::FromStr;

use pcl_error::{Error, ErrorCode};

/// Log severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::with_msg(ErrorCode::Invalid, format!("unknown log level '{s}'")))
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

/// A set of levels, used for the trace and exit policies of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSet(u8);

impl LevelSet {
    pub const NONE: LevelSet = LevelSet(0);

    pub fn all() -> Self {
        Level::ALL.into_iter().collect()
    }

    pub fn with(mut self, level: Level) -> Self {
        self.0 |= level.bit();
        self
    }

    pub fn without(mut self, level: Level) -> Self {
        self.0 &= !level.bit();
        self
    }

    pub fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(LevelSet::NONE, LevelSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Fatal.to_string(), "fatal");
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("loud".parse::<Level>().unwrap_err().code(), ErrorCode::Invalid);
        assert!(Level::Panic > Level::Error);
    }

    #[test]
    fn test_level_set() {
        let set = LevelSet::all().without(Level::Info).without(Level::Warn);
        assert!(set.contains(Level::Debug));
        assert!(!set.contains(Level::Info));
        assert!(set.contains(Level::Panic));
        assert!(LevelSet::NONE.is_empty());
        assert_eq!([Level::Panic].into_iter().collect::<LevelSet>(), LevelSet::NONE.with(Level::Panic));
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
    }
}
