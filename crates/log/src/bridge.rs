//! A `log` facade backend that writes PCL-formatted lines.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;

use chrono::Utc;
use log::{LevelFilter, Metadata, Record};
use pcl_error::{Error, ErrorCode, Result};

use crate::event::{LogEvent, Logger, DEFAULT_FACILITY};
use crate::level::LevelSet;

/// Environment variable holding the filter level (`off`, `error` .. `trace`).
pub const LOG_ENV: &str = "PCL_LOG";

/// Parses a filter level, falling back to `info` when unset or unknown.
pub fn level_filter(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

type Sink = Box<dyn Write + Send>;

pub struct PclLogger {
    logger: Mutex<Logger<Sink>>,
    facility: String,
    filter: LevelFilter,
    utc: bool,
}

impl PclLogger {
    /// A logger writing to `sink` at `info` level. Records never end the process.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        let sink: Sink = Box::new(sink);
        Self {
            logger: Mutex::new(Logger::new(sink)),
            facility: DEFAULT_FACILITY.to_string(),
            filter: LevelFilter::Info,
            utc: false,
        }
    }

    /// A stderr logger filtered by `PCL_LOG`.
    pub fn from_env() -> Self {
        let value = std::env::var(LOG_ENV).ok();
        Self::new(io::stderr()).filter(level_filter(value.as_deref()))
    }

    pub fn filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = facility.into();
        self
    }

    pub fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Installs this logger as the global `log` backend.
    pub fn init(self) -> Result<()> {
        let filter = self.filter;
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| Error::with_msg(ErrorCode::Already, e.to_string()))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn event_for(&self, record: &Record<'_>) -> LogEvent {
        let mut event = LogEvent::new(record.level().into())
            .facility(self.facility.as_str())
            .at(Utc::now())
            .utc(self.utc)
            .trace(false)
            .exit(LevelSet::NONE, 0);
        event.file = record.file().unwrap_or_default().to_string();
        event.func = record.module_path().unwrap_or_default().to_string();
        event.line = record.line().unwrap_or(0);
        event
    }
}

impl log::Log for PclLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let event = self.event_for(record);
        let message = record.args().to_string();
        if let Ok(mut logger) = self.logger.lock() {
            let _ = logger.event(&event, &message, None);
        }
    }

    fn flush(&self) {
        if let Ok(mut logger) = self.logger.lock() {
            let _ = logger.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_level_filter_from_env_value() {
        assert_eq!(level_filter(None), LevelFilter::Info);
        assert_eq!(level_filter(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(level_filter(Some("off")), LevelFilter::Off);
        assert_eq!(level_filter(Some("chatty")), LevelFilter::Info);
    }

    #[test]
    fn test_records_are_pcl_formatted() {
        let buf = SharedBuf::default();
        let logger = PclLogger::new(buf.clone()).facility("app").utc(true);
        logger.log(
            &Record::builder()
                .args(format_args!("rehashed {} entries", 3))
                .level(log::Level::Warn)
                .file(Some("table.rs"))
                .module_path(Some("pcl_htable::table"))
                .line(Some(40))
                .build(),
        );
        let out = buf.text();
        assert!(out.starts_with('['));
        assert!(out.ends_with(" app.warn] table.rs:pcl_htable::table(40): rehashed 3 entries\n"));
    }

    #[test]
    fn test_filtered_records_are_dropped() {
        let buf = SharedBuf::default();
        let logger = PclLogger::new(buf.clone()).filter(LevelFilter::Warn);
        logger.log(&Record::builder().args(format_args!("quiet")).level(log::Level::Info).build());
        logger.log(&Record::builder().args(format_args!("loud")).level(log::Level::Error).build());
        let out = buf.text();
        assert!(!out.contains("quiet"));
        assert!(out.contains("libpcl.error] loud"));
    }
}
