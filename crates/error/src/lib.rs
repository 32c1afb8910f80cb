//! Error codes and errors carrying a stack trace.
//!
//! An [`Error`] is created at the failure site with [`Error::new`], [`Error::with_msg`]
//! or the [`err!`] macro, and collects an outer frame every time it is propagated with
//! [`ResultExt::trace`] or [`trc!`]. The resulting trace can be rendered as indented
//! text ([`Error::report`]) or as JSON ([`Error::to_json`]).

pub mod code;
mod error;
mod report;

pub use code::ErrorCode;
pub use error::{Error, Result, ResultExt, Trace};
