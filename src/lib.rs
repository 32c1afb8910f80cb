//! PCL: a portable systems utility library.
//!
//! The functionality lives in the `pcl-*` member crates; this crate re-exports them
//! under one roof and hosts the `pcl` command-line tool.

pub use pcl_buf as buf;
pub use pcl_crypto as crypto;
pub use pcl_error as error;
pub use pcl_htable as htable;
pub use pcl_json as json;
pub use pcl_log as log;
pub use pcl_string as string;
pub use pcl_sys as sys;

pub use pcl_error::{Error, ErrorCode, Result, ResultExt, Trace, err, trc};
