//! String helpers used throughout PCL.
//!
//! Most functions work on `&str`; the ones that inspect raw input ([`utf8_check`],
//! [`hex_decode`]) take bytes or report the offending bytes in their error messages.

mod cmd;
mod hex;
mod mode;
mod search;
mod strint;
mod trim;
mod units;
mod utf8;

pub use cmd::{parse_cmd, strsignal};
pub use hex::{hex_decode, hex_encode};
pub use mode::strmode;
pub use search::{ireplace, isplit, istr, replace, replace_bounded, split};
pub use strint::{StrInt, parse_int, strtoi, strtol, strtoll, strtoui, strtoul, strtoull};
pub use trim::{DEFAULT_TRIM_SET, ltrim, rtrim, trim, trim_set, truncate};
pub use units::fbytes;
pub use utf8::{utf8_check, utf8_from_code};
