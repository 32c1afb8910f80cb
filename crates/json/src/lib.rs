//! JSON for PCL.
//!
//! [`Value`] is the document model; objects are [`pcl_htable::HashTable`]s and keep
//! their members in insertion order. [`parse`] is a recursive-descent parser whose
//! errors point at the line and text where parsing failed, [`encode`] writes compact
//! or tab-indented text, and [`JsonPath`] selects values with JSONPath expressions.

mod convert;
mod encode;
mod parse;
pub mod path;
mod value;

pub use encode::{encode, format_g};
pub use parse::{parse, parse_all, parse_bytes};
pub use path::{JsonPath, Segment};
pub use value::{Object, Value};
