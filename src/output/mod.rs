//! Output formatting for engine results.
//!
//! The engine itself performs no I/O; these helpers render its plain-data
//! results for humans ([`terminal`]) and machines ([`json`]).

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_batch_summary, format_candidate};
