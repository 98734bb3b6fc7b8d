//! Output formatting.

mod response;

pub use response::{format_error, format_words};
