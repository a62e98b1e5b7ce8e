//! Date and value helpers shared by validation and compilation.

pub mod dates;
pub mod values;

pub use dates::{DateError, DateParser};
pub use values::{numeric_field, present, value_text, NumericField, Record};
