//! Observability utilities.
//!
//! This module provides:
//! - Global subscriber installation in pretty, compact or JSON format
//! - Span timing

mod subscriber;
mod timer;

pub use subscriber::{init_tracing, LogFormat, DEFAULT_FILTER};
pub use timer::SpanTimer;
