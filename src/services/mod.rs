//! Services Module
//!
//! Async operations exposed to callers.

mod analyzer;

pub use analyzer::Analyzer;
