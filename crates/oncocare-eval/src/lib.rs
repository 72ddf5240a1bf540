//! oncocare-eval
//!
//! Scores produced answers against expected ones. Comparison is exact
//! after trimming, ignoring case.

pub mod error;
pub mod evaluate;
pub mod scoring;

pub use evaluate::{evaluate, evaluate_report};
