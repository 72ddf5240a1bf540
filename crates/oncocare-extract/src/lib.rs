//! oncocare-extract
//!
//! Turns a data model specification and a patient record into templated
//! prompt/answer pairs. Pure functions — missing data degrades to sentinel
//! text, never to an error.

pub mod dispatch;
pub mod format;
pub mod transcript;

pub use dispatch::generate;

/// Answer for a lookup that found nothing.
pub const UNKNOWN: &str = "Unknown";

/// End date shown for a medication that has not been stopped.
pub const ONGOING: &str = "ongoing";

/// End date shown for a disease state that has not resolved.
pub const PRESENT: &str = "present";
