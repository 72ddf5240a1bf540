//! oncocare-core
//!
//! Pure domain types: the data model specification, the patient record and
//! its typed sections, and prompt/answer pairs. No I/O — this is the shared
//! vocabulary of the OncoCare system.

pub mod error;
pub mod models;
pub mod text;
