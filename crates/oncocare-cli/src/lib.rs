//! oncocare-cli
//!
//! File-based front end for prompt generation and answer scoring.

pub mod commands;
pub mod config;
pub mod store;
