//! # fixhero-core
//!
//! Core types for the FixHero Dev Inspector.
//!
//! FixHero captures UI bugs from live pages: a snapshot of the offending DOM
//! element, a screenshot, and the most recent console/network errors, bundled
//! into an [`Issue`] record that downstream tooling persists, reviews, and
//! exports.
//!
//! This crate holds the shared vocabulary of the pipeline:
//!
//! - [`Issue`] and its parts ([`ElementSnapshot`], [`ConsoleErrorRecord`],
//!   [`NetworkErrorRecord`], [`BoundingRect`])
//! - the unified [`InspectorError`] type and [`Result`] alias
//! - repository-level configuration (`.fixhero/config.toml`)
//! - the fail-open helper for non-critical operations

pub mod config;
pub mod fail_open;

mod error;
mod types;

pub use error::{InspectorError, Result};
pub use types::*;
