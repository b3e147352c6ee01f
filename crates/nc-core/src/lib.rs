//! Configuration types and errors for node-cleaner.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`ScanConfiguration`]: the validated, immutable input of one scan
//! - [`Settings`]: optional defaults loaded from a JSON settings file
//! - [`ConfigError`]: everything that can go wrong while building either

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{ScanConfiguration, Settings};
pub use error::ConfigError;
