//! Library crate for userform.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Command line flags (`cli`)
//! - Error and result types (`error`)
//! - Row list, field registry and validation rules (`form`)
//! - One-time remote seed loader (`seed`)
//! - Simulated submission (`submit`)
//! - UI rendering (`ui`)
//!
//! It is used by the `userform` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod form;
pub mod seed;
pub mod submit;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
