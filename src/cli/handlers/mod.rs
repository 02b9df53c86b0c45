//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod preview;
pub mod serve;

pub use preview::PreviewCommandHandler;
pub use serve::ServeCommandHandler;
