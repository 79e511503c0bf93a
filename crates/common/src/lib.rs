//! Shared error plumbing used across all slack-mcp crates.

pub mod error;

pub use error::{Error, FromMessage, Result};
