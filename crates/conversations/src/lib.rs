//! Conversation-history normalization pipeline.
//!
//! Raw provider history records go in, stable display-ready message records
//! come out: resolved display names, extracted image references, nothing
//! else touched. The transform is pure and total: it performs no I/O,
//! mutates nothing it is handed, and never fails on well-formed input.

pub mod attachments;
pub mod directory;
pub mod message;
pub mod normalize;

pub use attachments::{FileKind, image_refs};
pub use directory::{EmptyDirectory, UserDirectory};
pub use message::{File, ImageRef, NormalizedMessage, RawMessage};
pub use normalize::normalize;
