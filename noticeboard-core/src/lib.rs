//! # Noticeboard Core
//!
//! Core types, errors, and traits for the noticeboard ephemeral notification store.
//!
//! This crate provides the building blocks shared by the store and its hosts:
//!
//! - **Types**: Notices, their content, partial updates, and read-only snapshots
//! - **Errors**: Configuration error type with context
//! - **Constants**: Defaults for capacity, eviction delay, and id allocation
//! - **Traits**: The producer-facing [`Notifier`] interface
//!
//! ## Example
//!
//! ```rust
//! use noticeboard_core::{NoticeContent, Variant};
//!
//! let content = NoticeContent::new()
//!     .with_title("Error")
//!     .with_description("Failed to fetch!")
//!     .with_variant(Variant::Destructive);
//! let json = serde_json::to_string(&content).unwrap();
//! assert!(json.contains("destructive"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{NoticeError, Result};
pub use traits::*;
pub use types::*;
