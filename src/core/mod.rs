//! # Core Module
//!
//! Shared domain vocabulary, configuration, and reply-text utilities for the
//! release tracker bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add titles module with the shared normalization key
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod media;
pub mod response;
pub mod titles;

// Re-export commonly used items
pub use config::Config;
pub use media::{ListKind, MediaKind};
pub use response::{chunk_message, escape_html, truncate_message, MESSAGE_LIMIT};
pub use titles::normalize_title;
