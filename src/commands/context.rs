//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with store and metadata provider

use std::sync::Arc;

use crate::database::Database;
use crate::features::metadata::MetadataProvider;

/// Services every command handler can reach:
/// - the persisted user store
/// - the metadata provider (TMDB in production, mocks in tests)
/// - the process start time for uptime display
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub provider: Arc<dyn MetadataProvider>,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(database: Database, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            database,
            provider,
            start_time: std::time::Instant::now(),
        }
    }
}
