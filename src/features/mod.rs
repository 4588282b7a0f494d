//! # Features Layer
//!
//! Feature modules sitting between the core/infrastructure layers and the
//! command surface.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod metadata;
pub mod notifications;
pub mod rate_limiting;

// Re-export feature items for convenient wiring
pub use metadata::{MetadataProvider, ProviderError, ReleaseEntry, ReleaseWindow, TmdbClient};
pub use notifications::{
    DeliveryError, MessageChannel, ReleaseScheduler, RunReport, TelegramChannel,
};
pub use rate_limiting::RateLimiter;
