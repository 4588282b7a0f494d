// Core layer - shared domain vocabulary, configuration, reply utilities
pub mod core;

// Infrastructure - persisted user store
pub mod database;

// Features layer - metadata gateway, notification scheduling, rate limiting
pub mod features;

// Application layer - command routing
pub mod commands;

// Re-export core config for convenient wiring
pub use self::core::Config;

// Re-export the pieces the binary and tests reach for most often
pub use commands::{CommandContext, CommandRegistry, CommandRequest, CommandRouter};
pub use database::{Database, StoreError, UserProfile};
pub use features::metadata::{
    MetadataProvider, ProviderError, ReleaseEntry, ReleaseWindow, TmdbClient,
};
pub use features::notifications::{
    DeliveryError, MessageChannel, ReleaseScheduler, RunReport, TelegramChannel,
};
pub use features::rate_limiting::RateLimiter;
