//! # Feature: Metadata Gateway
//!
//! Thin adapter over the TMDB API: upcoming-release windows, title lookup,
//! and the browse queries (trending, top rated, random pick). Release-window
//! results are cached for a bounded interval so one scheduler tick costs one
//! upstream call regardless of how many users it processes.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Release-window cache
//! - 1.0.0: Initial release with provider trait and TMDB client

pub mod cache;
pub mod provider;
pub mod tmdb;
pub mod types;

pub use provider::{MetadataProvider, ProviderError, ReleaseWindow};
pub use tmdb::TmdbClient;
pub use types::ReleaseEntry;
