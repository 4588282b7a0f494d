//! Per-command handler implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add FavouritesHandler (addfave*/removefave*/listfave*)
//! - 1.0.0: Initial handlers for browse, highlight lists and notifications

pub mod browse;
pub mod favourites;
pub mod highlight;
pub mod notify;
pub mod utility;

use std::sync::Arc;

use super::handler::CommandHandler;

/// Create all registered command handlers
///
/// Returns a vector of handlers ready to be registered with CommandRegistry.
pub fn create_all_handlers() -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(browse::BrowseHandler),
        Arc::new(highlight::HighlightHandler),
        Arc::new(favourites::FavouritesHandler),
        Arc::new(notify::NotifyHandler),
    ]
}
