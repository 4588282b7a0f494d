//! # Feature: Release Notifications
//!
//! The daily notification run: intersect each opted-in user's highlight
//! lists against the imminent release window and deliver one summary message
//! per user. Delivery is best-effort and per-user isolated.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true

pub mod channel;
pub mod scheduler;

pub use channel::{DeliveryError, MessageChannel, TelegramChannel};
pub use scheduler::{ReleaseScheduler, RunReport, RunState};
