//! Core business logic for olion.
//!
//! Services here own the forum rules: moderation decisions and their
//! reputation and notification side effects, reports, votes and bookmarks,
//! accounts and Pakar promotion.

pub mod services;

pub use services::*;
