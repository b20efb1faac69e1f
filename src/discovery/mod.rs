//! Feed discovery: resolve an arbitrary user-supplied URL to validated feeds.
//!
//! The module is organized around three roles:
//!
//! - [`strategy`] — the [`DiscoveryStrategy`] capability each URL-shape
//!   handler implements ([`standard`], [`apple`], [`reddit`])
//! - [`registry`] — priority-ordered dispatch with first-match-wins semantics
//! - [`validator`] — the shared fetch/parse/dedup step every candidate feed
//!   URL funnels through, bound to per-request state in [`context`]
//!
//! # Control flow
//!
//! `registry.discover(url)` builds a fresh [`DiscoveryContext`] and walks the
//! strategies in ascending priority order. Each eligible strategy validates
//! its candidates through the context; the first non-empty result is
//! returned immediately and lower-precedence strategies never run. When
//! every strategy comes up empty the call fails with
//! [`DiscoveryError::NotFound`] — the only failure the caller is expected to
//! handle.

mod apple;
mod context;
mod reddit;
mod registry;
mod standard;
mod strategy;
mod types;
mod validator;

pub use apple::ApplePodcastsStrategy;
pub use context::DiscoveryContext;
pub use reddit::RedditStrategy;
pub use registry::DiscoveryRegistry;
pub use standard::StandardStrategy;
pub use strategy::DiscoveryStrategy;
pub use types::{DiscoveredFeed, DiscoveryError, FeedType};
