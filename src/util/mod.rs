//! Utility functions shared across discovery strategies.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: Security-focused validation to prevent SSRF attacks
//! - **URL normalization**: Canonical dedup keys for redirect-resolved URLs
//! - **Text processing**: HTML stripping and control-character sanitization
//!   for feed metadata

mod text;
mod url_guard;
mod url_norm;

pub use text::{strip_control_chars, strip_html};
pub use url_guard::{validate_url, UrlValidationError};
pub use url_norm::normalize_url;
