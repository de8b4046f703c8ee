//! Middleware and extractors.

pub mod error;
pub mod identity;
pub mod rate_limit;
