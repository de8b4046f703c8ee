//! # Inkwell Shared
//!
//! Wire types shared by the server and any rendering front end:
//! form payloads, page view models and problem-details errors.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
