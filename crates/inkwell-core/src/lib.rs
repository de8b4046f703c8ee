//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog.
//! Entities, ports and the authentication/ownership services live here with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DomainError;
