//! Core types and trait definitions for the personnel service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the `Person` entity, the request shapes accepted by the API,
//! field validation, and the [`store::PersonStore`] abstraction that storage
//! backends implement.

pub mod error;
pub mod patch;
pub mod person;
mod scalar;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
