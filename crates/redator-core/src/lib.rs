//! # Redator Core
//!
//! The domain layer of the Redator content platform.
//! Pure content transformations (slugs, sanitization, summaries), the ports
//! infrastructure must implement, and the services that compose them into the
//! keyword → article → sanitized HTML → stored post pipeline.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
