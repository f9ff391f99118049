//! # Redator Infrastructure
//!
//! Concrete implementations of the ports defined in `redator-core`:
//! PostgreSQL and in-memory storage, the OpenAI-compatible text generation
//! client, bearer token verification, and rate limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database, in-memory storage only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT bearer token verification
//! - `rate-limit` - Per-user rate limiting via governor

pub mod ai;
pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use ai::{OpenAiClient, OpenAiConfig};
pub use database::DatabaseConfig;
pub use memory::{InMemoryAuthorRepository, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository,
    PostgresTaxonomyRepository,
};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenVerifier};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
