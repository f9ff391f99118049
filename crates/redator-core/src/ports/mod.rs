//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;
mod text_generation;

pub use auth::{AuthError, TokenClaims, TokenVerifier};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{AuthorRepository, BaseRepository, PostRepository, TaxonomyRepository};
pub use text_generation::{CompletionRequest, TextGenerationClient, TextGenerationError};
