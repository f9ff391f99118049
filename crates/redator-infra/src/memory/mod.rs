//! In-memory storage - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

mod authors;
mod posts;

pub use authors::InMemoryAuthorRepository;
pub use posts::InMemoryPostRepository;
