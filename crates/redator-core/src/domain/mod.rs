//! Domain entities - the core business objects.

mod author;
mod post;
mod taxonomy;

pub use author::{Author, AuthorInput};
pub use post::{Post, PostInput};
pub use taxonomy::{Category, PostLinks, Tag};
