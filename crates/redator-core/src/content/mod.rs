//! Pure content transformations applied between the generator and storage.

mod entities;
mod sanitize;
mod slug;
mod summary;

pub use entities::decode_entities;
pub use sanitize::{SafeHtml, sanitize};
pub use slug::slugify;
pub use summary::{SUMMARY_LENGTH, plain_text, summarize};
