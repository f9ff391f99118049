//! SeaORM entities for the blog schema.

pub mod author;
pub mod category;
pub mod post;
pub mod post_category;
pub mod post_tag;
pub mod tag;
