//! Application services built on the ports.

mod article;
mod authors;
mod editor;
mod publishing;
mod rephrase;

#[cfg(test)]
pub(crate) mod testing;

pub use article::{ARTICLE_MAX_TOKENS, ARTICLE_TEMPERATURE, ArticleGenerator};
pub use authors::AuthorService;
pub use editor::{
    EditingSurface, EditorCommand, EditorSession, EditorState, GeneratedArticleDraft, Selection,
};
pub use publishing::{PostService, PublishedPost, UserPosts};
pub use rephrase::{REPHRASE_MAX_TOKENS, REPHRASE_TEMPERATURE, RephraseMode, RephraseService};
