//! The editing surface: keyword → generated draft → edits → saved post.
//!
//! [`EditorSession`] is the state of one editing session and only changes
//! through its transition methods. [`EditingSurface`] drives those
//! transitions around the asynchronous calls to the generator, the rephrase
//! service, and the post service. The session lock is released while a call
//! is in flight, so observers see `Generating`, `Rephrasing`, or `Saving`,
//! and a second command arriving meanwhile is rejected with
//! [`DomainError::Busy`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{SafeHtml, sanitize};
use crate::domain::{Post, PostInput, PostLinks};
use crate::error::DomainError;
use crate::services::{ArticleGenerator, PostService, RephraseMode, RephraseService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    Empty,
    Generating,
    Draft,
    Editing,
    Rephrasing,
    Saving,
    Saved,
    Failed,
}

impl EditorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorState::Empty => "empty",
            EditorState::Generating => "generating",
            EditorState::Draft => "draft",
            EditorState::Editing => "editing",
            EditorState::Rephrasing => "rephrasing",
            EditorState::Saving => "saving",
            EditorState::Saved => "saved",
            EditorState::Failed => "failed",
        }
    }

    fn in_flight(self) -> bool {
        matches!(
            self,
            EditorState::Generating | EditorState::Rephrasing | EditorState::Saving
        )
    }

    fn editable(self) -> bool {
        matches!(
            self,
            EditorState::Draft | EditorState::Editing | EditorState::Saved
        )
    }
}

/// Generator output held by the session until it is saved or discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedArticleDraft {
    pub keyword: String,
    pub raw_content: String,
    pub sanitized_content: SafeHtml,
}

/// A span of the document content, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Byte range of this selection within `text`.
    fn byte_range(&self, text: &str) -> Option<std::ops::Range<usize>> {
        if self.start >= self.end {
            return None;
        }
        let mut offsets = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()));
        let start = offsets.nth(self.start)?;
        let end = offsets.nth(self.end - self.start - 1)?;
        Some(start..end)
    }
}

/// One user action on the editing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorCommand {
    Generate { keyword: String },
    Edit { document: PostInput },
    Rephrase { selection: Selection, mode: RephraseMode },
    Save,
    Acknowledge,
}

/// State of one editing session.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSession {
    id: Uuid,
    owner: Uuid,
    state: EditorState,
    post_id: Option<Uuid>,
    draft: Option<GeneratedArticleDraft>,
    document: PostInput,
    error: Option<String>,
}

impl EditorSession {
    /// A blank session waiting for a keyword.
    pub fn new(owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            state: EditorState::Empty,
            post_id: None,
            draft: None,
            document: PostInput::default(),
            error: None,
        }
    }

    /// A session editing an already stored post.
    pub fn for_post(owner: Uuid, post: &Post, links: PostLinks) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            state: EditorState::Editing,
            post_id: Some(post.id),
            draft: None,
            document: PostInput {
                title: post.title.clone(),
                content: post.content.clone(),
                published: post.published,
                og_image: post.og_image.clone(),
                canonical_url: post.canonical_url.clone(),
                category_ids: links.category_ids,
                tag_ids: links.tag_ids,
            },
            error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn post_id(&self) -> Option<Uuid> {
        self.post_id
    }

    pub fn draft(&self) -> Option<&GeneratedArticleDraft> {
        self.draft.as_ref()
    }

    pub fn document(&self) -> &PostInput {
        &self.document
    }

    /// The last error shown to the user, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn guard_idle(&self) -> Result<(), DomainError> {
        if self.state.in_flight() {
            return Err(DomainError::Busy);
        }
        Ok(())
    }

    fn wrong_state(&self, action: &str) -> DomainError {
        DomainError::InvalidInput(format!("cannot {action} while {:?}", self.state))
    }

    /// `Empty → Generating`. Returns the trimmed keyword to generate from.
    pub fn begin_generation(&mut self, keyword: &str) -> Result<String, DomainError> {
        self.guard_idle()?;
        if self.state != EditorState::Empty {
            return Err(self.wrong_state("generate"));
        }
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DomainError::InvalidInput(
                "enter a keyword or title to generate an article".to_string(),
            ));
        }

        self.state = EditorState::Generating;
        self.error = None;
        Ok(keyword.to_string())
    }

    /// `Generating → Draft` on success, `Generating → Failed` otherwise.
    pub fn finish_generation(
        &mut self,
        keyword: &str,
        outcome: Result<String, DomainError>,
    ) -> Result<(), DomainError> {
        match outcome {
            Ok(raw_content) => {
                let sanitized_content = sanitize(&raw_content);
                self.document = PostInput {
                    title: keyword.to_string(),
                    content: sanitized_content.as_str().to_string(),
                    ..PostInput::default()
                };
                self.draft = Some(GeneratedArticleDraft {
                    keyword: keyword.to_string(),
                    raw_content,
                    sanitized_content,
                });
                self.state = EditorState::Draft;
                Ok(())
            }
            Err(err) => {
                self.draft = None;
                self.document = PostInput::default();
                self.error = Some(err.to_string());
                self.state = EditorState::Failed;
                Err(err)
            }
        }
    }

    /// `Failed → Empty`, dropping everything from the failed attempt.
    pub fn acknowledge(&mut self) -> Result<(), DomainError> {
        self.guard_idle()?;
        if self.state != EditorState::Failed {
            return Err(self.wrong_state("acknowledge"));
        }
        self.state = EditorState::Empty;
        self.draft = None;
        self.document = PostInput::default();
        self.error = None;
        Ok(())
    }

    /// Replace the working document with the user's edits.
    pub fn edit(&mut self, document: PostInput) -> Result<(), DomainError> {
        self.guard_idle()?;
        if !self.state.editable() {
            return Err(self.wrong_state("edit"));
        }
        self.document = document;
        self.state = EditorState::Editing;
        self.error = None;
        Ok(())
    }

    /// `Draft/Editing → Rephrasing`. Returns the selected text.
    pub fn begin_rephrase(&mut self, selection: Selection) -> Result<String, DomainError> {
        self.guard_idle()?;
        if !self.state.editable() {
            return Err(self.wrong_state("rephrase"));
        }
        let range = selection
            .byte_range(&self.document.content)
            .ok_or_else(|| DomainError::InvalidInput("select some text to rephrase".to_string()))?;

        let text = self.document.content[range].to_string();
        self.state = EditorState::Rephrasing;
        self.error = None;
        Ok(text)
    }

    /// `Rephrasing → Editing`. On success the selection is replaced by the
    /// sanitized result; on failure the document is left untouched.
    pub fn finish_rephrase(
        &mut self,
        selection: Selection,
        outcome: Result<String, DomainError>,
    ) -> Result<(), DomainError> {
        self.state = EditorState::Editing;
        let replacement = match outcome {
            Ok(text) => sanitize(&text),
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        match selection.byte_range(&self.document.content) {
            Some(range) => {
                self.document
                    .content
                    .replace_range(range, replacement.as_str());
                Ok(())
            }
            None => {
                let err = DomainError::InvalidInput("selection no longer exists".to_string());
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// `Draft/Editing → Saving`. Returns the identity to update, if any, and
    /// the document to store.
    pub fn begin_save(&mut self) -> Result<(Option<Uuid>, PostInput), DomainError> {
        self.guard_idle()?;
        if !self.state.editable() {
            return Err(self.wrong_state("save"));
        }
        self.state = EditorState::Saving;
        self.error = None;
        Ok((self.post_id, self.document.clone()))
    }

    /// `Saving → Saved` on success; back to `Editing` with the document
    /// unchanged on failure.
    pub fn finish_save(&mut self, outcome: Result<Post, DomainError>) -> Result<(), DomainError> {
        match outcome {
            Ok(post) => {
                self.post_id = Some(post.id);
                self.document.title = post.title;
                self.document.content = post.content;
                self.draft = None;
                self.state = EditorState::Saved;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.state = EditorState::Editing;
                Err(err)
            }
        }
    }
}

impl EditorSession {
    /// Leave an in-flight state whose result will never arrive.
    ///
    /// Generation falls back to `Empty`; rephrase and save fall back to
    /// `Editing` with the document as it was before the request. A save
    /// interrupted mid-flight may or may not have been stored.
    fn abandon(&mut self) {
        let interrupted = match self.state {
            EditorState::Generating => {
                self.draft = None;
                self.document = PostInput::default();
                EditorState::Empty
            }
            EditorState::Rephrasing | EditorState::Saving => EditorState::Editing,
            _ => return,
        };

        tracing::warn!(session_id = %self.id, from = self.state.as_str(), "Editor request abandoned");
        self.state = interrupted;
        self.error = Some("the previous request was interrupted".to_string());
    }
}

/// Puts the session back into a usable state if a command is dropped
/// between its begin and finish transitions.
struct InFlight<'a> {
    session: &'a Mutex<EditorSession>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(session: &'a Mutex<EditorSession>) -> Self {
        Self {
            session,
            settled: false,
        }
    }

    fn finish<T>(mut self, apply: impl FnOnce(&mut EditorSession) -> T) -> T {
        self.settled = true;
        apply(&mut lock(self.session))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock(self.session).abandon();
        }
    }
}

/// Runs editor commands against the generation and storage services.
#[derive(Clone)]
pub struct EditingSurface {
    generator: ArticleGenerator,
    rephraser: RephraseService,
    posts: PostService,
}

fn lock(session: &Mutex<EditorSession>) -> MutexGuard<'_, EditorSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EditingSurface {
    pub fn new(generator: ArticleGenerator, rephraser: RephraseService, posts: PostService) -> Self {
        Self {
            generator,
            rephraser,
            posts,
        }
    }

    /// Apply one command to a session.
    ///
    /// Errors are also recorded on the session for display; every failure
    /// leaves the session in a state the user can continue from.
    pub async fn dispatch(
        &self,
        session: &Mutex<EditorSession>,
        command: EditorCommand,
    ) -> Result<(), DomainError> {
        match command {
            EditorCommand::Generate { keyword } => {
                let keyword = lock(session).begin_generation(&keyword)?;
                let in_flight = InFlight::new(session);
                let outcome = self.generator.generate_article(&keyword).await;
                in_flight.finish(|s| s.finish_generation(&keyword, outcome))
            }
            EditorCommand::Edit { document } => lock(session).edit(document),
            EditorCommand::Rephrase { selection, mode } => {
                let text = lock(session).begin_rephrase(selection)?;
                let in_flight = InFlight::new(session);
                let outcome = self.rephraser.rephrase(&text, mode).await;
                in_flight.finish(|s| s.finish_rephrase(selection, outcome))
            }
            EditorCommand::Save => {
                let (owner, (post_id, document)) = {
                    let mut guard = lock(session);
                    let owner = guard.owner();
                    (owner, guard.begin_save()?)
                };
                let in_flight = InFlight::new(session);
                let outcome = match post_id {
                    Some(id) => self.posts.update(owner, id, document).await,
                    None => self.posts.create(owner, document).await,
                };
                in_flight.finish(|s| s.finish_save(outcome))
            }
            EditorCommand::Acknowledge => lock(session).acknowledge(),
        }
    }
}
