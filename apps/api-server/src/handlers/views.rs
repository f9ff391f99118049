//! Domain → wire conversions.

use redator_core::domain::{Author, AuthorInput, Category, Post, PostInput, Tag};
use redator_core::services::{EditorSession, PublishedPost};
use redator_shared::dto::{
    AuthorResponse, CreateAuthorRequest, DraftResponse, EditorSessionResponse, PostResponse,
    PostSummaryResponse, PublicPostResponse, SavePostRequest, SeoMetadata, TaxonomyResponse,
};

pub fn post_input(req: SavePostRequest) -> PostInput {
    PostInput {
        title: req.title,
        content: req.content,
        published: req.published,
        og_image: req.og_image,
        canonical_url: req.canonical_url,
        category_ids: req.category_ids,
        tag_ids: req.tag_ids,
    }
}

fn save_request(input: &PostInput) -> SavePostRequest {
    SavePostRequest {
        title: input.title.clone(),
        content: input.content.clone(),
        published: input.published,
        og_image: input.og_image.clone(),
        canonical_url: input.canonical_url.clone(),
        category_ids: input.category_ids.clone(),
        tag_ids: input.tag_ids.clone(),
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        summary: post.summary,
        published: post.published,
        published_at: post.published_at,
        meta_title: post.meta_title,
        meta_description: post.meta_description,
        og_image: post.og_image,
        canonical_url: post.canonical_url,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn post_summary(post: Post) -> PostSummaryResponse {
    PostSummaryResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        summary: post.summary,
        published_at: post.published_at,
        og_image: post.og_image,
    }
}

pub fn public_post(published: PublishedPost) -> PublicPostResponse {
    let PublishedPost {
        post,
        categories,
        tags,
    } = published;

    let seo = SeoMetadata {
        title: post.meta_title.clone().unwrap_or_else(|| post.title.clone()),
        description: post
            .meta_description
            .clone()
            .unwrap_or_else(|| post.summary.clone()),
        og_image: post.og_image.clone(),
        canonical_url: post.canonical_url.clone(),
    };

    PublicPostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        summary: post.summary,
        published_at: post.published_at,
        categories: categories.into_iter().map(category).collect(),
        tags: tags.into_iter().map(tag).collect(),
        seo,
    }
}

pub fn category(category: Category) -> TaxonomyResponse {
    TaxonomyResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
    }
}

pub fn tag(tag: Tag) -> TaxonomyResponse {
    TaxonomyResponse {
        id: tag.id,
        name: tag.name,
        slug: tag.slug,
    }
}

pub fn author_input(req: CreateAuthorRequest) -> AuthorInput {
    AuthorInput {
        name: req.name,
        bio: req.bio,
        website_url: req.website_url,
        twitter_username: req.twitter_username,
        github_username: req.github_username,
        linkedin_url: req.linkedin_url,
    }
}

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        slug: author.slug,
        bio: author.bio,
        website_url: author.website_url,
        twitter_username: author.twitter_username,
        github_username: author.github_username,
        linkedin_url: author.linkedin_url,
        created_at: author.created_at,
    }
}

pub fn editor_session(session: &EditorSession) -> EditorSessionResponse {
    EditorSessionResponse {
        id: session.id(),
        state: session.state().as_str().to_string(),
        post_id: session.post_id(),
        draft: session.draft().map(|d| DraftResponse {
            keyword: d.keyword.clone(),
            sanitized_content: d.sanitized_content.as_str().to_string(),
        }),
        document: save_request(session.document()),
        error: session.error().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn stored_post() -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Receitas Veganas".into(),
            slug: "receitas-veganas".into(),
            content: "<p>Pratos simples.</p>".into(),
            summary: "Pratos simples.".into(),
            published: true,
            published_at: Some(now),
            meta_title: None,
            meta_description: None,
            og_image: None,
            canonical_url: Some("https://exemplo.com.br/receitas".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn seo_falls_back_to_title_and_summary() {
        let view = public_post(PublishedPost {
            post: stored_post(),
            categories: vec![],
            tags: vec![],
        });

        assert_eq!(view.seo.title, "Receitas Veganas");
        assert_eq!(view.seo.description, "Pratos simples.");
        assert_eq!(
            view.seo.canonical_url.as_deref(),
            Some("https://exemplo.com.br/receitas")
        );
    }

    #[test]
    fn seo_prefers_stored_meta_fields() {
        let mut post = stored_post();
        post.meta_title = Some("Veganas | Blog".into());
        post.meta_description = Some("Descrição".into());

        let view = public_post(PublishedPost {
            post,
            categories: vec![],
            tags: vec![],
        });

        assert_eq!(view.seo.title, "Veganas | Blog");
        assert_eq!(view.seo.description, "Descrição");
    }
}
