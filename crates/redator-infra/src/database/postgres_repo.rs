//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use redator_core::domain::{Author, Category, Post, PostLinks, Tag};
use redator_core::error::RepoError;
use redator_core::ports::{AuthorRepository, BaseRepository, PostRepository, TaxonomyRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// Replace a post's category and tag rows inside an open transaction.
async fn replace_links<C>(conn: &C, post_id: Uuid, links: &PostLinks) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    PostCategoryEntity::delete_many()
        .filter(post_category::Column::PostId.eq(post_id))
        .exec(conn)
        .await
        .map_err(query_error)?;

    if !links.category_ids.is_empty() {
        let rows = links.category_ids.iter().map(|&category_id| post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        });
        PostCategoryEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(write_error)?;
    }

    PostTagEntity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(conn)
        .await
        .map_err(query_error)?;

    if !links.tag_ids.is_empty() {
        let rows = links.tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
        });
        PostTagEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(write_error)?;
    }

    Ok(())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_by_id(self, id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Published.eq(true))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(write_error)?;
        replace_links(&txn, model.id, links).await?;

        txn.commit().await.map_err(query_error)?;
        tracing::debug!(post_id = %model.id, "Post row and links inserted");
        Ok(model.into())
    }

    async fn update(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(write_error)?;
        replace_links(&txn, model.id, links).await?;

        txn.commit().await.map_err(query_error)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        replace_links(&txn, id, &PostLinks::default()).await?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_error)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)?;
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .order_by_asc(author::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Author>, RepoError> {
        let result = AuthorEntity::find()
            .filter(author::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL category and tag lookups.
pub struct PostgresTaxonomyRepository {
    db: DbConn,
}

impl PostgresTaxonomyRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn categories_for_post(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let ids: Vec<Uuid> = PostCategoryEntity::find()
            .filter(post_category::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|link| link.category_id)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let ids: Vec<Uuid> = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
