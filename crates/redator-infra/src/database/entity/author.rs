//! Author entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub linkedin_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for redator_core::domain::Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            slug: model.slug,
            bio: model.bio,
            website_url: model.website_url,
            twitter_username: model.twitter_username,
            github_username: model.github_username,
            linkedin_url: model.linkedin_url,
            created_at: model.created_at.into(),
        }
    }
}

impl From<redator_core::domain::Author> for ActiveModel {
    fn from(author: redator_core::domain::Author) -> Self {
        Self {
            id: Set(author.id),
            user_id: Set(author.user_id),
            name: Set(author.name),
            slug: Set(author.slug),
            bio: Set(author.bio),
            website_url: Set(author.website_url),
            twitter_username: Set(author.twitter_username),
            github_username: Set(author.github_username),
            linkedin_url: Set(author.linkedin_url),
            created_at: Set(author.created_at.into()),
        }
    }
}
