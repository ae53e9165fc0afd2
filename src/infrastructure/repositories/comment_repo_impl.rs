// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::Comment;
use crate::domain::registry::Reportable;
use crate::domain::repositories::comment_repository::CommentRepository;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::infrastructure::database::entities::comment as comment_entity;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

/// 评论仓库实现
#[derive(Clone)]
pub struct CommentRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CommentRepositoryImpl {
    /// 创建新的评论仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<comment_entity::Model> for Comment {
    fn from(model: comment_entity::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            body: model.body,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

impl From<Comment> for comment_entity::ActiveModel {
    fn from(comment: Comment) -> Self {
        Self {
            id: Set(comment.id),
            author_id: Set(comment.author_id),
            body: Set(comment.body.clone()),
            active: Set(comment.active),
            created_at: Set(comment.created_at),
        }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create(&self, comment: &Comment) -> Result<Comment, RepositoryError> {
        let model: comment_entity::ActiveModel = comment.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(comment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepositoryError> {
        let model = comment_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError> {
        let model = comment_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: comment_entity::ActiveModel = model.into();
        active.active = Set(false);
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}

#[async_trait]
impl Reportable for CommentRepositoryImpl {
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let model = comment_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.is_some())
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError> {
        CommentRepository::deactivate(self, id).await
    }
}
