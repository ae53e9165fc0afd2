// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::Comment;
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 评论仓库特质
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// 创建评论
    async fn create(&self, comment: &Comment) -> Result<Comment, RepositoryError>;
    /// 根据ID查找评论
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepositoryError>;
    /// 下架评论
    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError>;
}
