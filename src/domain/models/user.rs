// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
///
/// `last_login_at` 是召回邮件触发器监视的字段；`is_active`
/// 为软删除标记，任务执行时会重新校验。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识符
    pub id: Uuid,
    /// 邮箱地址（唯一）
    pub email: String,
    /// 名字，用于邮件问候语
    pub first_name: Option<String>,
    /// 是否激活，false 表示已被软删除或封禁
    pub is_active: bool,
    /// 最近登录时间，召回触发器的监视字段
    pub last_login_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl User {
    /// 创建一个新的激活用户
    pub fn new(email: String, first_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    /// 软删除用户
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now().into();
    }
}

/// 评论实体
///
/// 作为第二种可举报实体存在，`active` 为下架标记。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// 评论唯一标识符
    pub id: Uuid,
    /// 作者ID
    pub author_id: Uuid,
    /// 评论内容
    pub body: String,
    /// 是否可见，false 表示已被审核下架
    pub active: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

impl Comment {
    /// 创建一条新评论
    pub fn new(author_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            body,
            active: true,
            created_at: Utc::now().into(),
        }
    }
}
