// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 可举报实体类型
///
/// 封闭的实体类型注册表：举报记录通过 (类型, id) 二元组
/// 关联任意领域对象，不使用反射式的类型解析。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// 用户
    User,
    /// 评论
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Comment => write!(f, "comment"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EntityKind::User),
            "comment" => Ok(EntityKind::Comment),
            _ => Err(()),
        }
    }
}

/// 举报记录
///
/// 创建后不可变更；审核处置（如下架被举报内容）是独立的
/// 管理员操作，与举报创建解耦。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// 举报唯一标识符
    pub id: Uuid,
    /// 被举报实体的类型
    pub entity_kind: EntityKind,
    /// 被举报实体的ID
    pub entity_id: Uuid,
    /// 举报人ID
    pub reporter_id: Uuid,
    /// 举报原因
    pub reason: String,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

impl Report {
    /// 创建一条新的举报记录
    pub fn new(entity_kind: EntityKind, entity_id: Uuid, reporter_id: Uuid, reason: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_kind,
            entity_id,
            reporter_id,
            reason,
            created_at: Utc::now().into(),
        }
    }
}
