// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 评论仓库实现
pub mod comment_repo_impl;

/// 任务仓库实现
pub mod job_repo_impl;

/// 举报仓库实现
pub mod report_repo_impl;

/// 用户仓库实现
pub mod user_repo_impl;
