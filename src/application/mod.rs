// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 邮件内容渲染
pub mod emails;

/// 应用用例
pub mod use_cases;
