// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 调度策略层
pub mod dispatcher;

pub use dispatcher::Dispatcher;
