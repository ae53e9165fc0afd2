// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务队列
pub mod job_queue;

/// 任务调度器
pub mod scheduler;
