// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 单个工作项的处理流水线，以及有限并发的批量执行
pub mod download_worker;
pub mod manager;

pub use download_worker::{DownloadWorker, ItemOutcome};
pub use manager::{RunSummary, WorkerManager};
