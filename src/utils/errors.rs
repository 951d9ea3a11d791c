// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::history_repository::RepositoryError;
use crate::domain::repositories::storage_repository::StorageError;
use crate::engines::traits::EngineError;
use thiserror::Error;

/// Worker错误类型
///
/// 单个工作项处理失败时返回；失败的工作项不写历史记录，下次运行会重新生成。
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("元数据获取失败: {0}")]
    Metadata(#[source] EngineError),

    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("下载失败: {0}")]
    Download(#[source] EngineError),

    #[error("内部错误: {0}")]
    Internal(String),
}
