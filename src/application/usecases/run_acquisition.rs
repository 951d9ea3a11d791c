// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::admission::RunInput;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use crate::domain::services::report_aggregator::{ReportAggregator, ReportError};
use crate::domain::services::task_generator::{TaskGenerationError, TaskGenerator};
use crate::engines::traits::{ChannelVideoSource, MediaDownloader, MetadataSource, TranscriptSource};
use crate::workers::download_worker::DownloadWorker;
use crate::workers::manager::{RunSummary, WorkerManager};

// === Section: Errors ===

/// 运行错误
///
/// 只有整批无法继续时才返回；单个工作项的失败计入 `RunSummary::failed`。
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Run input unavailable: {0}")]
    Input(#[from] StorageError),
    #[error("Invalid run input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Tasks(#[from] TaskGenerationError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

// === Section: Use Case Definition ===

/// 运行参数
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_key: String,
    pub shuffle: bool,
    pub concurrency: usize,
}

/// 一次完整的采集运行
///
/// 读取运行输入，生成任务，以有限并发处理全部工作项，最后生成报告。
pub struct RunAcquisitionUseCase<H, C, M, T, D>
where
    H: HistoryRepository + 'static,
    C: ChannelVideoSource,
    M: MetadataSource + 'static,
    T: TranscriptSource + 'static,
    D: MediaDownloader + 'static,
{
    input_storage: Arc<dyn StorageRepository>,
    task_generator: TaskGenerator<H, C>,
    manager: WorkerManager<H, M, T, D>,
    report_aggregator: ReportAggregator<H>,
    options: RunOptions,
}

// === Section: Implementation ===

impl<H, C, M, T, D> RunAcquisitionUseCase<H, C, M, T, D>
where
    H: HistoryRepository + 'static,
    C: ChannelVideoSource,
    M: MetadataSource + 'static,
    T: TranscriptSource + 'static,
    D: MediaDownloader + 'static,
{
    pub fn new(
        history: Arc<H>,
        channel_source: Arc<C>,
        worker: Arc<DownloadWorker<H, M, T, D>>,
        input_storage: Arc<dyn StorageRepository>,
        report_storage: Arc<dyn StorageRepository>,
        options: RunOptions,
    ) -> Self {
        Self {
            input_storage,
            task_generator: TaskGenerator::new(history.clone(), channel_source),
            manager: WorkerManager::new(worker, options.concurrency),
            report_aggregator: ReportAggregator::new(history, report_storage),
            options,
        }
    }

    /// 读取并校验运行输入
    pub async fn load_input(&self) -> Result<RunInput, RunError> {
        let value = self.input_storage.load_json(&self.options.input_key).await?;
        let input: RunInput =
            serde_json::from_value(value).map_err(|e| RunError::InvalidInput(e.to_string()))?;
        input
            .validate()
            .map_err(|e| RunError::InvalidInput(e.to_string()))?;
        Ok(input)
    }

    #[instrument(skip(self), fields(run_id = %Uuid::new_v4(), input_key = %self.options.input_key))]
    pub async fn execute(&self) -> Result<RunSummary, RunError> {
        let started = Instant::now();

        let input = self.load_input().await?;
        info!(channels = input.channels.len(), "Run input loaded");

        let tasks = self
            .task_generator
            .generate_tasks(&input.channels, self.options.shuffle)
            .await?;

        let mut summary = self
            .manager
            .run_all(tasks, Arc::new(input.configuration))
            .await;

        let reports = self.report_aggregator.generate_reports().await?;
        info!(channels = reports.len(), "Reports generated");

        summary.elapsed = started.elapsed();
        Ok(summary)
    }
}
