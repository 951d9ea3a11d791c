// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::admission::AdmissionConfig;
use crate::domain::models::video::WorkItem;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::engines::traits::{MediaDownloader, MetadataSource, TranscriptSource};
use crate::utils::errors::WorkerError;
use crate::workers::download_worker::{DownloadWorker, ItemOutcome};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// 一次运行的汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub admitted: usize,
    pub rejected: usize,
    pub ineligible: usize,
    /// 已有历史记录而跳过的工作项
    pub already_recorded: usize,
    /// 处理出错、未写入历史记录的工作项
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.admitted + self.rejected + self.ineligible + self.already_recorded + self.failed
    }

    fn record(&mut self, item: &WorkItem, result: Result<ItemOutcome, WorkerError>) {
        match result {
            Ok(ItemOutcome::Admitted) => self.admitted += 1,
            Ok(ItemOutcome::Rejected { .. }) => self.rejected += 1,
            Ok(ItemOutcome::Ineligible) => self.ineligible += 1,
            Ok(ItemOutcome::AlreadyRecorded) => self.already_recorded += 1,
            Err(e) => {
                error!(
                    channel_id = %item.channel_id,
                    video_id = %item.video_id,
                    error = %e,
                    "Work item failed"
                );
                metrics::counter!("harvestrs_items_failed_total").increment(1);
                self.failed += 1;
            }
        }
    }
}

/// 工作管理器
///
/// 以有限并发处理全部工作项；单个工作项失败不影响其他工作项。
pub struct WorkerManager<H, M, T, D>
where
    H: HistoryRepository + 'static,
    M: MetadataSource + 'static,
    T: TranscriptSource + 'static,
    D: MediaDownloader + 'static,
{
    worker: Arc<DownloadWorker<H, M, T, D>>,
    concurrency: usize,
}

impl<H, M, T, D> WorkerManager<H, M, T, D>
where
    H: HistoryRepository + 'static,
    M: MetadataSource + 'static,
    T: TranscriptSource + 'static,
    D: MediaDownloader + 'static,
{
    /// # 参数
    ///
    /// * `worker` - 共享的下载工作器
    /// * `concurrency` - 同时处理的工作项上限，至少为 1
    pub fn new(worker: Arc<DownloadWorker<H, M, T, D>>, concurrency: usize) -> Self {
        Self {
            worker,
            concurrency: concurrency.max(1),
        }
    }

    /// 处理全部工作项并返回汇总
    pub async fn run_all(&self, items: Vec<WorkItem>, config: Arc<AdmissionConfig>) -> RunSummary {
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();
        let mut summary = RunSummary::default();

        info!(
            items = items.len(),
            concurrency = self.concurrency,
            "Processing work items"
        );

        for item in items {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    summary.record(
                        &item,
                        Err(WorkerError::Internal("semaphore closed".to_string())),
                    );
                    continue;
                }
            };
            let worker = self.worker.clone();
            let config = config.clone();
            join_set.spawn(async move {
                let _permit = permit;
                let result = worker.process(&item, &config).await;
                (item, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((item, result)) => summary.record(&item, result),
                Err(e) => {
                    error!(error = %e, "Work item task panicked");
                    metrics::counter!("harvestrs_items_failed_total").increment(1);
                    summary.failed += 1;
                }
            }
        }

        summary.elapsed = started.elapsed();
        info!(
            admitted = summary.admitted,
            rejected = summary.rejected,
            ineligible = summary.ineligible,
            already_recorded = summary.already_recorded,
            failed = summary.failed,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Work items processed"
        );
        summary
    }
}
