// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::history::HistoryRecord;
use crate::domain::repositories::history_repository::{HistoryRepository, RepositoryError};
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 报告生成错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("History scan failed: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Report upload failed: {0}")]
    Storage(#[from] StorageError),
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// 成功下载报告行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRow {
    pub video_id: String,
    pub video_title: Option<String>,
    pub video_duration: Option<f64>,
    pub video_view_count: Option<i64>,
    pub video_like_count: Option<i64>,
}

/// 失败报告行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRow {
    pub video_id: String,
    pub reason: Option<String>,
}

/// 单个频道的报告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelReport {
    pub successful: Vec<SuccessRow>,
    pub failed: Vec<FailureRow>,
}

impl ChannelReport {
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }
}

/// 成功报告对象键
pub fn success_report_key(channel_id: &str) -> String {
    format!("{}/successfully_downloaded.csv", channel_id)
}

/// 失败报告对象键
pub fn failure_report_key(channel_id: &str) -> String {
    format!("{}/unsuccessfully_downloaded.csv", channel_id)
}

/// 按频道划分历史记录，再按下载状态拆成成功与失败两部分
///
/// 频道内保持记录的输入顺序。
pub fn partition_by_channel(records: &[HistoryRecord]) -> BTreeMap<String, ChannelReport> {
    let mut reports: BTreeMap<String, ChannelReport> = BTreeMap::new();

    for record in records {
        let report = reports.entry(record.channel_id.clone()).or_default();
        if record.download_status {
            report.successful.push(SuccessRow {
                video_id: record.video_id.clone(),
                video_title: record.video_title.clone(),
                video_duration: record.video_duration,
                video_view_count: record.video_view_count,
                video_like_count: record.video_like_count,
            });
        } else {
            report.failed.push(FailureRow {
                video_id: record.video_id.clone(),
                reason: record.reason.clone(),
            });
        }
    }

    reports
}

/// 序列化为带表头的 CSV；空列表也输出表头
pub fn to_csv<T: Serialize>(rows: &[T], headers: &[&str]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))
}

const SUCCESS_COLUMNS: &[&str] = &[
    "video_id",
    "video_title",
    "video_duration",
    "video_view_count",
    "video_like_count",
];
const FAILURE_COLUMNS: &[&str] = &["video_id", "reason"];

/// 报告汇总器
///
/// 读取历史存储的当前状态，为每个频道写出成功与失败两份 CSV。
pub struct ReportAggregator<H: HistoryRepository> {
    history: Arc<H>,
    storage: Arc<dyn StorageRepository>,
}

impl<H: HistoryRepository> ReportAggregator<H> {
    pub fn new(history: Arc<H>, storage: Arc<dyn StorageRepository>) -> Self {
        Self { history, storage }
    }

    /// 生成并上传全部频道报告，返回内存中的划分结果
    pub async fn generate_reports(&self) -> Result<BTreeMap<String, ChannelReport>, ReportError> {
        let records = self.history.scan_all().await?;
        let reports = partition_by_channel(&records);

        for (channel_id, report) in &reports {
            let success_csv = to_csv(&report.successful, SUCCESS_COLUMNS)?;
            self.storage
                .save(&success_report_key(channel_id), &success_csv)
                .await?;

            let failure_csv = to_csv(&report.failed, FAILURE_COLUMNS)?;
            self.storage
                .save(&failure_report_key(channel_id), &failure_csv)
                .await?;

            info!(
                channel_id = %channel_id,
                successful = report.successful.len(),
                failed = report.failed.len(),
                "Channel report uploaded"
            );
        }

        Ok(reports)
    }
}
