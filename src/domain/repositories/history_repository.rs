// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::history::{ChannelOutcome, ChannelStatus, HistoryRecord};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 全表扫描每页默认条数
pub const DEFAULT_SCAN_PAGE_SIZE: u64 = 500;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 存储的数据无法映射为领域对象
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// 扫描游标：上一页最后一条记录的主键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HistoryCursor {
    pub channel_id: String,
    pub video_id: String,
}

impl From<&HistoryRecord> for HistoryCursor {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            channel_id: record.channel_id.clone(),
            video_id: record.video_id.clone(),
        }
    }
}

/// 一页扫描结果
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub records: Vec<HistoryRecord>,
    /// 还有后续页时返回下一页的起点
    pub next_cursor: Option<HistoryCursor>,
}

/// 历史记录仓库特质
///
/// 历史存储是系统唯一共享的可变资源：只支持追加、按键查询和分页扫描。
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 追加一条记录；相同 (channel_id, video_id) 已存在时不写入并返回 false
    async fn append(&self, record: &HistoryRecord) -> Result<bool, RepositoryError>;

    /// 频道是否存在指定状态的记录
    async fn has_channel_status(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<bool, RepositoryError>;

    /// 查询频道指定状态的记录，只投影下载状态与时长
    async fn channel_outcomes(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<Vec<ChannelOutcome>, RepositoryError>;

    /// 指定 (channel_id, video_id) 是否已有任何记录
    async fn exists(&self, channel_id: &str, video_id: &str) -> Result<bool, RepositoryError>;

    /// 按主键顺序扫描一页
    async fn scan_page(
        &self,
        cursor: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<HistoryPage, RepositoryError>;

    /// 扫描全部记录，循环翻页直到没有游标
    async fn scan_all(&self) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let mut records = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.scan_page(cursor, DEFAULT_SCAN_PAGE_SIZE).await?;
            records.extend(page.records);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(records)
    }
}
