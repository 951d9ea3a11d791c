// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::history::{ChannelOutcome, ChannelStatus, HistoryRecord};
use crate::domain::repositories::history_repository::{
    HistoryCursor, HistoryPage, HistoryRepository, RepositoryError,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 内存历史记录仓库
///
/// 与数据库实现语义一致：主键冲突时不写入，扫描按主键排序。
#[derive(Clone, Default)]
pub struct InMemoryHistoryRepository {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有记录初始化
    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// 当前全部记录的快照（按写入顺序）
    pub async fn snapshot(&self) -> Vec<HistoryRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.channel_id == record.channel_id && r.video_id == record.video_id)
        {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn has_channel_status(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<bool, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.channel_id == channel_id && r.channel_status == status))
    }

    async fn channel_outcomes(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<Vec<ChannelOutcome>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.channel_id == channel_id && r.channel_status == status)
            .map(HistoryRecord::outcome)
            .collect())
    }

    async fn exists(&self, channel_id: &str, video_id: &str) -> Result<bool, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.channel_id == channel_id && r.video_id == video_id))
    }

    async fn scan_page(
        &self,
        cursor: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<HistoryPage, RepositoryError> {
        let mut sorted = self.records.read().await.clone();
        sorted.sort_by(|a, b| HistoryCursor::from(a).cmp(&HistoryCursor::from(b)));

        let remaining: Vec<HistoryRecord> = sorted
            .into_iter()
            .filter(|r| match &cursor {
                Some(c) => HistoryCursor::from(r) > *c,
                None => true,
            })
            .collect();

        let limit = limit.max(1) as usize;
        let has_more = remaining.len() > limit;
        let records: Vec<HistoryRecord> = remaining.into_iter().take(limit).collect();
        let next_cursor = if has_more {
            records.last().map(HistoryCursor::from)
        } else {
            None
        };

        Ok(HistoryPage {
            records,
            next_cursor,
        })
    }
}
