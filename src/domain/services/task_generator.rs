// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video::{ChannelSource, WorkItem};
use crate::domain::repositories::history_repository::{HistoryRepository, RepositoryError};
use crate::engines::traits::{ChannelVideoSource, EngineError};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// 任务生成错误
#[derive(Error, Debug)]
pub enum TaskGenerationError {
    #[error("Channel enumeration failed for {channel_id}: {source}")]
    Enumeration {
        channel_id: String,
        #[source]
        source: EngineError,
    },
    #[error("History lookup failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// 任务生成器
///
/// 枚举每个频道当前发布的视频，跳过历史中已有任何记录的 (频道, 视频)，
/// 保证每个组合在系统生命周期内至多被评估一次。
pub struct TaskGenerator<H: HistoryRepository, C: ChannelVideoSource> {
    history: Arc<H>,
    channel_source: Arc<C>,
}

impl<H: HistoryRepository, C: ChannelVideoSource> TaskGenerator<H, C> {
    pub fn new(history: Arc<H>, channel_source: Arc<C>) -> Self {
        Self {
            history,
            channel_source,
        }
    }

    /// 生成去重后的工作列表
    ///
    /// 不打乱时按输入频道顺序、频道内自然顺序输出；
    /// 打乱时对完整列表做一次跨频道的均匀随机排列。
    /// 同一 (频道, 视频) 在一次调用中只输出一次，包括规范化后重名的频道。
    pub async fn generate_tasks(
        &self,
        channels: &[ChannelSource],
        shuffle: bool,
    ) -> Result<Vec<WorkItem>, TaskGenerationError> {
        let mut tasks = Vec::new();
        let mut emitted: HashSet<(String, String)> = HashSet::new();

        for channel in channels {
            let video_ids = self
                .channel_source
                .list_videos(&channel.channel_url)
                .await
                .map_err(|source| TaskGenerationError::Enumeration {
                    channel_id: channel.channel_id.clone(),
                    source,
                })?;

            let mut skipped = 0usize;
            for video_id in video_ids {
                let key = (channel.channel_id.clone(), video_id);
                if emitted.contains(&key) {
                    debug!(channel_id = %key.0, video_id = %key.1, "Duplicate listing, skipping");
                    continue;
                }
                if self.history.exists(&key.0, &key.1).await? {
                    debug!(channel_id = %key.0, video_id = %key.1, "Already attempted, skipping");
                    skipped += 1;
                    continue;
                }
                tasks.push(WorkItem::new(key.0.clone(), key.1.clone()));
                emitted.insert(key);
            }

            info!(
                channel_id = %channel.channel_id,
                skipped,
                total_tasks = tasks.len(),
                "Channel enumerated"
            );
        }

        if shuffle {
            tasks.shuffle(&mut rand::rng());
        }

        Ok(tasks)
    }
}
