// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::admission::AdmissionConfig;
use crate::domain::models::history::{ChannelOutcome, ChannelStatus, HistoryRecord};
use crate::domain::repositories::history_repository::{HistoryRepository, RepositoryError};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// 评估到该数量后才检查成功率
pub const CHECK_AFTER_N_VIDEOS: usize = 5;

/// 违反的配额阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaBreach {
    MaxHoursExceeded,
    MaxVideosExceeded,
    SuccessRatioTooLow,
}

impl fmt::Display for QuotaBreach {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuotaBreach::MaxHoursExceeded => write!(f, "Max hours per channel exceeded"),
            QuotaBreach::MaxVideosExceeded => {
                write!(f, "Max downloaded videos per channel exceeded")
            }
            QuotaBreach::SuccessRatioTooLow => write!(f, "Minimum success rate not achieved"),
        }
    }
}

/// 按顺序检查时长、数量、成功率，返回第一个违反的阈值
pub fn check_channel_outcomes(
    outcomes: &[ChannelOutcome],
    config: &AdmissionConfig,
) -> Option<QuotaBreach> {
    let successful: Vec<&ChannelOutcome> = outcomes.iter().filter(|o| o.download_status).collect();

    let total_seconds: f64 = successful.iter().filter_map(|o| o.video_duration).sum();
    let total_hours = (total_seconds / 3600.0 * 100.0).round() / 100.0;
    if total_hours > config.max_download_hours_per_channel {
        return Some(QuotaBreach::MaxHoursExceeded);
    }

    let total_videos = successful.len() as u64;
    if total_videos > config.max_downloaded_videos_per_channel {
        return Some(QuotaBreach::MaxVideosExceeded);
    }

    if outcomes.len() >= CHECK_AFTER_N_VIDEOS {
        let ratio = total_videos as f64 / outcomes.len() as f64;
        if ratio < config.min_successful_download_ratio {
            return Some(QuotaBreach::SuccessRatioTooLow);
        }
    }

    None
}

/// 频道配额账本
///
/// 每次调用都从历史记录重新推导频道资格，不在内存中缓存。
/// 先读后写不是事务性的：并发工作器可能各自写入一条停用记录。
pub struct QuotaLedger<H: HistoryRepository> {
    history: Arc<H>,
}

impl<H: HistoryRepository> QuotaLedger<H> {
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }

    /// 检查频道是否仍有资格处理视频
    ///
    /// 违反阈值时追加一条 Inactive 记录并返回 false。
    ///
    /// # 参数
    ///
    /// * `channel_id` - 频道ID
    /// * `video_id` - 当前待处理的视频ID，停用记录以它为键
    /// * `config` - 准入配置
    pub async fn check_channel_eligible(
        &self,
        channel_id: &str,
        video_id: &str,
        config: &AdmissionConfig,
    ) -> Result<bool, RepositoryError> {
        if self
            .history
            .has_channel_status(channel_id, ChannelStatus::Inactive)
            .await?
        {
            info!(channel_id, "Channel is inactive, skipping");
            return Ok(false);
        }

        let outcomes = self
            .history
            .channel_outcomes(channel_id, ChannelStatus::Active)
            .await?;
        if outcomes.is_empty() {
            return Ok(true);
        }

        match check_channel_outcomes(&outcomes, config) {
            Some(breach) => {
                warn!(channel_id, video_id, %breach, "Deactivating channel");
                metrics::counter!(
                    "harvestrs_channels_deactivated_total",
                    "reason" => breach.to_string()
                )
                .increment(1);
                self.history
                    .append(&HistoryRecord::deactivation(
                        channel_id,
                        video_id,
                        breach.to_string(),
                    ))
                    .await?;
                Ok(false)
            }
            None => Ok(true),
        }
    }
}
