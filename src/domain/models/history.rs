// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::admission::ConstraintVerdict;
use crate::domain::models::video::VideoMetadata;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 历史记录实体
///
/// 每个 (channel_id, video_id) 对应一条处理结果。记录只追加，
/// 从不更新或删除；频道的当前状态总是通过重新查询历史得出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 频道ID
    pub channel_id: String,
    /// 视频ID
    pub video_id: String,
    /// 视频最终是否被接收并下载
    pub download_status: bool,
    /// 频道状态，Inactive 为终态
    pub channel_status: ChannelStatus,
    /// 视频时长（秒）
    pub video_duration: Option<f64>,
    /// 估算的语速（每分钟词数）
    pub video_wpm: Option<u32>,
    pub video_title: Option<String>,
    pub video_view_count: Option<i64>,
    pub video_like_count: Option<i64>,
    pub video_upload_date: Option<NaiveDate>,
    /// 拒绝原因
    pub reason: Option<String>,
    /// 最后写入时间
    pub update_time: DateTime<FixedOffset>,
}

impl HistoryRecord {
    /// 创建频道停用记录
    ///
    /// # 参数
    ///
    /// * `channel_id` - 频道ID
    /// * `video_id` - 触发停用检查的视频ID
    /// * `reason` - 违反的配额阈值描述
    pub fn deactivation(channel_id: &str, video_id: &str, reason: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            video_id: video_id.to_string(),
            download_status: false,
            channel_status: ChannelStatus::Inactive,
            video_duration: None,
            video_wpm: None,
            video_title: None,
            video_view_count: None,
            video_like_count: None,
            video_upload_date: None,
            reason: Some(reason.into()),
            update_time: Utc::now().into(),
        }
    }

    /// 根据评估结论创建记录
    ///
    /// 记录以工作项的频道ID为键，而不是元数据中的上传者。
    pub fn evaluated(
        channel_id: &str,
        metadata: &VideoMetadata,
        verdict: &ConstraintVerdict,
    ) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            video_id: metadata.video_id.clone(),
            download_status: verdict.passed,
            channel_status: ChannelStatus::Active,
            video_duration: Some(metadata.duration),
            video_wpm: verdict.metrics.wpm,
            video_title: Some(metadata.title.clone()),
            video_view_count: metadata.view_count,
            video_like_count: metadata.like_count,
            video_upload_date: metadata.upload_date,
            reason: verdict.reason.clone(),
            update_time: Utc::now().into(),
        }
    }

    /// 将记录投影为配额检查所需的字段
    pub fn outcome(&self) -> ChannelOutcome {
        ChannelOutcome {
            download_status: self.download_status,
            video_duration: self.video_duration,
        }
    }
}

/// 频道状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChannelStatus {
    /// 频道仍可继续处理
    #[default]
    Active,
    /// 频道已因配额被停用
    Inactive,
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelStatus::Active => write!(f, "Active"),
            ChannelStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl FromStr for ChannelStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ChannelStatus::Active),
            "Inactive" => Ok(ChannelStatus::Inactive),
            _ => Err(()),
        }
    }
}

/// 历史记录在配额检查中的投影：只保留下载状态与时长
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelOutcome {
    pub download_status: bool,
    pub video_duration: Option<f64>,
}
