// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 视频元数据
///
/// 由元数据源返回，只在评估阶段使用，评估结果写入历史记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// 视频ID
    pub video_id: String,
    /// 上传者标识（频道 handle）；部分视频不提供
    #[serde(default)]
    pub uploader_id: Option<String>,
    /// 视频时长（秒）
    pub duration: f64,
    pub title: String,
    pub view_count: Option<i64>,
    pub like_count: Option<i64>,
    pub upload_date: Option<NaiveDate>,
    /// 自动生成字幕轨道：语言代码 -> 字幕下载地址
    #[serde(default)]
    pub caption_tracks: BTreeMap<String, String>,
}

/// 待评估的工作项
///
/// 由任务生成器创建，被处理流水线消费一次；其处理结果就是一条历史记录。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub channel_id: String,
    pub video_id: String,
}

impl WorkItem {
    pub fn new(channel_id: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            video_id: video_id.into(),
        }
    }
}

/// 频道来源
///
/// 运行输入中以 `[channel_id, channel_url]` 二元组给出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)")]
pub struct ChannelSource {
    pub channel_id: String,
    pub channel_url: String,
}

impl ChannelSource {
    pub fn new(channel_id: &str, channel_url: impl Into<String>) -> Self {
        Self {
            channel_id: normalize_channel_id(channel_id),
            channel_url: channel_url.into(),
        }
    }
}

impl From<(String, String)> for ChannelSource {
    fn from((channel_id, channel_url): (String, String)) -> Self {
        Self::new(&channel_id, channel_url)
    }
}

/// 去掉频道 handle 中的 `@` 前缀
pub fn normalize_channel_id(channel_id: &str) -> String {
    channel_id.trim().replace('@', "")
}
