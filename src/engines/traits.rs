// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::transcript::TranscriptSegment;
use crate::domain::models::video::VideoMetadata;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 外部进程启动或读写失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 外部进程返回非零状态
    #[error("Process failed: {0}")]
    ProcessFailed(String),
    /// 返回内容无法解析
    #[error("Parse error: {0}")]
    Parse(String),
    /// 视频或频道不存在
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Parse(err.to_string())
    }
}

/// 字幕获取错误
///
/// `Display` 输出直接作为拒绝原因写入历史记录。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// 视频没有自动生成的字幕
    #[error("Captions unavailable")]
    Unavailable,
    /// 请求的语言不在可用字幕中
    #[error("Selected caption language not available")]
    LanguageNotFound,
    /// 底层获取失败
    #[error("{0}")]
    Fetch(String),
}

impl From<EngineError> for TranscriptError {
    fn from(err: EngineError) -> Self {
        TranscriptError::Fetch(err.to_string())
    }
}

/// 元数据源
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// 根据视频ID获取元数据
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, EngineError>;
}

/// 字幕源
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// 获取指定语言的有序字幕片段
    ///
    /// 字幕轨道取自调用方已获取的元数据。
    async fn fetch_transcript(
        &self,
        metadata: &VideoMetadata,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// 频道视频枚举源
#[async_trait]
pub trait ChannelVideoSource: Send + Sync {
    /// 按频道自然顺序（新到旧）列出当前发布的视频ID
    async fn list_videos(&self, channel_url: &str) -> Result<Vec<String>, EngineError>;
}

/// 媒体下载器
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// 下载音频到目标目录，返回本地文件路径
    async fn download_audio(&self, video_id: &str, dest_dir: &Path)
        -> Result<PathBuf, EngineError>;
}
