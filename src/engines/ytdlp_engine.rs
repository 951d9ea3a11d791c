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

use crate::domain::models::video::{normalize_channel_id, VideoMetadata};
use crate::engines::traits::{ChannelVideoSource, EngineError, MediaDownloader, MetadataSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, instrument};

/// 视频页面基础地址
pub const VIDEO_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// 下载音频的格式
pub const AUDIO_FORMAT: &str = "flac";

/// yt-dlp 引擎
///
/// 通过调用 yt-dlp 可执行文件获取元数据、枚举频道视频与下载音频
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    binary: String,
    proxy: Option<String>,
}

impl YtDlpEngine {
    pub fn new(binary: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            proxy,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-warnings").kill_on_drop(true);
        if let Some(proxy) = &self.proxy {
            cmd.arg("--proxy").arg(proxy);
        }
        cmd
    }

    /// 运行 yt-dlp 并返回标准输出
    async fn run(&self, args: &[&str]) -> Result<String, EngineError> {
        debug!(binary = %self.binary, ?args, "Running yt-dlp");
        let output = self.command().args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("Video unavailable") || stderr.contains("does not exist") {
                return Err(EngineError::NotFound(stderr));
            }
            return Err(EngineError::ProcessFailed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// 视频ID对应的页面地址
pub fn video_url(video_id: &str) -> String {
    format!("{}{}", VIDEO_BASE_URL, video_id)
}

/// 频道地址对应的视频列表页
pub fn videos_tab_url(channel_url: &str) -> String {
    let trimmed = channel_url.trim_end_matches('/');
    if trimmed.ends_with("/videos") {
        trimmed.to_string()
    } else {
        format!("{}/videos", trimmed)
    }
}

/// 从 `yt-dlp -J` 的输出解析视频元数据
///
/// 缺少时长或标题属于契约错误；上传者缺失时为 `None`。
pub fn parse_video_metadata(video_id: &str, value: &Value) -> Result<VideoMetadata, EngineError> {
    let uploader_id = value
        .get("uploader_url")
        .and_then(Value::as_str)
        .and_then(|url| url.rsplit('@').next())
        .or_else(|| value.get("uploader_id").and_then(Value::as_str))
        .map(normalize_channel_id)
        .filter(|id| !id.is_empty());

    let duration = value
        .get("duration")
        .and_then(Value::as_f64)
        .ok_or_else(|| EngineError::Parse(format!("missing duration for {}", video_id)))?;

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::Parse(format!("missing title for {}", video_id)))?
        .to_string();

    let upload_date = value
        .get("upload_date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y%m%d").ok());

    Ok(VideoMetadata {
        video_id: video_id.to_string(),
        uploader_id,
        duration,
        title,
        view_count: value.get("view_count").and_then(Value::as_i64),
        like_count: value.get("like_count").and_then(Value::as_i64),
        upload_date,
        caption_tracks: parse_caption_tracks(value),
    })
}

/// 自动生成字幕中提供 json3 格式的语言及其地址
fn parse_caption_tracks(value: &Value) -> BTreeMap<String, String> {
    let Some(captions) = value.get("automatic_captions").and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    captions
        .iter()
        .filter_map(|(language, formats)| {
            formats
                .as_array()?
                .iter()
                .find(|f| f.get("ext").and_then(Value::as_str) == Some("json3"))
                .and_then(|f| f.get("url").and_then(Value::as_str))
                .map(|url| (language.clone(), url.to_string()))
        })
        .collect()
}

/// 解析 `--flat-playlist --print id` 的输出
pub fn parse_video_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl MetadataSource for YtDlpEngine {
    #[instrument(skip(self))]
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, EngineError> {
        let stdout = self
            .run(&["-J", "--skip-download", &video_url(video_id)])
            .await?;
        let value: Value = serde_json::from_str(&stdout)?;
        parse_video_metadata(video_id, &value)
    }
}

#[async_trait]
impl ChannelVideoSource for YtDlpEngine {
    #[instrument(skip(self))]
    async fn list_videos(&self, channel_url: &str) -> Result<Vec<String>, EngineError> {
        let stdout = self
            .run(&["--flat-playlist", "--print", "id", &videos_tab_url(channel_url)])
            .await?;
        Ok(parse_video_ids(&stdout))
    }
}

#[async_trait]
impl MediaDownloader for YtDlpEngine {
    #[instrument(skip(self, dest_dir))]
    async fn download_audio(
        &self,
        video_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, EngineError> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let template = dest_dir.join("%(id)s.%(ext)s");
        let template = template.to_string_lossy();

        self.run(&[
            "-x",
            "--audio-format",
            AUDIO_FORMAT,
            "-o",
            template.as_ref(),
            &video_url(video_id),
        ])
        .await?;

        let path = dest_dir.join(format!("{}.{}", video_id, AUDIO_FORMAT));
        if !tokio::fs::try_exists(&path).await? {
            return Err(EngineError::ProcessFailed(format!(
                "expected audio file {} was not produced",
                path.display()
            )));
        }
        Ok(path)
    }
}
