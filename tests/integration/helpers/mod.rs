// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use harvestrs::config::settings::DatabaseSettings;
use harvestrs::domain::models::admission::AdmissionConfig;
use harvestrs::domain::models::history::{ChannelStatus, HistoryRecord};
use harvestrs::domain::models::transcript::TranscriptSegment;
use harvestrs::domain::models::video::VideoMetadata;
use harvestrs::engines::traits::{
    ChannelVideoSource, EngineError, MediaDownloader, MetadataSource, TranscriptError,
    TranscriptSource,
};
use harvestrs::infrastructure::database::connection;
use harvestrs::infrastructure::repositories::history_repo_impl::HistoryRepositoryImpl;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 创建已应用迁移的 SQLite 内存数据库
pub async fn create_test_history() -> Arc<HistoryRepositoryImpl> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
        log_statements: false,
    };
    let db = connection::connect_and_migrate(&settings)
        .await
        .expect("Failed to set up test database");
    Arc::new(HistoryRepositoryImpl::new(Arc::new(db)))
}

pub fn admission_config() -> AdmissionConfig {
    AdmissionConfig {
        max_download_hours_per_channel: 10.0,
        max_downloaded_videos_per_channel: 100,
        min_successful_download_ratio: 0.5,
        captions_language: "en".to_string(),
        min_wpm: 120,
        min_audio_duration_minutes: 1.0,
        max_audio_duration_minutes: 180.0,
    }
}

pub fn evaluated_record(channel_id: &str, video_id: &str, downloaded: bool) -> HistoryRecord {
    HistoryRecord {
        channel_id: channel_id.to_string(),
        video_id: video_id.to_string(),
        download_status: downloaded,
        channel_status: ChannelStatus::Active,
        video_duration: Some(754.5),
        video_wpm: Some(163),
        video_title: Some(format!("Episode {}", video_id)),
        video_view_count: Some(48_213),
        video_like_count: Some(1_904),
        video_upload_date: NaiveDate::from_ymd_opt(2024, 3, 9),
        reason: (!downloaded).then(|| "Low WPM".to_string()),
        update_time: Utc::now().into(),
    }
}

/// 按每段词数生成 60 秒的连续字幕；每段 4 秒，因此语速为 words_per_cue * 15
pub fn steady_transcript(words_per_cue: usize) -> Vec<TranscriptSegment> {
    let text = vec!["word"; words_per_cue].join(" ");
    (0..15)
        .map(|i| TranscriptSegment::new(i as f64 * 4.0, 4.0, text.clone()))
        .collect()
}

pub struct FakeVideo {
    pub duration: f64,
    pub transcript: Result<Vec<TranscriptSegment>, TranscriptError>,
}

/// 视频平台的内存替身
///
/// 同时充当元数据源、字幕源、频道枚举源与音频下载器。
#[derive(Default)]
pub struct FakeVideoPlatform {
    channels: HashMap<String, Vec<String>>,
    videos: HashMap<String, FakeVideo>,
    broken_downloads: HashSet<String>,
}

impl FakeVideoPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_url(channel_id: &str) -> String {
        format!("https://www.youtube.com/@{}", channel_id)
    }

    pub fn with_channel(mut self, channel_id: &str, videos: Vec<(&str, FakeVideo)>) -> Self {
        let ids = videos.iter().map(|(id, _)| id.to_string()).collect();
        self.channels.insert(Self::channel_url(channel_id), ids);
        for (id, video) in videos {
            self.videos.insert(id.to_string(), video);
        }
        self
    }

    pub fn with_broken_download(mut self, video_id: &str) -> Self {
        self.broken_downloads.insert(video_id.to_string());
        self
    }
}

#[async_trait]
impl MetadataSource for FakeVideoPlatform {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, EngineError> {
        let video = self
            .videos
            .get(video_id)
            .ok_or_else(|| EngineError::NotFound(video_id.to_string()))?;
        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            uploader_id: Some("uploader".to_string()),
            duration: video.duration,
            title: format!("Title {}", video_id),
            view_count: Some(100),
            like_count: Some(7),
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            caption_tracks: BTreeMap::new(),
        })
    }
}

#[async_trait]
impl TranscriptSource for FakeVideoPlatform {
    async fn fetch_transcript(
        &self,
        metadata: &VideoMetadata,
        _language: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.videos
            .get(&metadata.video_id)
            .map(|v| v.transcript.clone())
            .unwrap_or(Err(TranscriptError::Unavailable))
    }
}

#[async_trait]
impl ChannelVideoSource for FakeVideoPlatform {
    async fn list_videos(&self, channel_url: &str) -> Result<Vec<String>, EngineError> {
        self.channels
            .get(channel_url)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(channel_url.to_string()))
    }
}

#[async_trait]
impl MediaDownloader for FakeVideoPlatform {
    async fn download_audio(&self, video_id: &str, dest_dir: &Path) -> Result<PathBuf, EngineError> {
        if self.broken_downloads.contains(video_id) {
            return Err(EngineError::ProcessFailed(format!(
                "ERROR: [youtube] {}: HTTP Error 403",
                video_id
            )));
        }
        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(format!("{}.flac", video_id));
        tokio::fs::write(&path, format!("audio of {}", video_id)).await?;
        Ok(path)
    }
}
