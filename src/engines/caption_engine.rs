// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::transcript::TranscriptSegment;
use crate::domain::models::video::VideoMetadata;
use crate::engines::traits::{EngineError, TranscriptError, TranscriptSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; harvestrs/0.1)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// 解析 json3 字幕文档
///
/// 只含换行的追加事件与空事件被丢弃，片段内换行折叠为空格。
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>, EngineError> {
    let document: Json3Document = serde_json::from_str(body)?;

    Ok(document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment::new(
                event.start_ms as f64 / 1000.0,
                event.duration_ms as f64 / 1000.0,
                text,
            ))
        })
        .collect())
}

/// 自动字幕引擎
///
/// 从元数据中的字幕轨道下载 json3 格式的字幕。
pub struct CaptionEngine {
    client: reqwest::Client,
}

impl CaptionEngine {
    pub fn new(proxy: Option<&str>) -> Result<Self, EngineError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<TranscriptSegment>, EngineError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_json3(&body)
    }
}

#[async_trait]
impl TranscriptSource for CaptionEngine {
    #[instrument(skip(self, metadata), fields(video_id = %metadata.video_id))]
    async fn fetch_transcript(
        &self,
        metadata: &VideoMetadata,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        if metadata.caption_tracks.is_empty() {
            return Err(TranscriptError::Unavailable);
        }
        let url = metadata
            .caption_tracks
            .get(language)
            .ok_or(TranscriptError::LanguageNotFound)?;

        let segments = self.download(url).await?;
        debug!(segments = segments.len(), "Transcript downloaded");
        Ok(segments)
    }
}
