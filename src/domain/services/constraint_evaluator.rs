// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::admission::{AdmissionConfig, ConstraintVerdict, VerdictMetrics};
use crate::domain::models::transcript::{to_srt, TranscriptSegment};
use crate::domain::models::video::VideoMetadata;
use crate::domain::services::wpm_estimator::estimate_wpm;
use crate::engines::traits::{TranscriptError, TranscriptSource};
use std::sync::Arc;
use tracing::{debug, instrument};

const REASON_SEPARATOR: &str = " - ";

/// 语速检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WpmCheck {
    Passed(u32),
    Low(u32),
    /// 没有字幕，无法计算
    Unknown,
}

impl WpmCheck {
    pub fn wpm(&self) -> Option<u32> {
        match self {
            WpmCheck::Passed(wpm) | WpmCheck::Low(wpm) => Some(*wpm),
            WpmCheck::Unknown => None,
        }
    }
}

/// 一次评估的完整输出
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub verdict: ConstraintVerdict,
    /// 获取到的字幕片段
    pub transcript: Option<Vec<TranscriptSegment>>,
    /// SRT 格式字幕，没有字幕时为空
    pub srt_content: String,
}

/// 语速检查，估算值截断为整数后与下限比较
pub fn check_wpm(segments: Option<&[TranscriptSegment]>, min_wpm: u32) -> WpmCheck {
    match segments {
        Some(segments) => {
            let wpm = estimate_wpm(segments).wpm.max(0.0) as u32;
            if wpm < min_wpm {
                WpmCheck::Low(wpm)
            } else {
                WpmCheck::Passed(wpm)
            }
        }
        None => WpmCheck::Unknown,
    }
}

/// 时长检查，返回是否通过
///
/// 仅当时长（分钟）同时大于下限和上限时失败，失败原因记为 "Too short"。
/// 该判定与线上历史数据保持一致，修改前需确认产品意图。
pub fn check_duration(duration_seconds: f64, config: &AdmissionConfig) -> bool {
    let minutes = duration_seconds / 60.0;
    !(minutes > config.min_audio_duration_minutes && minutes > config.max_audio_duration_minutes)
}

/// 按字幕、语速、时长的顺序拼接失败原因；全部通过时返回 None
pub fn failure_reason(
    transcript_error: Option<&TranscriptError>,
    wpm: WpmCheck,
    duration_passed: bool,
) -> Option<String> {
    let mut reasons: Vec<String> = Vec::new();

    if let Some(err) = transcript_error {
        reasons.push(err.to_string());
    }
    match wpm {
        WpmCheck::Low(_) => reasons.push("Low WPM".to_string()),
        WpmCheck::Unknown => reasons.push("Unknown WPM".to_string()),
        WpmCheck::Passed(_) => {}
    }
    if !duration_passed {
        reasons.push("Too short".to_string());
    }

    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join(REASON_SEPARATOR))
    }
}

/// 约束评估器
///
/// 所有子检查都会执行，不短路，以便原因字符串汇总全部失败项。
pub struct ConstraintEvaluator<T: TranscriptSource> {
    transcripts: Arc<T>,
}

impl<T: TranscriptSource> ConstraintEvaluator<T> {
    pub fn new(transcripts: Arc<T>) -> Self {
        Self { transcripts }
    }

    /// 评估视频是否满足准入约束
    ///
    /// 字幕获取失败被记录为原因而不是错误返回。
    #[instrument(skip(self, config, metadata))]
    pub async fn evaluate(
        &self,
        video_id: &str,
        config: &AdmissionConfig,
        metadata: &VideoMetadata,
    ) -> Evaluation {
        let transcript = self
            .transcripts
            .fetch_transcript(metadata, &config.captions_language)
            .await;

        let (segments, transcript_error) = match transcript {
            Ok(segments) => (Some(segments), None),
            Err(err) => {
                debug!(error = %err, "Transcript not obtained");
                (None, Some(err))
            }
        };

        let wpm = check_wpm(segments.as_deref(), config.min_wpm);
        if let Some(value) = wpm.wpm() {
            metrics::histogram!("harvestrs_video_wpm").record(value as f64);
        }
        let duration_passed = check_duration(metadata.duration, config);

        let reason = failure_reason(transcript_error.as_ref(), wpm, duration_passed);
        let srt_content = segments.as_deref().map(to_srt).unwrap_or_default();

        Evaluation {
            verdict: ConstraintVerdict {
                passed: reason.is_none(),
                reason,
                metrics: VerdictMetrics {
                    wpm: wpm.wpm(),
                    duration: metadata.duration,
                },
            },
            transcript: segments,
            srt_content,
        }
    }
}
