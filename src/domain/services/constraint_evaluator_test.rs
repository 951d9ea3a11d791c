// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::admission::AdmissionConfig;
    use crate::domain::models::transcript::TranscriptSegment;
    use crate::domain::models::video::VideoMetadata;
    use crate::domain::services::constraint_evaluator::{
        check_duration, check_wpm, failure_reason, ConstraintEvaluator, WpmCheck,
    };
    use crate::engines::traits::{TranscriptError, TranscriptSource};
    use async_trait::async_trait;
    use mockall::mock;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    // --- Mocks ---

    mock! {
        pub Transcripts {}
        #[async_trait]
        impl TranscriptSource for Transcripts {
            async fn fetch_transcript(
                &self,
                metadata: &VideoMetadata,
                language: &str,
            ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
        }
    }

    fn config(min_wpm: u32) -> AdmissionConfig {
        AdmissionConfig {
            max_download_hours_per_channel: 10.0,
            max_downloaded_videos_per_channel: 100,
            min_successful_download_ratio: 0.5,
            captions_language: "en".to_string(),
            min_wpm,
            min_audio_duration_minutes: 1.0,
            max_audio_duration_minutes: 180.0,
        }
    }

    fn metadata(duration: f64) -> VideoMetadata {
        VideoMetadata {
            video_id: "vid".to_string(),
            uploader_id: Some("chan".to_string()),
            duration,
            title: "A talk".to_string(),
            view_count: Some(100),
            like_count: Some(5),
            upload_date: None,
            caption_tracks: BTreeMap::new(),
        }
    }

    /// 连续的 4 秒片段，每段 10 个词，即 150 词/分钟
    fn steady_segments() -> Vec<TranscriptSegment> {
        (0..15)
            .map(|i| {
                TranscriptSegment::new(
                    i as f64 * 4.0,
                    4.0,
                    "one two three four five six seven eight nine ten",
                )
            })
            .collect()
    }

    fn evaluator_with(
        result: Result<Vec<TranscriptSegment>, TranscriptError>,
    ) -> ConstraintEvaluator<MockTranscripts> {
        let mut transcripts = MockTranscripts::new();
        transcripts
            .expect_fetch_transcript()
            .withf(|metadata, language| metadata.video_id == "vid" && language == "en")
            .times(1)
            .returning(move |_, _| result.clone());
        ConstraintEvaluator::new(Arc::new(transcripts))
    }

    // --- Evaluation ---

    #[tokio::test]
    async fn test_low_wpm_is_rejected() {
        let evaluator = evaluator_with(Ok(steady_segments()));

        let evaluation = evaluator.evaluate("vid", &config(160), &metadata(600.0)).await;

        assert!(!evaluation.verdict.passed);
        assert_eq!(evaluation.verdict.reason.as_deref(), Some("Low WPM"));
        assert_eq!(evaluation.verdict.metrics.wpm, Some(150));
        assert_eq!(evaluation.verdict.metrics.duration, 600.0);
    }

    #[tokio::test]
    async fn test_passing_video_carries_srt() {
        let evaluator = evaluator_with(Ok(steady_segments()));

        let evaluation = evaluator.evaluate("vid", &config(120), &metadata(600.0)).await;

        assert!(evaluation.verdict.passed);
        assert!(evaluation.verdict.reason.is_none());
        assert_eq!(evaluation.transcript.as_ref().map(Vec::len), Some(15));
        assert!(evaluation
            .srt_content
            .starts_with("1\n00:00:00,000 --> 00:00:04,000\none two"));
    }

    #[tokio::test]
    async fn test_missing_captions_reason() {
        let evaluator = evaluator_with(Err(TranscriptError::Unavailable));

        let evaluation = evaluator.evaluate("vid", &config(120), &metadata(600.0)).await;

        assert!(!evaluation.verdict.passed);
        assert_eq!(
            evaluation.verdict.reason.as_deref(),
            Some("Captions unavailable - Unknown WPM")
        );
        assert_eq!(evaluation.verdict.metrics.wpm, None);
        assert!(evaluation.transcript.is_none());
        assert!(evaluation.srt_content.is_empty());
    }

    #[tokio::test]
    async fn test_every_failure_is_reported_in_order() {
        let evaluator = evaluator_with(Err(TranscriptError::LanguageNotFound));

        // 200 minutes exceeds both duration bounds
        let evaluation = evaluator
            .evaluate("vid", &config(120), &metadata(200.0 * 60.0))
            .await;

        assert_eq!(
            evaluation.verdict.reason.as_deref(),
            Some("Selected caption language not available - Unknown WPM - Too short")
        );
    }

    // --- Sub-checks ---

    #[test]
    fn test_check_wpm_boundaries() {
        let segments = steady_segments();

        assert_eq!(check_wpm(Some(segments.as_slice()), 150), WpmCheck::Passed(150));
        assert_eq!(check_wpm(Some(segments.as_slice()), 151), WpmCheck::Low(150));
        assert_eq!(check_wpm(None, 0), WpmCheck::Unknown);
    }

    #[test]
    fn test_check_duration_predicate() {
        let config = config(120);

        assert!(check_duration(10.0 * 60.0, &config));
        assert!(check_duration(0.5 * 60.0, &config));
        assert!(!check_duration(181.0 * 60.0, &config));
    }

    #[test]
    fn test_failure_reason_is_stable() {
        let err = TranscriptError::Fetch("HTTP 429".to_string());

        let first = failure_reason(Some(&err), WpmCheck::Unknown, false);
        let second = failure_reason(Some(&err), WpmCheck::Unknown, false);

        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("HTTP 429 - Unknown WPM - Too short"));
        assert_eq!(failure_reason(None, WpmCheck::Passed(200), true), None);
    }
}
