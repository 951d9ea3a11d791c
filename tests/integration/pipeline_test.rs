// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    admission_config, create_test_history, steady_transcript, FakeVideo, FakeVideoPlatform,
};
use harvestrs::application::usecases::run_acquisition::{
    RunAcquisitionUseCase, RunError, RunOptions,
};
use harvestrs::domain::models::history::ChannelStatus;
use harvestrs::domain::models::transcript::TranscriptSegment;
use harvestrs::domain::repositories::history_repository::HistoryRepository;
use harvestrs::domain::repositories::storage_repository::StorageRepository;
use harvestrs::engines::traits::TranscriptError;
use harvestrs::infrastructure::repositories::history_repo_impl::HistoryRepositoryImpl;
use harvestrs::infrastructure::storage::InMemoryStorage;
use harvestrs::workers::download_worker::DownloadWorker;
use std::sync::Arc;

const INPUT_KEY: &str = "input.json";

struct TestRun {
    use_case: RunAcquisitionUseCase<
        HistoryRepositoryImpl,
        FakeVideoPlatform,
        FakeVideoPlatform,
        FakeVideoPlatform,
        FakeVideoPlatform,
    >,
    history: Arc<HistoryRepositoryImpl>,
    data: InMemoryStorage,
    reports: InMemoryStorage,
    _work_dir: tempfile::TempDir,
}

async fn create_test_run(
    platform: FakeVideoPlatform,
    input: serde_json::Value,
    concurrency: usize,
) -> TestRun {
    let history = create_test_history().await;
    let platform = Arc::new(platform);
    let inputs = InMemoryStorage::new();
    let data = InMemoryStorage::new();
    let reports = InMemoryStorage::new();
    let work_dir = tempfile::tempdir().unwrap();

    inputs
        .save(INPUT_KEY, &serde_json::to_vec(&input).unwrap())
        .await
        .unwrap();

    let worker = Arc::new(DownloadWorker::new(
        history.clone(),
        platform.clone(),
        platform.clone(),
        platform.clone(),
        Arc::new(data.clone()),
        work_dir.path(),
    ));
    let use_case = RunAcquisitionUseCase::new(
        history.clone(),
        platform,
        worker,
        Arc::new(inputs),
        Arc::new(reports.clone()),
        RunOptions {
            input_key: INPUT_KEY.to_string(),
            shuffle: false,
            concurrency,
        },
    );

    TestRun {
        use_case,
        history,
        data,
        reports,
        _work_dir: work_dir,
    }
}

fn run_input(channels: &[&str], configuration: serde_json::Value) -> serde_json::Value {
    let channels: Vec<(String, String)> = channels
        .iter()
        .map(|c| (format!("@{}", c), FakeVideoPlatform::channel_url(c)))
        .collect();
    serde_json::json!({
        "channels": channels,
        "configuration": configuration,
    })
}

fn configuration_json() -> serde_json::Value {
    serde_json::to_value(admission_config()).unwrap()
}

fn video(duration: f64, transcript: Result<Vec<TranscriptSegment>, TranscriptError>) -> FakeVideo {
    FakeVideo {
        duration,
        transcript,
    }
}

async fn report(storage: &InMemoryStorage, key: &str) -> String {
    String::from_utf8(storage.get(key).await.unwrap().expect("report missing")).unwrap()
}

/// 测试完整运行：接收、拒绝与失败各自的结果
#[tokio::test]
async fn test_run_records_every_outcome() {
    let platform = FakeVideoPlatform::new()
        .with_channel(
            "alpha",
            vec![
                ("a1", video(600.0, Ok(steady_transcript(11)))),
                ("a2", video(600.0, Ok(steady_transcript(6)))),
                ("a3", video(600.0, Err(TranscriptError::Unavailable))),
            ],
        )
        .with_channel("beta", vec![("b1", video(900.0, Ok(steady_transcript(12))))])
        .with_broken_download("b1");
    let run = create_test_run(
        platform,
        run_input(&["alpha", "beta"], configuration_json()),
        2,
    )
    .await;

    let summary = run.use_case.execute().await.unwrap();

    assert_eq!(summary.admitted, 1);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.ineligible, 0);
    assert_eq!(summary.failed, 1);

    assert_eq!(
        run.data.keys().await,
        vec!["alpha/audio_files/a1.flac", "alpha/srt_files/a1.srt"]
    );

    // The failed item leaves no history, so beta has no reports
    assert!(!run.history.exists("beta", "b1").await.unwrap());
    assert_eq!(
        run.reports.keys().await,
        vec![
            "alpha/successfully_downloaded.csv",
            "alpha/unsuccessfully_downloaded.csv",
        ]
    );
    assert_eq!(
        report(&run.reports, "alpha/successfully_downloaded.csv").await,
        "video_id,video_title,video_duration,video_view_count,video_like_count\n\
         a1,Title a1,600.0,100,7\n"
    );
    assert_eq!(
        report(&run.reports, "alpha/unsuccessfully_downloaded.csv").await,
        "video_id,reason\na2,Low WPM\na3,Captions unavailable - Unknown WPM\n"
    );
}

/// 测试跨运行去重：已有记录的视频不再处理，失败的视频会重试
#[tokio::test]
async fn test_second_run_only_retries_unrecorded_items() {
    let platform = FakeVideoPlatform::new()
        .with_channel(
            "alpha",
            vec![
                ("a1", video(600.0, Ok(steady_transcript(11)))),
                ("a2", video(600.0, Ok(steady_transcript(6)))),
                ("a3", video(600.0, Ok(steady_transcript(10)))),
            ],
        )
        .with_broken_download("a3");
    let run = create_test_run(platform, run_input(&["alpha"], configuration_json()), 1).await;

    let first = run.use_case.execute().await.unwrap();
    assert_eq!(first.total(), 3);
    assert_eq!(first.failed, 1);

    let second = run.use_case.execute().await.unwrap();
    assert_eq!(second.total(), 1);
    assert_eq!(second.failed, 1);
    assert_eq!(run.history.scan_all().await.unwrap().len(), 2);
}

/// 测试配额：超过时长后频道被停用，只写入一条停用记录
#[tokio::test]
async fn test_hours_quota_deactivates_channel() {
    let platform = FakeVideoPlatform::new().with_channel(
        "alpha",
        ["v1", "v2", "v3", "v4"]
            .into_iter()
            .map(|id| (id, video(600.0, Ok(steady_transcript(11)))))
            .collect(),
    );
    let mut configuration = configuration_json();
    configuration["max_download_H_per_channel"] = serde_json::json!(0.1);
    let run = create_test_run(platform, run_input(&["alpha"], configuration), 1).await;

    let summary = run.use_case.execute().await.unwrap();

    assert_eq!(summary.admitted, 1);
    assert_eq!(summary.ineligible, 3);

    let records = run.history.scan_all().await.unwrap();
    let inactive: Vec<_> = records
        .iter()
        .filter(|r| r.channel_status == ChannelStatus::Inactive)
        .collect();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].video_id, "v2");
    assert_eq!(
        inactive[0].reason.as_deref(),
        Some("Max hours per channel exceeded")
    );
    assert!(report(&run.reports, "alpha/unsuccessfully_downloaded.csv")
        .await
        .contains("v2,Max hours per channel exceeded"));
}

/// 测试运行输入校验
#[tokio::test]
async fn test_invalid_input_aborts_before_processing() {
    let mut configuration = configuration_json();
    configuration["min_successful_download_ratio"] = serde_json::json!(2.0);
    let run = create_test_run(
        FakeVideoPlatform::new().with_channel("alpha", vec![]),
        run_input(&["alpha"], configuration),
        1,
    )
    .await;

    let err = run.use_case.execute().await.unwrap_err();

    assert!(matches!(err, RunError::InvalidInput(_)));
    assert!(run.reports.keys().await.is_empty());
}

/// 测试未知频道导致整批失败
#[tokio::test]
async fn test_unknown_channel_fails_task_generation() {
    let run = create_test_run(
        FakeVideoPlatform::new(),
        run_input(&["missing"], configuration_json()),
        1,
    )
    .await;

    let err = run.use_case.execute().await.unwrap_err();

    assert!(matches!(err, RunError::Tasks(_)));
}
