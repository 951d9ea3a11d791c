// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{create_test_history, evaluated_record};
use harvestrs::domain::models::history::{ChannelOutcome, ChannelStatus, HistoryRecord};
use harvestrs::domain::repositories::history_repository::{HistoryCursor, HistoryRepository};

/// 测试追加与按键查询
///
/// 主键冲突时不覆盖已有记录。
#[tokio::test]
async fn test_append_is_idempotent_per_key() {
    let repo = create_test_history().await;
    let record = evaluated_record("chan", "vid", true);

    assert!(repo.append(&record).await.unwrap());
    assert!(repo.exists("chan", "vid").await.unwrap());
    assert!(!repo.exists("chan", "other").await.unwrap());
    assert!(!repo.exists("other", "vid").await.unwrap());

    let conflicting = HistoryRecord::deactivation("chan", "vid", "Max hours per channel exceeded");
    assert!(!repo.append(&conflicting).await.unwrap());

    let stored = repo.scan_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].channel_status, ChannelStatus::Active);
    assert!(stored[0].download_status);
}

/// 测试字段持久化
#[tokio::test]
async fn test_record_fields_survive_storage() {
    let repo = create_test_history().await;
    let record = evaluated_record("chan", "vid", false);
    repo.append(&record).await.unwrap();

    let stored = repo.scan_all().await.unwrap().remove(0);

    assert_eq!(stored.video_duration, record.video_duration);
    assert_eq!(stored.video_wpm, record.video_wpm);
    assert_eq!(stored.video_title, record.video_title);
    assert_eq!(stored.video_view_count, record.video_view_count);
    assert_eq!(stored.video_like_count, record.video_like_count);
    assert_eq!(stored.video_upload_date, record.video_upload_date);
    assert_eq!(stored.reason.as_deref(), Some("Low WPM"));
}

/// 测试按频道状态查询与投影
#[tokio::test]
async fn test_channel_queries_filter_by_status() {
    let repo = create_test_history().await;
    repo.append(&evaluated_record("chan", "v1", true))
        .await
        .unwrap();
    repo.append(&evaluated_record("chan", "v2", false))
        .await
        .unwrap();
    repo.append(&evaluated_record("elsewhere", "v3", true))
        .await
        .unwrap();

    assert!(!repo
        .has_channel_status("chan", ChannelStatus::Inactive)
        .await
        .unwrap());

    let mut outcomes = repo
        .channel_outcomes("chan", ChannelStatus::Active)
        .await
        .unwrap();
    outcomes.sort_by_key(|o| !o.download_status);
    assert_eq!(
        outcomes,
        vec![
            ChannelOutcome {
                download_status: true,
                video_duration: Some(754.5),
            },
            ChannelOutcome {
                download_status: false,
                video_duration: Some(754.5),
            },
        ]
    );

    repo.append(&HistoryRecord::deactivation(
        "chan",
        "v4",
        "Minimum success rate not achieved",
    ))
    .await
    .unwrap();

    assert!(repo
        .has_channel_status("chan", ChannelStatus::Inactive)
        .await
        .unwrap());
    assert!(!repo
        .has_channel_status("elsewhere", ChannelStatus::Inactive)
        .await
        .unwrap());
    assert_eq!(
        repo.channel_outcomes("chan", ChannelStatus::Inactive)
            .await
            .unwrap()
            .len(),
        1
    );
}

/// 测试游标分页扫描
///
/// 调用方循环直到没有游标；每页按 (频道, 视频) 排序且不重复。
#[tokio::test]
async fn test_scan_pages_until_cursor_is_exhausted() {
    let repo = create_test_history().await;
    for channel in ["b", "a"] {
        for i in 0..4 {
            repo.append(&evaluated_record(channel, &format!("v{}", i), i % 2 == 0))
                .await
                .unwrap();
        }
    }

    let mut cursor: Option<HistoryCursor> = None;
    let mut page_sizes = Vec::new();
    let mut keys = Vec::new();
    loop {
        let page = repo.scan_page(cursor.clone(), 3).await.unwrap();
        page_sizes.push(page.records.len());
        keys.extend(
            page.records
                .iter()
                .map(|r| format!("{}/{}", r.channel_id, r.video_id)),
        );
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(page_sizes, vec![3, 3, 2]);
    assert_eq!(
        keys,
        vec!["a/v0", "a/v1", "a/v2", "a/v3", "b/v0", "b/v1", "b/v2", "b/v3"]
    );
    assert_eq!(repo.scan_all().await.unwrap().len(), 8);
}

/// 测试空历史
#[tokio::test]
async fn test_empty_history_scan() {
    let repo = create_test_history().await;

    let page = repo.scan_page(None, 10).await.unwrap();

    assert!(page.records.is_empty());
    assert!(page.next_cursor.is_none());
}
