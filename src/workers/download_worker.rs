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

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::admission::AdmissionConfig;
use crate::domain::models::history::HistoryRecord;
use crate::domain::models::video::WorkItem;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::services::constraint_evaluator::ConstraintEvaluator;
use crate::domain::services::quota_ledger::QuotaLedger;
use crate::engines::traits::{MediaDownloader, MetadataSource, TranscriptSource};
use crate::utils::errors::WorkerError;

/// 音频文件对象键
pub fn audio_key(channel_id: &str, video_id: &str) -> String {
    format!("{}/audio_files/{}.flac", channel_id, video_id)
}

/// 字幕文件对象键
pub fn srt_key(channel_id: &str, video_id: &str) -> String {
    format!("{}/srt_files/{}.srt", channel_id, video_id)
}

/// 单个工作项的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 历史中已有该 (频道, 视频) 的记录，未处理
    AlreadyRecorded,
    /// 频道已无资格，未评估
    Ineligible,
    /// 未通过约束评估
    Rejected { reason: String },
    /// 通过评估并完成下载
    Admitted,
}

/// 下载工作器
///
/// 对一个工作项依次执行：获取元数据、配额检查、约束评估、
/// 下载并上传音频与字幕、写入历史记录。
pub struct DownloadWorker<H, M, T, D>
where
    H: HistoryRepository,
    M: MetadataSource,
    T: TranscriptSource,
    D: MediaDownloader,
{
    history: Arc<H>,
    metadata: Arc<M>,
    ledger: QuotaLedger<H>,
    evaluator: ConstraintEvaluator<T>,
    downloader: Arc<D>,
    storage: Arc<dyn StorageRepository>,
    work_dir: PathBuf,
}

impl<H, M, T, D> DownloadWorker<H, M, T, D>
where
    H: HistoryRepository,
    M: MetadataSource,
    T: TranscriptSource,
    D: MediaDownloader,
{
    /// 创建新的下载工作器实例
    ///
    /// # 参数
    ///
    /// * `history` - 历史记录仓库
    /// * `metadata` - 元数据源
    /// * `transcripts` - 字幕源
    /// * `downloader` - 音频下载器
    /// * `storage` - 数据存储桶
    /// * `work_dir` - 音频下载的本地临时目录
    pub fn new(
        history: Arc<H>,
        metadata: Arc<M>,
        transcripts: Arc<T>,
        downloader: Arc<D>,
        storage: Arc<dyn StorageRepository>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ledger: QuotaLedger::new(history.clone()),
            evaluator: ConstraintEvaluator::new(transcripts),
            history,
            metadata,
            downloader,
            storage,
            work_dir: work_dir.into(),
        }
    }

    /// 处理一个工作项
    ///
    /// 返回错误时不写入历史记录，该工作项在下次运行时会重新生成。
    /// 已有记录的工作项直接跳过，不会重复评估或下载。
    /// 被拒绝的视频写入 `download_status=false` 的记录；
    /// 通过的视频只在音频与字幕都上传成功后才写入记录。
    #[instrument(skip(self, config), fields(channel_id = %item.channel_id, video_id = %item.video_id))]
    pub async fn process(
        &self,
        item: &WorkItem,
        config: &AdmissionConfig,
    ) -> Result<ItemOutcome, WorkerError> {
        if self.history.exists(&item.channel_id, &item.video_id).await? {
            debug!("History record already present, skipping");
            return Ok(ItemOutcome::AlreadyRecorded);
        }

        let metadata = self
            .metadata
            .fetch_metadata(&item.video_id)
            .await
            .map_err(WorkerError::Metadata)?;
        if let Some(uploader) = metadata
            .uploader_id
            .as_deref()
            .filter(|uploader| *uploader != item.channel_id)
        {
            warn!(%uploader, "Uploader does not match the channel being processed");
        }

        if !self
            .ledger
            .check_channel_eligible(&item.channel_id, &item.video_id, config)
            .await?
        {
            return Ok(ItemOutcome::Ineligible);
        }

        let evaluation = self
            .evaluator
            .evaluate(&item.video_id, config, &metadata)
            .await;
        let record = HistoryRecord::evaluated(&item.channel_id, &metadata, &evaluation.verdict);

        if let Some(reason) = evaluation.verdict.reason.clone() {
            self.append_record(&record).await?;
            metrics::counter!("harvestrs_videos_rejected_total").increment(1);
            info!(%reason, "Video rejected");
            return Ok(ItemOutcome::Rejected { reason });
        }

        let audio_path = self
            .downloader
            .download_audio(&item.video_id, &self.work_dir)
            .await
            .map_err(WorkerError::Download)?;
        self.storage
            .upload_file(&audio_path, &audio_key(&item.channel_id, &item.video_id))
            .await?;
        self.storage
            .save(
                &srt_key(&item.channel_id, &item.video_id),
                evaluation.srt_content.as_bytes(),
            )
            .await?;

        self.append_record(&record).await?;
        metrics::counter!("harvestrs_videos_admitted_total").increment(1);
        info!(
            wpm = ?evaluation.verdict.metrics.wpm,
            duration = evaluation.verdict.metrics.duration,
            "Video admitted"
        );
        Ok(ItemOutcome::Admitted)
    }

    async fn append_record(&self, record: &HistoryRecord) -> Result<(), WorkerError> {
        if !self.history.append(record).await? {
            warn!("History record written concurrently by another worker; kept the existing one");
        }
        Ok(())
    }
}
