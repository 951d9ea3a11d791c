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

use harvestrs::application::usecases::run_acquisition::{RunAcquisitionUseCase, RunOptions};
use harvestrs::config::settings::Settings;
use harvestrs::engines::caption_engine::CaptionEngine;
use harvestrs::engines::ytdlp_engine::YtDlpEngine;
use harvestrs::infrastructure::database::connection;
use harvestrs::infrastructure::repositories::history_repo_impl::HistoryRepositoryImpl;
use harvestrs::infrastructure::storage::create_storage_repository;
use harvestrs::workers::download_worker::DownloadWorker;
use std::sync::Arc;
use tracing::info;

use harvestrs::utils::telemetry;

/// 主函数
///
/// 初始化各组件，执行一次采集运行后退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting harvestrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        harvestrs::infrastructure::metrics::init_metrics(&settings.metrics.listen_addr);
    }

    // 3. Connect to database and apply migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    let history = Arc::new(HistoryRepositoryImpl::new(db));
    info!("History store ready");

    // 4. Initialize storage, one per bucket
    let input_storage =
        create_storage_repository(&settings.storage, &settings.storage.input_bucket).await?;
    let data_storage =
        create_storage_repository(&settings.storage, &settings.storage.data_bucket).await?;
    let report_storage =
        create_storage_repository(&settings.storage, &settings.storage.reports_bucket).await?;

    // 5. Initialize engines
    let pipeline = &settings.pipeline;
    let ytdlp = Arc::new(YtDlpEngine::new(
        pipeline.ytdlp_path.clone(),
        pipeline.proxy.clone(),
    ));
    let captions = Arc::new(CaptionEngine::new(pipeline.proxy.as_deref())?);

    let worker = Arc::new(DownloadWorker::new(
        history.clone(),
        ytdlp.clone(),
        captions,
        ytdlp.clone(),
        data_storage,
        pipeline.work_dir.clone(),
    ));

    // 6. Run
    let use_case = RunAcquisitionUseCase::new(
        history,
        ytdlp,
        worker,
        input_storage,
        report_storage,
        RunOptions {
            input_key: pipeline.input_key.clone(),
            shuffle: pipeline.shuffle,
            concurrency: pipeline.concurrency,
        },
    );
    let summary = use_case.execute().await?;

    info!(
        admitted = summary.admitted,
        rejected = summary.rejected,
        ineligible = summary.ineligible,
        already_recorded = summary.already_recorded,
        failed = summary.failed,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "Run finished"
    );
    Ok(())
}
