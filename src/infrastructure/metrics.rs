// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 指标导出器
///
/// 地址无效或端口被占用只记录警告，不影响流水线运行。
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    metrics::describe_counter!(
        "harvestrs_videos_admitted_total",
        "Videos that passed every constraint and were downloaded"
    );
    metrics::describe_counter!(
        "harvestrs_videos_rejected_total",
        "Videos rejected by the constraint evaluator"
    );
    metrics::describe_counter!(
        "harvestrs_channels_deactivated_total",
        "Channel deactivation records written by the quota ledger"
    );
    metrics::describe_counter!(
        "harvestrs_items_failed_total",
        "Work items that failed with a collaborator error"
    );
    metrics::describe_histogram!("harvestrs_video_wpm", "Estimated words per minute");

    info!("Metrics exporter listening on {}", addr);
}
