// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video::ChannelSource;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 准入配置
///
/// 每次运行从输入对象的 `configuration` 字段读取，键名与输入文件保持一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AdmissionConfig {
    /// 每个频道最多成功下载的小时数
    #[serde(rename = "max_download_H_per_channel")]
    #[validate(range(min = 0.0))]
    pub max_download_hours_per_channel: f64,
    /// 每个频道最多成功下载的视频数
    pub max_downloaded_videos_per_channel: u64,
    /// 最低下载成功率
    #[serde(alias = "min_successful_download_ration")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_successful_download_ratio: f64,
    /// 字幕语言代码
    #[validate(length(min = 1))]
    pub captions_language: String,
    /// 最低语速（每分钟词数）
    pub min_wpm: u32,
    /// 音频时长下限（分钟）
    #[serde(rename = "min_audio_duration_M")]
    #[validate(range(min = 0.0))]
    pub min_audio_duration_minutes: f64,
    /// 音频时长上限（分钟）
    #[serde(rename = "max_audio_duration_M")]
    #[validate(range(min = 0.0))]
    pub max_audio_duration_minutes: f64,
}

/// 运行输入
///
/// 存放在输入存储桶中的 JSON 对象。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunInput {
    pub channels: Vec<ChannelSource>,
    #[validate(nested)]
    pub configuration: AdmissionConfig,
}

/// 评估指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictMetrics {
    /// 语速；没有字幕时未知
    pub wpm: Option<u32>,
    /// 视频时长（秒）
    pub duration: f64,
}

/// 约束评估结论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintVerdict {
    pub passed: bool,
    /// 所有失败原因以 " - " 连接；通过时为空
    pub reason: Option<String>,
    pub metrics: VerdictMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_json() -> serde_json::Value {
        serde_json::json!({
            "channels": [["@chan", "https://www.youtube.com/@chan"]],
            "configuration": {
                "max_download_H_per_channel": 10,
                "max_downloaded_videos_per_channel": 100,
                "min_successful_download_ration": 0.5,
                "captions_language": "en",
                "min_wpm": 120,
                "min_audio_duration_M": 1,
                "max_audio_duration_M": 180
            }
        })
    }

    #[test]
    fn test_run_input_accepts_legacy_ratio_key() {
        let input: RunInput = serde_json::from_value(input_json()).unwrap();

        assert_eq!(input.channels[0].channel_id, "chan");
        assert_eq!(input.configuration.min_successful_download_ratio, 0.5);
        assert_eq!(input.configuration.max_download_hours_per_channel, 10.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_invalid_ratio_is_rejected() {
        let mut value = input_json();
        value["configuration"]["min_successful_download_ration"] = serde_json::json!(1.5);
        let input: RunInput = serde_json::from_value(value).unwrap();

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_missing_field_is_a_parse_error() {
        let mut value = input_json();
        value["configuration"]
            .as_object_mut()
            .unwrap()
            .remove("min_wpm");

        assert!(serde_json::from_value::<RunInput>(value).is_err());
    }
}
