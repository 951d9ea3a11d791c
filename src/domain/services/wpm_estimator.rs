// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::transcript::TranscriptSegment;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// 最大迭代次数
pub const MAX_ITERATION: usize = 10;
/// 相邻两次估算差值低于该值时视为收敛
pub const EXIT_WPM_DIFF_THRESHOLD: f64 = 1.0;
/// 初始语速先验（每分钟词数）
pub const INITIAL_APPROXIMATE_WPM: f64 = 180.0;
/// 片段内实际说话时间最多为按当前语速推算时间的倍数，其余视为停顿
///
/// 即允许单个片段比当前估算慢 50%。当所有片段的窗口都远大于推算时间（稀疏语音）时，
/// 每次迭代的说话时间都取上限，估算值每轮除以 1.5、不会收敛；
/// 此时结果由 `MAX_ITERATION` 决定，`WpmEstimate::converged` 为 `false`。
const MAX_SPEECH_STRETCH: f64 = 1.5;

static ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// 语速估算结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmEstimate {
    /// 最后一次迭代得到的语速
    pub wpm: f64,
    /// 实际执行的迭代次数
    pub iterations: usize,
    /// 是否在迭代上限内收敛
    pub converged: bool,
}

/// 单次迭代的统计
#[derive(Debug, Clone, Copy, PartialEq)]
struct SpeakStats {
    words: usize,
    speak_seconds: f64,
    wpm: f64,
}

/// 每分钟词数换算为每词秒数
fn seconds_per_word(wpm: f64) -> f64 {
    60.0 / wpm
}

/// 统计片段词数，方括号标注（如 `[Music]`）不计入
fn count_words(text: &str) -> usize {
    ANNOTATION.replace_all(text, " ").split_whitespace().count()
}

/// 在给定每词秒数下估算说话时间与语速
fn speak_time(segments: &[TranscriptSegment], inference_spw: f64) -> SpeakStats {
    let mut words = 0;
    let mut speak_seconds = 0.0;

    for (index, segment) in segments.iter().enumerate() {
        let segment_words = count_words(&segment.text);
        if segment_words == 0 {
            continue;
        }

        // Auto captions overlap; clip each window at the next cue
        let mut window = segment.duration.max(0.0);
        if let Some(next) = segments.get(index + 1) {
            window = window.min((next.start - segment.start).max(0.0));
        }

        let inferred = segment_words as f64 * inference_spw * MAX_SPEECH_STRETCH;
        words += segment_words;
        speak_seconds += window.min(inferred);
    }

    let wpm = if speak_seconds > 0.0 {
        words as f64 / speak_seconds * 60.0
    } else {
        0.0
    };

    SpeakStats {
        words,
        speak_seconds,
        wpm,
    }
}

/// 估算字幕的语速
///
/// 语速与片段中的说话时间互相依赖，因此从先验语速出发做不动点迭代：
/// 用上一次的语速推算每词秒数，重新估算说话时间和语速，
/// 直到相邻两次差值小于阈值或达到迭代上限。未收敛不视为错误。
pub fn estimate_wpm(segments: &[TranscriptSegment]) -> WpmEstimate {
    let mut prev_wpm = INITIAL_APPROXIMATE_WPM;
    let mut inference_spw = seconds_per_word(prev_wpm);
    let mut estimate = WpmEstimate {
        wpm: 0.0,
        iterations: 0,
        converged: false,
    };

    for iteration in 0..MAX_ITERATION {
        let stats = speak_time(segments, inference_spw);
        let diff_wpm = (stats.wpm - prev_wpm).abs();
        debug!(
            iteration,
            words = stats.words,
            speak_seconds = stats.speak_seconds,
            wpm = stats.wpm,
            diff_wpm,
            "wpm iteration"
        );

        estimate.wpm = stats.wpm;
        estimate.iterations = iteration + 1;

        if stats.words == 0 {
            break;
        }
        if diff_wpm < EXIT_WPM_DIFF_THRESHOLD {
            estimate.converged = true;
            break;
        }

        inference_spw = seconds_per_word(stats.wpm);
        prev_wpm = stats.wpm;
    }

    estimate
}
