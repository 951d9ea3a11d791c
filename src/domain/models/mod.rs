// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 准入（admission）：运行输入、准入配置与约束评估结论
/// - 历史记录（history）：每个 (频道, 视频) 的只追加处理结果
/// - 字幕（transcript）：带时间的字幕片段及 SRT 渲染
/// - 视频（video）：视频元数据、工作项与频道来源
pub mod admission;
pub mod history;
pub mod transcript;
pub mod video;
