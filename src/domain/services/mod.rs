// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含准入控制的核心业务规则：
/// - 配额账本（quota_ledger）：根据历史记录判断频道是否仍有资格
/// - 语速估算（wpm_estimator）：从字幕片段估算每分钟词数
/// - 约束评估（constraint_evaluator）：字幕、语速、时长三项检查
/// - 任务生成（task_generator）：枚举频道视频并按历史去重
/// - 报告汇总（report_aggregator）：按频道输出成功与失败报告
pub mod constraint_evaluator;
#[cfg(test)]
mod constraint_evaluator_test;
pub mod quota_ledger;
pub mod report_aggregator;
pub mod task_generator;
pub mod wpm_estimator;
