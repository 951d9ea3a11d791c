// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 历史记录仓库（history_repository）：只追加的处理结果存储
/// - 存储仓库（storage_repository）：对象存储（输入、数据与报告）
pub mod history_repository;
pub mod storage_repository;
