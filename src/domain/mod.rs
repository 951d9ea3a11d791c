// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含准入控制的核心业务逻辑，包括：
/// - 领域模型（models）：历史记录、视频元数据、准入配置等
/// - 仓库接口（repositories）：历史存储与对象存储的抽象接口
/// - 服务（services）：配额、语速、约束、任务生成与报告
///
/// 领域层不依赖任何具体的外部实现。
pub mod models;
pub mod repositories;
pub mod services;
