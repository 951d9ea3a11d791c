// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排一次完整的采集运行
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 元数据、字幕、频道枚举与音频下载的外部适配器
pub mod engines;

/// 基础设施模块
///
/// 提供数据库、对象存储与指标等外部服务集成
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型与日志初始化
pub mod utils;

/// 工作器模块
///
/// 单个工作项的处理与批量执行
pub mod workers;
