// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的具体实现：
/// - 基于SeaORM的历史记录仓库
/// - 进程内存中的历史记录仓库（测试使用）
pub mod history_repo_impl;
pub mod memory_history_repo;
