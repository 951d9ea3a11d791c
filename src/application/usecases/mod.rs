// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// 编排领域服务与工作器完成一次采集运行
pub mod run_acquisition;
