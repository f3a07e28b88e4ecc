// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 图片归档模块
///
/// 下载商品图片并保存到本地目录
pub mod archive;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 爬取编排模块
///
/// 驱动可恢复的 模型 -> 配件 抓取流程
pub mod crawler;

/// 领域模块
///
/// 包含核心业务实体（模型、配件明细）
pub mod domain;

/// 引擎模块
///
/// 实现普通 HTTP 抓取与无头浏览器渲染抓取
pub mod engines;

/// 提取模块
///
/// 从 HTML 页面中提取结构化数据
pub mod extract;

/// 存储模块
///
/// 读写模型表与配件表两个 CSV 数据集
pub mod store;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
