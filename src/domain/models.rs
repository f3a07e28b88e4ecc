// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 模型处理状态
///
/// `Done` 是终态：一旦标记完成，后续运行不再重新抓取该模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStatus {
    Pending,
    Done,
}

/// 产品模型
///
/// 目录页上的一个产品系列，其下挂载若干配件页面。
/// 以 `model_link` 作为唯一标识；在发现阶段创建一次，之后只原地更新状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub model_name: String,
    pub model_link: String,
    pub status: ModelStatus,
    pub num_parts: Option<u32>,
}

impl Model {
    pub fn pending(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            model_name: name.into(),
            model_link: link.into(),
            status: ModelStatus::Pending,
            num_parts: None,
        }
    }
}

/// 配件明细行
///
/// 每访问一个配件页面生成一行，追加写入配件表，创建后不再修改。
/// `model_name` 是模型名的冗余拷贝，不做外键校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparePartDetail {
    #[serde(rename = "Model")]
    pub model_name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Image Links")]
    pub image_filenames: String,
    #[serde(rename = "Details")]
    pub description: String,
}

/// 模型表发现状态
///
/// 用显式枚举取代"文件是否存在"的隐式状态机：
/// 模型表文件已存在时跳过目录发现，整个运行期间不再访问目录页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// 模型表尚未生成，需要抓取目录页
    NotStarted,
    /// 模型表已存在，直接加载
    Loaded,
}
