// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{DiscoveryState, Model};
use crate::store::StoreError;
use std::path::{Path, PathBuf};

const HEADER: [&str; 4] = ["model_name", "model_link", "status", "num_parts"];

/// 模型表存储
///
/// 一个模型一行；文件一旦生成就是模型列表的唯一事实来源，
/// 之后的运行不再从站点重新发现
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 返回发现状态
    ///
    /// 文件存在即 `Loaded`，跳过目录发现；这是显式的、可测试的分支，
    /// 不做任何过期检测
    pub fn state(&self) -> DiscoveryState {
        if self.path.exists() {
            DiscoveryState::Loaded
        } else {
            DiscoveryState::NotStarted
        }
    }

    /// 读取全部模型行
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Model>)` - 按文件顺序的模型行
    /// * `Err(StoreError)` - 文件缺失或行格式错误
    pub fn load(&self) -> Result<Vec<Model>, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut models = Vec::new();
        for row in reader.deserialize() {
            models.push(row?);
        }
        Ok(models)
    }

    /// 整表重写
    ///
    /// 截断文件并连同表头写入全部行；每处理完一个模型调用一次，
    /// 代价为 O(模型总数)
    pub fn rewrite(&self, models: &[Model]) -> Result<(), StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for model in models {
            writer.serialize(model)?;
        }
        writer.flush()?;
        Ok(())
    }
}
