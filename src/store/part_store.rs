// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::SparePartDetail;
use crate::store::StoreError;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const HEADER: [&str; 6] = ["Model", "Title", "SKU", "Price", "Image Links", "Details"];

/// 配件表存储
///
/// 只追加不更新；假定单进程单遍执行，不对并发写入方做保护
pub struct PartStore {
    path: PathBuf,
}

impl PartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加配件行
    ///
    /// 文件已存在且非空时只追加数据行；否则先写表头。
    /// 跨运行多次追加不会重复表头
    pub fn append(&self, rows: &[SparePartDetail]) -> Result<(), StoreError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
