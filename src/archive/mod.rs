// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// 归档错误类型
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// 图片请求失败
    #[error("Image request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 图片响应非 2xx
    #[error("Image {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    /// 本地写入失败
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// URL 中没有可用的文件名
    #[error("Image URL has no file name: {0}")]
    NoFileName(String),
}

impl ArchiveError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            ArchiveError::Request(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ArchiveError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// 图片归档器
///
/// 将详情页图片下载到本地目录，文件名取 URL 的最后一段路径。
/// 同一次调用中两个不同 URL 映射到同一文件名时，
/// 后者加上 URL 的 SHA-256 前 8 位十六进制前缀，不做静默覆盖
pub struct ImageArchiver {
    client: reqwest::Client,
    dir: PathBuf,
}

/// 取 URL 最后一段非空路径作为文件名
fn file_name_of(url: &str) -> Result<String, ArchiveError> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(|s| s.to_string()),
        Err(_) => url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    };

    segment.ok_or_else(|| ArchiveError::NoFileName(url.to_string()))
}

impl ImageArchiver {
    pub fn new(client: reqwest::Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    /// 下载一组图片并返回存储用的文件名串
    ///
    /// # 参数
    ///
    /// * `urls` - 图片 URL 集合，调用方已按值去重
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 以 ", " 连接的本地文件名
    /// * `Err(ArchiveError)` - 任何一张图片下载或写入失败，整组归档终止
    pub async fn archive(&self, urls: &[String]) -> Result<String, ArchiveError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ArchiveError::Io {
                path: self.dir.display().to_string(),
                source: e,
            })?;

        // filename -> source URL, to detect collisions within this call
        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut names = Vec::with_capacity(urls.len());

        for url in urls {
            let base_name = file_name_of(url)?;

            let name = match claimed.get(&base_name) {
                Some(owner) if owner == url => continue,
                Some(_) => {
                    let digest = Sha256::digest(url.as_bytes());
                    format!("{}-{}", &hex::encode(digest)[..8], base_name)
                }
                None => base_name.clone(),
            };
            claimed.insert(base_name, url.clone());

            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ArchiveError::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().await?;

            let path = self.dir.join(&name);
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| ArchiveError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;

            debug!("Archived image {} -> {}", url, name);
            names.push(name);
        }

        Ok(names.join(", "))
    }
}
