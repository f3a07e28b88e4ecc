// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 状态码
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
    /// 等待渲染元素超时
    #[error("Timed out after {timeout:?} waiting for element '{selector}'")]
    WaitTimeout { selector: String, timeout: Duration },
    /// 浏览器会话错误
    #[error("Browser error: {0}")]
    Browser(String),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            FetchError::HttpStatus(code) => *code >= 500,
            FetchError::WaitTimeout { .. } => true,
            FetchError::Browser(_) => false,
        }
    }
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
    /// 渲染完成标志元素；`None` 表示不需要客户端渲染
    pub wait_for: Option<String>,
}

impl FetchRequest {
    /// 普通 HTTP 抓取请求
    pub fn plain(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            wait_for: None,
        }
    }

    /// 需要客户端渲染的抓取请求
    pub fn rendered(url: impl Into<String>, timeout: Duration, wait_for: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout,
            wait_for: Some(wait_for.into()),
        }
    }
}

/// 抓取响应
#[derive(Debug)]
pub struct FetchResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
}

impl FetchResponse {
    /// 非 200 状态视为硬失败
    ///
    /// 目录发现路径要求 200；配件链接页沿用源站契约不做状态检查
    pub fn ensure_ok(self) -> Result<Self, FetchError> {
        if self.status_code == 200 {
            Ok(self)
        } else {
            Err(FetchError::HttpStatus(self.status_code))
        }
    }
}

/// 抓取引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
