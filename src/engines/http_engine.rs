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

use crate::engines::traits::{FetchError, FetchRequest, FetchResponse, PageFetcher};
use async_trait::async_trait;

/// HTTP抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎，用于目录页、模型页和图片字节
pub struct HttpEngine {
    client: reqwest::Client,
}

impl HttpEngine {
    /// 创建新的HTTP引擎
    ///
    /// # 参数
    ///
    /// * `user_agent` - 请求使用的User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(HttpEngine)` - 创建成功
    /// * `Err(FetchError)` - 客户端构建失败
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求；`wait_for` 字段被忽略（本引擎不执行客户端渲染）
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 响应正文与状态码；非 2xx 状态不在此处判定
    /// * `Err(FetchError)` - 网络层错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let content = response.text().await?;

        Ok(FetchResponse {
            status_code,
            content,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "http"
    }
}
