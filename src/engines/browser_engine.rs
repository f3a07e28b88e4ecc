// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{FetchError, FetchRequest, FetchResponse, PageFetcher};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器渲染引擎
///
/// 基于chromiumoxide实现的无头浏览器抓取引擎，用于需要客户端渲染的详情页。
/// 每次调用启动一个独立的浏览器会话，无论成功、提取失败还是等待超时，
/// 会话都会在返回前被关闭，避免长目录爬取过程中资源无限增长
pub struct BrowserEngine;

impl BrowserEngine {
    pub fn new() -> Self {
        Self
    }

    async fn render(
        browser: &Browser,
        request: &FetchRequest,
        wait_for: &str,
    ) -> Result<FetchResponse, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        page.goto(request.url.as_str())
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        wait_for_element(&page, wait_for, request.timeout).await?;

        let content = page
            .content()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        Ok(FetchResponse {
            status_code: 200,
            content,
        })
    }
}

impl Default for BrowserEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 轮询等待元素出现，超出时限返回 `WaitTimeout`
async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<(), FetchError> {
    let poll = async {
        loop {
            if page.find_element(selector).await.is_ok() {
                return;
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| FetchError::WaitTimeout {
            selector: selector.to_string(),
            timeout,
        })
}

#[async_trait]
impl PageFetcher for BrowserEngine {
    /// 执行浏览器渲染抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求，`wait_for` 必须给出渲染完成的标志元素
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 渲染完成后的完整文档
    /// * `Err(FetchError)` - 启动、导航或等待超时错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let wait_for = request.wait_for.as_deref().ok_or_else(|| {
            FetchError::Browser("rendered fetch requires a wait_for selector".to_string())
        })?;

        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(FetchError::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // Drive CDP events while the page is in use
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = Self::render(&browser, request, wait_for).await;

        // Session teardown runs on every exit path
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "browser"
    }
}
