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

use crate::archive::{ArchiveError, ImageArchiver};
use crate::config::settings::Settings;
use crate::domain::models::{DiscoveryState, Model, ModelStatus, SparePartDetail};
use crate::engines::traits::{FetchError, FetchRequest, PageFetcher};
use crate::extract::{ExtractError, Extractor};
use crate::store::{ModelStore, PartStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

/// 爬取错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CrawlError {
    /// 判断错误是否可重试
    ///
    /// 可重试错误（网络抖动、等待超时）只推迟当前模型；
    /// 其余错误（站点结构变更、存储故障）终止整个运行
    pub fn is_retryable(&self) -> bool {
        match self {
            CrawlError::Fetch(e) => e.is_retryable(),
            CrawlError::Archive(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// 单次运行的统计结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// 模型总数
    pub total: usize,
    /// 本次运行完成的模型数
    pub completed: usize,
    /// 因可重试错误推迟到下次运行的模型数
    pub deferred: usize,
}

/// 爬取编排器
///
/// 按模型驱动状态机：Pending -> 抓链接 -> 逐个渲染提取 -> 归档图片
/// -> 追加配件行 -> Done。状态只在该模型全部配件成功后翻转；
/// 失败的模型保持 Pending，下次运行整体重抓（无配件级幂等）
pub struct Orchestrator {
    settings: Settings,
    page_fetcher: Arc<dyn PageFetcher>,
    detail_fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    archiver: ImageArchiver,
    model_store: ModelStore,
    part_store: PartStore,
}

impl Orchestrator {
    /// 创建编排器
    ///
    /// # 参数
    ///
    /// * `settings` - 应用配置
    /// * `page_fetcher` - 目录页与模型页使用的引擎
    /// * `detail_fetcher` - 详情页使用的引擎（生产环境为浏览器引擎）
    ///
    /// # 返回值
    ///
    /// * `Ok(Orchestrator)` - 创建成功
    /// * `Err(CrawlError)` - 选择器编译或 HTTP 客户端构建失败
    pub fn new(
        settings: Settings,
        page_fetcher: Arc<dyn PageFetcher>,
        detail_fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, CrawlError> {
        let extractor = Extractor::new(&settings.selectors)?;
        let client = reqwest::Client::builder()
            .user_agent(&settings.crawl.user_agent)
            .build()
            .map_err(FetchError::from)?;
        let archiver = ImageArchiver::new(client, &settings.crawl.image_dir);
        let model_store = ModelStore::new(&settings.crawl.models_file);
        let part_store = PartStore::new(&settings.crawl.parts_file);

        Ok(Self {
            settings,
            page_fetcher,
            detail_fetcher,
            extractor,
            archiver,
            model_store,
            part_store,
        })
    }

    fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.crawl.http_timeout_secs)
    }

    /// 执行一次完整的爬取运行
    ///
    /// # 返回值
    ///
    /// * `Ok(RunSummary)` - 运行统计；推迟的模型不算失败
    /// * `Err(CrawlError)` - 目录发现失败或遇到不可重试错误
    pub async fn run(&self) -> Result<RunSummary, CrawlError> {
        let mut models = self.load_models().await?;

        let total = models.len();
        let mut completed = 0usize;
        let mut deferred = 0usize;

        for index in 0..models.len() {
            // Done is terminal, never revisited
            if models[index].status == ModelStatus::Done {
                continue;
            }

            let name = models[index].model_name.clone();
            match self.process_model(&models[index]).await {
                Ok(part_count) => {
                    models[index].status = ModelStatus::Done;
                    models[index].num_parts = Some(part_count);
                    self.model_store.rewrite(&models)?;
                    completed += 1;
                    info!("Finished model {} ({} parts)", name, part_count);
                }
                Err(e) if e.is_retryable() => {
                    // Leave the model Pending; the next run picks it up again
                    warn!("Deferring model {}: {}", name, e);
                    deferred += 1;
                }
                Err(e) => {
                    error!("Aborting run on model {}: {}", name, e);
                    return Err(e);
                }
            }
        }

        info!(
            "Scraping completed: {} of {} models done, {} deferred",
            completed, total, deferred
        );
        Ok(RunSummary {
            total,
            completed,
            deferred,
        })
    }

    /// 加载模型表，必要时先执行目录发现
    ///
    /// 文件存在即直接加载；否则抓取目录页、提取模型列表并写入带表头的新表。
    /// 目录页非 200 视为硬失败，不写任何文件
    async fn load_models(&self) -> Result<Vec<Model>, CrawlError> {
        match self.model_store.state() {
            DiscoveryState::Loaded => {
                info!("Models already saved to file");
                Ok(self.model_store.load()?)
            }
            DiscoveryState::NotStarted => {
                let catalog_url = &self.settings.crawl.catalog_url;
                let base = Url::parse(catalog_url)?;

                let request = FetchRequest::plain(catalog_url.clone(), self.http_timeout());
                let response = self
                    .page_fetcher
                    .fetch(&request)
                    .await?
                    .ensure_ok()
                    .inspect_err(|_| error!("Failed to retrieve catalog page {}", catalog_url))?;

                let models = self.extractor.model_list(&response.content, &base)?;
                self.model_store.rewrite(&models)?;
                info!(
                    "Discovered {} models, saved to {}",
                    models.len(),
                    self.model_store.path().display()
                );
                Ok(models)
            }
        }
    }

    /// 处理单个模型：抓取配件链接、提取每个详情、归档图片并追加结果
    ///
    /// # 返回值
    ///
    /// * `Ok(u32)` - 该模型找到的配件链接数
    /// * `Err(CrawlError)` - 任何一个配件失败则整个模型失败，不追加任何行
    async fn process_model(&self, model: &Model) -> Result<u32, CrawlError> {
        let base = Url::parse(&model.model_link)?;

        // Link pages keep the source-site contract: the status code is not checked
        let request = FetchRequest::plain(model.model_link.clone(), self.http_timeout());
        let response = self.page_fetcher.fetch(&request).await?;
        let links = self.extractor.part_links(&response.content, &base)?;

        let mut rows: Vec<SparePartDetail> = Vec::with_capacity(links.len());
        for (position, link) in links.iter().enumerate() {
            info!(
                "Processing {}: part {}/{}",
                model.model_name,
                position + 1,
                links.len()
            );

            let request = FetchRequest::rendered(
                link.clone(),
                Duration::from_secs(self.settings.crawl.render_timeout_secs),
                self.settings.crawl.render_ready_selector.clone(),
            );
            let page = self.detail_fetcher.fetch(&request).await?;
            let detail = self.extractor.part_detail(&page.content)?;
            let image_filenames = self.archiver.archive(&detail.image_urls).await?;

            rows.push(SparePartDetail {
                model_name: model.model_name.clone(),
                title: detail.title,
                sku: detail.sku,
                price: detail.price,
                image_filenames,
                description: detail.description,
            });
        }

        self.part_store.append(&rows)?;
        info!("Data saved to {}", self.part_store.path().display());

        Ok(links.len() as u32)
    }
}
