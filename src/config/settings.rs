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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含爬取目标、数据集文件路径和站点选择器等所有配置项
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 站点选择器配置
    pub selectors: SelectorSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// 目录页URL
    pub catalog_url: String,
    /// 模型表文件路径
    pub models_file: String,
    /// 配件表文件路径
    pub parts_file: String,
    /// 图片保存目录
    pub image_dir: String,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 普通抓取超时时间（秒）
    pub http_timeout_secs: u64,
    /// 渲染抓取超时时间（秒）
    pub render_timeout_secs: u64,
    /// 渲染完成的标志元素选择器
    pub render_ready_selector: String,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            catalog_url:
                "https://www.zavattishop.com/en/pool-robots/accessories/dolphin-spare-parts.html"
                    .to_string(),
            models_file: "models.csv".to_string(),
            parts_file: "spare_parts.csv".to_string(),
            image_dir: "images".to_string(),
            user_agent: "Mozilla/5.0 (compatible; sparecrawl/0.1)".to_string(),
            http_timeout_secs: 30,
            render_timeout_secs: 10,
            render_ready_selector: ".fotorama__nav__shaft".to_string(),
        }
    }
}

/// 站点选择器配置设置
///
/// 这些选择器是对目标站点页面结构的兼容性契约，站点改版时只需调整配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// 目录页模型区域
    pub model_region: String,
    /// 模型卡片
    pub model_tile: String,
    /// 模型标题链接
    pub model_heading_link: String,
    /// 配件卡片
    pub part_tile: String,
    /// 配件链接
    pub part_link: String,
    /// 详情页标题
    pub detail_title: String,
    /// 详情页SKU
    pub detail_sku: String,
    /// 详情页价格容器
    pub detail_price_wrapper: String,
    /// 详情页价格
    pub detail_price: String,
    /// 详情页图片
    pub detail_images: String,
    /// 详情页描述
    pub detail_description: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            model_region: "div.row.category-products".to_string(),
            model_tile: "div.col-6.col-lg-3.px-4".to_string(),
            model_heading_link: "h2 a".to_string(),
            part_tile: "div.col-6.col-md-3.item.product".to_string(),
            part_link: "a.product-item-link".to_string(),
            detail_title: "div.product-info-main h1".to_string(),
            detail_sku: "div.product.attribute.sku div.value".to_string(),
            detail_price_wrapper: "span.price-wrapper".to_string(),
            detail_price: "span.price".to_string(),
            detail_images: "div.product.media img".to_string(),
            detail_description: "div.product.attribute.description".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SPARECRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}
