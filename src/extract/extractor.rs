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

use crate::config::settings::SelectorSettings;
use crate::domain::models::Model;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// 提取错误类型
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 选择器配置无效
    #[error("Invalid selector for {0}: {1}")]
    BadSelector(&'static str, String),
    /// 页面缺少必需元素；通常意味着站点结构已变更
    #[error("Missing required element: {0}")]
    MissingField(&'static str),
    /// 链接无法解析为URL
    #[error("Invalid URL in {field}: {source}")]
    BadUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// 配件详情页提取结果
///
/// `image_urls` 已按值去重并剔除视频缩略图，保持首见顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    pub sku: String,
    pub price: String,
    pub image_urls: Vec<String>,
    pub description: String,
}

/// 提取服务
///
/// 将站点选择器配置编译为三种固定的提取形态：
/// 模型列表、配件链接列表和配件详情
pub struct Extractor {
    model_region: Selector,
    model_tile: Selector,
    model_heading_link: Selector,
    part_tile: Selector,
    part_link: Selector,
    detail_title: Selector,
    detail_sku: Selector,
    detail_price_wrapper: Selector,
    detail_price: Selector,
    detail_images: Selector,
    detail_description: Selector,
}

fn parse(name: &'static str, raw: &str) -> Result<Selector, ExtractError> {
    Selector::parse(raw).map_err(|e| ExtractError::BadSelector(name, e.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

impl Extractor {
    /// 创建提取器，预先编译全部选择器
    ///
    /// # 参数
    ///
    /// * `selectors` - 站点选择器配置
    ///
    /// # 返回值
    ///
    /// * `Ok(Extractor)` - 创建成功
    /// * `Err(ExtractError)` - 某个选择器无法解析
    pub fn new(selectors: &SelectorSettings) -> Result<Self, ExtractError> {
        Ok(Self {
            model_region: parse("model_region", &selectors.model_region)?,
            model_tile: parse("model_tile", &selectors.model_tile)?,
            model_heading_link: parse("model_heading_link", &selectors.model_heading_link)?,
            part_tile: parse("part_tile", &selectors.part_tile)?,
            part_link: parse("part_link", &selectors.part_link)?,
            detail_title: parse("detail_title", &selectors.detail_title)?,
            detail_sku: parse("detail_sku", &selectors.detail_sku)?,
            detail_price_wrapper: parse("detail_price_wrapper", &selectors.detail_price_wrapper)?,
            detail_price: parse("detail_price", &selectors.detail_price)?,
            detail_images: parse("detail_images", &selectors.detail_images)?,
            detail_description: parse("detail_description", &selectors.detail_description)?,
        })
    }

    /// 提取目录页的模型列表
    ///
    /// 定位第一个模型区域，遍历其中的每个模型卡片，
    /// 取标题链接的 href 和文本；href 相对于 `base_url` 解析为绝对地址
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Model>)` - 状态为 Pending 的模型行，每个卡片一行
    /// * `Err(ExtractError)` - 区域或标题链接缺失
    pub fn model_list(&self, html: &str, base_url: &Url) -> Result<Vec<Model>, ExtractError> {
        let document = Html::parse_document(html);

        let region = document
            .select(&self.model_region)
            .next()
            .ok_or(ExtractError::MissingField("category products region"))?;

        let mut models = Vec::new();
        for tile in region.select(&self.model_tile) {
            let link = tile
                .select(&self.model_heading_link)
                .next()
                .ok_or(ExtractError::MissingField("model heading link"))?;
            let href = link
                .value()
                .attr("href")
                .ok_or(ExtractError::MissingField("model link href"))?;
            let resolved = base_url.join(href).map_err(|e| ExtractError::BadUrl {
                field: "model link",
                source: e,
            })?;

            models.push(Model::pending(element_text(link), resolved.to_string()));
        }

        Ok(models)
    }

    /// 提取模型页上的配件链接
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 每个配件卡片的链接，解析为绝对地址
    /// * `Err(ExtractError)` - 某个卡片缺少链接
    pub fn part_links(&self, html: &str, base_url: &Url) -> Result<Vec<String>, ExtractError> {
        let document = Html::parse_document(html);

        let mut links = Vec::new();
        for tile in document.select(&self.part_tile) {
            let anchor = tile
                .select(&self.part_link)
                .next()
                .ok_or(ExtractError::MissingField("part link"))?;
            let href = anchor
                .value()
                .attr("href")
                .ok_or(ExtractError::MissingField("part link href"))?;
            let resolved = base_url.join(href).map_err(|e| ExtractError::BadUrl {
                field: "part link",
                source: e,
            })?;
            links.push(resolved.to_string());
        }

        Ok(links)
    }

    /// 提取配件详情页
    ///
    /// 标题、SKU 和描述为必需字段，缺失视为站点结构变更；
    /// 价格容器或价格节点不存在是合法情况，价格取空字符串
    ///
    /// # 返回值
    ///
    /// * `Ok(DetailPage)` - 提取出的详情字段
    /// * `Err(ExtractError)` - 必需字段缺失
    pub fn part_detail(&self, html: &str) -> Result<DetailPage, ExtractError> {
        let document = Html::parse_document(html);

        let title = document
            .select(&self.detail_title)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingField("title"))?;

        let sku = document
            .select(&self.detail_sku)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingField("sku"))?;

        let price = document
            .select(&self.detail_price_wrapper)
            .next()
            .and_then(|wrapper| wrapper.select(&self.detail_price).next())
            .map(element_text)
            .unwrap_or_default();

        let mut image_urls: Vec<String> = Vec::new();
        for img in document.select(&self.detail_images) {
            if let Some(src) = img.value().attr("src") {
                if src.contains("video") {
                    continue;
                }
                if !image_urls.iter().any(|u| u == src) {
                    image_urls.push(src.to_string());
                }
            }
        }

        let description = document
            .select(&self.detail_description)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingField("description"))?;

        Ok(DetailPage {
            title,
            sku,
            price,
            image_urls,
            description,
        })
    }
}
