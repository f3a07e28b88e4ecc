// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sparecrawl::config::settings::Settings;
use sparecrawl::crawler::Orchestrator;
use sparecrawl::engines::http_engine::HttpEngine;
use std::path::Path;
use std::sync::Arc;

/// Settings wired to a mock server and a scratch directory.
pub fn test_settings(server_uri: &str, dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.crawl.catalog_url = format!("{}/catalog", server_uri);
    settings.crawl.models_file = dir.join("models.csv").to_str().unwrap().to_string();
    settings.crawl.parts_file = dir.join("spare_parts.csv").to_str().unwrap().to_string();
    settings.crawl.image_dir = dir.join("images").to_str().unwrap().to_string();
    settings.crawl.http_timeout_secs = 5;
    settings
}

/// Orchestrator with the plain HTTP engine standing in for the browser,
/// so detail pages are served by the mock server without Chromium.
pub fn test_orchestrator(settings: Settings) -> Orchestrator {
    let engine = Arc::new(HttpEngine::new("sparecrawl-test").unwrap());
    Orchestrator::new(settings, engine.clone(), engine).unwrap()
}

pub fn catalog_html(tiles: &[(&str, &str)]) -> String {
    let tiles: String = tiles
        .iter()
        .map(|(name, href)| {
            format!(
                r#"<div class="col-6 col-lg-3 px-4"><h2><a href="{}">{}</a></h2></div>"#,
                href, name
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="row category-products">{}</div></body></html>"#,
        tiles
    )
}

pub fn model_html(part_hrefs: &[&str]) -> String {
    let tiles: String = part_hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="col-6 col-md-3 item product"><a class="product-item-link" href="{}">Part</a></div>"#,
                href
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", tiles)
}

pub fn detail_html(title: &str, sku: &str, price: &str, image_url: &str) -> String {
    format!(
        r#"<html><body>
        <div class="product-info-main"><h1>{}</h1></div>
        <div class="product attribute sku"><div class="value">{}</div></div>
        <span class="price-wrapper"><span class="price">{}</span></span>
        <div class="product media"><img src="{}"></div>
        <div class="product attribute description">Replacement part.</div>
        </body></html>"#,
        title, sku, price, image_url
    )
}
