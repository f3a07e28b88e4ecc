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

use sparecrawl::config::settings::Settings;
use sparecrawl::crawler::Orchestrator;
use sparecrawl::engines::browser_engine::BrowserEngine;
use sparecrawl::engines::http_engine::HttpEngine;
use sparecrawl::utils::telemetry;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并执行一次爬取运行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting sparecrawl...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize Engines
    let page_fetcher = Arc::new(HttpEngine::new(&settings.crawl.user_agent)?);
    let detail_fetcher = Arc::new(BrowserEngine::new());

    // 4. Run the crawl
    let orchestrator = Orchestrator::new(settings, page_fetcher, detail_fetcher)?;
    let summary = orchestrator.run().await?;

    info!(
        "Run finished: {}/{} models completed, {} deferred",
        summary.completed, summary.total, summary.deferred
    );
    Ok(())
}
