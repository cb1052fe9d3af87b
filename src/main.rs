use anyhow::Result;
use publish_paper::app::AppConfig;
use publish_paper::ask_llm::ask_llm_for_payload;
use publish_paper::browser::connect_to_browser_and_page;
use publish_paper::logger;
use publish_paper::model::load_question_page;
use publish_paper::publish::PaperService;
use publish_paper::remote::ChromiumExecutor;
use publish_paper::storage::CosStorage;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();
    let config = AppConfig::load(None)?;

    let mut question_page = load_question_page(Path::new(&config.paper_toml))?;
    info!("🚀 开始发布试卷: {}", question_page.name);
    info!("🔌 浏览器端口: {}", config.debug_port);

    let (browser, tiku_page) = connect_to_browser_and_page(
        config.debug_port,
        None,
        Some(&config.tiku_target_title),
    )
    .await?;

    // LLM 生成建卷基础字段（不含最外层大括号的片段）
    let fragment = ask_llm_for_payload(&question_page).await?;

    let executor = Arc::new(ChromiumExecutor::new(
        Arc::new(tiku_page),
        config.publish.js_timeout_secs,
    ));
    let storage = Arc::new(CosStorage::new());
    let service = PaperService::new(executor, storage, config.publish.clone());

    let outcome = service.save_new_paper(&mut question_page, &fragment).await;

    drop(browser);

    match outcome {
        Ok(Some(paper_id)) => {
            info!("🎉 发布完成, paper_id: {}", paper_id);
            Ok(())
        }
        Ok(None) => {
            warn!("❌ 平台未接受本次提交，试卷未入库");
            std::process::exit(1);
        }
        Err(e) => {
            error!("❌ 发布失败: {:#}", e);
            Err(e)
        }
    }
}
