use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// 连接到已在调试端口上运行的浏览器，并定位平台页面。
/// 平台会话（扫码登录后的 Cookie）就活在这个浏览器里，所以只连接、不启动。
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url)
        .await
        .with_context(|| format!("无法连接到端口 {} 的浏览器", port))?;

    // 在后台消费浏览器事件流
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等浏览器状态同步
    sleep(Duration::from_millis(500)).await;

    let pages = browser.pages().await.context("获取页面列表失败")?;

    // 优先按标题找已打开的平台页
    if let Some(title) = target_title {
        for p in pages.iter() {
            if let Ok(Some(page_title)) = p.get_title().await {
                if page_title.contains(title) {
                    info!("✓ 找到目标页面: {}", page_title);
                    let _ = p.activate().await;
                    return Ok((browser, p.clone()));
                }
            }
        }
    }

    // 其次按 URL 找
    if let Some(url) = target_url {
        for p in pages.iter() {
            if let Ok(Some(page_url)) = p.url().await {
                if page_url.contains(url) {
                    info!("✓ 找到包含目标 URL 的页面");
                    return Ok((browser, p.clone()));
                }
            }
        }
        let page = browser.new_page(url).await?;
        info!("已导航到: {}", url);
        return Ok((browser, page));
    }

    // 兜底：复用第一个页面
    if let Some(first_page) = pages.first() {
        Ok((browser, first_page.clone()))
    } else {
        let page = browser.new_page("about:blank").await?;
        Ok((browser, page))
    }
}
