//! 页面上下文内的网络请求能力。
//!
//! 平台接口必须带着浏览器会话的 Cookie 才能调通，所以请求不从本进程发出，
//! 而是序列化成一个请求描述，丢进远程页面里用 fetch 执行。

use crate::error::PublishError;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::{Duration, timeout};
use tracing::debug;

/// 一次页面内请求的完整描述
#[derive(Debug, Clone, Serialize)]
pub struct RemoteRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn post(url: impl Into<String>, headers: BTreeMap<String, String>, body: Value) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers,
            body: Some(body),
        }
    }
}

/// 远程执行能力：在浏览器页面上下文内发起请求并返回解析后的 JSON
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute_fetch(&self, request: RemoteRequest) -> Result<Value>;
}

// fetch 包装器：传输层异常折叠成 __fetch_error 字段带回来，
// 避免 evaluate 因为页面内抛异常而整个失败
const FETCH_JS: &str = r#"
async (req) => {
    const init = {
        method: req.method,
        headers: req.headers,
        credentials: "include"
    };
    if (req.body !== null && req.body !== undefined) {
        init.body = JSON.stringify(req.body);
    }
    try {
        const response = await fetch(req.url, init);
        const data = await response.json();
        return data;
    } catch (err) {
        console.error("Fetch error:", err);
        return { __fetch_error: err.toString() };
    }
}
"#;

/// 基于 chromiumoxide Page 的实现
pub struct ChromiumExecutor {
    page: Arc<chromiumoxide::Page>,
    js_timeout_secs: u64,
}

impl ChromiumExecutor {
    pub fn new(page: Arc<chromiumoxide::Page>, js_timeout_secs: u64) -> Self {
        Self {
            page,
            js_timeout_secs,
        }
    }
}

#[async_trait]
impl RemoteExecutor for ChromiumExecutor {
    async fn execute_fetch(&self, request: RemoteRequest) -> Result<Value> {
        debug!("页面内请求: {} {}", request.method, request.url);
        let request_json = serde_json::to_string(&request)?;
        let eval_future = self
            .page
            .evaluate(format!("({})({})", FETCH_JS, request_json));
        let eval_result = timeout(Duration::from_secs(self.js_timeout_secs), eval_future)
            .await
            .map_err(|_| PublishError::Transport(format!("等待 {} 响应超时", request.url)))??;
        let value: Value = eval_result.into_value()?;

        if let Some(err) = value.get("__fetch_error").and_then(|v| v.as_str()) {
            return Err(PublishError::Transport(format!("{}: {}", request.url, err)).into());
        }
        Ok(value)
    }
}
