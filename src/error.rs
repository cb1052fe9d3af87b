use std::path::PathBuf;
use thiserror::Error;

/// 发布流水线的错误类型
#[derive(Debug, Error)]
pub enum PublishError {
    /// 网络 / 页面执行层失败
    #[error("网络请求失败: {0}")]
    Transport(String),

    /// 响应能解析但业务上未成功
    #[error("接口返回未成功 ({endpoint}): {message}")]
    Application { endpoint: String, message: String },

    /// LLM 片段包上大括号后仍不是合法 JSON，无法组装提交 payload
    #[error("LLM 片段不是合法 JSON: {source}\n片段内容: {fragment}")]
    MalformedFragment {
        fragment: String,
        #[source]
        source: serde_json::Error,
    },

    /// 本地 PDF 不存在，在发起任何网络请求之前短路
    #[error("文件不存在: {0}")]
    FileNotFound(PathBuf),
}
