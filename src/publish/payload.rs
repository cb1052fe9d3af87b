//! 阶段4: payload 组装。
//!
//! LLM 给的是一个 JSON 对象去掉最外层大括号后的"片段"，这里负责把它
//! 还原成映射，再把通知接口返回的附件数组作为固定键合并进去。

use crate::error::PublishError;
use anyhow::Result;
use serde_json::{Map, Value};

/// 附件在提交 payload 里的固定键名
pub const ATTACHMENTS_KEY: &str = "attachments";

/// 把 LLM 片段还原成 JSON 映射。
/// 末尾多余的逗号和空白会被容忍；包上大括号仍解析失败则是硬错误，
/// 错误里带上原始片段便于排查。
pub fn parse_llm_fragment(fragment: &str) -> Result<Map<String, Value>, PublishError> {
    let trimmed = fragment.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    let wrapped = format!("{{{}}}", trimmed);
    serde_json::from_str(&wrapped).map_err(|source| PublishError::MalformedFragment {
        fragment: fragment.to_string(),
        source,
    })
}

/// 合并附件数组。键已存在时直接覆盖，不做深合并；
/// 附件阶段无结果时 payload 保持原样。
pub fn merge_attachments(payload: &mut Map<String, Value>, attachments: Option<Value>) {
    if let Some(value) = attachments {
        payload.insert(ATTACHMENTS_KEY.to_string(), value);
    }
}

/// 序列化成提交用的 JSON 字符串，非 ASCII 字符原样保留
pub fn to_submission_json(payload: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}
