use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 凭证接口响应
#[derive(Debug, Deserialize)]
pub struct CredentialResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<CredentialData>,
    pub message: Option<String>,
}

/// 一组临时上传凭证及目标桶信息，只在一次上传内有效，不落盘不打印
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialData {
    pub credentials: Credentials,
    pub region: String,
    pub bucket: String,
    #[serde(rename = "keyPrefix")]
    pub key_prefix: String,
    #[serde(rename = "cdnDomain")]
    pub cdn_domain: String,
}

/// 临时密钥三元组
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "tmpSecretId")]
    pub tmp_secret_id: String,
    #[serde(rename = "tmpSecretKey")]
    pub tmp_secret_key: String,
    #[serde(rename = "sessionToken")]
    pub session_token: String,
}

/// 通知接口响应，data 是后端生成的附件数组，结构对本模块不透明
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<Value>,
    pub message: Option<String>,
}

/// 建卷接口响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SavePaperResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "deserialize_paper_id")]
    pub data: Option<String>,
    pub message: Option<String>,
}

/// 已上传文件的最终 URL 与云端 key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub url: String,
    pub key: String,
}

// paper_id 有时是字符串有时是数字，统一成字符串
fn deserialize_paper_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "paper_id 应为字符串或数字, 实际是: {}",
            other
        ))),
    }
}
