use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::ObjectStorage;
use crate::publish::models::CredentialData;

type HmacSha1 = Hmac<Sha1>;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> reqwest::Client {
    HTTP_CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                .pool_max_idle_per_host(10)
                .build()
                .expect("构建 COS HTTP 客户端失败")
        })
        .clone()
}

/// 腾讯云 COS 实现：每次上传都用传入的临时凭证重新签名，整文件一次 PUT
#[derive(Debug, Default)]
pub struct CosStorage;

impl CosStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObjectStorage for CosStorage {
    async fn upload_file(
        &self,
        credentials: &CredentialData,
        local_file_path: &Path,
        object_key: &str,
    ) -> Result<()> {
        let file_content = tokio::fs::read(local_file_path).await?;
        let creds = &credentials.credentials;
        let host = format!(
            "{}.cos.{}.myqcloud.com",
            credentials.bucket, credentials.region
        );
        let url = format!("https://{}/{}", host, object_key);
        let path = format!("/{}", object_key);
        debug!("COS PUT {} ({} bytes)", url, file_content.len());

        let auth = build_authorization("put", &path, &host, &creds.tmp_secret_id, &creds.tmp_secret_key)?;

        let response = http_client()
            .put(&url)
            .header("Host", &host)
            .header("Authorization", auth)
            .header("x-cos-security-token", &creds.session_token)
            .body(file_content)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(anyhow!("COS 上传失败, 状态 {}: {}", status, text))
        }
    }
}

/// 按 COS V5 签名规则生成 Authorization 头，签名有效期 1 小时
fn build_authorization(
    method: &str,
    path: &str,
    host: &str,
    secret_id: &str,
    secret_key: &str,
) -> Result<String> {
    let now = Utc::now();
    let expired = now + Duration::hours(1);
    let key_time = format!("{};{}", now.timestamp(), expired.timestamp());

    // 1. SignKey
    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes()).map_err(|e| anyhow!("{}", e))?;
    mac.update(key_time.as_bytes());
    let sign_key = hex::encode(mac.finalize().into_bytes());

    // 2. HttpString
    let http_string = format!("{}\n{}\n\nhost={}\n", method, path, host);
    let sha1_http = hex::encode(Sha1::digest(http_string.as_bytes()));

    // 3. StringToSign
    let string_to_sign = format!("sha1\n{}\n{}\n", key_time, sha1_http);

    // 4. Signature
    let mut mac = HmacSha1::new_from_slice(sign_key.as_bytes()).map_err(|e| anyhow!("{}", e))?;
    mac.update(string_to_sign.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!(
        "q-sign-algorithm=sha1&q-ak={}&q-sign-time={}&q-key-time={}&q-header-list=host&q-url-param-list=&q-signature={}",
        secret_id, key_time, key_time, signature
    ))
}
