use crate::error::PublishError;
use crate::publish::api_client::ApiClient;
use crate::publish::models::{CredentialData, FileInfo, NotifyResponse};
use crate::storage::ObjectStorage;
use anyhow::{Result, anyhow};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 文件上传服务：凭证 -> COS -> 通知，三步串行，失败即止
pub struct UploadService {
    api_client: ApiClient,
    storage: Arc<dyn ObjectStorage>,
}

impl UploadService {
    pub fn new(api_client: ApiClient, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            api_client,
            storage,
        }
    }

    /// 上传 PDF 并换取后端附件数组。
    /// 文件缺失在发起任何网络请求之前就报错；通知接口能调通但声明失败时
    /// 返回 Ok(None)，由调用方决定是否继续。
    pub async fn upload_pdf(&self, file_path: &Path) -> Result<Option<Value>> {
        if !file_path.exists() {
            return Err(PublishError::FileNotFound(file_path.to_path_buf()).into());
        }
        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("非法文件名: {:?}", file_path))?;

        let credentials = self.api_client.get_upload_credentials(filename).await?;
        let file_info = self.push_to_storage(&credentials, file_path, filename).await?;

        let notify_response = match self
            .api_client
            .notify_application_server(filename, &file_info)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // 文件已经传上去了，通知没送达，云端对象从此无人引用
                error!("❌ 通知服务器失败，云端对象成为孤儿: {}", file_info.key);
                return Err(e);
            }
        };

        match notify_response {
            NotifyResponse {
                success: true,
                data: Some(data),
                ..
            } => {
                info!("🎉 成功获取到目标 `data` 数组! 🎉");
                debug!("附件数据: {:?}", data);
                Ok(Some(data))
            }
            other => {
                warn!(
                    "上传流程完成但未获取到附件数据，云端对象将无人引用: {}",
                    file_info.key
                );
                warn!("服务器响应: {}", serde_json::to_string_pretty(&other)?);
                Ok(None)
            }
        }
    }

    /// 阶段2: 把文件推到对象存储，返回最终 URL 和云端 key
    async fn push_to_storage(
        &self,
        credentials: &CredentialData,
        file_path: &Path,
        filename: &str,
    ) -> Result<FileInfo> {
        info!("--- 阶段2: 正在上传文件到腾讯云COS... ---");

        let object_key = build_object_key(&credentials.key_prefix, filename);
        debug!("云端路径 (Key): {}", object_key);

        self.storage
            .upload_file(credentials, file_path, &object_key)
            .await
            .map_err(|e| {
                error!("文件上传到 COS 失败: {}", e);
                e
            })?;

        let final_url = format!("https://{}/{}", credentials.cdn_domain, object_key);
        info!("✅ 文件上传成功。");
        info!("最终文件URL: {}", final_url);

        Ok(FileInfo {
            url: final_url,
            key: object_key,
        })
    }
}

/// 生成全局唯一的 object key: `{keyPrefix}/{uuid}/{filename}`。
/// 前缀两侧的斜杠和空白会被清理，避免出现空路径段。
pub fn build_object_key(key_prefix: &str, filename: &str) -> String {
    let prefix = key_prefix
        .trim()
        .trim_start_matches('/')
        .trim_end_matches('/');
    format!("{}/{}/{}", prefix, Uuid::new_v4(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::config::PublishConfig;
    use crate::remote::testing::FakeExecutor;
    use crate::storage::testing::FakeStorage;

    #[test]
    fn object_keys_differ_for_same_filename() {
        let first = build_object_key("p", "a.pdf");
        let second = build_object_key("p", "a.pdf");
        assert_ne!(first, second, "同名文件的两次 key 必须不同");
        assert!(first.starts_with("p/"));
        assert!(first.ends_with("/a.pdf"));
    }

    #[test]
    fn object_key_trims_prefix_slashes() {
        let key = build_object_key(" /p/q/ ", "a.pdf");
        assert!(key.starts_with("p/q/"));
        // prefix 两段 + uuid + 文件名
        assert_eq!(key.split('/').count(), 4);
        let uuid_segment = key.split('/').nth(2).unwrap();
        assert_eq!(uuid_segment.len(), 36);
    }

    #[tokio::test]
    async fn missing_file_short_circuits_before_any_request() {
        let executor = Arc::new(FakeExecutor::new(vec![]));
        let storage = Arc::new(FakeStorage::new());
        let service = UploadService::new(
            ApiClient::new(executor.clone(), PublishConfig::default()),
            storage.clone(),
        );

        let err = service
            .upload_pdf(Path::new("/nonexistent/没有这个文件.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PublishError>(),
            Some(PublishError::FileNotFound(_))
        ));
        assert!(executor.recorded().is_empty(), "不应发起任何网络请求");
        assert!(storage.uploads().is_empty(), "不应触发任何存储调用");
    }
}
