use crate::error::PublishError;
use crate::publish::config::PublishConfig;
use crate::publish::models::{CredentialData, CredentialResponse, FileInfo, NotifyResponse, SavePaperResponse};
use crate::remote::{RemoteExecutor, RemoteRequest};
use anyhow::Result;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 平台 API 客户端，所有请求都经由远程页面上下文发出
#[derive(Clone)]
pub struct ApiClient {
    executor: Arc<dyn RemoteExecutor>,
    config: PublishConfig,
}

impl ApiClient {
    pub fn new(executor: Arc<dyn RemoteExecutor>, config: PublishConfig) -> Self {
        Self { executor, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn common_headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Accept".to_string(),
                "application/json, text/plain, */*".to_string(),
            ),
            ("tikutoken".to_string(), self.config.tiku_token.clone()),
        ])
    }

    /// 阶段1: 获取上传凭证。非成功响应一律视为本阶段失败，调用方必须在
    /// 触发任何云存储副作用之前停下。
    pub async fn get_upload_credentials(&self, filename: &str) -> Result<CredentialData> {
        info!("--- 阶段1: 正在请求上传凭证 (Via Page Fetch)... ---");

        let url = self.endpoint(&self.config.credential_api_path);
        let body = json!({
            "fileName": filename,
            "contentType": "application/pdf",
            "storageType": "cos",
            "securityLevel": 1
        });
        let response_value = self
            .executor
            .execute_fetch(RemoteRequest::post(&url, self.common_headers(), body))
            .await?;
        let response: CredentialResponse = serde_json::from_value(response_value)?;

        match response {
            CredentialResponse {
                success: true,
                data: Some(data),
                ..
            } => {
                info!("✅ 凭证获取成功。");
                Ok(data)
            }
            CredentialResponse { message, .. } => {
                let message = message.unwrap_or_else(|| "Unknown error".to_string());
                warn!("❌ 错误: API响应格式不正确或未成功: {}", message);
                Err(PublishError::Application {
                    endpoint: url,
                    message,
                }
                .into())
            }
        }
    }

    /// 阶段3: 通知服务器上传完成。原样返回响应，成功与否由调用方判断。
    pub async fn notify_application_server(
        &self,
        filename: &str,
        file_info: &FileInfo,
    ) -> Result<NotifyResponse> {
        info!("--- 阶段3: 正在通知应用服务器 (Via Page Fetch)... ---");

        let url = self.endpoint(&self.config.notify_api_path);
        let body = json!({
            "uploadAttachments": [
                {
                    "fileName": filename,
                    "fileType": "pdf",
                    "fileUrl": file_info.url,
                    "resourceType": "zbtiku_pc"
                }
            ],
            "fileUploadType": 5,
            "fileContentType": 1,
            "paperId": ""
        });
        let response_value = self
            .executor
            .execute_fetch(RemoteRequest::post(&url, self.common_headers(), body))
            .await?;
        let response: NotifyResponse = serde_json::from_value(response_value)?;

        info!("✅ 服务器通知成功，已收到返回数据。");
        debug!("通知响应: {:?}", response);
        Ok(response)
    }

    /// 阶段5: 提交组装好的 payload 创建试卷
    pub async fn save_paper(&self, payload: &Value) -> Result<SavePaperResponse> {
        let url = self.endpoint(&self.config.save_paper_api_path);
        debug!("发送的payload: {}", serde_json::to_string(payload)?);

        let response_value = self
            .executor
            .execute_fetch(RemoteRequest::post(
                &url,
                self.common_headers(),
                payload.clone(),
            ))
            .await?;
        let response: SavePaperResponse = serde_json::from_value(response_value)?;

        debug!("API响应: {}", serde_json::to_string_pretty(&response)?);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::FakeExecutor;
    use serde_json::json;

    fn client_with(responses: Vec<Value>) -> (Arc<FakeExecutor>, ApiClient) {
        let executor = Arc::new(FakeExecutor::new(responses));
        let client = ApiClient::new(executor.clone(), PublishConfig::default());
        (executor, client)
    }

    fn credential_ok() -> Value {
        json!({
            "success": true,
            "data": {
                "region": "ap-x",
                "bucket": "b1",
                "keyPrefix": "p",
                "cdnDomain": "cdn.example.com",
                "credentials": {
                    "tmpSecretId": "id",
                    "tmpSecretKey": "key",
                    "sessionToken": "tok"
                }
            }
        })
    }

    #[tokio::test]
    async fn credential_request_has_fixed_fields() {
        let (executor, client) = client_with(vec![credential_ok()]);

        let data = client.get_upload_credentials("试卷.pdf").await.unwrap();
        assert_eq!(data.bucket, "b1");

        let requests = executor.recorded();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert!(request.url.ends_with("/attachment/get/credential"));
        assert_eq!(
            request.headers.get("tikutoken").map(String::as_str),
            Some("732FD8402F95087CD934374135C46EE5")
        );
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["fileName"], "试卷.pdf");
        assert_eq!(body["contentType"], "application/pdf");
        assert_eq!(body["storageType"], "cos");
        assert_eq!(body["securityLevel"], 1);
    }

    #[tokio::test]
    async fn credential_failure_is_application_error() {
        let (_, client) = client_with(vec![json!({"success": false, "message": "no auth"})]);

        let err = client.get_upload_credentials("a.pdf").await.unwrap_err();
        match err.downcast_ref::<PublishError>() {
            Some(PublishError::Application { message, .. }) => assert_eq!(message, "no auth"),
            other => panic!("期望 Application 错误, 实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn notify_body_matches_contract() {
        let (executor, client) = client_with(vec![json!({"success": true, "data": [{"id": 7}]})]);
        let file_info = FileInfo {
            url: "https://cdn.example.com/p/u/a.pdf".to_string(),
            key: "p/u/a.pdf".to_string(),
        };

        let response = client
            .notify_application_server("a.pdf", &file_info)
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.data.unwrap()[0]["id"], 7);

        let request = &executor.recorded()[0];
        assert!(request.url.ends_with("/attachment/batch/upload/files"));
        let body = request.body.as_ref().unwrap();
        let attachment = &body["uploadAttachments"][0];
        assert_eq!(attachment["fileName"], "a.pdf");
        assert_eq!(attachment["fileType"], "pdf");
        assert_eq!(attachment["fileUrl"], "https://cdn.example.com/p/u/a.pdf");
        assert_eq!(attachment["resourceType"], "zbtiku_pc");
        assert_eq!(body["fileUploadType"], 5);
        assert_eq!(body["fileContentType"], 1);
        assert_eq!(body["paperId"], "");
    }

    #[tokio::test]
    async fn notify_passes_failure_response_through() {
        let (_, client) = client_with(vec![json!({"success": false, "message": "limit"})]);
        let file_info = FileInfo {
            url: "u".to_string(),
            key: "k".to_string(),
        };

        // 声明失败的响应不是本层的错误，原样交给调用方
        let response = client
            .notify_application_server("a.pdf", &file_info)
            .await
            .unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn save_paper_extracts_numeric_id() {
        let (executor, client) = client_with(vec![json!({"success": true, "data": 42})]);
        let payload = json!({"title": "试卷", "attachments": []});

        let response = client.save_paper(&payload).await.unwrap();
        assert!(response.success);
        assert_eq!(response.data.as_deref(), Some("42"));

        let request = &executor.recorded()[0];
        assert!(request.url.ends_with("/paper/new/save"));
        assert_eq!(request.body.as_ref().unwrap()["title"], "试卷");
    }
}
