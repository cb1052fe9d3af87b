use crate::model::QuestionPage;
use crate::publish::api_client::ApiClient;
use crate::publish::config::PublishConfig;
use crate::publish::payload;
use crate::publish::persist::persist_paper;
use crate::publish::upload::UploadService;
use crate::publish::utils::sanitize_filename;
use crate::remote::RemoteExecutor;
use crate::storage::ObjectStorage;
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 试卷发布服务：串起六个阶段，任何一个阶段失败都短路后续阶段
pub struct PaperService {
    api_client: ApiClient,
    upload_service: UploadService,
    config: PublishConfig,
}

impl PaperService {
    pub fn new(
        executor: Arc<dyn RemoteExecutor>,
        storage: Arc<dyn ObjectStorage>,
        config: PublishConfig,
    ) -> Self {
        let api_client = ApiClient::new(executor, config.clone());
        let upload_service = UploadService::new(api_client.clone(), storage);
        Self {
            api_client,
            upload_service,
            config,
        }
    }

    /// 发布一份试卷。
    ///
    /// 成功时返回平台分配的 paper_id，并把带 page_id 的快照落盘；
    /// 平台拒绝提交时返回 Ok(None)，错误细节只记日志。
    /// 附件阶段（凭证/上传）失败会中止整次运行；只有通知接口调通但
    /// 声明失败这一种情况会降级为"不带附件提交"。
    pub async fn save_new_paper(
        &self,
        question_page: &mut QuestionPage,
        llm_fragment: &str,
    ) -> Result<Option<String>> {
        let name_for_cos = sanitize_filename(&question_page.name);
        let pdf_path = Path::new(&self.config.pdf_dir).join(format!("{}.pdf", name_for_cos));

        let attachments = self.upload_service.upload_pdf(&pdf_path).await?;
        if attachments.is_none() {
            warn!("附件阶段无结果，试卷将不带附件提交");
        }

        let mut payload_map = payload::parse_llm_fragment(llm_fragment)?;
        payload::merge_attachments(&mut payload_map, attachments);
        debug!("组装后的 payload: {}", payload::to_submission_json(&payload_map)?);
        let payload_value = Value::Object(payload_map);

        let result = self.api_client.save_paper(&payload_value).await?;

        if result.success {
            if let Some(paper_id) = result.data {
                info!("✅ 成功! 获取到的paper_id: {}", paper_id);
                question_page.page_id = Some(paper_id.clone());
                persist_paper(question_page, Path::new(&self.config.output_dir))?;
                Ok(Some(paper_id))
            } else {
                warn!("❌ API 返回成功但未包含 paper_id");
                Ok(None)
            }
        } else {
            let message = result.message.as_deref().unwrap_or("Unknown error");
            error!("❌ 请求失败或未返回成功状态: {}", message);
            Ok(None)
        }
    }
}
