//! LLM 协作者：根据试卷名称/科目/省份生成建卷 payload 的基础字段。
//! 对流水线而言这是个不透明函数，返回的是去掉最外层大括号的 JSON 片段。

use crate::model::QuestionPage;
use openai::Credentials;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use tracing::{debug, warn};

// LLM 配置
const API_KEY: &str = "26e96c4d312e48feacbd78b7c42bd71e";
const API_BASE_URL: &str = "http://menshen.xdf.cn/v1";
const MODEL_NAME: &str = "gemini-3.0-pro-preview";

/// 通用的 LLM 调用函数
pub async fn ask_llm(user_message: &str) -> anyhow::Result<String> {
    debug!("正在调用 LLM API，模型: {}", MODEL_NAME);

    let credentials = Credentials::new(API_KEY, API_BASE_URL);
    let messages = vec![ChatCompletionMessage {
        role: ChatCompletionMessageRole::User,
        content: Some(user_message.to_string()),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }];

    let chat_completion = ChatCompletion::builder(MODEL_NAME, messages)
        .credentials(credentials)
        .create()
        .await
        .map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

    let returned_message = chat_completion
        .choices
        .first()
        .ok_or_else(|| anyhow::anyhow!("LLM 返回结果为空"))?
        .message
        .clone();
    let content = returned_message
        .content
        .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

    Ok(content.trim().to_string())
}

/// 让 LLM 生成建卷 payload 的基础字段，返回不含最外层大括号的片段
pub async fn ask_llm_for_payload(question_page: &QuestionPage) -> anyhow::Result<String> {
    let prompt = build_payload_prompt(question_page);
    let response = ask_llm(&prompt).await?;
    Ok(strip_object_braces(&response))
}

fn build_payload_prompt(question_page: &QuestionPage) -> String {
    format!(
        r#"你是一个专业的教务数据分析助手。请根据以下信息生成题库平台建卷接口的字段。

试卷名称: {}
科目: {}
省份: {}
年级: {}
年份: {}

请严格返回一个纯 JSON 对象，不要包含 markdown 代码块标记，不要输出任何解释文字。
对象需包含建卷接口要求的 title、subjectName、gradeName、paperYear 等基础字段。"#,
        question_page.name,
        question_page.subject,
        question_page.province,
        question_page.grade,
        question_page.year
    )
}

/// LLM 偶尔会带上代码块标记或最外层大括号，这里剥掉，只留对象内容
fn strip_object_braces(response: &str) -> String {
    let trimmed = response.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();
    let trimmed = trimmed.strip_prefix('{').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('}').unwrap_or(trimmed);
    trimmed.trim().to_string()
}
