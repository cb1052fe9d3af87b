use serde::Deserialize;

/// 发布流程配置：平台地址、令牌与本地目录。
/// 每个组件在构造时拿到自己的一份，不读全局常量，方便测试替换假端点。
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_credential_api_path")]
    pub credential_api_path: String,
    #[serde(default = "default_notify_api_path")]
    pub notify_api_path: String,
    #[serde(default = "default_save_paper_api_path")]
    pub save_paper_api_path: String,
    #[serde(default = "default_tiku_token")]
    pub tiku_token: String,
    #[serde(default = "default_js_timeout_secs")]
    pub js_timeout_secs: u64,
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            credential_api_path: default_credential_api_path(),
            notify_api_path: default_notify_api_path(),
            save_paper_api_path: default_save_paper_api_path(),
            tiku_token: default_tiku_token(),
            js_timeout_secs: default_js_timeout_secs(),
            pdf_dir: default_pdf_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://tps-tiku-api.staff.xdf.cn".to_string()
}

fn default_credential_api_path() -> String {
    "/attachment/get/credential".to_string()
}

fn default_notify_api_path() -> String {
    "/attachment/batch/upload/files".to_string()
}

fn default_save_paper_api_path() -> String {
    "/paper/new/save".to_string()
}

fn default_tiku_token() -> String {
    "732FD8402F95087CD934374135C46EE5".to_string()
}

fn default_js_timeout_secs() -> u64 {
    16
}

fn default_pdf_dir() -> String {
    "PDF".to_string()
}

fn default_output_dir() -> String {
    "./output_toml".to_string()
}
