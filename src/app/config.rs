use crate::publish::PublishConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 程序入口配置，从 config.toml 读取，缺省字段用默认值
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,
    #[serde(default = "default_tiku_title")]
    pub tiku_target_title: String,
    /// 待发布试卷的元数据 TOML（抓取阶段的产物），单次运行只处理一份
    #[serde(default = "default_paper_toml")]
    pub paper_toml: String,
    #[serde(default)]
    pub publish: PublishConfig,
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            let cfg: AppConfig = toml::from_str(&raw)
                .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
            return Ok(cfg);
        }
        Ok(AppConfig::default())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            tiku_target_title: default_tiku_title(),
            paper_toml: default_paper_toml(),
            publish: PublishConfig::default(),
        }
    }
}

fn default_debug_port() -> u16 {
    2001
}

fn default_tiku_title() -> String {
    "题库平台 | 录排中心".to_string()
}

fn default_paper_toml() -> String {
    "paper.toml".to_string()
}
