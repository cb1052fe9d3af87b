//! 发布流水线：凭证 -> COS 上传 -> 通知 -> 组装 -> 建卷 -> 落盘

pub mod api_client;
pub mod config;
pub mod models;
pub mod payload;
pub mod persist;
pub mod service;
pub mod upload;
pub mod utils;

pub use config::PublishConfig;
pub use service::PaperService;
