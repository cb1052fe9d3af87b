//! 把抓取好的试卷发布到题库平台。
//!
//! 流程：取上传凭证 -> 传 COS -> 通知服务器 -> 组装 payload -> 创建试卷 -> 落盘 TOML。
//! 每一步失败都会短路后续步骤。

pub mod app;
pub mod ask_llm;
pub mod browser;
pub mod error;
pub mod logger;
pub mod model;
pub mod publish;
pub mod remote;
pub mod storage;
