//! 阶段6: 本地落盘。成功提交后把试卷快照写成 TOML，这是整次运行唯一的
//! 持久副作用，任何更早阶段失败都不会产生它。

use crate::model::QuestionPage;
use crate::publish::utils::sanitize_filename;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 把试卷写到 `{output_dir}/{清理后的试卷名}.toml`，同名文件直接覆盖
pub fn persist_paper(question_page: &QuestionPage, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let sanitized_name = sanitize_filename(&question_page.name);
    let toml_path = output_dir.join(format!("{}.toml", sanitized_name));
    let toml_content = toml::to_string(question_page)?;
    fs::write(&toml_path, toml_content)?;
    info!("Saved TOML: {}", toml_path.display());
    Ok(toml_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("publish_paper_persist_{}", Uuid::new_v4()))
    }

    fn sample_page(page_id: Option<String>) -> QuestionPage {
        QuestionPage {
            name: "Test2024".to_string(),
            province: "Beijing".to_string(),
            grade: "九年级".to_string(),
            year: "2024".to_string(),
            subject: "Math".to_string(),
            page_id,
            stemlist: vec![Question {
                origin: "Q1".to_string(),
                stem: "2+2=?".to_string(),
            }],
        }
    }

    #[test]
    fn writes_snapshot_with_page_id_and_stems() {
        let dir = temp_dir();
        let page = sample_page(Some("PID-123".to_string()));

        let path = persist_paper(&page, &dir).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let reloaded: QuestionPage = toml::from_str(&raw).unwrap();

        assert_eq!(reloaded.page_id.as_deref(), Some("PID-123"));
        assert_eq!(reloaded.name, "Test2024");
        assert_eq!(reloaded.stemlist.len(), 1);
        assert_eq!(reloaded.stemlist[0].origin, "Q1");
        assert_eq!(reloaded.stemlist[0].stem, "2+2=?");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn omits_page_id_when_absent() {
        let dir = temp_dir();
        let page = sample_page(None);

        let path = persist_paper(&page, &dir).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("page_id"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = temp_dir();
        let mut page = sample_page(Some("OLD".to_string()));
        persist_paper(&page, &dir).unwrap();

        page.page_id = Some("NEW".to_string());
        let path = persist_paper(&page, &dir).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("NEW"));
        assert!(!raw.contains("OLD"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn sanitizes_file_name() {
        let dir = temp_dir();
        let mut page = sample_page(None);
        page.name = "2024/期中 试卷".to_string();

        let path = persist_paper(&page, &dir).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_期中_试卷.toml"
        );

        fs::remove_dir_all(&dir).ok();
    }
}
