use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 单道题目：来源标注 + 题干，全程原样携带
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub origin: String,
    pub stem: String,
}

/// 一份试卷的元数据与题干列表。
/// 字段顺序即落盘 TOML 的字段顺序；page_id 在创建成功后才会被填上。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPage {
    pub name: String,
    pub province: String,
    pub grade: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    pub stemlist: Vec<Question>,
}

/// 从 TOML 文件加载试卷元数据（抓取阶段的产物）
pub fn load_question_page(path: &Path) -> Result<QuestionPage> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("读取试卷元数据失败: {}", path.display()))?;
    let page: QuestionPage =
        toml::from_str(&raw).with_context(|| format!("解析试卷元数据失败: {}", path.display()))?;
    Ok(page)
}

// year 字段兼容字符串和整数两种写法
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer representing a year")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(YearVisitor)
}
