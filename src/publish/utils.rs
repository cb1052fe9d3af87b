/// 清理试卷名用作文件名 / COS key：替换文件系统和 URL 里不安全的字符，
/// 保留中文与常见标点
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .trim()
        .chars()
        .map(|c| match c {
            // Windows 文件系统不支持的字符
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            // URL 里容易出问题的字符
            '+' | '&' | '=' | '%' | '#' | '@' | '!' | '$' | '`' | '~' => '_',
            c if c.is_control() => '_',
            c if c.is_whitespace() => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_chinese_and_replaces_separators() {
        assert_eq!(
            sanitize_filename("2024年北京/中考 数学"),
            "2024年北京_中考_数学"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_filename("  Test2024  "), "Test2024");
    }
}
