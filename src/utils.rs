use std::path::Path;
use thiserror::Error;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Malformed data card: {0}")]
    Format(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Nuisance type mismatch for '{nuisance}': expected '{expected}', got '{found}'")]
    TypeMismatch {
        nuisance: String,
        expected: String,
        found: String,
    },

    #[error("Workspace file name clash: {0}")]
    NameClash(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// 按空白分割一行，丢弃首尾空白
pub fn split_tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// 将token序列重新拼接为单空格分隔的一行
pub fn join_tokens(tokens: &[&str]) -> String {
    tokens.join(" ")
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<std::path::PathBuf, CardError> {
    if !file_path.exists() {
        return Err(CardError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在",
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path).map_err(CardError::IoError)?;

    Ok(backup_path)
}

/// 比较两个token是否等价（忽略格式差异）
///
/// 字符串相同或数值相等均视为等价，例如 "1.0" 与 "1"。
pub fn compare_items(item1: &str, item2: &str) -> bool {
    if item1 == item2 {
        return true;
    }
    match (item1.parse::<f64>(), item2.parse::<f64>()) {
        (Ok(v1), Ok(v2)) => v1 == v2,
        _ => false,
    }
}

/// 比较两行是否等价（忽略空白宽度与分隔线长度）
pub fn compare_lines(line1: &str, line2: &str) -> bool {
    let t1 = normalize_line(line1);
    let t2 = normalize_line(line2);
    if t1.len() != t2.len() {
        return false;
    }
    t1.iter()
        .zip(t2.iter())
        .all(|(a, b)| compare_items(a, b))
}

/// 规范化一行：压缩空白，连续的'-'折叠为单个
fn normalize_line(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|token| {
            if token.chars().all(|c| c == '-') && token.len() > 1 {
                "-".to_string()
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// 比较两个数据卡文件是否等价（忽略格式差异）
pub fn compare_cards(card1: &Path, card2: &Path) -> Result<bool, CardError> {
    let lines1 = read_card_lines(card1)?;
    let lines2 = read_card_lines(card2)?;

    if lines1.len() != lines2.len() {
        return Ok(false);
    }

    Ok(lines1
        .iter()
        .zip(lines2.iter())
        .all(|(l1, l2)| compare_lines(l1, l2)))
}

fn read_card_lines(path: &Path) -> Result<Vec<String>, CardError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.lines().map(|l| l.trim().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_items() {
        assert!(compare_items("abc", "abc"));
        assert!(compare_items("1.0", "1"));
        assert!(compare_items("0.02", "2e-2"));

        assert!(!compare_items("abc", "abd"));
        assert!(!compare_items("1.0", "1.1"));
        assert!(!compare_items("-", "0"));
    }

    #[test]
    fn test_compare_lines() {
        assert!(compare_lines("jer  lnN   1", "jer lnN 1.0"));
        assert!(compare_lines("--------", "--"));
        assert!(!compare_lines("jer lnN 1", "jer lnN 2"));
        assert!(!compare_lines("jer lnN 1", "jer lnN 1 1"));
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(split_tokens("  a   b  c "), vec!["a", "b", "c"]);
        assert!(split_tokens("   ").is_empty());
        assert_eq!(join_tokens(&split_tokens("  a   b  c ")), "a b c");
    }
}
