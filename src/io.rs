/// IO 抽象层
///
/// 定义数据卡读写的抽象接口，支持依赖注入和测试 mock。
/// Reader/Writer只负责行级IO，不负责块切分与排版。
use std::path::Path;

use crate::utils::CardError;

/// 数据卡读取 trait
///
/// # 职责
/// - 从文件系统读取卡的全部行（含分隔线）
/// - 不负责解析，仅负责 IO
pub trait CardReader {
    /// 读取卡文件，返回去除首尾空白后的行
    fn read(&self, path: &Path) -> Result<Vec<String>, CardError>;
}

/// 数据卡写入 trait
///
/// # 职责
/// - 将排版后的行写入文件系统
/// - 不负责排版，仅负责 IO
pub trait CardWriter {
    /// 写入卡文件，已存在的文件会被覆盖
    fn write(&self, lines: &[String], path: &Path) -> Result<(), CardError>;
}

/// 默认的文件系统读取实现
pub struct DefaultCardReader;

impl CardReader for DefaultCardReader {
    fn read(&self, path: &Path) -> Result<Vec<String>, CardError> {
        let text = std::fs::read_to_string(path)?;
        Ok(text.lines().map(|line| line.trim().to_string()).collect())
    }
}

/// 默认的文件系统写入实现
pub struct DefaultCardWriter;

impl CardWriter for DefaultCardWriter {
    fn write(&self, lines: &[String], path: &Path) -> Result<(), CardError> {
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.txt");

        let lines = vec!["imax 1".to_string(), "jmax 2".to_string()];
        DefaultCardWriter.write(&lines, &path).unwrap();

        let loaded = DefaultCardReader.read(&path).unwrap();
        assert_eq!(loaded, lines);
    }

    #[test]
    fn test_read_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.txt");
        std::fs::write(&path, "  imax 1  \n\tjmax 2\n").unwrap();

        let loaded = DefaultCardReader.read(&path).unwrap();
        assert_eq!(loaded, vec!["imax 1", "jmax 2"]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = DefaultCardReader.read(Path::new("/nonexistent/card.txt"));
        assert!(matches!(result, Err(CardError::IoError(_))));
    }
}
