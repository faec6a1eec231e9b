use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::utils::{split_tokens, CardError};
use crate::WORKSPACE_EXTENSION;

use super::CardManager;

/// 将workspace引用token拆为路径部分与冒号后缀
///
/// 引用形如 `path/to/model.root` 或 `model.root:wspace/obj`，
/// 冒号之后是文件内对象路径，不属于文件路径本身。
fn split_workspace_token(token: &str) -> (&str, &str) {
    match token.find(':') {
        Some(index) => token.split_at(index),
        None => (token, ""),
    }
}

/// 判断token是否为workspace文件引用（路径部分以固定扩展名结尾）
fn is_workspace_token(token: &str) -> bool {
    let (path, _) = split_workspace_token(token);
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == WORKSPACE_EXTENSION)
}

/// 文件名部分（不含目录）
fn basename(path: &str) -> Result<String, CardError> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            CardError::Format(format!("workspace reference has no file name: {:?}", path))
        })
}

impl CardManager {
    /// 列出卡引用的全部workspace文件路径（去重，按出现顺序）
    ///
    /// 只扫描shape块；冒号后缀不计入路径。
    pub fn workspace_file_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for line in &self.blocks.shape {
            for token in split_tokens(line) {
                if !is_workspace_token(token) {
                    continue;
                }
                let (path, _) = split_workspace_token(token);
                if !paths.iter().any(|p| p == path) {
                    paths.push(path.to_string());
                }
            }
        }
        paths
    }

    /// 对shape块中的每个workspace路径应用改写函数（后缀原样保留）
    fn rewrite_workspace_tokens(
        &mut self,
        rewrite: impl Fn(&str) -> Result<String, CardError>,
    ) -> Result<(), CardError> {
        let mut new_shape = Vec::with_capacity(self.blocks.shape.len());
        for line in &self.blocks.shape {
            let mut tokens: Vec<String> = Vec::new();
            for token in split_tokens(line) {
                if is_workspace_token(token) {
                    let (path, suffix) = split_workspace_token(token);
                    tokens.push(format!("{}{}", rewrite(path)?, suffix));
                } else {
                    tokens.push(token.to_string());
                }
            }
            new_shape.push(tokens.join(" "));
        }
        self.blocks.shape = new_shape;
        Ok(())
    }

    /// 卡文件所在目录的绝对路径
    fn card_dir(&self) -> Result<PathBuf, CardError> {
        let dir = self
            .source_path()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(std::env::current_dir()?.join(dir))
        }
    }

    /// 将workspace引用改写为绝对路径（相对路径按卡所在目录解析）
    ///
    /// 已是绝对路径的引用保持不变，因此该操作幂等。
    pub fn make_paths_absolute(&mut self) -> Result<(), CardError> {
        let base = self.card_dir()?;
        self.rewrite_workspace_tokens(|path| {
            if Path::new(path).is_absolute() {
                Ok(path.to_string())
            } else {
                Ok(base.join(path).to_string_lossy().into_owned())
            }
        })
    }

    /// 将workspace引用改写为纯文件名
    ///
    /// 两个不同的源路径折叠到同一文件名时返回NameClash。
    /// 对已是纯文件名的引用是恒等操作，因此幂等；
    /// 与[`make_paths_absolute`](Self::make_paths_absolute)互为逆操作。
    pub fn make_paths_basename(&mut self) -> Result<(), CardError> {
        self.check_basename_clashes()?;
        self.rewrite_workspace_tokens(|path| basename(path))
    }

    /// 校验去目录化不会让不同源路径折叠到同一文件名
    fn check_basename_clashes(&self) -> Result<(), CardError> {
        let mut seen: HashMap<String, String> = HashMap::new();
        for path in self.workspace_file_paths() {
            let name = basename(&path)?;
            if let Some(previous) = seen.get(&name) {
                if previous != &path {
                    return Err(CardError::NameClash(format!(
                        "both {:?} and {:?} map to {:?}",
                        previous, path, name
                    )));
                }
            } else {
                seen.insert(name, path);
            }
        }
        Ok(())
    }

    /// 将卡引用的workspace文件拷贝到目标目录，并把引用改写为文件名
    ///
    /// 逐个文件独立拷贝，不提供跨文件的事务保证。
    pub(crate) fn copy_workspace_files(&mut self, dest_dir: &Path) -> Result<(), CardError> {
        self.check_basename_clashes()?;
        let base = self.card_dir()?;

        for path in self.workspace_file_paths() {
            let source = if Path::new(&path).is_absolute() {
                PathBuf::from(&path)
            } else {
                base.join(&path)
            };
            let target = dest_dir.join(basename(&path)?);
            std::fs::copy(&source, &target)?;
        }

        self.make_paths_basename()
    }
}
