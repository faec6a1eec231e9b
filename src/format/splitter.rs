use std::sync::OnceLock;

use regex::Regex;

use crate::utils::{split_tokens, CardError};

use super::CardBlocks;

/// 判断是否为分隔线（仅由'-'和空格组成，允许空行）
pub fn is_separator_line(line: &str) -> bool {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATOR_RE.get_or_init(|| Regex::new(r"^[\- ]*$").expect("valid separator regex"));
    re.is_match(line)
}

/// 找出所有分隔线的行号
fn find_separator_lines(lines: &[String]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_separator_line(line))
        .map(|(index, _)| index)
        .collect()
}

/// 在nuisance/param合并区内定位param块的第一行
///
/// nuisance块与param块之间没有分隔线，只能靠行长变化推断边界：
/// 自上而下扫描，第一条token数严格小于前一行的行即为param块起点。
/// 该启发式对首行token数不少于末条nuisance行的param块会误判，
/// 因此集中在这一个函数里，便于将来换成显式标记格式。
pub fn find_first_param_line(lines: &[String]) -> Result<usize, CardError> {
    let mut previous_length = 0;
    for (index, line) in lines.iter().enumerate() {
        let length = split_tokens(line).len();
        if previous_length > length {
            return Ok(index);
        }
        previous_length = length;
    }
    Err(CardError::Format(
        "could not find separation between nuisance and param blocks".to_string(),
    ))
}

/// 将数据卡的全部行切分为六个块
///
/// 输入应包含卡的所有行（含分隔线）；分隔线本身会被丢弃，
/// 不会出现在任何块中。卡必须恰好含有四条分隔线，
/// 否则返回格式错误。
pub fn split_lines(lines: &[String]) -> Result<CardBlocks, CardError> {
    // 一张卡应当恰好包含四条分隔线
    let separator_indices = find_separator_lines(lines);
    if separator_indices.len() != 4 {
        return Err(CardError::Format(format!(
            "expected exactly 4 separator lines, found {}",
            separator_indices.len()
        )));
    }

    // 前四个块均以分隔线为界，直接按位置切片
    let mut spans = Vec::with_capacity(4);
    for (counter, &stop) in separator_indices.iter().enumerate() {
        let start = if counter > 0 {
            separator_indices[counter - 1] + 1
        } else {
            0
        };
        spans.push(lines[start..stop].to_vec());
    }

    // 第五、六块之间没有分隔线，扫描剩余行动态确定边界
    let last_separator = separator_indices[3];
    let leftover = &lines[last_separator + 1..];
    let first_param = find_first_param_line(leftover)?;

    let nuisance: Vec<String> = leftover[..first_param].to_vec();
    let param: Vec<String> = leftover[first_param..].to_vec();
    debug_assert_eq!(nuisance.len() + param.len(), leftover.len());

    let mut spans = spans.into_iter();
    Ok(CardBlocks {
        header: spans.next().unwrap_or_default(),
        shape: spans.next().unwrap_or_default(),
        bin: spans.next().unwrap_or_default(),
        process: spans.next().unwrap_or_default(),
        nuisance,
        param,
    })
}
