use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::model::NO_EFFECT;
use crate::utils::{join_tokens, split_tokens, CardError};

use super::CardManager;

/// shape块行的首token分类
///
/// 行分类集中在一个封闭枚举里，add/drop操作据此保持一致，
/// 避免散落的字符串比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTag {
    Shapes,
    Bin,
    Observation,
    Process,
    Rate,
    Other,
}

impl RowTag {
    fn classify(token: &str) -> Self {
        match token {
            "shapes" => RowTag::Shapes,
            "bin" => RowTag::Bin,
            "observation" => RowTag::Observation,
            "process" => RowTag::Process,
            "rate" => RowTag::Rate,
            _ => RowTag::Other,
        }
    }
}

/// 待加入卡中的新过程描述
#[derive(Debug, Clone)]
pub struct NewProcess {
    /// 过程名称
    pub name: String,
    /// 所属区域
    pub region: String,
    /// 过程编号
    pub id: i32,
    /// workspace文件引用（shapes行的文件字段）
    pub workspace_file: String,
    /// 直方图说明（shapes行的直方图字段）
    pub histogram: String,
    /// 系统误差直方图说明（可选）
    pub systematic: Option<String>,
    /// 事例率
    pub rate: String,
    /// 各nuisance对新列的效应 (nuisance名 -> (类型, 效应值))
    pub nuisance_effects: HashMap<String, (String, String)>,
}

/// 在一行的指定token位置插入新token
fn line_insert(line: &str, position: usize, addition: &str) -> String {
    let mut parts: Vec<&str> = split_tokens(line);
    parts.insert(position.min(parts.len()), addition);
    join_tokens(&parts)
}

/// 从一行中移除指定位置的token（位置相对于`offset`之后的token区）
fn line_remove_columns(line: &str, offset: usize, drop: &HashSet<usize>) -> String {
    let parts = split_tokens(line);
    let kept: Vec<&str> = parts
        .iter()
        .enumerate()
        .filter(|(index, _)| *index < offset || !drop.contains(&(index - offset)))
        .map(|(_, token)| *token)
        .collect();
    join_tokens(&kept)
}

/// 编译完整匹配的正则（过程名/不确定度名按整个token匹配）
fn compile_full_match(pattern: &str) -> Result<Regex, CardError> {
    Ok(Regex::new(&format!("^(?:{})$", pattern))?)
}

impl CardManager {
    /// 调整header中声明的过程数（jmax）
    ///
    /// token为'*'（通配）时保持不变；没有jmax行时静默跳过。
    fn bump_process_count(&mut self, delta: i64) {
        for line in &mut self.blocks.header {
            let tokens = split_tokens(line);
            if tokens.first() != Some(&"jmax") {
                continue;
            }
            if let Some(count) = tokens.get(1).and_then(|t| t.parse::<i64>().ok()) {
                let mut new_tokens: Vec<String> =
                    tokens.iter().map(|t| t.to_string()).collect();
                new_tokens[1] = (count + delta).to_string();
                *line = new_tokens.join(" ");
            }
            return;
        }
    }

    /// 向卡中加入一个新过程
    ///
    /// - 过程名为新名称时，header中的过程数加一；
    /// - shape块追加一条shapes行；
    /// - process块每行在位置1插入新列；
    /// - 已有nuisance行：提供了效应的插入效应值（类型必须与该行
    ///   声明的类型一致），未提供的插入占位值；
    /// - 提供的效应中不存在对应行的nuisance，则追加新行，
    ///   原有各列填占位值。
    ///
    /// 结构性编辑不会自动更新效应模型，调用方需要时应执行
    /// [`refresh_model`](Self::refresh_model)。
    pub fn add_process(&mut self, new: &NewProcess) -> Result<(), CardError> {
        let known_names: HashSet<String> = self
            .parse_processes()?
            .into_iter()
            .map(|p| p.name)
            .collect();
        let column_count = self.process_region_pairs()?.len();

        // process块四行固定为 区域/过程名/过程编号/事例率
        if self.blocks.process.len() < 4 {
            return Err(CardError::Format(format!(
                "process block has {} rows, expected at least 4 (bin, name, id, rate)",
                self.blocks.process.len()
            )));
        }

        // 全部校验先于任何改写：出错时卡保持原状，不留下部分编辑
        for line in &self.blocks.nuisance {
            let tokens = split_tokens(line);
            let (name, declared_kind) = match (tokens.first(), tokens.get(1)) {
                (Some(name), Some(kind)) => (*name, *kind),
                _ => {
                    return Err(CardError::Format(format!(
                        "nuisance row too short: {:?}",
                        line
                    )))
                }
            };
            if let Some((kind, _)) = new.nuisance_effects.get(name) {
                if kind.as_str() != declared_kind {
                    return Err(CardError::TypeMismatch {
                        nuisance: name.to_string(),
                        expected: declared_kind.to_string(),
                        found: kind.clone(),
                    });
                }
            }
        }

        if !known_names.contains(&new.name) {
            self.bump_process_count(1);
        }

        let mut shape_tokens = vec![
            "shapes".to_string(),
            new.name.clone(),
            new.region.clone(),
            new.workspace_file.clone(),
            new.histogram.clone(),
        ];
        if let Some(systematic) = &new.systematic {
            shape_tokens.push(systematic.clone());
        }
        self.blocks.shape.push(shape_tokens.join(" "));

        // 新列统一插在位置1
        let id_token = new.id.to_string();
        let column_values = [
            new.region.as_str(),
            new.name.as_str(),
            id_token.as_str(),
            new.rate.as_str(),
        ];
        for (line, value) in self.blocks.process.iter_mut().zip(column_values.iter()) {
            *line = line_insert(line, 1, value);
        }

        let mut unmatched: HashMap<&String, &(String, String)> =
            new.nuisance_effects.iter().collect();
        for line in &mut self.blocks.nuisance {
            // 行的完整性已在上面的校验过程中确认
            let name = split_tokens(line)[0].to_string();
            let value = match unmatched.remove(&name) {
                Some((_, value)) => value.as_str(),
                None => NO_EFFECT,
            };
            *line = line_insert(line, 2, value);
        }

        // 尚无对应行的nuisance追加为新行（排序保证输出稳定）
        let mut leftover: Vec<(&String, &(String, String))> = unmatched.into_iter().collect();
        leftover.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, (kind, value)) in leftover {
            let mut tokens = vec![name.clone(), kind.clone(), value.clone()];
            tokens.extend(std::iter::repeat(NO_EFFECT.to_string()).take(column_count));
            self.blocks.nuisance.push(tokens.join(" "));
        }

        Ok(())
    }

    /// 从卡中移除匹配的过程
    ///
    /// `pattern`按名称精确匹配或作为正则整token匹配。移除引用该
    /// 过程的shapes行、process块与nuisance块中对应的数值列，
    /// 并将header中的过程数减一。process块中没有匹配列时整个
    /// 操作不触碰任何块（包括shapes行）。shape块中首token无法
    /// 识别的行会告警并保留，不中断整个编辑。
    pub fn drop_process(&mut self, pattern: &str) -> Result<(), CardError> {
        let re = compile_full_match(pattern)?;
        let matches = |name: &str| name == pattern || re.is_match(name);

        // 先收集要删除的列号，再统一过滤重建，避免边删边迭代；
        // 没有匹配列时直接返回，shapes行与过程数保持原状
        let (_, name_row, _) = self.process_header_rows()?;
        let drop_columns: HashSet<usize> = split_tokens(name_row)
            .iter()
            .skip(1)
            .enumerate()
            .filter(|(_, name)| matches(name))
            .map(|(index, _)| index)
            .collect();
        if drop_columns.is_empty() {
            return Ok(());
        }

        // shape块：移除引用该过程的shapes行
        let mut new_shape = Vec::with_capacity(self.blocks.shape.len());
        for line in &self.blocks.shape {
            let tokens = split_tokens(line);
            match tokens.first().map(|t| RowTag::classify(t)) {
                Some(RowTag::Shapes) => {
                    if tokens.get(1).is_some_and(|name| matches(name)) {
                        continue;
                    }
                }
                Some(RowTag::Other) | None => {
                    eprintln!("warning: unexpected row in shape block, keeping: {:?}", line);
                }
                _ => {}
            }
            new_shape.push(line.clone());
        }
        self.blocks.shape = new_shape;

        for line in &mut self.blocks.process {
            *line = line_remove_columns(line, 1, &drop_columns);
        }
        for line in &mut self.blocks.nuisance {
            *line = line_remove_columns(line, 2, &drop_columns);
        }

        self.bump_process_count(-1);
        Ok(())
    }

    /// 重命名信号过程
    ///
    /// 将`old_names[i]`逐token替换为`new_names[i]`（所有块的所有行，
    /// 保留原有空白宽度）；超出`new_names`长度的旧名称通过
    /// [`drop_process`](Self::drop_process)整体移除。
    pub fn rename_signal_processes(
        &mut self,
        new_names: &[String],
        old_names: &[String],
    ) -> Result<(), CardError> {
        for (old, new) in old_names.iter().zip(new_names.iter()) {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(old)))?;
            for block in [
                &mut self.blocks.header,
                &mut self.blocks.shape,
                &mut self.blocks.bin,
                &mut self.blocks.process,
                &mut self.blocks.nuisance,
                &mut self.blocks.param,
            ] {
                for line in block.iter_mut() {
                    *line = re.replace_all(line, new.as_str()).into_owned();
                }
            }
        }

        let surplus_start = new_names.len().min(old_names.len());
        for old in &old_names[surplus_start..] {
            self.drop_process(&regex::escape(old))?;
        }
        Ok(())
    }

    /// 按名称正则移除不确定度行，返回移除的行数
    pub fn drop_uncertainty(&mut self, pattern: &str) -> Result<usize, CardError> {
        let re = compile_full_match(pattern)?;
        let before = self.blocks.nuisance.len();
        self.blocks.nuisance.retain(|line| {
            !split_tokens(line)
                .first()
                .is_some_and(|name| re.is_match(name))
        });
        Ok(before - self.blocks.nuisance.len())
    }
}
