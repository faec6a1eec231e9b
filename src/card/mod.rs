mod edits;
mod paths;


pub use edits::NewProcess;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::format::{blocks_to_lines, split_lines, CardBlocks};
use crate::io::{CardReader, CardWriter, DefaultCardReader, DefaultCardWriter};
use crate::model::{Nuisance, NuisanceCollection, Process};
use crate::stats::CardStats;
use crate::utils::{split_tokens, CardError};

/// 数据卡管理器
///
/// 绑定一个输入卡文件，负责 加载 → 切块 → 内存编辑 → 排版 → 写出
/// 的完整流程。块集合是编辑的唯一事实来源；效应模型
/// （[`processes`](Self::processes)与[`nuisances`](Self::nuisances)）
/// 由块解析得到，结构性编辑之后不会自动更新，调用方需要时
/// 应显式调用[`refresh_model`](Self::refresh_model)。
///
/// # 使用示例
///
/// ```rust,ignore
/// use datacard_manager::CardManager;
///
/// let mut manager = CardManager::new("card.txt")?;
/// manager.nuisances.set_nuisance_effect("jer", "zh", "monojet_2018_signal", 2)?;
/// manager.rewrite_nuisance_block()?;
/// manager.write(Path::new("out/card.txt"), false)?;
/// ```
pub struct CardManager {
    /// 输入卡文件路径
    infile: PathBuf,
    /// 当前的块集合（编辑的事实来源）
    pub blocks: CardBlocks,
    /// 卡中的过程列表（按出现顺序去重）
    pub processes: Vec<Process>,
    /// 卡中的nuisance集合
    pub nuisances: NuisanceCollection,
}

impl CardManager {
    /// 从卡文件创建管理器并立即加载
    pub fn new(infile: impl Into<PathBuf>) -> Result<Self, CardError> {
        Self::with_reader(infile, &DefaultCardReader)
    }

    /// 使用自定义Reader创建管理器（依赖注入，便于测试）
    pub fn with_reader(
        infile: impl Into<PathBuf>,
        reader: &dyn CardReader,
    ) -> Result<Self, CardError> {
        let mut manager = Self {
            infile: infile.into(),
            blocks: CardBlocks::default(),
            processes: Vec::new(),
            nuisances: NuisanceCollection::new(),
        };
        manager.reset_with(reader)?;
        Ok(manager)
    }

    /// 输入卡文件路径
    pub fn source_path(&self) -> &Path {
        &self.infile
    }

    /// 将内存状态重置为源文件内容
    pub fn reset(&mut self) -> Result<(), CardError> {
        self.reset_with(&DefaultCardReader)
    }

    fn reset_with(&mut self, reader: &dyn CardReader) -> Result<(), CardError> {
        let lines = reader.read(&self.infile)?;
        self.blocks = split_lines(&lines)?;
        self.refresh_model()
    }

    /// 从当前块内容重新派生效应模型
    pub fn refresh_model(&mut self) -> Result<(), CardError> {
        self.processes = self.parse_processes()?;
        self.nuisances = self.parse_nuisances()?;
        Ok(())
    }

    /// 获取排版后的全部卡行
    pub fn get_lines(&self, separators: bool) -> Vec<String> {
        blocks_to_lines(&self.blocks, separators)
    }

    /// process块的前三行：区域行、过程名行、过程编号行
    fn process_header_rows(&self) -> Result<(&str, &str, &str), CardError> {
        if self.blocks.process.len() < 3 {
            return Err(CardError::Format(format!(
                "process block has {} rows, expected at least 3 (bin, name, id)",
                self.blocks.process.len()
            )));
        }
        Ok((
            &self.blocks.process[0],
            &self.blocks.process[1],
            &self.blocks.process[2],
        ))
    }

    /// 按列序派生(过程名, 区域名)对
    ///
    /// 第k列的(过程, 区域)对应process块区域行与过程名行的第k个token。
    pub fn process_region_pairs(&self) -> Result<Vec<(String, String)>, CardError> {
        let (bin_row, name_row, _) = self.process_header_rows()?;
        let regions = split_tokens(bin_row);
        let names = split_tokens(name_row);

        if regions.len() != names.len() {
            return Err(CardError::Format(format!(
                "process block region row has {} tokens but name row has {}",
                regions.len(),
                names.len()
            )));
        }

        Ok(names
            .iter()
            .skip(1)
            .zip(regions.iter().skip(1))
            .map(|(name, region)| (name.to_string(), region.to_string()))
            .collect())
    }

    /// 解析卡中的过程列表（按(id, name)身份去重，保留出现顺序）
    fn parse_processes(&self) -> Result<Vec<Process>, CardError> {
        let (_, name_row, id_row) = self.process_header_rows()?;
        let names = split_tokens(name_row);
        let ids = split_tokens(id_row);

        if names.len() != ids.len() {
            return Err(CardError::Format(format!(
                "process block name row has {} tokens but id row has {}",
                names.len(),
                ids.len()
            )));
        }

        let mut processes: Vec<Process> = Vec::new();
        for (name, id) in names.iter().skip(1).zip(ids.iter().skip(1)) {
            let id: i32 = id.parse().map_err(|_| {
                CardError::Format(format!("invalid process id token: {:?}", id))
            })?;
            let process = Process::new(id, *name);
            if !processes.contains(&process) {
                processes.push(process);
            }
        }
        Ok(processes)
    }

    /// 从nuisance块解析nuisance集合
    ///
    /// 每行形如 `name type v1 v2 ... vN`，第k个数值与process块
    /// 派生的第k个(过程, 区域)列一一对应。
    fn parse_nuisances(&self) -> Result<NuisanceCollection, CardError> {
        let pairs = self.process_region_pairs()?;

        let mut collection = NuisanceCollection::new();
        for line in &self.blocks.nuisance {
            let tokens = split_tokens(line);
            if tokens.len() < 2 {
                return Err(CardError::Format(format!(
                    "nuisance row too short: {:?}",
                    line
                )));
            }
            let values = &tokens[2..];
            if values.len() != pairs.len() {
                return Err(CardError::Format(format!(
                    "nuisance '{}' has {} values but the card has {} (process, region) columns",
                    tokens[0],
                    values.len(),
                    pairs.len()
                )));
            }

            let effects: HashMap<(String, String), String> = pairs
                .iter()
                .cloned()
                .zip(values.iter().map(|v| v.to_string()))
                .collect();

            collection.add_nuisance(Nuisance {
                name: tokens[0].to_string(),
                kind: tokens[1].to_string(),
                effects,
            })?;
        }
        Ok(collection)
    }

    /// 从当前nuisance集合重建nuisance块
    ///
    /// 行序为集合的插入顺序，列序取自process块当前的列序；
    /// 若未发生结构性增删，重建结果与原块逐token一致。
    /// 这是内存中的效应修改落盘的唯一途径。
    pub fn rewrite_nuisance_block(&mut self) -> Result<(), CardError> {
        let pairs = self.process_region_pairs()?;

        let mut new_block = Vec::with_capacity(self.nuisances.len());
        for nuisance in self.nuisances.iter() {
            let mut tokens = vec![nuisance.name.clone(), nuisance.kind.clone()];
            for (process, region) in &pairs {
                tokens.push(nuisance.get_effect(process, region).to_string());
            }
            new_block.push(tokens.join(" "));
        }
        self.blocks.nuisance = new_block;
        Ok(())
    }

    /// 汇总卡的统计信息
    pub fn stats(&self) -> Result<CardStats, CardError> {
        CardStats::collect(self)
    }

    /// 将数据卡写入文件
    ///
    /// 目标目录不存在时会创建；已存在的输出文件会被覆盖。
    /// `copy_workspace_files`为真时，先将卡引用的全部workspace
    /// 文件逐个拷贝到目标目录，并把引用改写为纯文件名。
    pub fn write(&mut self, outfile: &Path, copy_workspace_files: bool) -> Result<(), CardError> {
        self.write_with(&DefaultCardWriter, outfile, copy_workspace_files)
    }

    /// 使用自定义Writer写出
    pub fn write_with(
        &mut self,
        writer: &dyn CardWriter,
        outfile: &Path,
        copy_workspace_files: bool,
    ) -> Result<(), CardError> {
        if let Some(parent) = outfile.parent() {
            if !parent.as_os_str().is_empty() {
                // 目标目录已存在不算错误
                std::fs::create_dir_all(parent)?;
            }
        }

        if copy_workspace_files {
            let dest_dir = outfile
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            self.copy_workspace_files(&dest_dir)?;
        }

        let lines = self.get_lines(true);
        writer.write(&lines, outfile)
    }
}
