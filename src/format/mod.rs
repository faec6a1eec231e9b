mod formatter;
mod splitter;
mod table;


pub use formatter::blocks_to_lines;
pub use splitter::{find_first_param_line, is_separator_line, split_lines};

/// 数据卡的六个逻辑块
///
/// 每张卡按固定顺序由以下几块组成：
///
/// 0 - header块    (imax、jmax、kmax及注释)
/// ---- 分隔线      (仅由'-'和空格组成的行)
/// 1 - shape块     (shape直方图定义)
/// ---- 分隔线
/// 2 - bin块       (区域及观测数定义)
/// ---- 分隔线
/// 3 - process块   (各区域中的过程定义)
/// ---- 分隔线
/// 4 - nuisance块  (各nuisance对过程/区域的影响)
/// 5 - param块     (附加参数、rename语句等，与上一块之间没有分隔线)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockName {
    Header,
    Shape,
    Bin,
    Process,
    Nuisance,
    Param,
}

impl BlockName {
    /// 按卡内顺序列出全部块
    pub const ALL: [BlockName; 6] = [
        BlockName::Header,
        BlockName::Shape,
        BlockName::Bin,
        BlockName::Process,
        BlockName::Nuisance,
        BlockName::Param,
    ];

    /// 从块序号获取块名
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 获取块名字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockName::Header => "header",
            BlockName::Shape => "shape",
            BlockName::Bin => "bin",
            BlockName::Process => "process",
            BlockName::Nuisance => "nuisance",
            BlockName::Param => "param",
        }
    }
}

impl std::fmt::Display for BlockName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 数据卡的块集合
///
/// 每个字段保存一个块的全部行（不含分隔线）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardBlocks {
    pub header: Vec<String>,
    pub shape: Vec<String>,
    pub bin: Vec<String>,
    pub process: Vec<String>,
    pub nuisance: Vec<String>,
    pub param: Vec<String>,
}

impl CardBlocks {
    /// 获取指定块的行
    pub fn get(&self, name: BlockName) -> &Vec<String> {
        match name {
            BlockName::Header => &self.header,
            BlockName::Shape => &self.shape,
            BlockName::Bin => &self.bin,
            BlockName::Process => &self.process,
            BlockName::Nuisance => &self.nuisance,
            BlockName::Param => &self.param,
        }
    }

    /// 获取指定块的行（可变引用）
    pub fn get_mut(&mut self, name: BlockName) -> &mut Vec<String> {
        match name {
            BlockName::Header => &mut self.header,
            BlockName::Shape => &mut self.shape,
            BlockName::Bin => &mut self.bin,
            BlockName::Process => &mut self.process,
            BlockName::Nuisance => &mut self.nuisance,
            BlockName::Param => &mut self.param,
        }
    }

    /// 卡内全部行数（不含分隔线）
    pub fn line_count(&self) -> usize {
        BlockName::ALL.iter().map(|b| self.get(*b).len()).sum()
    }
}
