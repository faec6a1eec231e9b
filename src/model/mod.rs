mod collection;
mod nuisance;

#[cfg(test)]
mod tests;

pub use collection::NuisanceCollection;
pub use nuisance::{EffectEntry, Nuisance, NuisanceReport};

/// 无效应占位值
///
/// 表示某nuisance对某(process, region)组合没有效应，
/// 在卡文本中渲染为'-'。
pub const NO_EFFECT: &str = "-";

/// 数据卡中的一个过程（信号或本底贡献）
///
/// 以(id, name)二元组为身份：两个过程相等当且仅当id与name均相同。
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Process {
    /// 过程编号（0及负数为信号，正数为本底）
    pub id: i32,
    /// 过程名称
    pub name: String,
}

impl Process {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// 是否为信号过程
    pub fn is_signal(&self) -> bool {
        self.id <= 0
    }
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
