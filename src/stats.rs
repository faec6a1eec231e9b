use std::collections::BTreeMap;

use crate::card::CardManager;
use crate::utils::CardError;

/// 数据卡统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct CardStats {
    /// 区域数量
    pub regions: usize,
    /// 过程数量（按(id, name)身份去重）
    pub processes: usize,
    /// 其中信号过程数量
    pub signal_processes: usize,
    /// (过程, 区域)列数
    pub columns: usize,
    /// nuisance数量
    pub nuisances: usize,
    /// 按类型统计的nuisance数量
    pub nuisances_by_kind: BTreeMap<String, usize>,
    /// param块行数
    pub params: usize,
}

impl CardStats {
    /// 从当前块内容汇总统计信息
    pub fn collect(manager: &CardManager) -> Result<Self, CardError> {
        let pairs = manager.process_region_pairs()?;

        let mut regions: Vec<&str> = Vec::new();
        for (_, region) in &pairs {
            if !regions.contains(&region.as_str()) {
                regions.push(region);
            }
        }

        let mut nuisances_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for nuisance in manager.nuisances.iter() {
            *nuisances_by_kind.entry(nuisance.kind.clone()).or_insert(0) += 1;
        }

        Ok(Self {
            regions: regions.len(),
            processes: manager.processes.len(),
            signal_processes: manager.processes.iter().filter(|p| p.is_signal()).count(),
            columns: pairs.len(),
            nuisances: manager.nuisances.len(),
            nuisances_by_kind,
            params: manager.blocks.param.len(),
        })
    }
}

impl std::fmt::Display for CardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 数据卡统计 ===")?;
        writeln!(f, "区域数量: {}", self.regions)?;
        writeln!(
            f,
            "过程数量: {} (其中信号过程: {})",
            self.processes, self.signal_processes
        )?;
        writeln!(f, "(过程, 区域)列数: {}", self.columns)?;
        writeln!(f, "nuisance数量: {}", self.nuisances)?;
        for (kind, count) in &self.nuisances_by_kind {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        writeln!(f, "附加参数行数: {}", self.params)?;
        Ok(())
    }
}
