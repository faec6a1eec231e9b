use std::collections::HashMap;

use super::NO_EFFECT;

/// 一个nuisance参数及其逐单元效应
///
/// `effects`以(过程名, 区域名)为键，值为卡中的效应token原文，
/// 无效应以[`NO_EFFECT`]占位。键无序且唯一。
#[derive(Debug, Clone, PartialEq)]
pub struct Nuisance {
    /// nuisance名称
    pub name: String,
    /// 类型标识（如"lnN"、"shape"）
    pub kind: String,
    /// 效应映射 ((过程名, 区域名) -> 效应值)
    pub effects: HashMap<(String, String), String>,
}

impl Nuisance {
    /// 创建不含任何效应的nuisance
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            effects: HashMap::new(),
        }
    }

    /// 查询对指定(过程, 区域)的效应
    ///
    /// 未记录的组合返回[`NO_EFFECT`]，从不失败。
    pub fn get_effect(&self, process_name: &str, region_name: &str) -> &str {
        self.effects
            .get(&(process_name.to_string(), region_name.to_string()))
            .map(String::as_str)
            .unwrap_or(NO_EFFECT)
    }

    /// 效应的数值视图（占位值计为0）
    pub fn effect_value(&self, process_name: &str, region_name: &str) -> f64 {
        let raw = self.get_effect(process_name, region_name);
        if raw == NO_EFFECT {
            return 0.0;
        }
        raw.parse().unwrap_or(0.0)
    }

    /// 写入或覆盖对指定(过程, 区域)的效应
    pub fn set_effect(
        &mut self,
        process_name: impl Into<String>,
        region_name: impl Into<String>,
        value: impl ToString,
    ) {
        self.effects.insert(
            (process_name.into(), region_name.into()),
            value.to_string(),
        );
    }

    /// 判断是否影响指定过程
    ///
    /// 不给出区域时，只要任一记录键包含该过程名即为真；
    /// 给出区域时要求(过程, 区域)精确匹配。
    pub fn affects_process(&self, process_name: &str, region_name: Option<&str>) -> bool {
        match region_name {
            Some(region) => self
                .effects
                .contains_key(&(process_name.to_string(), region.to_string())),
            None => self.effects.keys().any(|(p, _)| p == process_name),
        }
    }

    /// 生成可序列化的导出视图（效应按键排序，输出稳定）
    pub fn report(&self) -> NuisanceReport {
        let mut effects: Vec<EffectEntry> = self
            .effects
            .iter()
            .map(|((process, region), value)| EffectEntry {
                process: process.clone(),
                region: region.clone(),
                value: value.clone(),
            })
            .collect();
        effects.sort_by(|a, b| (&a.process, &a.region).cmp(&(&b.process, &b.region)));

        NuisanceReport {
            name: self.name.clone(),
            kind: self.kind.clone(),
            effects,
        }
    }
}

/// 单条效应的导出形式
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EffectEntry {
    pub process: String,
    pub region: String,
    pub value: String,
}

/// nuisance的JSON导出形式
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NuisanceReport {
    pub name: String,
    pub kind: String,
    pub effects: Vec<EffectEntry>,
}
