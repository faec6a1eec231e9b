use std::collections::HashMap;

use crate::utils::CardError;

use super::Nuisance;

/// nuisance集合（名称唯一，保留插入顺序）
///
/// 顺序单独记录在`order`中，重建nuisance块时按原有行序输出。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NuisanceCollection {
    nuisances: HashMap<String, Nuisance>,
    order: Vec<String>,
}

impl NuisanceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入nuisance，名称已存在时失败
    pub fn add_nuisance(&mut self, nuisance: Nuisance) -> Result<(), CardError> {
        if self.nuisances.contains_key(&nuisance.name) {
            return Err(CardError::DuplicateKey(format!(
                "cannot insert duplicate nuisance name: {}",
                nuisance.name
            )));
        }
        self.order.push(nuisance.name.clone());
        self.nuisances.insert(nuisance.name.clone(), nuisance);
        Ok(())
    }

    /// 移除nuisance，名称不存在时失败
    pub fn remove_nuisance(&mut self, name: &str) -> Result<Nuisance, CardError> {
        match self.nuisances.remove(name) {
            Some(nuisance) => {
                self.order.retain(|n| n != name);
                Ok(nuisance)
            }
            None => Err(CardError::NotFound(format!(
                "no such nuisance: {}",
                name
            ))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Nuisance> {
        self.nuisances.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Nuisance> {
        self.nuisances.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nuisances.contains_key(name)
    }

    /// 查询指定nuisance对(过程, 区域)的效应
    ///
    /// nuisance不存在返回NotFound；存在但组合未记录时返回占位值。
    pub fn get_nuisance_effect(
        &self,
        nuisance_name: &str,
        process_name: &str,
        region_name: &str,
    ) -> Result<&str, CardError> {
        let nuisance = self.nuisances.get(nuisance_name).ok_or_else(|| {
            CardError::NotFound(format!("no such nuisance: {}", nuisance_name))
        })?;
        Ok(nuisance.get_effect(process_name, region_name))
    }

    /// 写入指定nuisance对(过程, 区域)的效应
    pub fn set_nuisance_effect(
        &mut self,
        nuisance_name: &str,
        process_name: &str,
        region_name: &str,
        value: impl ToString,
    ) -> Result<(), CardError> {
        let nuisance = self.nuisances.get_mut(nuisance_name).ok_or_else(|| {
            CardError::NotFound(format!("no such nuisance: {}", nuisance_name))
        })?;
        nuisance.set_effect(process_name, region_name, value);
        Ok(())
    }

    /// 按插入顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Nuisance> {
        self.order
            .iter()
            .filter_map(move |name| self.nuisances.get(name))
    }

    /// 按插入顺序列出名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nuisances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nuisances.is_empty()
    }
}
