//! 行对齐
//!
//! 四个槽位的结构按下标逐行对齐；可选地对对比槽位做名称匹配

use crate::models::registry::StructureRegistry;
use crate::models::slot::SlotId;
use std::path::PathBuf;

/// 对齐模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// 按载入顺序逐行对齐
    #[default]
    Positional,
    /// 对比槽位的名称已替换为参考槽位中最相似的名称
    Matched,
}

/// 对齐表中的一格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedEntry {
    /// 当前显示 / 参与对比的名称
    pub name: String,
    /// 注册表中的原始名称
    pub source_name: String,
    /// 原始结构文件
    pub artifact: PathBuf,
}

/// 四个槽位的对齐结果
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    columns: [Vec<AlignedEntry>; 4],
    mode: AlignmentMode,
}

impl Alignment {
    /// 由各槽位注册表按插入顺序构建
    pub fn positional(registries: [Option<&StructureRegistry>; 4]) -> Self {
        let mut alignment = Self::default();
        for (column, registry) in alignment.columns.iter_mut().zip(registries) {
            if let Some(registry) = registry {
                *column = registry
                    .entries()
                    .iter()
                    .map(|entry| AlignedEntry {
                        name: entry.name.clone(),
                        source_name: entry.name.clone(),
                        artifact: entry.path.clone(),
                    })
                    .collect();
            }
        }
        alignment
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AlignmentMode) {
        self.mode = mode;
    }

    pub fn column(&self, slot: SlotId) -> &[AlignedEntry] {
        &self.columns[slot.index()]
    }

    pub fn column_mut(&mut self, slot: SlotId) -> &mut Vec<AlignedEntry> {
        &mut self.columns[slot.index()]
    }

    /// 某槽位某行的结构
    pub fn entry(&self, slot: SlotId, row: usize) -> Option<&AlignedEntry> {
        self.columns[slot.index()].get(row)
    }

    /// 行数：四列中最长的一列
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// 某槽位的名称列表
    pub fn names(&self, slot: SlotId) -> Vec<String> {
        self.column(slot).iter().map(|e| e.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> StructureRegistry {
        StructureRegistry::from_artifacts(
            names.iter().map(|n| PathBuf::from(format!("/w/{}.mha", n))),
        )
    }

    #[test]
    fn test_positional_alignment() {
        let reference = registry(&["A", "B", "C"]);
        let second = registry(&["A", "D"]);
        let alignment = Alignment::positional([Some(&reference), Some(&second), None, None]);

        assert_eq!(alignment.row_count(), 3);
        assert_eq!(alignment.mode(), AlignmentMode::Positional);
        assert_eq!(alignment.entry(SlotId::Second, 1).map(|e| e.name.as_str()), Some("D"));
        assert!(alignment.entry(SlotId::Second, 2).is_none());
        assert!(alignment.column(SlotId::Fourth).is_empty());
    }

    #[test]
    fn test_empty_alignment() {
        let alignment = Alignment::positional([None, None, None, None]);
        assert_eq!(alignment.row_count(), 0);
    }
}
