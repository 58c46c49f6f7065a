//! 结构注册表
//!
//! 一个槽位内：结构名 → 结构文件路径，保持插入顺序

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 单个结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureEntry {
    /// 结构名（文件名去掉扩展名）
    pub name: String,
    /// 结构文件的绝对路径
    pub path: PathBuf,
}

/// 结构注册表
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    entries: Vec<StructureEntry>,
    index: HashMap<String, usize>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按给定顺序从结构文件构建注册表
    ///
    /// 无法得到文件名的路径会被跳过
    pub fn from_artifacts(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut registry = Self::new();
        for path in paths {
            match structure_name(&path) {
                Some(name) => {
                    registry.insert(name, path);
                }
                None => warn!("跳过无法识别名称的文件: {}", path.display()),
            }
        }
        registry
    }

    /// 插入结构，返回实际使用的名称
    ///
    /// 重名时追加数字后缀（`Liver`、`Liver_2`、`Liver_3`...）
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> String {
        let requested = name.into();
        let mut name = requested.clone();
        let mut suffix = 2;
        while self.index.contains_key(&name) {
            name = format!("{}_{}", requested, suffix);
            suffix += 1;
        }
        if name != requested {
            warn!("结构名重复: {}，重命名为 {}", requested, name);
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(StructureEntry {
            name: name.clone(),
            path: path.into(),
        });
        name
    }

    /// 按名称查找结构文件
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].path.as_path())
    }

    pub fn entries(&self) -> &[StructureEntry] {
        &self.entries
    }

    /// 按插入顺序返回结构名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 从结构文件路径得到结构名：文件名去掉最后一个扩展名
pub fn structure_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_name_strips_last_extension() {
        assert_eq!(
            structure_name(Path::new("/tmp/x/Liver.mha")).as_deref(),
            Some("Liver")
        );
        assert_eq!(
            structure_name(Path::new("/tmp/x/Kidney_L.nii.gz")).as_deref(),
            Some("Kidney_L.nii")
        );
        assert_eq!(structure_name(Path::new("/tmp/x/Heart")).as_deref(), Some("Heart"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let registry = StructureRegistry::from_artifacts(vec![
            PathBuf::from("/w/Spleen.mha"),
            PathBuf::from("/w/Aorta.mha"),
            PathBuf::from("/w/Liver.mha"),
        ]);

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["Spleen", "Aorta", "Liver"]);
        assert_eq!(registry.get("Aorta"), Some(Path::new("/w/Aorta.mha")));
        assert_eq!(registry.get("aorta"), None);
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let registry = StructureRegistry::from_artifacts(vec![
            PathBuf::from("/w/Liver.mha"),
            PathBuf::from("/w/Liver.nrrd"),
            PathBuf::from("/w/Liver.vtk"),
        ]);

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["Liver", "Liver_2", "Liver_3"]);
        assert_eq!(registry.get("Liver_2"), Some(Path::new("/w/Liver.nrrd")));
        assert_eq!(registry.len(), 3);
    }
}
