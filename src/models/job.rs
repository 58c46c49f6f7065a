use crate::models::slot::SlotId;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 一次对比任务（来自 TOML 文件）
///
/// ```toml
/// reference = "ct_planejamento.dcm"
/// comparisons = ["ct_medico_a.dcm", "ct_medico_b.dcm"]
/// match_names = true
/// output = "resultados_dice.csv"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CompareJob {
    /// 参考序列（槽位 1）
    pub reference: PathBuf,
    /// 对比序列（槽位 2-4，最多 3 个）
    #[serde(default)]
    pub comparisons: Vec<PathBuf>,
    /// 计算前是否做名称匹配
    #[serde(default)]
    pub match_names: bool,
    /// 导出路径，为空时使用默认文件名
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// 跳过导出（相当于在保存对话框中点取消）
    #[serde(default)]
    pub skip_export: bool,
}

impl CompareJob {
    /// 某槽位对应的输入文件
    pub fn input_for(&self, slot: SlotId) -> Option<&Path> {
        match slot {
            SlotId::Reference => Some(self.reference.as_path()),
            other => self
                .comparisons
                .get(other.index() - 1)
                .map(PathBuf::as_path),
        }
    }

    /// 将相对路径解析为相对于 `base` 的路径
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.reference);
        self.comparisons.iter_mut().for_each(resolve);
        if let Some(output) = self.output.as_mut() {
            resolve(output);
        }
    }
}
