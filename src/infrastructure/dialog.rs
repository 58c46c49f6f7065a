//! 文件对话框
//!
//! 选择输入文件和导出位置。返回 `None` 表示用户取消。

use crate::models::{CompareJob, SlotId};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 文件选择能力
pub trait FileDialog {
    /// 为某槽位选择输入文件，只接受扩展名为 `extension` 的文件
    fn pick_input(&self, slot: SlotId, extension: &str) -> Option<PathBuf>;

    /// 选择导出位置，`default_name` 为建议的文件名
    fn pick_save_destination(&self, default_name: &str) -> Option<PathBuf>;
}

/// 由任务文件回答的对话框
pub struct JobDialog<'a> {
    job: &'a CompareJob,
}

impl<'a> JobDialog<'a> {
    pub fn new(job: &'a CompareJob) -> Self {
        Self { job }
    }
}

impl FileDialog for JobDialog<'_> {
    fn pick_input(&self, slot: SlotId, extension: &str) -> Option<PathBuf> {
        let path = self.job.input_for(slot)?;
        if !has_extension(path, extension) {
            warn!(
                "⚠️ {} 的文件 {} 不是 .{} 文件，已忽略",
                slot,
                path.display(),
                extension
            );
            return None;
        }
        Some(path.to_path_buf())
    }

    fn pick_save_destination(&self, default_name: &str) -> Option<PathBuf> {
        if self.job.skip_export {
            return None;
        }
        Some(
            self.job
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_name)),
        )
    }
}

/// 扩展名比较（不区分大小写）
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension.trim_start_matches('.')))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(toml_text: &str) -> CompareJob {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("/a/RS.DCM"), "dcm"));
        assert!(has_extension(Path::new("/a/rs.dcm"), ".dcm"));
        assert!(!has_extension(Path::new("/a/rs.nii"), "dcm"));
        assert!(!has_extension(Path::new("/a/rs"), "dcm"));
    }

    #[test]
    fn test_pick_input_filters_extension() {
        let job = job("reference = \"ref.dcm\"\ncomparisons = [\"a.nii\"]\n");
        let dialog = JobDialog::new(&job);

        assert_eq!(
            dialog.pick_input(SlotId::Reference, "dcm"),
            Some(PathBuf::from("ref.dcm"))
        );
        assert_eq!(dialog.pick_input(SlotId::Second, "dcm"), None);
        assert_eq!(dialog.pick_input(SlotId::Third, "dcm"), None);
    }

    #[test]
    fn test_pick_save_destination() {
        let default_job = job("reference = \"ref.dcm\"\n");
        assert_eq!(
            JobDialog::new(&default_job).pick_save_destination("resultados_dice.csv"),
            Some(PathBuf::from("resultados_dice.csv"))
        );

        let custom = job("reference = \"ref.dcm\"\noutput = \"/out/r.csv\"\n");
        assert_eq!(
            JobDialog::new(&custom).pick_save_destination("resultados_dice.csv"),
            Some(PathBuf::from("/out/r.csv"))
        );

        let cancelled = job("reference = \"ref.dcm\"\nskip_export = true\n");
        assert_eq!(
            JobDialog::new(&cancelled).pick_save_destination("resultados_dice.csv"),
            None
        );
    }
}
