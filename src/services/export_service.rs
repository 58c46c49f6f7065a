//! 结果导出服务 - 业务能力层
//!
//! 只负责把结果写成 CSV。先写入同目录下的临时文件，成功后再替换目标文件，
//! 所以报告成功的文件一定是完整的。

use crate::config::Config;
use crate::error::ExportError;
use crate::infrastructure::FileDialog;
use crate::models::ComparisonResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CSV 表头
pub const CSV_HEADER: [&str; 4] = [
    "Reference Structure",
    "Compared Structure",
    "Source Slot",
    "Dice",
];

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// 已写入
    Written { path: PathBuf, rows: usize },
    /// 用户取消，没有写任何文件
    Cancelled,
}

/// 结果导出服务
pub struct ExportService {
    default_file_name: String,
}

impl ExportService {
    pub fn new(config: &Config) -> Self {
        Self {
            default_file_name: config.export_file_name.clone(),
        }
    }

    /// 选择位置并导出
    pub fn export(
        &self,
        results: &[ComparisonResult],
        dialog: &impl FileDialog,
    ) -> Result<ExportOutcome, ExportError> {
        let Some(destination) = dialog.pick_save_destination(&self.default_file_name) else {
            info!("导出已取消");
            return Ok(ExportOutcome::Cancelled);
        };

        write_csv(&destination, results)?;
        info!("💾 已导出 {} 条结果: {}", results.len(), destination.display());

        Ok(ExportOutcome::Written {
            path: destination,
            rows: results.len(),
        })
    }
}

/// 生成 CSV 文本（含表头）
pub fn render_csv(results: &[ComparisonResult]) -> String {
    let mut csv = CSV_HEADER.map(csv_escape).join(",");
    csv.push('\n');

    for result in results {
        let row = [
            csv_escape(&result.reference_name),
            csv_escape(&result.compared_name),
            csv_escape(&result.slot_label()),
            csv_escape(&result.outcome.display_text()),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// 写入 CSV 文件
pub fn write_csv(destination: &Path, results: &[ComparisonResult]) -> Result<(), ExportError> {
    let content = render_csv(results);
    write_atomically(destination, content.as_bytes()).map_err(|source| ExportError::WriteFailed {
        path: destination.to_path_buf(),
        source,
    })
}

fn write_atomically(destination: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut staging = tempfile::NamedTempFile::new_in(parent)?;
    staging.write_all(content)?;
    staging.as_file().sync_all()?;
    debug!("临时文件写入完成: {}", staging.path().display());

    staging.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

fn csv_escape(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
