//! 结构提取服务 - 业务能力层
//!
//! 载入一个输入文件：创建工作目录 → 调用外部工具提取 → 列出结构文件建立注册表

use crate::config::Config;
use crate::error::LoadError;
use crate::infrastructure::WorkingDirectory;
use crate::models::StructureRegistry;
use crate::services::tool::SegmentationTool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// 已载入的输入
#[derive(Debug)]
pub struct LoadedInput {
    /// 输入文件
    pub source: PathBuf,
    /// 工作目录（随本结构释放）
    pub work_dir: WorkingDirectory,
    /// 提取出的结构
    pub registry: StructureRegistry,
}

/// 结构提取服务
pub struct ExtractionService<T> {
    tool: Arc<T>,
    work_dir_root: Option<PathBuf>,
    work_dir_prefix: String,
}

impl<T: SegmentationTool> ExtractionService<T> {
    pub fn new(tool: Arc<T>, config: &Config) -> Self {
        Self {
            tool,
            work_dir_root: config.work_dir_root.clone(),
            work_dir_prefix: config.work_dir_prefix.clone(),
        }
    }

    /// 载入输入文件并提取结构
    ///
    /// 失败时不会留下部分注册表，工作目录随错误一起释放
    pub async fn load(&self, input: &Path) -> Result<LoadedInput, LoadError> {
        let work_dir = WorkingDirectory::create(self.work_dir_root.as_deref(), &self.work_dir_prefix)?;

        info!("🔍 正在提取结构: {}", input.display());
        self.tool
            .extract_structures(input, work_dir.path())
            .await
            .map_err(|source| LoadError::ExtractFailed {
                input: input.to_path_buf(),
                source,
            })?;

        let artifacts = work_dir.list_artifacts().await?;
        let registry = StructureRegistry::from_artifacts(artifacts);
        if registry.is_empty() {
            warn!("⚠️ {} 没有提取到任何结构", input.display());
        }

        Ok(LoadedInput {
            source: input.to_path_buf(),
            work_dir,
            registry,
        })
    }
}
