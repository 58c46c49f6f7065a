//! 工作目录 - 基础设施层
//!
//! 每次载入一个输入文件就创建一个独立的临时目录，外部工具的输出写在里面。
//! 目录随 `WorkingDirectory` 一起释放。

use crate::error::LoadError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// 单个输入的工作目录
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: TempDir,
}

impl WorkingDirectory {
    /// 立即在文件系统上创建一个唯一命名的目录
    ///
    /// # 参数
    /// - `root`: 父目录，`None` 时使用系统临时目录
    /// - `prefix`: 目录名前缀
    pub fn create(root: Option<&Path>, prefix: &str) -> Result<Self, LoadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);

        let dir = match root {
            Some(root) => {
                let root = absolute_path(root);
                std::fs::create_dir_all(&root).map_err(|source| LoadError::WorkDirFailed { source })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|source| LoadError::WorkDirFailed { source })?;

        debug!("创建工作目录: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 列出外部工具写入的结构文件，按文件名排序
    ///
    /// 只返回普通文件
    pub async fn list_artifacts(&self) -> Result<Vec<PathBuf>, LoadError> {
        let list_failed = |source| LoadError::ListFailed {
            dir: self.path().to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(self.path()).await.map_err(list_failed)?;
        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_failed)? {
            let file_type = entry.file_type().await.map_err(list_failed)?;
            if file_type.is_file() {
                artifacts.push(entry.path());
            }
        }
        artifacts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!("工作目录 {} 中有 {} 个文件", self.path().display(), artifacts.len());
        Ok(artifacts)
    }
}

/// 相对路径按当前目录补全为绝对路径
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_unique_and_eager() {
        let root = tempfile::tempdir().unwrap();
        let a = WorkingDirectory::create(Some(root.path()), "dicom-compare-").unwrap();
        let b = WorkingDirectory::create(Some(root.path()), "dicom-compare-").unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("dicom-compare-"));
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let dir = WorkingDirectory::create(Some(root.path()), "wd-").unwrap();
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_list_artifacts_sorted_files_only() {
        let dir = WorkingDirectory::create(None, "wd-").unwrap();
        std::fs::write(dir.path().join("Spleen.mha"), b"").unwrap();
        std::fs::write(dir.path().join("Aorta.mha"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let artifacts = dir.list_artifacts().await.unwrap();
        let names: Vec<_> = artifacts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Aorta.mha", "Spleen.mha"]);
    }

    #[test]
    fn test_absolute_path() {
        assert!(absolute_path(Path::new("relative/x.dcm")).is_absolute());
    }
}
