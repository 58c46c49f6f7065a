use crate::models::job::CompareJob;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 对比槽位数量上限
const MAX_COMPARISONS: usize = 3;

/// 从 TOML 文件加载对比任务
///
/// 相对路径按任务文件所在目录解析
pub async fn load_job(job_file_path: &Path) -> Result<CompareJob> {
    let content = fs::read_to_string(job_file_path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", job_file_path.display()))?;

    let mut job: CompareJob = toml::from_str(&content)
        .with_context(|| format!("无法解析任务文件: {}", job_file_path.display()))?;

    if job.comparisons.len() > MAX_COMPARISONS {
        anyhow::bail!(
            "任务文件 {} 中有 {} 个对比序列，最多支持 {} 个",
            job_file_path.display(),
            job.comparisons.len(),
            MAX_COMPARISONS
        );
    }

    if let Some(base) = job_file_path.parent() {
        job.resolve_relative_to(base);
    }

    tracing::info!(
        "已加载任务: 参考 {} | 对比 {} 个",
        job.reference.display(),
        job.comparisons.len()
    );

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_load_job_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "reference = \"ref.dcm\"\ncomparisons = [\"a.dcm\"]\nmatch_names = true\n",
        )
        .unwrap();

        let job = load_job(&job_path).await.unwrap();
        assert_eq!(job.reference, dir.path().join("ref.dcm"));
        assert_eq!(job.comparisons, vec![dir.path().join("a.dcm")]);
        assert!(job.match_names);
    }

    #[tokio::test]
    async fn test_load_job_rejects_too_many_comparisons() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "reference = \"r.dcm\"\ncomparisons = [\"a.dcm\", \"b.dcm\", \"c.dcm\", \"d.dcm\"]\n",
        )
        .unwrap();

        assert!(load_job(&job_path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_job_missing_file() {
        let result = load_job(&PathBuf::from("/nonexistent/job.toml")).await;
        tokio_test::assert_err!(result);
    }
}
