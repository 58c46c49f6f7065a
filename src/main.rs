use anyhow::Result;
use dice_compare::utils::logging;
use dice_compare::{App, Config};
use std::path::PathBuf;
use tracing::warn;

/// 默认任务文件
const DEFAULT_JOB_FILE: &str = "dice_job.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（无法解析的环境变量等日志就绪后再报告）
    let (config, rejected) = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);
    for message in &rejected {
        warn!("⚠️ {}", message);
    }

    // 任务文件：命令行参数 > DICE_JOB_FILE > 默认文件名
    let job_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DICE_JOB_FILE").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_JOB_FILE));

    // 初始化并运行应用
    App::initialize(config, &job_path).await?.run().await?;

    Ok(())
}
