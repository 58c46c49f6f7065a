//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 按任务文件驱动一次完整的对比：
//!
//! 1. **载入**：依次为四个槽位选择输入并提取结构（单个槽位失败不影响其他槽位）
//! 2. **匹配**：任务要求时做名称匹配
//! 3. **计算**：批量计算 DICE，并发由准入队列控制
//! 4. **导出**：写出 CSV 并输出统计

use crate::config::Config;
use crate::infrastructure::JobDialog;
use crate::models::{load_job, CompareJob, ResultTable, SlotId};
use crate::orchestrator::session::{LoadOutcome, Session};
use crate::services::{ExportOutcome, ExternalTool, SegmentationTool};
use crate::utils::logging;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 一次运行的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    /// 导出的文件，未导出时为 `None`
    pub exported: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    job: CompareJob,
}

impl App {
    /// 初始化应用：输出启动信息并读取任务文件
    pub async fn initialize(config: Config, job_path: &Path) -> Result<Self> {
        logging::log_startup(&config.tool_program, config.max_concurrent_compares);

        info!("\n📁 正在读取任务文件: {}", job_path.display());
        let job = load_job(job_path).await?;

        Ok(Self { config, job })
    }

    /// 使用配置中的外部工具运行
    pub async fn run(&self) -> Result<RunSummary> {
        let tool = Arc::new(ExternalTool::from_config(&self.config));
        self.run_with_tool(tool).await
    }

    /// 使用指定的工具运行
    pub async fn run_with_tool<T: SegmentationTool>(&self, tool: Arc<T>) -> Result<RunSummary> {
        let mut session = Session::new(tool, &self.config);
        let dialog = JobDialog::new(&self.job);

        self.load_all(&mut session, &dialog).await;

        if self.job.match_names {
            if let Err(e) = session.apply_matching() {
                warn!("⚠️ 跳过名称匹配: {}", e);
            }
        }

        let report = session.compare().await?;
        log_table(&report.table);
        let mut summary = RunSummary {
            succeeded: report.succeeded(),
            failed: report.failed(),
            total: report.submitted(),
            exported: None,
        };

        match session.export(&dialog) {
            Ok(ExportOutcome::Written { path, .. }) => summary.exported = Some(path),
            Ok(ExportOutcome::Cancelled) => {}
            Err(e) => error!("❌ 导出失败: {}", e),
        }

        let exported = summary.exported.as_ref().map(|p| p.display().to_string());
        logging::print_final_stats(
            summary.succeeded,
            summary.failed,
            summary.total,
            exported.as_deref(),
        );

        Ok(summary)
    }

    async fn load_all<T: SegmentationTool>(&self, session: &mut Session<T>, dialog: &JobDialog<'_>) {
        for slot in SlotId::ALL {
            match session.load_slot(slot, dialog).await {
                Ok(LoadOutcome::Loaded { .. }) => {}
                Ok(LoadOutcome::Cancelled) => {
                    if self.job.input_for(slot).is_some() {
                        warn!("⚠️ {} 未载入", slot);
                    }
                }
                Err(e) => error!("❌ {} 载入失败: {}", slot, e),
            }
        }
    }
}

fn log_table(table: &ResultTable) {
    info!("\n📋 对比结果:");
    for line in table.render_lines() {
        info!("  {}", line);
    }
}
