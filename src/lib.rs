//! # Dice Compare
//!
//! 用外部分割工具比较四个 DICOM 序列中结构的 DICE 系数
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 外部进程、工作目录、文件对话框
//! - `ToolCommand` / `run_streaming` - 组装命令行并运行外部工具
//! - `WorkingDirectory` - 每个输入一个临时目录，随槽位释放
//!
//! ### ② 数据模型（Models）
//! - `models/` - 槽位、结构注册表、行对齐、结果表、任务文件
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ExtractionService` - 提取结构
//! - `MatchingService` - 结构名称匹配
//! - `ExportService` - 导出 CSV
//! - `SegmentationTool` - 外部工具接口
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 四个槽位的状态机
//! - `orchestrator/batch_comparator` - 批量对比，并发由 `admission` 控制
//! - `orchestrator/app` - 按任务文件跑完整流程
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CompareJob, CompareOutcome, ComparisonResult, SlotId};
pub use orchestrator::{App, RunSummary, Session};
pub use services::{ExternalTool, SegmentationTool};
