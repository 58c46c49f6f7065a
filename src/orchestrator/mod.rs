//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责槽位状态、批量对比和并发调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 读取任务文件
//! - 依次载入槽位、匹配、计算、导出
//! - 输出全局统计信息
//!
//! ### `session` - 对比会话
//! - 持有四个槽位及其工作目录
//! - 维护行对齐（按位置 / 按名称匹配）
//! - 检查计算和导出的前置条件
//!
//! ### `batch_comparator` - 批量对比
//! - 按行、按槽位生成对比对
//! - 通过准入队列提交，汇总结果
//!
//! ### `admission` - 有界准入队列
//! - 限制同时运行的外部进程数
//! - 先提交先放行
//!
//! ## 层次关系
//!
//! ```text
//! app (一次任务)
//!     ↓
//! session (四个槽位)
//!     ↓
//! batch_comparator (Vec<ComparePair>) → admission
//!     ↓
//! services (能力层：extraction / matching / export / tool)
//!     ↓
//! infrastructure (基础设施：ToolCommand / WorkingDirectory)
//! ```

pub mod admission;
pub mod app;
pub mod batch_comparator;
pub mod session;

// 重新导出主要类型
pub use admission::AdmissionQueue;
pub use app::{App, RunSummary};
pub use batch_comparator::{plan_pairs, BatchComparator, BatchReport, ComparePair};
pub use session::{LoadOutcome, Session, SessionState};
