//! 批量对比器 - 编排层
//!
//! ## 职责
//!
//! 根据当前的行对齐，列出所有 (参考结构, 对比结构) 对，
//! 通过有界准入队列并发调用外部工具，收集每一对的结果。
//!
//! ## 规则
//!
//! 1. 行数 = 四个槽位中最长的列
//! 2. 参考槽位在某行没有结构时，整行跳过
//! 3. 对比槽位在某行没有结构时，该 (行, 槽位) 不产生结果
//! 4. 每个提交的任务恰好产生一条结果：成功为分数，失败为 `error`，不会丢弃
//! 5. 所有任务结束后批次才算完成

use crate::error::SessionError;
use crate::models::{
    AlignedEntry, Alignment, CompareOutcome, ComparisonResult, ResultTable, SlotId,
};
use crate::orchestrator::admission::AdmissionQueue;
use crate::services::SegmentationTool;
use crate::utils::logging;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 一对待对比的结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePair {
    pub row: usize,
    pub slot: SlotId,
    pub reference: AlignedEntry,
    pub compared: AlignedEntry,
}

/// 按行、按槽位列出所有结构对
pub fn plan_pairs(alignment: &Alignment) -> Vec<ComparePair> {
    let mut pairs = Vec::new();
    for row in 0..alignment.row_count() {
        let Some(reference) = alignment.entry(SlotId::Reference, row) else {
            continue;
        };
        for slot in SlotId::COMPARISONS {
            if let Some(compared) = alignment.entry(slot, row) {
                pairs.push(ComparePair {
                    row,
                    slot,
                    reference: reference.clone(),
                    compared: compared.clone(),
                });
            }
        }
    }
    pairs
}

/// 一次批量对比的结果
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 按完成顺序排列的结果
    pub results: Vec<ComparisonResult>,
    /// 按 (行, 槽位) 写入的结果表
    pub table: ResultTable,
    /// 实际达到的最大并发
    pub peak_concurrency: usize,
}

impl BatchReport {
    pub fn submitted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.submitted() - self.succeeded()
    }

    /// 按表格顺序（行，再按槽位）排列的结果
    pub fn in_table_order(&self) -> Vec<ComparisonResult> {
        let mut ordered = self.results.clone();
        ordered.sort_by_key(|r| (r.row, r.slot));
        ordered
    }
}

/// 批量对比器
pub struct BatchComparator<T> {
    tool: Arc<T>,
    admission: AdmissionQueue,
}

impl<T: SegmentationTool> BatchComparator<T> {
    /// # 参数
    /// - `tool`: 外部工具
    /// - `max_concurrent`: 同时运行的对比进程上限
    pub fn new(tool: Arc<T>, max_concurrent: usize) -> Self {
        Self {
            tool,
            admission: AdmissionQueue::new(max_concurrent),
        }
    }

    /// 对当前对齐执行一次完整的批量对比
    ///
    /// 单个对比失败只记录为 `error`，不会中断批次
    pub async fn run(&self, alignment: &Alignment) -> Result<BatchReport, SessionError> {
        let pairs = plan_pairs(alignment);
        logging::log_batch_start(pairs.len(), self.admission.capacity());

        let mut report = BatchReport {
            table: ResultTable::from_alignment(alignment),
            ..Default::default()
        };
        self.admission.reset_peak();

        let mut pending = FuturesUnordered::new();
        for pair in pairs {
            let tool = Arc::clone(&self.tool);
            let structure_a = pair.reference.artifact.clone();
            let structure_b = pair.compared.artifact.clone();

            let handle = self
                .admission
                .submit(async move { tool.compare_structures(&structure_a, &structure_b).await })
                .await?;
            pending.push(handle.map(move |joined| (pair, joined)));
        }

        while let Some((pair, joined)) = pending.next().await {
            let outcome = match joined {
                Ok(Ok(score)) => CompareOutcome::success(score),
                Ok(Err(e)) => {
                    warn!(
                        "[行 {} {}] ⚠️ {} vs {} 对比失败: {}",
                        pair.row + 1,
                        pair.slot,
                        pair.reference.name,
                        pair.compared.name,
                        e
                    );
                    CompareOutcome::failure(e.to_string())
                }
                Err(e) => {
                    error!("[行 {} {}] ❌ 对比任务异常终止: {}", pair.row + 1, pair.slot, e);
                    CompareOutcome::failure(format!("任务异常终止: {}", e))
                }
            };

            debug!(
                "[行 {} {}] {} vs {} = {}",
                pair.row + 1,
                pair.slot,
                pair.reference.name,
                pair.compared.name,
                outcome.display_text()
            );

            report.table.set_outcome(pair.row, pair.slot, outcome.clone());
            report.results.push(ComparisonResult {
                row: pair.row,
                slot: pair.slot,
                reference_name: pair.reference.name,
                compared_name: pair.compared.name,
                outcome,
            });
        }

        report.peak_concurrency = self.admission.peak();
        logging::log_batch_complete(report.succeeded(), report.submitted(), report.peak_concurrency);

        Ok(report)
    }
}
