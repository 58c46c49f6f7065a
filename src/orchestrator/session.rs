//! 对比会话 - 编排层
//!
//! 持有四个槽位和当前行对齐，按状态机推进：
//!
//! ```text
//! Empty → Loaded → (Matched) → Compared → Exported
//! ```
//!
//! 任何一次重新载入都会回到 `Loaded`，并按位置重新对齐所有槽位

use crate::config::Config;
use crate::error::{AppError, AppResult, LoadError, SessionError};
use crate::infrastructure::FileDialog;
use crate::models::{Alignment, AlignmentMode, SlotId};
use crate::orchestrator::batch_comparator::{BatchComparator, BatchReport};
use crate::services::{
    ExportOutcome, ExportService, ExtractionService, LoadedInput, MatchingService,
    SegmentationTool,
};
use crate::utils::logging;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未载入任何槽位
    Empty,
    /// 至少载入了一个槽位，按位置对齐
    Loaded,
    /// 已做名称匹配
    Matched,
    /// 已计算 DICE
    Compared,
    /// 已导出
    Exported,
}

/// 载入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 已载入，附带结构数量
    Loaded { structures: usize },
    /// 用户取消
    Cancelled,
}

/// 对比会话
pub struct Session<T> {
    slots: [Option<LoadedInput>; 4],
    alignment: Alignment,
    state: SessionState,
    extraction: ExtractionService<T>,
    matcher: MatchingService,
    comparator: BatchComparator<T>,
    exporter: ExportService,
    input_extension: String,
    last_report: Option<BatchReport>,
}

impl<T: SegmentationTool> Session<T> {
    pub fn new(tool: Arc<T>, config: &Config) -> Self {
        Self {
            slots: Default::default(),
            alignment: Alignment::default(),
            state: SessionState::Empty,
            extraction: ExtractionService::new(Arc::clone(&tool), config),
            matcher: MatchingService::new(),
            comparator: BatchComparator::new(tool, config.max_concurrent_compares),
            exporter: ExportService::new(config),
            input_extension: config.input_extension.clone(),
            last_report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn slot(&self, slot: SlotId) -> Option<&LoadedInput> {
        self.slots[slot.index()].as_ref()
    }

    pub fn last_report(&self) -> Option<&BatchReport> {
        self.last_report.as_ref()
    }

    /// 通过对话框为槽位选择文件并载入
    pub async fn load_slot(
        &mut self,
        slot: SlotId,
        dialog: &impl FileDialog,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(input) = dialog.pick_input(slot, &self.input_extension) else {
            return Ok(LoadOutcome::Cancelled);
        };
        let structures = self.load_slot_from(slot, &input).await?;
        Ok(LoadOutcome::Loaded { structures })
    }

    /// 载入指定文件到槽位
    ///
    /// 失败时槽位保持原状；成功时替换旧内容（旧工作目录随之删除）
    pub async fn load_slot_from(&mut self, slot: SlotId, input: &Path) -> Result<usize, LoadError> {
        let loaded = self.extraction.load(input).await?;
        let structures = loaded.registry.len();
        logging::log_slot_loaded(&slot.label(), &input.display().to_string(), structures);

        self.slots[slot.index()] = Some(loaded);
        self.realign();
        Ok(structures)
    }

    fn realign(&mut self) {
        let registries = SlotId::ALL.map(|slot| self.slot(slot).map(|s| &s.registry));
        self.alignment = Alignment::positional(registries);
        self.state = SessionState::Loaded;
        self.last_report = None;
    }

    fn reference_ready(&self) -> bool {
        self.slot(SlotId::Reference)
            .is_some_and(|input| !input.registry.is_empty())
    }

    /// 对比槽位的名称替换为参考槽位中的最佳匹配
    ///
    /// # 返回
    /// 名称发生变化的条目数
    pub fn apply_matching(&mut self) -> Result<usize, SessionError> {
        if !self.reference_ready() {
            return Err(SessionError::ReferenceNotLoaded);
        }
        let renamed = self.matcher.apply(&mut self.alignment);
        info!("🔗 名称匹配完成: {} 个结构改名", renamed);

        self.state = SessionState::Matched;
        self.last_report = None;
        Ok(renamed)
    }

    /// 执行一次批量对比
    pub async fn compare(&mut self) -> Result<&BatchReport, SessionError> {
        if !self.reference_ready() {
            return Err(SessionError::ReferenceNotLoaded);
        }
        if !SlotId::COMPARISONS.iter().any(|&slot| self.slot(slot).is_some()) {
            return Err(SessionError::NoComparisonLoaded);
        }

        if self.alignment.mode() == AlignmentMode::Matched {
            info!("使用名称匹配后的对齐");
        }
        let report = self.comparator.run(&self.alignment).await?;
        self.state = SessionState::Compared;
        Ok(self.last_report.insert(report))
    }

    /// 导出最近一次批量对比的结果（按表格顺序）
    pub fn export(&mut self, dialog: &impl FileDialog) -> AppResult<ExportOutcome> {
        let report = self
            .last_report
            .as_ref()
            .ok_or(AppError::Session(SessionError::NotCompared))?;

        let outcome = self.exporter.export(&report.in_table_order(), dialog)?;
        if matches!(outcome, ExportOutcome::Written { .. }) {
            self.state = SessionState::Exported;
        }
        Ok(outcome)
    }
}
