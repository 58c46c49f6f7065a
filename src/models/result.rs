//! 对比结果与结果表

use crate::models::alignment::Alignment;
use crate::models::slot::SlotId;

/// 失败时显示 / 导出的标记
pub const ERROR_MARKER: &str = "error";

/// 表格中空位的显示
const EMPTY_CELL: &str = "-";

/// 单次对比的结果
#[derive(Debug, Clone, PartialEq)]
pub enum CompareOutcome {
    /// 成功，分数保留 3 位小数
    Success { score: f64 },
    /// 失败
    Failure { reason: String },
}

impl CompareOutcome {
    /// 由工具输出的原始分数创建，四舍五入到 3 位小数
    pub fn success(raw_score: f64) -> Self {
        CompareOutcome::Success {
            score: (raw_score * 1000.0).round() / 1000.0,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        CompareOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompareOutcome::Success { .. })
    }

    /// 显示 / 导出的文本：3 位小数或 `error`
    pub fn display_text(&self) -> String {
        match self {
            CompareOutcome::Success { score } => format!("{:.3}", score),
            CompareOutcome::Failure { .. } => ERROR_MARKER.to_string(),
        }
    }
}

/// 一条对比结果
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// 所在行
    pub row: usize,
    /// 对比槽位
    pub slot: SlotId,
    /// 参考结构名
    pub reference_name: String,
    /// 对比结构名
    pub compared_name: String,
    pub outcome: CompareOutcome,
}

impl ComparisonResult {
    pub fn slot_label(&self) -> String {
        self.slot.label()
    }
}

/// 结果表中的一行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// 四个槽位的结构名
    pub names: [Option<String>; 4],
    /// 槽位 2-4 的对比结果
    pub outcomes: [Option<CompareOutcome>; 3],
}

/// 按行 / 列定位的结果表
///
/// 结果按 (行, 槽位) 写入，与完成顺序无关
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<TableRow>,
}

impl ResultTable {
    /// 按当前对齐生成空表
    pub fn from_alignment(alignment: &Alignment) -> Self {
        let rows = (0..alignment.row_count())
            .map(|row| TableRow {
                names: SlotId::ALL.map(|slot| alignment.entry(slot, row).map(|e| e.name.clone())),
                outcomes: Default::default(),
            })
            .collect();
        Self { rows }
    }

    /// 写入某行某对比槽位的结果
    ///
    /// 参考槽位或越界的行会被忽略
    pub fn set_outcome(&mut self, row: usize, slot: SlotId, outcome: CompareOutcome) {
        if slot.is_reference() {
            return;
        }
        if let Some(table_row) = self.rows.get_mut(row) {
            table_row.outcomes[slot.index() - 1] = Some(outcome);
        }
    }

    pub fn outcome(&self, row: usize, slot: SlotId) -> Option<&CompareOutcome> {
        if slot.is_reference() {
            return None;
        }
        self.rows.get(row)?.outcomes[slot.index() - 1].as_ref()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 渲染为文本行（表头 + 每行一条）
    pub fn render_lines(&self) -> Vec<String> {
        let mut header: Vec<String> = SlotId::ALL.iter().map(|s| s.label()).collect();
        header.extend(SlotId::COMPARISONS.iter().map(|s| format!("DICE {}", s.number())));

        let mut cells: Vec<Vec<String>> = vec![header];
        for row in &self.rows {
            let mut line: Vec<String> = row
                .names
                .iter()
                .map(|n| n.clone().unwrap_or_else(|| EMPTY_CELL.to_string()))
                .collect();
            line.extend(row.outcomes.iter().map(|o| {
                o.as_ref()
                    .map(CompareOutcome::display_text)
                    .unwrap_or_else(|| EMPTY_CELL.to_string())
            }));
            cells.push(line);
        }

        let widths: Vec<usize> = (0..cells[0].len())
            .map(|col| cells.iter().map(|l| l[col].chars().count()).max().unwrap_or(0))
            .collect();

        cells
            .iter()
            .map(|line| {
                line.iter()
                    .zip(&widths)
                    .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                    .collect::<Vec<_>>()
                    .join(" | ")
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}
