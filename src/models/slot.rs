use std::fmt;

/// 输入槽位
///
/// 槽位 1 为参考序列，2-4 为对比序列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    /// 参考序列
    Reference = 1,
    /// 对比序列 2
    Second = 2,
    /// 对比序列 3
    Third = 3,
    /// 对比序列 4
    Fourth = 4,
}

impl SlotId {
    /// 全部槽位（按顺序）
    pub const ALL: [SlotId; 4] = [
        SlotId::Reference,
        SlotId::Second,
        SlotId::Third,
        SlotId::Fourth,
    ];

    /// 对比槽位
    pub const COMPARISONS: [SlotId; 3] = [SlotId::Second, SlotId::Third, SlotId::Fourth];

    /// 槽位编号（1-4）
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 数组下标（0-3）
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// 从编号解析槽位
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(SlotId::Reference),
            2 => Some(SlotId::Second),
            3 => Some(SlotId::Third),
            4 => Some(SlotId::Fourth),
            _ => None,
        }
    }

    pub fn is_reference(self) -> bool {
        self == SlotId::Reference
    }

    /// 导出 / 显示用的标签，例如 `Slot 2`
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot {}", self.number())
    }
}
