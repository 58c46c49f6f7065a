/// 结构名称匹配服务
///
/// 负责为对比序列中的结构找出参考序列里名称最相似的结构
use crate::models::{Alignment, AlignmentMode, SlotId};
use tracing::{debug, info};

/// 名称相似度（不区分大小写），取值 [0, 1]
///
/// 基于字符二元组的 Sørensen–Dice 系数，忽略空白
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// 结构名称匹配服务
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchingService;

impl MatchingService {
    pub fn new() -> Self {
        Self
    }

    /// 在候选名称中找出与 `name` 最相似的一个
    ///
    /// # 参数
    /// - `name`: 待匹配的结构名
    /// - `candidates`: 参考序列中的结构名
    ///
    /// # 返回
    /// 相似度严格最高的候选；并列时取先出现的；
    /// 候选为空或相似度都为 0 时原样返回 `name`
    pub fn find_best_match<S: AsRef<str>>(&self, name: &str, candidates: &[S]) -> String {
        let mut best = name;
        let mut best_score = 0.0;

        for candidate in candidates {
            let candidate = candidate.as_ref();
            let score = name_similarity(name, candidate);
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }

        debug!("匹配 {} → {} (相似度 {:.3})", name, best, best_score);
        best.to_string()
    }

    /// 将对比槽位（2-4）的名称替换为参考槽位中的最佳匹配
    ///
    /// 只修改显示名称，行位置和结构文件不变。重复执行结果不变。
    ///
    /// # 返回
    /// 名称发生变化的条目数
    pub fn apply(&self, alignment: &mut Alignment) -> usize {
        let reference = alignment.names(SlotId::Reference);
        let mut renamed = 0;

        for slot in SlotId::COMPARISONS {
            for entry in alignment.column_mut(slot).iter_mut() {
                let matched = self.find_best_match(&entry.name, &reference);
                if matched != entry.name {
                    info!("🔗 {}: {} → {}", slot, entry.name, matched);
                    entry.name = matched;
                    renamed += 1;
                }
            }
        }

        alignment.set_mode(AlignmentMode::Matched);
        renamed
    }
}
