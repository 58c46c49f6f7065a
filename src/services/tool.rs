//! 外部分割 / DICE 工具 - 业务能力层
//!
//! 只负责"提取结构"和"对比两个结构"两种能力，不关心槽位和批次

use crate::config::Config;
use crate::error::ToolError;
use crate::infrastructure::{run_streaming, ToolCommand};
use crate::utils::logging::truncate_text;
use regex::Regex;
use std::future::Future;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// 外部工具能力
///
/// 两个操作都会启动外部进程，调用方需要 await 结果
pub trait SegmentationTool: Send + Sync + 'static {
    /// 从输入文件提取结构，输出写入 `work_dir`
    fn extract_structures(
        &self,
        input: &Path,
        work_dir: &Path,
    ) -> impl Future<Output = Result<(), ToolError>> + Send;

    /// 计算两个结构文件的 DICE 系数
    fn compare_structures(
        &self,
        structure_a: &Path,
        structure_b: &Path,
    ) -> impl Future<Output = Result<f64, ToolError>> + Send;
}

/// 命令行工具实现
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: String,
    prefix_args: Vec<String>,
    timeout: Option<Duration>,
}

impl ExternalTool {
    pub fn new(program: impl Into<String>, prefix_args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            prefix_args,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tool_program.clone(),
            config.tool_prefix_args.clone(),
            config.tool_timeout(),
        )
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(self.program.clone(), &self.prefix_args)
    }
}

impl SegmentationTool for ExternalTool {
    async fn extract_structures(&self, input: &Path, work_dir: &Path) -> Result<(), ToolError> {
        let command = self.command().convert(input, work_dir);
        run_streaming(&command, "convert", self.timeout).await?;
        Ok(())
    }

    async fn compare_structures(&self, structure_a: &Path, structure_b: &Path) -> Result<f64, ToolError> {
        let command = self.command().dice(structure_a, structure_b);
        let output = run_streaming(&command, "dice", self.timeout).await?;
        let score = parse_dice_score(&output.stdout)?;
        debug!(
            "DICE {} vs {} = {}",
            structure_a.display(),
            structure_b.display(),
            score
        );
        Ok(score)
    }
}

fn dice_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)DICE:\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)")
            .expect("DICE pattern is a valid regex")
    })
}

/// 从工具输出中解析 DICE 值
///
/// 取第一处 `DICE: <数字>`（不区分大小写），数值必须在 [0, 1] 内
pub fn parse_dice_score(stdout: &str) -> Result<f64, ToolError> {
    let captured = dice_pattern()
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ToolError::MissingScore {
            output: truncate_text(stdout.trim(), 200),
        })?;

    let score: f64 = captured
        .as_str()
        .parse()
        .map_err(|_| ToolError::MissingScore {
            output: captured.as_str().to_string(),
        })?;

    if !(0.0..=1.0).contains(&score) {
        return Err(ToolError::ScoreOutOfRange(score));
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plastimatch_output() {
        let stdout = "Loading...\nTP:   1034\nTN:   99120\nDICE:       0.912345\nSE:  0.93\n";
        assert_eq!(parse_dice_score(stdout).unwrap(), 0.912345);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_dice_score("dice: 0.5").unwrap(), 0.5);
        assert_eq!(parse_dice_score("Dice:1").unwrap(), 1.0);
        assert_eq!(parse_dice_score("DICE: .25").unwrap(), 0.25);
    }

    #[test]
    fn test_parse_missing_score() {
        assert!(matches!(
            parse_dice_score("Similarity: 0.9"),
            Err(ToolError::MissingScore { .. })
        ));
        assert!(matches!(parse_dice_score(""), Err(ToolError::MissingScore { .. })));
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(
            parse_dice_score("DICE: 1.5"),
            Err(ToolError::ScoreOutOfRange(_))
        ));
        assert!(matches!(
            parse_dice_score("DICE: -0.1"),
            Err(ToolError::ScoreOutOfRange(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compare_through_wrapper() {
        let tool = ExternalTool::new(
            "sh",
            vec!["-c".to_string(), "echo \"DICE: 0.75 for $3\"".to_string(), "fake".to_string()],
            Some(Duration::from_secs(10)),
        );
        let score = tool
            .compare_structures(Path::new("/w/a.mha"), Path::new("/w/b.mha"))
            .await
            .unwrap();
        assert_eq!(score, 0.75);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compare_exit_zero_without_score_fails() {
        let tool = ExternalTool::new(
            "sh",
            vec!["-c".to_string(), "echo nothing here".to_string(), "fake".to_string()],
            None,
        );
        let result = tool
            .compare_structures(Path::new("/w/a.mha"), Path::new("/w/b.mha"))
            .await;
        assert!(matches!(result, Err(ToolError::MissingScore { .. })));
    }
}
