//! 外部进程执行 - 基础设施层
//!
//! 启动进程，逐行转发 stdout / stderr 到日志，同时收集 stdout，
//! 按退出码判断成功与否

use crate::error::ToolError;
use crate::infrastructure::command::ToolCommand;
use crate::utils::logging::truncate_text;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

/// stderr 写入错误信息时保留的最大长度
const STDERR_EXCERPT_LEN: usize = 500;

/// 进程输出
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// 运行命令直到退出
///
/// # 参数
/// - `command`: 要执行的命令
/// - `verb`: 日志标签（convert / dice）
/// - `timeout`: 超时，`None` 表示一直等待
///
/// # 返回
/// 退出码为 0 时返回输出，否则返回 `ToolError`
pub async fn run_streaming(
    command: &ToolCommand,
    verb: &'static str,
    timeout: Option<Duration>,
) -> Result<ProcessOutput, ToolError> {
    debug!("[{}] 执行: {}", verb, command);

    let mut child = command
        .to_command()
        .spawn()
        .map_err(|source| ToolError::SpawnFailed {
            program: command.program.clone(),
            source,
        })?;

    let stdout_task = tokio::spawn(collect_lines(child.stdout.take(), verb, "stdout"));
    let stderr_task = tokio::spawn(collect_lines(child.stderr.take(), verb, "stderr"));

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!("[{}] 超时 {} 秒，终止进程", verb, limit.as_secs());
                let _ = child.kill().await;
                return Err(ToolError::TimedOut {
                    secs: limit.as_secs(),
                });
            }
        },
        None => child.wait().await?,
    };

    let output = ProcessOutput {
        stdout: stdout_task.await.unwrap_or_default(),
        stderr: stderr_task.await.unwrap_or_default(),
    };

    if status.success() {
        Ok(output)
    } else {
        Err(ToolError::NonZeroExit {
            code: status.code(),
            stderr: truncate_text(output.stderr.trim(), STDERR_EXCERPT_LEN),
        })
    }
}

/// 逐行读取原始字节，非 UTF-8 内容按有损方式解码，不会中断读取
async fn collect_lines<R>(reader: Option<R>, verb: &'static str, stream: &'static str) -> String
where
    R: AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(reader) = reader else {
        return collected;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(&['\n', '\r'][..]);
                debug!("[{} {}] {}", verb, stream, line);
                collected.push_str(line);
                collected.push('\n');
            }
            Err(e) => {
                warn!("[{} {}] 读取输出失败: {}", verb, stream, e);
                break;
            }
        }
    }
    collected
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn test_collects_stdout_on_success() {
        let output = run_streaming(&sh("echo line1; echo line2; echo err >&2"), "test", None)
            .await
            .unwrap();
        assert_eq!(output.stdout, "line1\nline2\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let err = run_streaming(&sh("echo bad input >&2; exit 3"), "test", None)
            .await
            .unwrap_err();
        match err {
            ToolError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "bad input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_truncate_stdout() {
        let output = run_streaming(
            &sh("printf 'header \\377\\376\\n'; echo 'DICE: 0.75'"),
            "dice",
            None,
        )
        .await
        .unwrap();

        assert!(output.stdout.starts_with("header "));
        assert!(output.stdout.ends_with("DICE: 0.75\n"));
        let score = crate::services::tool::parse_dice_score(&output.stdout).unwrap();
        assert_eq!(score, 0.75);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let cmd = ToolCommand {
            program: "definitely-not-a-real-tool-4821".to_string(),
            args: Vec::new(),
        };
        let err = run_streaming(&cmd, "test", None).await.unwrap_err();
        assert!(matches!(err, ToolError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let err = run_streaming(&sh("sleep 5"), "test", Some(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
