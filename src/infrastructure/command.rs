//! 外部工具命令构造
//!
//! 以参数列表的形式构造命令，直接交给进程 API，不经过 shell 解析

use crate::infrastructure::workdir::absolute_path;
use std::fmt;
use std::path::Path;
use std::process::Stdio;

/// 外部工具命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// # 参数
    /// - `program`: 可执行文件
    /// - `prefix_args`: 放在子命令之前的参数
    pub fn new(program: impl Into<String>, prefix_args: &[String]) -> Self {
        Self {
            program: program.into(),
            args: prefix_args.to_vec(),
        }
    }

    /// 提取结构：`convert --input <input> --output-prefix <work_dir>/`
    pub fn convert(mut self, input: &Path, work_dir: &Path) -> Self {
        let mut prefix = normalize_path(&absolute_path(work_dir));
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.args.extend([
            "convert".to_string(),
            "--input".to_string(),
            normalize_path(&absolute_path(input)),
            "--output-prefix".to_string(),
            prefix,
        ]);
        self
    }

    /// 计算 DICE：`dice --dice <a> <b>`
    pub fn dice(mut self, structure_a: &Path, structure_b: &Path) -> Self {
        self.args.extend([
            "dice".to_string(),
            "--dice".to_string(),
            normalize_path(&absolute_path(structure_a)),
            normalize_path(&absolute_path(structure_b)),
        ]);
        self
    }

    /// 生成可直接 spawn 的进程命令
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// 路径分隔符统一为 `/`
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
