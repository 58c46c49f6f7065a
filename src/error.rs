use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 导出失败
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 流程状态错误
    #[error("流程错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 载入错误（LoadFailure / ListFailure）
#[derive(Debug, Error)]
pub enum LoadError {
    /// 创建工作目录失败
    #[error("无法创建工作目录: {source}")]
    WorkDirFailed {
        #[source]
        source: std::io::Error,
    },
    /// 提取结构失败
    #[error("提取结构失败 ({}): {source}", input.display())]
    ExtractFailed {
        input: PathBuf,
        #[source]
        source: ToolError,
    },
    /// 列出工作目录失败
    #[error("无法列出工作目录 {}: {source}", dir.display())]
    ListFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 外部工具错误
#[derive(Debug, Error)]
pub enum ToolError {
    /// 进程无法启动
    #[error("无法启动 {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 进程以非零状态退出
    #[error("进程退出码 {}: {stderr}", code.map_or_else(|| "无(被信号终止)".to_string(), |c| c.to_string()))]
    NonZeroExit { code: Option<i32>, stderr: String },
    /// 等待进程时发生 IO 错误
    #[error("读取进程输出失败: {0}")]
    Io(#[from] std::io::Error),
    /// 超时
    #[error("进程超过 {secs} 秒未结束，已终止")]
    TimedOut { secs: u64 },
    /// 输出中找不到 DICE 值
    #[error("输出中未找到 DICE 值: {output}")]
    MissingScore { output: String },
    /// DICE 值不在 [0, 1] 范围内
    #[error("DICE 值 {0} 超出范围 [0, 1]")]
    ScoreOutOfRange(f64),
}

/// 导出错误（ExportFailure）
#[derive(Debug, Error)]
pub enum ExportError {
    /// 写入失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 流程状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 参考序列未载入或没有结构
    #[error("请先载入参考序列（槽位 1）及其结构")]
    ReferenceNotLoaded,
    /// 没有任何对比序列
    #[error("请至少载入一个用于对比的序列（槽位 2-4）")]
    NoComparisonLoaded,
    /// 尚未计算
    #[error("尚未计算 DICE，没有可导出的结果")]
    NotCompared,
    /// 并发队列已关闭
    #[error("并发队列已关闭")]
    AdmissionClosed,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配置值非法错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        })
    }
}

impl ToolError {
    /// 是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, ToolError::TimedOut { .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
