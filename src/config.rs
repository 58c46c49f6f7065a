use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 外部分割 / DICE 工具
    pub tool_program: String,
    /// 放在子命令之前的额外参数（例如包装脚本）
    pub tool_prefix_args: Vec<String>,
    /// 同时运行的对比进程数量
    pub max_concurrent_compares: usize,
    /// 外部进程超时（秒），0 表示不限
    pub tool_timeout_secs: u64,
    /// 工作目录的父目录，为空时使用系统临时目录
    pub work_dir_root: Option<PathBuf>,
    /// 工作目录名前缀
    pub work_dir_prefix: String,
    /// 允许载入的文件扩展名
    pub input_extension: String,
    /// 默认导出文件名
    pub export_file_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_program: "plastimatch".to_string(),
            tool_prefix_args: Vec::new(),
            max_concurrent_compares: 5,
            tool_timeout_secs: 600,
            work_dir_root: None,
            work_dir_prefix: "dicom-compare-".to_string(),
            input_extension: "dcm".to_string(),
            export_file_name: "resultados_dice.csv".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，同时返回无法解析的环境变量说明
    ///
    /// 若设置了 `DICE_CONFIG_FILE`，先读取该 TOML 文件，再用其余环境变量覆盖。
    /// 日志尚未初始化时使用本函数，初始化后再输出返回的说明
    pub fn from_env() -> AppResult<(Self, Vec<String>)> {
        let base = match std::env::var("DICE_CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let mut rejected = Vec::new();
        let config = base.with_env_overrides(&mut rejected);
        config.validate()?;
        Ok((config, rejected))
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(self, rejected: &mut Vec<String>) -> Self {
        Self {
            tool_program: std::env::var("DICE_TOOL_PROGRAM").unwrap_or(self.tool_program),
            tool_prefix_args: std::env::var("DICE_TOOL_PREFIX_ARGS")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or(self.tool_prefix_args),
            max_concurrent_compares: env_parse("MAX_CONCURRENT_COMPARES", self.max_concurrent_compares, rejected),
            tool_timeout_secs: env_parse("TOOL_TIMEOUT_SECS", self.tool_timeout_secs, rejected),
            work_dir_root: std::env::var("WORK_DIR_ROOT").ok().map(PathBuf::from).or(self.work_dir_root),
            work_dir_prefix: std::env::var("WORK_DIR_PREFIX").unwrap_or(self.work_dir_prefix),
            input_extension: std::env::var("INPUT_EXTENSION").unwrap_or(self.input_extension),
            export_file_name: std::env::var("EXPORT_FILE_NAME").unwrap_or(self.export_file_name),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging, rejected),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_compares == 0 {
            return Err(AppError::invalid_config("max_concurrent_compares", "必须大于 0"));
        }
        if self.tool_program.trim().is_empty() {
            return Err(AppError::invalid_config("tool_program", "不能为空"));
        }
        Ok(())
    }

    /// 外部进程超时，`None` 表示不限
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }
}

fn env_parse<T: FromStr>(var_name: &str, default: T, rejected: &mut Vec<String>) -> T {
    match std::env::var(var_name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            rejected.push(format!("环境变量 {} 的值 '{}' 无法解析，使用默认值", var_name, value));
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_concurrent_compares, 5);
        assert_eq!(config.export_file_name, "resultados_dice.csv");
        assert_eq!(config.tool_timeout(), Some(Duration::from_secs(600)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let config = Config {
            tool_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.tool_timeout(), None);
    }

    #[test]
    fn test_unparsable_env_value_is_reported() {
        std::env::set_var("DICE_TEST_MAX_COMPARES_BAD", "five");
        std::env::remove_var("DICE_TEST_MAX_COMPARES_UNSET");
        let mut rejected = Vec::new();

        let value = env_parse("DICE_TEST_MAX_COMPARES_BAD", 5usize, &mut rejected);
        let unset = env_parse("DICE_TEST_MAX_COMPARES_UNSET", 7usize, &mut rejected);

        assert_eq!(value, 5);
        assert_eq!(unset, 7);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].contains("DICE_TEST_MAX_COMPARES_BAD"));
        assert!(rejected[0].contains("five"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = Config {
            max_concurrent_compares: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_from_toml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tool_program = \"/opt/plastimatch/bin/plastimatch\"").unwrap();
        writeln!(file, "max_concurrent_compares = 2").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.tool_program, "/opt/plastimatch/bin/plastimatch");
        assert_eq!(config.max_concurrent_compares, 2);
        // 未写出的字段保持默认
        assert_eq!(config.input_extension, "dcm");
    }

    #[test]
    fn test_from_toml_file_bad_syntax() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_compares = [").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::TomlParseFailed { .. })));
    }
}
