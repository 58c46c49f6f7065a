/// 日志工具模块
///
/// 提供日志初始化和输出格式化的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `tool_program`: 外部工具
/// - `max_concurrent`: 最大并发数
pub fn log_startup(tool_program: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - DICE 结构对比");
    info!("🔧 外部工具: {}", tool_program);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录槽位载入信息
pub fn log_slot_loaded(slot_label: &str, input: &str, structure_count: usize) {
    info!("✓ {} 已载入: {}", slot_label, input);
    info!("📋 提取到 {} 个结构", structure_count);
}

/// 记录批次开始信息
///
/// # 参数
/// - `total_pairs`: 待对比的结构对数量
/// - `max_concurrent`: 最大并发数
pub fn log_batch_start(total_pairs: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始计算 DICE: 共 {} 对结构", total_pairs);
    info!("📄 同时最多运行 {} 个对比进程", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `success`: 成功数量
/// - `total`: 总数
/// - `peak`: 实际达到的最大并发
pub fn log_batch_complete(success: usize, total: usize, peak: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ DICE 计算完成: 成功 {}/{}", success, total);
    info!("📈 峰值并发: {}", peak);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `export_path`: 导出文件（未导出时为 `None`）
pub fn print_final_stats(success: usize, failed: usize, total: usize, export_path: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    match export_path {
        Some(path) => info!("\n结果已导出至: {}", path),
        None => info!("\n结果未导出"),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
