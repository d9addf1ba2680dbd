/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::QuizSummary;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(mode: &str, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("🤖 LLM 模型: {}", model_name);
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_document_loaded(path: &str, page_count: u32, text_chars: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📄 已加载文档: {}", path);
    info!("📑 共 {} 页，提取文本 {} 字符", page_count, text_chars);
    info!("{}", "─".repeat(60));
}

/// 打印测验最终成绩
pub fn print_final_stats(summary: &QuizSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 测验完成: {}", summary.title);
    info!("✅ 得分: {}/{}", summary.score, summary.total_questions);
    info!("{}", "=".repeat(60));
}

/// 追加一条测验成绩记录
///
/// 文件不存在时先写入表头
pub fn append_result(log_file_path: &str, summary: &QuizSummary) -> Result<()> {
    let is_new = !std::path::Path::new(log_file_path).exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    if is_new {
        let header = format!(
            "{}\n测验成绩记录 - 创建于 {}\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        file.write_all(header.as_bytes())?;
    }

    let line = format!(
        "{} | {} | {}/{}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        summary.title,
        summary.score,
        summary.total_questions
    );
    file.write_all(line.as_bytes())?;
    Ok(())
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
