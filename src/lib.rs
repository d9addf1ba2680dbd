//! # PDF Doc Quiz
//!
//! 一个在终端里阅读 PDF 并根据内容生成测验的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文档资源，只暴露能力
//! - `PdfDocument` - 解析 PDF，提供页数和单页文本
//! - `TextPageRenderer` - 把单页渲染成终端文本
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `extract_full_text` - 并发读取所有页，按页序拼接全文
//! - `LlmService` - 根据文本生成测验
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 纯状态机，不做 I/O
//! - `QuizSession` - 答题流程（出题 → 作答 → 反馈 → 结束）
//! - `PaginationController` - 翻页流程（单次渲染 + 最后请求优先）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 宿主程序，持有文档与会话
//! - `orchestrator/pager` - 执行渲染并丢弃过期结果
//! - `orchestrator/terminal` - 终端交互
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PdfDocument, TextPageRenderer};
pub use models::{Question, Quiz, QuizSummary};
pub use orchestrator::App;
pub use services::{LlmService, QuizGenerator};
pub use workflow::{QuizSession, SessionState};
