//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有全部可变状态（文档、翻页、会话），把用户操作转成对下层的调用。
//!
//! ## 模块划分
//!
//! ### `app` - 宿主程序
//! - 加载文档并提取全文
//! - 调用 `QuizGenerator` 生成测验
//! - 驱动 `QuizSession`，发布会话快照
//! - 测验结束时输出并记录成绩
//!
//! ### `pager` - 翻页驱动
//! - 执行 `PaginationController` 发出的渲染票据
//! - 丢弃过期的渲染结果
//!
//! ### `terminal` - 终端交互
//! - 翻页命令、答题输入、反馈显示
//!
//! ## 层次关系
//!
//! ```text
//! terminal (用户输入 / 屏幕输出)
//!     ↓
//! app / pager (状态持有者)
//!     ↓
//! workflow (QuizSession / PaginationController，纯状态机)
//!     ↓
//! services (text_aggregator / llm_service)
//!     ↓
//! infrastructure (PdfDocument / PageRenderer)
//! ```

pub mod app;
pub mod pager;
pub mod terminal;

// 重新导出主要类型
pub use app::{App, LoadedDocument};
pub use pager::{PageStatus, Pager};
