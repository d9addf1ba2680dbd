//! 基础设施层
//!
//! 持有文档资源，只暴露"读页数 / 读单页文本 / 渲染单页"的能力

pub mod document;
pub mod renderer;

pub use document::{PageTextSource, PdfDocument};
pub use renderer::{PageRenderer, RenderedPage, TextPageRenderer};
