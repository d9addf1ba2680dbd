//! 页面渲染 - 基础设施层
//!
//! 把单页渲染成可以直接显示在终端上的文本

use async_trait::async_trait;

use crate::error::DocumentError;
use crate::infrastructure::document::PdfDocument;

/// 一页渲染结果（即显示区域的内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page_number: u32,
    pub lines: Vec<String>,
}

/// 页面渲染器
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, document: &PdfDocument, page: u32)
        -> Result<RenderedPage, DocumentError>;
}

/// 终端文本渲染器
///
/// 按固定行宽折行，相当于把页面"缩放"到终端宽度
pub struct TextPageRenderer {
    width: usize,
}

impl TextPageRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(10),
        }
    }
}

#[async_trait]
impl PageRenderer for TextPageRenderer {
    async fn render(
        &self,
        document: &PdfDocument,
        page: u32,
    ) -> Result<RenderedPage, DocumentError> {
        document
            .check_page(page)
            .map_err(|e| DocumentError::render(page, e))?;

        let doc = document.clone();
        let lines = tokio::task::spawn_blocking(move || doc.page_lines(page))
            .await
            .map_err(|e| DocumentError::render(page, e))?
            .map_err(|e| DocumentError::render(page, e))?;

        Ok(RenderedPage {
            page_number: page,
            lines: lines
                .iter()
                .flat_map(|line| wrap_line(line, self.width))
                .collect(),
        })
    }
}

/// 按字符数折行，尽量在空白处断开
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        }

        // 单个词超过行宽时硬切
        let mut rest: Vec<char> = word.chars().collect();
        while current_len == 0 && rest.len() > width {
            wrapped.push(rest.drain(..width).collect());
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += rest.len();
        current.extend(rest);
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}
