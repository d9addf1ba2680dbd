//! PDF 文档 - 基础设施层
//!
//! 持有解析后的 PDF，只暴露页数和单页文本

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::DocumentError;

/// 单页文本来源
///
/// 每次调用只读取一页，多页之间互不依赖，可以并发调用
#[async_trait]
pub trait PageTextSource: Send + Sync {
    /// 总页数（≥ 1）
    fn page_count(&self) -> u32;

    /// 读取第 `page` 页（从 1 开始）的文本片段
    async fn text_items(&self, page: u32) -> Result<Vec<String>, DocumentError>;
}

/// 已解析的 PDF 文档
///
/// clone 只复制 `Arc`，可以安全地交给 blocking 任务
#[derive(Clone)]
pub struct PdfDocument {
    inner: Arc<lopdf::Document>,
    page_count: u32,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("page_count", &self.page_count)
            .finish()
    }
}

impl PdfDocument {
    /// 从字节流解析 PDF
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        if !looks_like_pdf(bytes) {
            return Err(DocumentError::InvalidFileType);
        }

        let inner = lopdf::Document::load_mem(bytes).map_err(DocumentError::parse)?;
        let page_count = inner.get_pages().len() as u32;
        if page_count == 0 {
            return Err(DocumentError::parse("文档没有任何页面"));
        }

        debug!("PDF 解析成功，共 {} 页", page_count);

        Ok(Self {
            inner: Arc::new(inner),
            page_count,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// 检查页码是否在 [1, page_count] 内
    pub fn check_page(&self, page: u32) -> Result<(), DocumentError> {
        if page == 0 || page > self.page_count {
            return Err(DocumentError::PageAccess {
                page,
                page_count: self.page_count,
            });
        }
        Ok(())
    }

    /// 同步读取单页文本，按行切分，去掉空行
    pub fn page_lines(&self, page: u32) -> Result<Vec<String>, DocumentError> {
        self.check_page(page)?;

        let text = self
            .inner
            .extract_text(&[page])
            .map_err(|e| DocumentError::TextExtraction {
                page,
                message: e.to_string(),
            })?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl PageTextSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    async fn text_items(&self, page: u32) -> Result<Vec<String>, DocumentError> {
        self.check_page(page)?;

        let document = self.clone();
        tokio::task::spawn_blocking(move || document.page_lines(page))
            .await
            .map_err(|e| DocumentError::TextExtraction {
                page,
                message: e.to_string(),
            })?
    }
}

/// PDF 头部（`%PDF-`）应出现在前 1024 字节内
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_pdf::sample_pdf;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfDocument::parse(b"hello, I am a text file").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidFileType));
    }

    #[test]
    fn test_rejects_broken_pdf() {
        let err = PdfDocument::parse(b"%PDF-1.5\n this is not really a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_page_count() {
        let doc = PdfDocument::parse(&sample_pdf(&["one", "two", "three"])).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = PdfDocument::parse(&sample_pdf(&["only"])).unwrap();
        assert!(matches!(
            doc.check_page(0),
            Err(DocumentError::PageAccess { page: 0, page_count: 1 })
        ));
        assert!(matches!(
            doc.page_lines(2),
            Err(DocumentError::PageAccess { page: 2, page_count: 1 })
        ));
    }

    #[tokio::test]
    async fn test_text_items_reads_page() {
        let doc = PdfDocument::parse(&sample_pdf(&["Hello", "World"])).unwrap();
        let items = doc.text_items(2).await.unwrap();
        assert!(items.join(" ").contains("World"));
    }
}
