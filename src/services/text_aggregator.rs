//! 全文提取服务 - 业务能力层
//!
//! 并发读取每一页文本，按页码顺序拼成一整段语料

use futures::future::try_join_all;
use tracing::{debug, error};

use crate::error::ExtractionError;
use crate::infrastructure::PageTextSource;

/// 页与页之间的分隔符
pub const PAGE_SEPARATOR: &str = "\n\n";

/// 提取整份文档的文本
///
/// - 所有页同时发起请求，完成顺序不限
/// - 结果按页码升序拼接，页内片段以单个空格连接
/// - 任一页失败即整体失败，不返回部分文本，也不重试
pub async fn extract_full_text<S>(source: &S) -> Result<String, ExtractionError>
where
    S: PageTextSource + ?Sized,
{
    let page_count = source.page_count();
    debug!("开始并发提取 {} 页文本", page_count);

    let requests = (1..=page_count).map(|page| async move {
        source
            .text_items(page)
            .await
            .map(|items| items.join(" "))
            .map_err(|source| ExtractionError { page, source })
    });

    // try_join_all 按输入顺序返回结果，并在第一个错误时立即结束
    let page_texts = try_join_all(requests).await.map_err(|e| {
        error!("第 {} 页文本提取失败: {}", e.page, e.source);
        e
    })?;

    let full_text = page_texts.join(PAGE_SEPARATOR);
    debug!("文本提取完成，共 {} 字符", full_text.chars().count());

    Ok(full_text)
}
