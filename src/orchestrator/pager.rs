//! 翻页驱动 - 编排层
//!
//! 把 `PaginationController` 和 `PageRenderer` 接起来：
//! 控制器决定渲染哪一页，这里负责真正执行渲染，并只把未过期的结果放到显示区域。
//! 锁不会跨 await 持有。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::infrastructure::{PageRenderer, PdfDocument, RenderedPage};
use crate::workflow::{PageRequest, PaginationController, RenderTicket};

/// 当前翻页状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStatus {
    pub current_page: u32,
    pub page_count: u32,
    pub displayed_page: Option<u32>,
}

struct PagerInner {
    document: Option<PdfDocument>,
    controller: PaginationController,
    surface: Option<RenderedPage>,
}

pub struct Pager {
    renderer: Arc<dyn PageRenderer>,
    inner: Mutex<PagerInner>,
}

impl Pager {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            renderer,
            inner: Mutex::new(PagerInner {
                document: None,
                controller: PaginationController::new(1),
                surface: None,
            }),
        }
    }

    /// 换成新文档，旧文档的渲染结果全部作废
    pub async fn attach(&self, document: PdfDocument) {
        let mut inner = self.inner.lock().await;
        inner.controller.reset(document.page_count());
        inner.document = Some(document);
        inner.surface = None;
    }

    pub async fn go_to_page(&self, page: u32) -> Result<PageRequest, DocumentError> {
        self.request(|controller| controller.go_to_page(page)).await
    }

    pub async fn render_current(&self) -> Result<PageRequest, DocumentError> {
        self.request(PaginationController::render_current).await
    }

    pub async fn go_next(&self) -> Result<PageRequest, DocumentError> {
        self.request(PaginationController::go_next).await
    }

    pub async fn go_prev(&self) -> Result<PageRequest, DocumentError> {
        self.request(PaginationController::go_prev).await
    }

    pub async fn status(&self) -> PageStatus {
        let inner = self.inner.lock().await;
        PageStatus {
            current_page: inner.controller.current_page(),
            page_count: inner.controller.page_count(),
            displayed_page: inner.controller.displayed_page(),
        }
    }

    /// 显示区域当前的内容（最近一次成功渲染的页）
    pub async fn surface(&self) -> Option<RenderedPage> {
        self.inner.lock().await.surface.clone()
    }

    /// 发起请求；如果需要立即渲染，则在当前任务里把渲染（以及随后的待渲染页）跑完
    async fn request(
        &self,
        action: impl FnOnce(&mut PaginationController) -> Result<PageRequest, DocumentError>,
    ) -> Result<PageRequest, DocumentError> {
        let request = {
            let mut inner = self.inner.lock().await;
            if inner.document.is_none() {
                return Err(DocumentError::NotLoaded);
            }
            action(&mut inner.controller)?
        };

        match request {
            PageRequest::Started(ticket) => self.drive(ticket).await?,
            PageRequest::Queued(page) => debug!("已有渲染进行中，第 {} 页排队等待", page),
            PageRequest::Ignored => debug!("已到达边界页，忽略翻页请求"),
        }
        Ok(request)
    }

    /// 依次执行票据，直到没有待渲染页
    ///
    /// 返回最后一次有效渲染的结果
    async fn drive(&self, first: RenderTicket) -> Result<(), DocumentError> {
        let mut ticket = first;
        let mut outcome = Ok(());

        loop {
            let document = self.inner.lock().await.document.clone();
            let Some(document) = document else {
                return outcome;
            };

            debug!("开始渲染第 {} 页 (generation {})", ticket.page, ticket.generation);
            let result = self.renderer.render(&document, ticket.page).await;

            let mut inner = self.inner.lock().await;
            let completion = inner.controller.complete_render(ticket, result.is_ok());

            if completion.accepted {
                outcome = match result {
                    Ok(rendered) => {
                        inner.surface = Some(rendered);
                        Ok(())
                    }
                    Err(e) => {
                        warn!("⚠️ 第 {} 页渲染失败: {}", ticket.page, e);
                        Err(e)
                    }
                };
            } else {
                debug!("丢弃过期的渲染结果: 第 {} 页", ticket.page);
            }

            match completion.next {
                Some(next) => ticket = next,
                None => return outcome,
            }
        }
    }
}
