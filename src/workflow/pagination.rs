//! 翻页控制器 - 流程层
//!
//! 同一文档同时最多只有一次渲染在进行；渲染期间的翻页请求只保留最后一个。
//! 每次开始渲染都会发放带代数（generation）的票据，完成时代数不匹配的结果直接丢弃。
//! 控制器不做 I/O，由 `orchestrator::Pager` 驱动。

use crate::error::DocumentError;

/// 渲染票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    pub page: u32,
    pub generation: u64,
}

/// 翻页请求的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// 立即开始渲染，调用方需要执行该票据
    Started(RenderTicket),
    /// 已有渲染在进行，记为待渲染页
    Queued(u32),
    /// 已在第一页 / 最后一页，无事可做
    Ignored,
}

/// 渲染完成后的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCompletion {
    /// 结果是否仍然有效（false 表示过期，应丢弃）
    pub accepted: bool,
    /// 紧接着需要渲染的待渲染页
    pub next: Option<RenderTicket>,
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    page_count: u32,
    current_page: u32,
    in_flight: Option<RenderTicket>,
    pending_page: Option<u32>,
    displayed_page: Option<u32>,
    next_generation: u64,
}

impl PaginationController {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count: page_count.max(1),
            current_page: 1,
            in_flight: None,
            pending_page: None,
            displayed_page: None,
            next_generation: 0,
        }
    }

    /// 换文档：回到第一页，进行中的渲染全部作废
    pub fn reset(&mut self, page_count: u32) {
        self.page_count = page_count.max(1);
        self.current_page = 1;
        self.in_flight = None;
        self.pending_page = None;
        self.displayed_page = None;
        self.next_generation += 1;
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// 最近一次请求的页码（请求发出即更新，不等渲染完成）
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// 最近一次成功渲染的页码
    pub fn displayed_page(&self) -> Option<u32> {
        self.displayed_page
    }

    pub fn render_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_page(&self) -> Option<u32> {
        self.pending_page
    }

    pub fn go_to_page(&mut self, page: u32) -> Result<PageRequest, DocumentError> {
        if page == 0 || page > self.page_count {
            return Err(DocumentError::PageAccess {
                page,
                page_count: self.page_count,
            });
        }

        if self.in_flight.is_some() {
            self.pending_page = Some(page);
            return Ok(PageRequest::Queued(page));
        }

        Ok(PageRequest::Started(self.start(page)))
    }

    pub fn render_current(&mut self) -> Result<PageRequest, DocumentError> {
        self.go_to_page(self.current_page)
    }

    pub fn go_next(&mut self) -> Result<PageRequest, DocumentError> {
        if self.current_page >= self.page_count {
            return Ok(PageRequest::Ignored);
        }
        self.go_to_page(self.current_page + 1)
    }

    pub fn go_prev(&mut self) -> Result<PageRequest, DocumentError> {
        if self.current_page <= 1 {
            return Ok(PageRequest::Ignored);
        }
        self.go_to_page(self.current_page - 1)
    }

    /// 渲染结束（成功或失败）
    ///
    /// 失败不会改动 `current_page`，也不会重试
    pub fn complete_render(&mut self, ticket: RenderTicket, succeeded: bool) -> RenderCompletion {
        if self.in_flight != Some(ticket) {
            return RenderCompletion {
                accepted: false,
                next: None,
            };
        }

        self.in_flight = None;
        if succeeded {
            self.displayed_page = Some(ticket.page);
        }

        let next = self.pending_page.take().map(|page| self.start(page));
        RenderCompletion {
            accepted: true,
            next,
        }
    }

    fn start(&mut self, page: u32) -> RenderTicket {
        let ticket = RenderTicket {
            page,
            generation: self.next_generation,
        };
        self.next_generation += 1;
        self.in_flight = Some(ticket);
        self.current_page = page;
        ticket
    }
}
