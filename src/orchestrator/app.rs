//! 宿主程序 - 编排层
//!
//! ## 职责
//!
//! 1. **文档管理**：加载 PDF、提取全文、交给 `Pager` 翻页
//! 2. **测验生成**：把全文（或主题）交给 `QuizGenerator`
//! 3. **会话驱动**：把用户操作转发给 `QuizSession`，并通过 `Observable` 发布新状态
//! 4. **成绩记录**：测验结束后输出并追加成绩
//!
//! 所有状态都由 `App` 独占；失败的操作不会破坏已有的文档或会话。

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ServiceError};
use crate::infrastructure::{PageRenderer, PdfDocument};
use crate::models::{Quiz, QuizSummary};
use crate::orchestrator::pager::Pager;
use crate::services::{extract_full_text, QuizGenerator};
use crate::utils::logging;
use crate::workflow::{Feedback, Observable, QuizSession, SessionState};

/// 已加载的文档及其全文
#[derive(Debug)]
pub struct LoadedDocument {
    pub name: String,
    pub document: PdfDocument,
    pub text: String,
}

/// 应用主结构
pub struct App {
    config: Config,
    generator: Option<Arc<dyn QuizGenerator>>,
    pager: Arc<Pager>,
    document: Option<LoadedDocument>,
    session: Observable<QuizSession>,
}

impl App {
    pub fn new(config: Config, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            config,
            generator: None,
            pager: Arc::new(Pager::new(renderer)),
            document: None,
            session: Observable::default(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn QuizGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pager(&self) -> &Arc<Pager> {
        &self.pager
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn session(&self) -> &QuizSession {
        self.session.get()
    }

    /// 订阅会话状态，每次成功的状态变化都会收到新快照
    pub fn subscribe_session(&self) -> watch::Receiver<QuizSession> {
        self.session.subscribe()
    }

    // ========== 文档 ==========

    pub async fn load_document(&mut self, path: &Path) -> AppResult<&LoadedDocument> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        self.load_document_bytes(&path.display().to_string(), &bytes)
            .await
    }

    /// 解析并提取全文；成功后才替换当前文档，然后渲染第一页
    pub async fn load_document_bytes(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> AppResult<&LoadedDocument> {
        info!("📁 正在加载文档: {}", name);

        let document = PdfDocument::parse(bytes).map_err(|e| {
            error!("❌ 文档加载失败: {}", e);
            e
        })?;
        let text = extract_full_text(&document).await?;

        logging::log_document_loaded(name, document.page_count(), text.chars().count());
        if text.trim().is_empty() {
            warn!("⚠️ 文档中没有可提取的文字（可能是扫描件）");
        }

        self.pager.attach(document.clone()).await;
        if let Err(e) = self.pager.render_current().await {
            warn!("⚠️ 首页渲染失败: {}", e);
        }

        Ok(&*self.document.insert(LoadedDocument {
            name: name.to_string(),
            document,
            text,
        }))
    }

    // ========== 测验生成 ==========

    /// 用当前文档的全文生成测验
    pub async fn generate_quiz(&mut self, question_count: u32) -> AppResult<SessionState> {
        let count = self.config.validate_question_count(question_count)?;
        let text = match &self.document {
            Some(loaded) if !loaded.text.trim().is_empty() => loaded.text.clone(),
            _ => return Err(AppError::NoSourceText),
        };
        self.generate_from(&text, count).await
    }

    /// 用自定义主题生成测验，题目数量取上限
    pub async fn generate_topic_quiz(&mut self, topic: &str) -> AppResult<SessionState> {
        if topic.trim().is_empty() {
            return Err(AppError::NoSourceText);
        }
        let count = self.config.max_question_count;
        self.generate_from(topic.trim(), count).await
    }

    // 失败时会话保持原样
    async fn generate_from(&mut self, source_text: &str, count: u32) -> AppResult<SessionState> {
        let generator = self
            .generator
            .clone()
            .ok_or(ServiceError::InvalidApiKey)?;

        info!("🧠 正在生成测验（{} 题）...", count);
        let quiz = generator
            .generate_quiz(source_text, count)
            .await
            .map_err(|e| {
                error!("❌ 测验生成失败: {}", e);
                e
            })?;

        info!(
            "✓ 测验生成成功: {}（{} 题）",
            quiz.title,
            quiz.questions.len()
        );
        if quiz.questions.len() != quiz.question_count as usize {
            warn!(
                "⚠️ 声明题数 {} 与实际题数 {} 不一致，成绩分母按声明题数计算",
                quiz.question_count,
                quiz.questions.len()
            );
        }

        Ok(self.load_quiz(quiz))
    }

    // ========== 会话 ==========

    /// 加载测验；没有题目的测验加载后即结束，同样记录成绩
    pub fn load_quiz(&mut self, quiz: Quiz) -> SessionState {
        let state = self
            .session
            .update(|session| session.load_quiz(quiz).clone());

        if state == SessionState::Finished {
            self.record_result();
        }
        state
    }

    pub fn submit_answer(&mut self, selected: Option<&str>) -> AppResult<Feedback> {
        Ok(self
            .session
            .try_update(|session| session.submit_answer(selected))?)
    }

    /// 确认反馈；测验结束时输出并记录成绩
    pub fn acknowledge_feedback(&mut self) -> AppResult<SessionState> {
        let state = self
            .session
            .try_update(|session| session.acknowledge_feedback().cloned())?;

        if state == SessionState::Finished {
            self.record_result();
        }
        Ok(state)
    }

    pub fn summary(&self) -> AppResult<QuizSummary> {
        Ok(self.session.get().summary()?)
    }

    fn record_result(&self) {
        let Ok(summary) = self.session.get().summary() else {
            return;
        };
        logging::print_final_stats(&summary);
        if let Err(e) = logging::append_result(&self.config.results_log_file, &summary) {
            warn!("⚠️ 成绩记录写入失败: {}", e);
        }
    }
}
