use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use pdf_doc_quiz::cli::{Cli, Command};
use pdf_doc_quiz::infrastructure::TextPageRenderer;
use pdf_doc_quiz::models::load_preset_quiz;
use pdf_doc_quiz::orchestrator::terminal;
use pdf_doc_quiz::services::LlmService;
use pdf_doc_quiz::utils::logging;
use pdf_doc_quiz::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::load(None)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let command = Cli::parse().command;
    logging::log_startup(command.mode_name(), &config.llm_model_name);

    if let Command::Pdf {
        questions: Some(count),
        ..
    } = &command
    {
        config.default_question_count = config.validate_question_count(*count)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let renderer = Arc::new(TextPageRenderer::new(config.render_width));
    let mut app = if command.needs_llm() {
        let api_key = match config.resolve_api_key() {
            Some(key) => key,
            None => terminal::prompt_api_key(&mut lines, &config.api_key_file).await?,
        };
        let service = LlmService::new(&config, &api_key)?;
        App::new(config, renderer).with_generator(Arc::new(service))
    } else {
        App::new(config, renderer)
    };

    match &command {
        Command::Pdf { path, .. } => {
            app.load_document(path).await?;
            terminal::run_document_mode(&mut app, &mut lines).await?;
        }
        Command::Topic { .. } => {
            let topic = command.topic_text().unwrap_or_default();
            if let Err(e) = app.generate_topic_quiz(&topic).await {
                error!("❌ 测验生成失败: {}", e);
                return Err(e.into());
            }
            terminal::run_quiz(&mut app, &mut lines).await?;
        }
        Command::Preset { path } => {
            let quiz = load_preset_quiz(path).await?;
            app.load_quiz(quiz);
            terminal::run_quiz(&mut app, &mut lines).await?;
        }
    }

    info!("👋 再见");
    Ok(())
}
