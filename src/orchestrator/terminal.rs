//! 终端交互
//!
//! 读取用户输入，驱动 `App`；会话画面根据订阅到的快照重新绘制

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, Lines};
use tracing::error;

use crate::config::is_valid_api_key;
use crate::error::{AppError, ConfigError, SessionError};
use crate::orchestrator::app::App;
use crate::workflow::{PageRequest, QuizSession, SessionState};

/// 询问 API Key（配置和 key 文件都没有时使用）
pub async fn prompt_api_key<R>(lines: &mut Lines<R>, key_file: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    prompt("请输入 API Key: ");
    match lines.next_line().await? {
        Some(key) if is_valid_api_key(&key) => Ok(key.trim().to_string()),
        _ => Err(ConfigError::ApiKeyMissing {
            key_file: key_file.to_string(),
        }
        .into()),
    }
}

/// 文档模式：翻页、生成测验
pub async fn run_document_mode<R>(app: &mut App, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    print_help();
    show_current_page(app).await;

    loop {
        prompt("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut parts = line.split_whitespace();

        match parts.next() {
            None => continue,
            Some("n") => {
                let result = app.pager().go_next().await;
                after_page_request(app, result).await;
            }
            Some("p") => {
                let result = app.pager().go_prev().await;
                after_page_request(app, result).await;
            }
            Some("g") => match parts.next().and_then(|n| n.parse::<u32>().ok()) {
                Some(page) => {
                    let result = app.pager().go_to_page(page).await;
                    after_page_request(app, result).await;
                }
                None => println!("用法: g <页码>"),
            },
            Some("quiz") => {
                let count = parts
                    .next()
                    .and_then(|n| n.parse::<u32>().ok())
                    .unwrap_or(app.config().default_question_count);

                match app.generate_quiz(count).await {
                    Ok(_) => run_quiz(app, lines).await?,
                    Err(e) => {
                        error!("生成测验失败: {}", e);
                        println!("测验生成失败，请重试。({})", e);
                    }
                }
                show_current_page(app).await;
            }
            Some("h") | Some("help") => print_help(),
            Some("q") | Some("exit") => break,
            Some(other) => println!("未知命令: {}（输入 help 查看帮助）", other),
        }
    }
    Ok(())
}

/// 答题循环，直到测验结束或输入结束
pub async fn run_quiz<R>(app: &mut App, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut view = app.subscribe_session();
    print!("{}", render_session(app.session()));

    loop {
        match app.session().state().clone() {
            SessionState::NoQuiz => return Ok(()),
            SessionState::Finished => {
                if let Ok(summary) = app.summary() {
                    println!(
                        "\n你的得分是 {} / {}。",
                        summary.score, summary.total_questions
                    );
                }
                return Ok(());
            }
            SessionState::AwaitingAnswer => {
                prompt("请输入选项编号: ");
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                let selected = resolve_selection(app.session(), &line);
                match app.submit_answer(selected.as_deref()) {
                    Ok(_) => {}
                    Err(AppError::Session(SessionError::NoSelection)) => {
                        println!("请选择一个选项");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            SessionState::ShowingFeedback(_) => {
                prompt("按回车继续...");
                if lines.next_line().await?.is_none() {
                    return Ok(());
                }
                app.acknowledge_feedback()?;
            }
        }

        if view.has_changed()? {
            let snapshot = view.borrow_and_update().clone();
            print!("{}", render_session(&snapshot));
        }
    }
}

/// 把用户输入换成选项文本
///
/// 输入编号（从 1 开始）或与选项完全相同的文字；没有选项的题目接受任意非空输入
pub fn resolve_selection(session: &QuizSession, input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let question = session.current_question()?;

    if question.options.is_empty() {
        return Some(input.to_string());
    }
    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| question.options.get(index))
            .cloned();
    }
    question.options.iter().find(|option| *option == input).cloned()
}

/// 根据会话快照生成要显示的文字
pub fn render_session(session: &QuizSession) -> String {
    let mut out = String::new();

    match session.state() {
        SessionState::NoQuiz | SessionState::Finished => {}
        SessionState::AwaitingAnswer => {
            if let (Some(question), Some((position, total))) =
                (session.current_question(), session.progress())
            {
                if position == 1 {
                    if let Some(quiz) = session.quiz() {
                        out.push_str(&format!("\n{}\n{}\n", quiz.title, "=".repeat(40)));
                    }
                }
                out.push_str(&format!("\n[{}/{}] {}\n", position, total, question.content));
                if question.options.is_empty() {
                    out.push_str("（本题没有选项，请直接输入答案）\n");
                }
                for (index, option) in question.options.iter().enumerate() {
                    out.push_str(&format!("  {}. {}\n", index + 1, option));
                }
            }
        }
        SessionState::ShowingFeedback(feedback) => {
            if feedback.correct {
                out.push_str("✅ 正确！\n");
            } else {
                out.push_str(&format!("❌ 错误。正确答案: {}\n", feedback.correct_answer));
            }
            if let Some(explanation) = &feedback.explanation {
                out.push_str(&format!("💡 {}\n", explanation));
            }
        }
    }
    out
}

async fn after_page_request(
    app: &App,
    result: Result<PageRequest, crate::error::DocumentError>,
) {
    match result {
        Ok(PageRequest::Ignored) => println!("已经是边界页"),
        Ok(_) => {}
        Err(e) => println!("{}", e),
    }
    show_current_page(app).await;
}

async fn show_current_page(app: &App) {
    let status = app.pager().status().await;
    if let Some(surface) = app.pager().surface().await {
        println!("{}", "─".repeat(60));
        for line in &surface.lines {
            println!("{}", line);
        }
        println!("{}", "─".repeat(60));
    }
    // 页码显示的是最近一次请求的页，而不是最近一次渲染成功的页
    println!("第 {} 页 / 共 {} 页", status.current_page, status.page_count);
}

fn print_help() {
    println!("命令: n 下一页 | p 上一页 | g <页码> 跳转 | quiz [题数] 生成测验 | help | exit");
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Quiz};

    fn session_with(question: Question) -> QuizSession {
        let mut session = QuizSession::new();
        session.load_quiz(Quiz::new("T", 1, vec![question]));
        session
    }

    #[test]
    fn test_resolve_selection_by_number() {
        let session = session_with(Question::new("2+2?", &["3", "4"], "4"));
        assert_eq!(resolve_selection(&session, " 2 ").as_deref(), Some("4"));
        assert_eq!(resolve_selection(&session, "0"), None);
        assert_eq!(resolve_selection(&session, "3"), None);
    }

    #[test]
    fn test_resolve_selection_by_text() {
        let session = session_with(Question::new("Color?", &["Red", "Blue"], "Blue"));
        assert_eq!(resolve_selection(&session, "Blue").as_deref(), Some("Blue"));
        assert_eq!(resolve_selection(&session, "Green"), None);
        assert_eq!(resolve_selection(&session, "   "), None);
    }

    #[test]
    fn test_resolve_selection_without_options() {
        let session = session_with(Question::new("Capital of Chile?", &[], "Santiago"));
        assert_eq!(
            resolve_selection(&session, "Santiago").as_deref(),
            Some("Santiago")
        );
    }

    #[test]
    fn test_render_session_shows_question_and_feedback() {
        let mut session = session_with(
            Question::new("2+2?", &["3", "4"], "4").with_explanation("Basic addition."),
        );
        let question_view = render_session(&session);
        assert!(question_view.contains("[1/1] 2+2?"));
        assert!(question_view.contains("  2. 4"));

        session.submit_answer(Some("3")).unwrap();
        let feedback_view = render_session(&session);
        assert!(feedback_view.contains("正确答案: 4"));
        assert!(feedback_view.contains("Basic addition."));
    }
}
