use crate::models::quiz::Quiz;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 题库文件既可以是测验数组，也可以是单个测验对象
#[derive(Deserialize)]
#[serde(untagged)]
enum QuizCollection {
    Many(Vec<Quiz>),
    One(Quiz),
}

/// 解析预置题库 JSON，返回其中所有测验
pub fn parse_quiz_collection(content: &str) -> Result<Vec<Quiz>> {
    let collection: QuizCollection =
        serde_json::from_str(content).context("题库 JSON 格式不正确")?;
    Ok(match collection {
        QuizCollection::Many(quizzes) => quizzes,
        QuizCollection::One(quiz) => vec![quiz],
    })
}

/// 从 JSON 文件加载预置测验（取第一份）
pub async fn load_preset_quiz(path: &Path) -> Result<Quiz> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取题库文件: {}", path.display()))?;

    let quizzes = parse_quiz_collection(&content)
        .with_context(|| format!("无法解析题库文件: {}", path.display()))?;

    tracing::info!("题库 {} 中共有 {} 份测验", path.display(), quizzes.len());

    quizzes
        .into_iter()
        .next()
        .with_context(|| format!("题库文件为空: {}", path.display()))
}
