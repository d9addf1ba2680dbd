//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// 在终端阅读 PDF，并根据内容生成测验
#[derive(Parser, Debug)]
#[command(name = "pdf_doc_quiz", version, about = "在终端阅读 PDF，并根据内容生成测验")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// 启动模式
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 打开 PDF，翻页并生成测验
    Pdf {
        /// PDF 文件路径
        path: PathBuf,
        /// `quiz` 命令默认的题目数量
        #[arg(long, short = 'n')]
        questions: Option<u32>,
    },
    /// 按主题生成测验
    Topic {
        /// 主题，可以由多个单词组成
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },
    /// 运行预设测验（无需 API Key）
    Preset {
        /// 测验 JSON 文件路径
        path: PathBuf,
    },
}

impl Command {
    pub fn mode_name(&self) -> &'static str {
        match self {
            Command::Pdf { .. } => "PDF",
            Command::Topic { .. } => "主题",
            Command::Preset { .. } => "预设测验",
        }
    }

    /// 预设测验不调用 LLM
    pub fn needs_llm(&self) -> bool {
        !matches!(self, Command::Preset { .. })
    }

    /// 主题各单词用空格拼接
    pub fn topic_text(&self) -> Option<String> {
        match self {
            Command::Topic { topic } => Some(topic.join(" ").trim().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("pdf_doc_quiz").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_parse_pdf_with_question_count() {
        let command = parse(&["pdf", "notes.pdf", "--questions", "5"]).unwrap();
        assert_eq!(
            command,
            Command::Pdf {
                path: PathBuf::from("notes.pdf"),
                questions: Some(5),
            }
        );
        assert!(command.needs_llm());

        let short = parse(&["pdf", "notes.pdf", "-n", "3"]).unwrap();
        assert!(matches!(short, Command::Pdf { questions: Some(3), .. }));
    }

    #[test]
    fn test_parse_topic_joins_words() {
        let command = parse(&["topic", "photosynthesis", "in", "plants"]).unwrap();
        assert_eq!(
            command.topic_text().as_deref(),
            Some("photosynthesis in plants")
        );
        assert_eq!(command.mode_name(), "主题");
    }

    #[test]
    fn test_parse_preset() {
        let command = parse(&["preset", "quiz.json"]).unwrap();
        assert_eq!(
            command,
            Command::Preset {
                path: PathBuf::from("quiz.json"),
            }
        );
        assert!(!command.needs_llm());
        assert_eq!(command.topic_text(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["pdf"]).is_err());
        assert!(parse(&["pdf", "a.pdf", "--questions", "many"]).is_err());
        assert!(parse(&["topic"]).is_err());
        assert!(parse(&["play"]).is_err());
    }
}
