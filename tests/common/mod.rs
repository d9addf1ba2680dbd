use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_doc_quiz::error::ServiceError;
use pdf_doc_quiz::infrastructure::TextPageRenderer;
use pdf_doc_quiz::models::{Question, Quiz};
use pdf_doc_quiz::services::llm_service::parse_quiz_response;
use pdf_doc_quiz::{App, Config, QuizGenerator};

/// 生成每页一行文本的 PDF
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// 两道题的小测验
pub fn arithmetic_quiz() -> Quiz {
    Quiz::new(
        "Arithmetic",
        2,
        vec![
            Question::new("2+2?", &["3", "4"], "4").with_explanation("Basic addition."),
            Question::new("Capital of France?", &["Paris", "Rome"], "Paris"),
        ],
    )
}

enum Reply {
    Quiz(Quiz),
    Raw(String),
    Fail,
}

/// 按预设返回结果的生成器，并记录收到的请求
pub struct ScriptedGenerator {
    reply: Reply,
    pub requests: Mutex<Vec<(String, u32)>>,
}

impl ScriptedGenerator {
    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(quiz: Quiz) -> Arc<Self> {
        Self::with_reply(Reply::Quiz(quiz))
    }

    /// 模型原样回复这段文字，按真实服务的方式解析
    pub fn replying(content: &str) -> Arc<Self> {
        Self::with_reply(Reply::Raw(content.to_string()))
    }

    pub fn failing() -> Arc<Self> {
        Self::with_reply(Reply::Fail)
    }

    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizGenerator for ScriptedGenerator {
    async fn generate_quiz(
        &self,
        source_text: &str,
        question_count: u32,
    ) -> Result<Quiz, ServiceError> {
        self.requests
            .lock()
            .unwrap()
            .push((source_text.to_string(), question_count));
        match &self.reply {
            Reply::Quiz(quiz) => Ok(quiz.clone()),
            Reply::Raw(content) => parse_quiz_response(content),
            Reply::Fail => Err(ServiceError::malformed("expected value at line 1 column 1")),
        }
    }
}

/// 每个测验写自己的成绩文件
pub fn results_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "pdf_doc_quiz_{}_{}.txt",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

pub fn test_app(name: &str, generator: Option<Arc<ScriptedGenerator>>) -> App {
    let config = Config {
        results_log_file: results_file(name).display().to_string(),
        ..Config::default()
    };
    let app = App::new(config, Arc::new(TextPageRenderer::new(40)));
    match generator {
        Some(generator) => app.with_generator(generator),
        None => app,
    }
}
