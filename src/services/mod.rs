pub mod llm_service;
pub mod text_aggregator;

pub use llm_service::{LlmService, QuizGenerator};
pub use text_aggregator::extract_full_text;
