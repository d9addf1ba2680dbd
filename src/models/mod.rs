pub mod loaders;
pub mod quiz;

pub use loaders::{load_preset_quiz, parse_quiz_collection};
pub use quiz::{Question, Quiz, QuizSummary};
