pub mod json_loader;

pub use json_loader::{load_preset_quiz, parse_quiz_collection};
