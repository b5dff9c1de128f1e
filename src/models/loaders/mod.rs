pub mod toml_loader;

pub use toml_loader::{load_all_toml_files, load_toml_to_question_bank, QuestionBank};
