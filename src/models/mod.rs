pub mod bloom;
pub mod loaders;
pub mod matrix;
pub mod paper;
pub mod question;

pub use bloom::BloomLevel;
pub use loaders::{load_all_toml_files, load_toml_to_question_bank, QuestionBank};
pub use matrix::ExamMatrix;
pub use paper::{AnswerKeyEntry, CorrectLetter, GeneratedPaper};
pub use question::{ImageRef, QuestionKind, QuestionRecord};
