//! # Exam Paper Engine
//!
//! Bộ máy ghép đề thi và đồng bộ bảng đáp án cho hệ thống quản lý học tập
//!
//! ## Kiến trúc
//!
//! Hệ thống chia bốn tầng, phụ thuộc một chiều từ trên xuống:
//!
//! ### ① Tầng dữ liệu (Models)
//! - `models/` - bản ghi câu hỏi chuẩn hóa, ma trận đề, đề đã sinh
//! - `QuestionRecord` - một câu hỏi; `GeneratedPaper` - đề kèm bảng đáp án
//! - `loaders/` - nạp ngân hàng soạn thủ công từ file TOML
//!
//! ### ② Tầng nghiệp vụ (Services)
//! - `services/` - ba năng lực độc lập, hàm thuần, không I/O
//! - `ParserService` - phân tích văn bản dán tay thành câu hỏi
//! - `SelectorService` - rút câu theo ma trận Bloom, báo đủ mọi mức thiếu
//! - `GeneratorService` - xáo trộn câu/phương án, dựng bảng đáp án
//!
//! ### ③ Tầng luồng (Workflow)
//! - `workflow/` - ghép các năng lực thành một lần ghép đề trọn vẹn
//! - `ExamFlow` - rút theo ma trận → sinh đề, hoặc sinh thẳng từ tập cố định
//!
//! ### ④ Tầng điều phối (App)
//! - `app` - quét thư mục nguồn, sinh hàng loạt bản đề, ghi JSON
//!
//! ## Bất biến cốt lõi
//!
//! Bảng đáp án công bố phải luôn trỏ đúng vị trí mới của phương án đúng
//! sau xáo trộn, với cả ba cách mã hóa đáp án lịch sử. Đáp án không quy
//! giải được phải lộ ra dưới dạng "chưa xác định", không bao giờ được
//! âm thầm gán về một chữ cái.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// Xuất lại các kiểu dùng thường xuyên
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    AnswerKeyEntry, BloomLevel, CorrectLetter, ExamMatrix, GeneratedPaper, ImageRef,
    QuestionKind, QuestionRecord,
};
pub use services::{
    GeneratorService, ParserService, SelectionError, SelectorService, ShortageError,
};
pub use workflow::ExamFlow;
