use serde::{Deserialize, Serialize};

use crate::models::bloom::BloomLevel;

/// Loại câu hỏi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Trắc nghiệm (có danh sách phương án)
    #[serde(rename = "trac_nghiem")]
    MultipleChoice,
    /// Tự luận (chấm theo hướng dẫn, không chấm theo chữ cái)
    #[serde(rename = "tu_luan")]
    Essay,
}

/// Tham chiếu hình minh họa của câu hỏi
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// Đánh dấu `[img:<ref>]` trong văn bản thô, chờ bước tải ảnh thủ công
    #[serde(rename = "cho_tai_len")]
    Pending(String),
    /// Dữ liệu ảnh nhúng sẵn (base64), do đường nhập liệu thủ công cung cấp
    #[serde(rename = "nhung_san")]
    Inline(String),
}

/// Một câu hỏi đã chuẩn hóa trong ngân hàng đề
///
/// Bản ghi chỉ được đọc bởi SelectorService và GeneratorService,
/// không bao giờ bị sửa tại chỗ, mọi xáo trộn đều tạo giá trị mới.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Định danh duy nhất, ổn định
    pub id: String,
    /// Nội dung đề bài (có thể chứa công thức `$...$`)
    pub content: String,
    /// Loại câu hỏi
    pub kind: QuestionKind,
    /// Danh sách phương án theo thứ tự soạn thảo, chỉ có khi trắc nghiệm
    #[serde(default)]
    pub options: Vec<String>,
    /// Đáp án đúng ở một trong ba cách mã hóa lịch sử:
    /// chữ cái trần ("B"), văn bản kèm tiền tố chữ cái ("B. Hà Nội"),
    /// hoặc văn bản phương án thuần ("Hà Nội")
    #[serde(default)]
    pub correct_answer: String,
    /// Lời giải / hướng dẫn chấm (có thể rỗng)
    #[serde(default)]
    pub explanation: String,
    /// Mức độ nhận thức theo thang Bloom
    pub bloom_level: BloomLevel,
    /// Hình minh họa (nếu có)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
}

impl Default for QuestionRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            content: String::new(),
            kind: QuestionKind::Essay,
            options: Vec::new(),
            correct_answer: String::new(),
            explanation: String::new(),
            bloom_level: BloomLevel::NhanBiet,
            image_ref: None,
        }
    }
}

impl QuestionRecord {
    /// Câu hỏi có phải trắc nghiệm không
    pub fn is_multiple_choice(&self) -> bool {
        self.kind == QuestionKind::MultipleChoice
    }
}
