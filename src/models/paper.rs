use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::QuestionRecord;

/// Nhãn hiển thị cho câu tự luận trong bảng đáp án
pub const ESSAY_LABEL: &str = "Tự luận";
/// Nhãn hiển thị khi không đối chiếu được đáp án với phương án nào
pub const UNRESOLVED_LABEL: &str = "Chưa xác định";
/// Nội dung thay thế khi câu tự luận không kèm đáp án tham khảo
pub const ESSAY_PLACEHOLDER: &str = "Xem hướng dẫn chấm";

/// Chữ cái đáp án trong bảng đáp án
///
/// Kiểu riêng thay vì chuỗi trần để khâu chấm điểm không thể
/// nhầm một đáp án chưa đối chiếu được với một chữ cái hợp lệ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectLetter {
    /// Chữ cái của phương án đúng sau khi xáo trộn (A–F)
    Letter(char),
    /// Câu tự luận, không chấm theo chữ cái
    Essay,
    /// Bản ghi lỗi: đáp án lưu trữ không khớp phương án nào
    Unresolved,
}

impl CorrectLetter {
    /// Dạng chuỗi dùng khi in đề / xuất JSON
    pub fn as_str(&self) -> String {
        match self {
            CorrectLetter::Letter(c) => c.to_string(),
            CorrectLetter::Essay => ESSAY_LABEL.to_string(),
            CorrectLetter::Unresolved => UNRESOLVED_LABEL.to_string(),
        }
    }

    /// Đáp án có dùng để chấm tự động được không
    pub fn is_gradable(&self) -> bool {
        matches!(self, CorrectLetter::Letter(_))
    }
}

impl std::fmt::Display for CorrectLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CorrectLetter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

// Giải mã từ dạng chuỗi, đối xứng với Serialize ở trên
impl<'de> Deserialize<'de> for CorrectLetter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Visitor;
        use std::fmt;

        struct LetterVisitor;

        impl<'de> Visitor<'de> for LetterVisitor {
            type Value = CorrectLetter;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("một chữ cái A-F, \"Tự luận\" hoặc \"Chưa xác định\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match value {
                    ESSAY_LABEL => Ok(CorrectLetter::Essay),
                    UNRESOLVED_LABEL => Ok(CorrectLetter::Unresolved),
                    s => {
                        let mut chars = s.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c @ 'A'..='F'), None) => Ok(CorrectLetter::Letter(c)),
                            _ => Err(E::custom(format!("chữ cái đáp án không hợp lệ: {}", s))),
                        }
                    }
                }
            }
        }

        deserializer.deserialize_str(LetterVisitor)
    }
}

/// Một dòng trong bảng đáp án
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    /// Chữ cái đúng sau xáo trộn
    pub correct_letter: CorrectLetter,
    /// Nội dung phương án đúng (hoặc đáp án tham khảo với câu tự luận)
    pub correct_content: String,
    /// Lời giải kèm theo (có thể rỗng)
    #[serde(default)]
    pub explanation: String,
}

/// Đề thi đã sinh: thứ tự câu và phương án đã xáo trộn, kèm bảng đáp án
///
/// Giá trị này là tạm thời, mỗi lần yêu cầu đề sẽ sinh lại từ đầu.
/// Muốn in nhiều bản của cùng một đề thì phía gọi tự giữ lại giá trị này
/// (hoặc chạy lại với cùng seed), engine không ghi nhớ gì giữa các lần gọi.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPaper {
    /// Mã đề
    pub exam_tag: String,
    /// Thời điểm sinh đề
    pub created_at: String,
    /// Các câu theo thứ tự trình bày cuối cùng, phương án đã gắn lại
    /// tiền tố `A.`, `B.`, ... theo thứ tự mới
    pub ordered_questions: Vec<QuestionRecord>,
    /// Bảng đáp án: vị trí câu (tính từ 1) → đáp án
    pub answer_key: BTreeMap<usize, AnswerKeyEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_letter_serde_round_trip() {
        for letter in [
            CorrectLetter::Letter('C'),
            CorrectLetter::Essay,
            CorrectLetter::Unresolved,
        ] {
            let json = serde_json::to_string(&letter).unwrap();
            let back: CorrectLetter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, letter);
        }
    }

    #[test]
    fn test_correct_letter_rejects_garbage() {
        assert!(serde_json::from_str::<CorrectLetter>("\"G\"").is_err());
        assert!(serde_json::from_str::<CorrectLetter>("\"AB\"").is_err());
    }

    #[test]
    fn test_only_letters_are_gradable() {
        assert!(CorrectLetter::Letter('A').is_gradable());
        assert!(!CorrectLetter::Essay.is_gradable());
        assert!(!CorrectLetter::Unresolved.is_gradable());
    }
}
