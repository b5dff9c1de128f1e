//! Bộ sinh đề và đồng bộ bảng đáp án - tầng nghiệp vụ
//!
//! Xáo trộn thứ tự câu và thứ tự phương án, đồng thời dựng bảng đáp án
//! sống sót qua xáo trộn. Mấu chốt: đáp án được đối chiếu theo *nội dung*
//! phương án (qua một khóa so sánh chuẩn hóa), không theo vị trí cũ,
//! nên ba cách mã hóa lịch sử của `correct_answer` đều quy về một đường.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use tracing::{info, warn};

use crate::models::paper::{
    AnswerKeyEntry, CorrectLetter, GeneratedPaper, ESSAY_PLACEHOLDER,
};
use crate::models::question::{QuestionKind, QuestionRecord};

/// Chữ cái tổng hợp gắn lại cho phương án sau xáo trộn
const SYNTHETIC_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Bộ sinh đề thi
pub struct GeneratorService {
    option_prefix: Regex,
    bare_letter: Regex,
}

impl Default for GeneratorService {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorService {
    /// Tạo bộ sinh đề mới
    pub fn new() -> Self {
        Self {
            option_prefix: Regex::new(r"^[A-D][.:)]\s*").expect("regex hợp lệ"),
            bare_letter: Regex::new(r"^[A-D][.:)]?\s*$").expect("regex hợp lệ"),
        }
    }

    /// Sinh một đề thi từ ảnh chụp ngân hàng câu hỏi
    ///
    /// # Tham số
    /// - `pool`: tập câu hỏi nguồn (chỉ đọc, không bị sửa)
    /// - `count`: số câu lấy vào đề; lớn hơn kích thước pool thì lấy hết
    /// - `exam_tag`: mã đề in trên đề
    /// - `rng`: nguồn ngẫu nhiên do phía gọi cấp
    ///
    /// # Trả về
    /// `GeneratedPaper` với thứ tự câu, thứ tự phương án đã xáo trộn
    /// và bảng đáp án theo vị trí (tính từ 1). Trong các câu của đề,
    /// `correct_answer`/`explanation` được xóa trắng: sau xáo trộn chúng
    /// không còn trỏ đúng nữa, nguồn chấm duy nhất là bảng đáp án.
    pub fn generate<R: Rng>(
        &self,
        pool: &[QuestionRecord],
        count: usize,
        exam_tag: &str,
        rng: &mut R,
    ) -> Result<GeneratedPaper> {
        let mut picked: Vec<QuestionRecord> = pool.to_vec();
        picked.shuffle(rng);
        picked.truncate(count.min(pool.len()));

        let mut paper = GeneratedPaper {
            exam_tag: exam_tag.to_string(),
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ordered_questions: Vec::with_capacity(picked.len()),
            answer_key: Default::default(),
        };

        for (index, mut question) in picked.into_iter().enumerate() {
            let position = index + 1;

            let entry = match question.kind {
                QuestionKind::MultipleChoice => {
                    self.synchronize_choice(&mut question, position, rng)?
                }
                QuestionKind::Essay => {
                    if !question.options.is_empty() {
                        anyhow::bail!(
                            "Câu tự luận '{}' mang danh sách phương án - dữ liệu vi phạm hợp đồng",
                            question.id
                        );
                    }
                    let reference = question.correct_answer.trim();
                    AnswerKeyEntry {
                        correct_letter: CorrectLetter::Essay,
                        correct_content: if reference.is_empty() {
                            ESSAY_PLACEHOLDER.to_string()
                        } else {
                            reference.to_string()
                        },
                        explanation: question.explanation.clone(),
                    }
                }
            };

            question.correct_answer = String::new();
            question.explanation = String::new();

            paper.answer_key.insert(position, entry);
            paper.ordered_questions.push(question);
        }

        info!(
            "✓ Đã sinh đề '{}' với {} câu",
            exam_tag,
            paper.ordered_questions.len()
        );
        Ok(paper)
    }

    /// Xáo trộn phương án của một câu trắc nghiệm và dựng dòng đáp án
    fn synchronize_choice<R: Rng>(
        &self,
        question: &mut QuestionRecord,
        position: usize,
        rng: &mut R,
    ) -> Result<AnswerKeyEntry> {
        if question.options.len() > SYNTHETIC_LETTERS.len() {
            anyhow::bail!(
                "Câu '{}' có {} phương án, vượt giới hạn {} chữ cái",
                question.id,
                question.options.len(),
                SYNTHETIC_LETTERS.len()
            );
        }

        // 1. Gỡ tiền tố chữ cái cũ khỏi từng phương án
        let mut clean_options: Vec<String> = question
            .options
            .iter()
            .map(|o| self.strip_option_prefix(o))
            .collect();

        // 2. Quy đáp án lưu trữ về nội dung phương án đúng
        let correct_content = self.resolve_correct_content(&question.correct_answer, &clean_options);

        // 3-5. Xáo trộn rồi gắn lại tiền tố A., B., ... theo thứ tự mới
        clean_options.shuffle(rng);
        question.options = clean_options
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{}. {}", SYNTHETIC_LETTERS[i], text))
            .collect();

        // 6. Tìm lại phương án đúng theo khóa so sánh, lấy chữ cái mới.
        // Không tìm thấy thì ghi rõ "chưa xác định" - tuyệt đối không
        // mặc định về một chữ cái nào, vì đó là bản ghi lỗi cần lộ ra.
        let entry = match correct_content {
            Some(content) => {
                let compare_key = normalize_compare_key(&content);
                match clean_options
                    .iter()
                    .position(|text| normalize_compare_key(text) == compare_key)
                {
                    Some(i) => AnswerKeyEntry {
                        correct_letter: CorrectLetter::Letter(SYNTHETIC_LETTERS[i]),
                        correct_content: content,
                        explanation: question.explanation.clone(),
                    },
                    None => {
                        warn!(
                            "Câu '{}' (vị trí {}): đáp án '{}' không khớp phương án nào",
                            question.id, position, content
                        );
                        AnswerKeyEntry {
                            correct_letter: CorrectLetter::Unresolved,
                            correct_content: content,
                            explanation: question.explanation.clone(),
                        }
                    }
                }
            }
            None => {
                warn!(
                    "Câu '{}' (vị trí {}): đáp án lưu trữ '{}' không quy giải được",
                    question.id, position, question.correct_answer
                );
                AnswerKeyEntry {
                    correct_letter: CorrectLetter::Unresolved,
                    correct_content: question.correct_answer.clone(),
                    explanation: question.explanation.clone(),
                }
            }
        };

        Ok(entry)
    }

    /// Gỡ tiền tố `A.` / `b)` / `C:` ở đầu một phương án
    fn strip_option_prefix(&self, option: &str) -> String {
        self.option_prefix.replace(option.trim(), "").trim().to_string()
    }

    /// Quy `correct_answer` về nội dung phương án đúng
    ///
    /// Ba cách mã hóa lịch sử:
    /// - chữ cái trần ("B", "B.") → tra theo *vị trí* trong danh sách
    ///   phương án gốc (trường hợp duy nhất dùng vị trí);
    /// - văn bản kèm tiền tố ("B. Hà Nội") → gỡ tiền tố, dùng phần còn lại;
    /// - văn bản thuần ("Hà Nội") → dùng nguyên văn.
    fn resolve_correct_content(
        &self,
        correct_answer: &str,
        clean_options: &[String],
    ) -> Option<String> {
        let answer = correct_answer.trim();

        if self.bare_letter.is_match(answer) {
            let letter = answer.chars().next()?.to_ascii_uppercase();
            let index = (letter as u8 - b'A') as usize;
            return clean_options.get(index).cloned();
        }

        let stripped = self.strip_option_prefix(answer);
        if stripped.is_empty() {
            return None;
        }
        Some(stripped)
    }
}

/// Khóa so sánh nội dung phương án: chữ thường, bỏ toàn bộ khoảng trắng
fn normalize_compare_key(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect()
}
