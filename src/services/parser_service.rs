//! Bộ phân tích văn bản thô - tầng nghiệp vụ
//!
//! Chuyển một khối văn bản dán tay (nhiều quy ước soạn thảo khác nhau)
//! thành danh sách bản ghi câu hỏi chuẩn hóa. Hàm thuần, không chặn,
//! không bao giờ ném lỗi: đoạn nào không phân tích được thì bỏ qua,
//! vì sau bước này luôn có người rà soát lại.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::bloom::BloomLevel;
use crate::models::question::{ImageRef, QuestionKind, QuestionRecord};

/// Kiểu đánh số câu trong một tài liệu
///
/// Hai kiểu loại trừ lẫn nhau: một tài liệu chỉ dùng một kiểu,
/// không trộn lẫn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberingStyle {
    /// `Câu 1.`, `Câu 2:` ...
    Word,
    /// `1.`, `2:` ...
    Bare,
}

/// Bộ phân tích văn bản thô thành câu hỏi
pub struct ParserService {
    word_numbering: Regex,
    bare_numbering: Regex,
    option_line: Regex,
    extra_option_marker: Regex,
    image_marker: Regex,
    inline_choice: Regex,
    explanation_heading: Regex,
    answer_table_heading: Regex,
    answer_tuple: Regex,
    leading_number: Regex,
}

impl Default for ParserService {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserService {
    /// Tạo bộ phân tích mới (biên dịch sẵn toàn bộ biểu thức chính quy)
    pub fn new() -> Self {
        Self {
            word_numbering: Regex::new(r"(?i)^Câu\s*(\d+)").expect("regex hợp lệ"),
            bare_numbering: Regex::new(r"^(\d+)\s*[.:]").expect("regex hợp lệ"),
            option_line: Regex::new(r"^(\*)?\s*([A-Da-d])[.:)]\s*(.*)$").expect("regex hợp lệ"),
            extra_option_marker: Regex::new(r"\s[A-Da-d][.:)]\s").expect("regex hợp lệ"),
            image_marker: Regex::new(r"\[img:([^\]]+)\]").expect("regex hợp lệ"),
            inline_choice: Regex::new(r"(?i)Chọn\s+([A-Da-d])\b").expect("regex hợp lệ"),
            explanation_heading: Regex::new(
                r"(?i)(Hướng dẫn giải|Lời giải|Cách giải|Giải thích)\s*:?",
            )
            .expect("regex hợp lệ"),
            answer_table_heading: Regex::new(r"(?i)BẢNG\s+ĐÁP\s+ÁN").expect("regex hợp lệ"),
            answer_tuple: Regex::new(r"(\d+)\s*\.?\s*([A-Da-d])\b").expect("regex hợp lệ"),
            leading_number: Regex::new(r"(?i)^\s*(?:Câu\s*\d+\s*[.:]?|\d+\s*[.:])\s*")
                .expect("regex hợp lệ"),
        }
    }

    /// Phân tích văn bản thô thành danh sách câu hỏi chuẩn hóa
    ///
    /// # Tham số
    /// - `raw_text`: văn bản dán tay, có thể lẫn tiêu đề mục,
    ///   bảng đáp án cuối tài liệu, đánh dấu ảnh `[img:...]`
    ///
    /// # Trả về
    /// Danh sách bản ghi theo thứ tự xuất hiện (có thể rỗng)
    pub fn parse(&self, raw_text: &str) -> Vec<QuestionRecord> {
        // Tách bảng đáp án cuối tài liệu trước khi chia khối
        let (body, side_table) = self.split_answer_table(raw_text);

        let style = self.detect_numbering_style(body);
        let blocks = self.split_blocks(body, style);

        debug!("Chia được {} khối câu hỏi", blocks.len());

        blocks
            .into_iter()
            .filter_map(|block| self.parse_block(&block, style, &side_table))
            .collect()
    }

    /// Tách phần "BẢNG ĐÁP ÁN" ở cuối tài liệu (nếu có)
    ///
    /// Bảng chứa các cặp `<số><chữ>` (vd. `12C`) và là nguồn đáp án
    /// dự phòng khi khối câu hỏi không mang chỉ dấu nào khác.
    fn split_answer_table<'a>(&self, raw_text: &'a str) -> (&'a str, HashMap<usize, char>) {
        let mut table = HashMap::new();

        let Some(m) = self.answer_table_heading.find(raw_text) else {
            return (raw_text, table);
        };

        let tail = &raw_text[m.end()..];
        for cap in self.answer_tuple.captures_iter(tail) {
            let number: usize = match cap[1].parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            let letter = cap[2]
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('A');
            table.insert(number, letter);
        }

        debug!("Bảng đáp án cuối tài liệu có {} mục", table.len());
        (&raw_text[..m.start()], table)
    }

    /// Đoán kiểu đánh số của tài liệu
    fn detect_numbering_style(&self, body: &str) -> NumberingStyle {
        for line in body.lines() {
            if self.word_numbering.is_match(line.trim_start()) {
                return NumberingStyle::Word;
            }
        }
        NumberingStyle::Bare
    }

    /// Chia văn bản thành các khối, mỗi khối bắt đầu bằng một dòng đánh số
    ///
    /// Phần trước khối đầu tiên (lời dẫn, tiêu đề mục) bị loại bỏ.
    fn split_blocks(&self, body: &str, style: NumberingStyle) -> Vec<String> {
        let start_re = match style {
            NumberingStyle::Word => &self.word_numbering,
            NumberingStyle::Bare => &self.bare_numbering,
        };

        let mut blocks: Vec<String> = Vec::new();
        let mut current: Option<String> = None;

        for line in body.lines() {
            if start_re.is_match(line.trim_start()) {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(line.to_string());
            } else if let Some(block) = current.as_mut() {
                block.push('\n');
                block.push_str(line);
            }
        }

        if let Some(block) = current {
            blocks.push(block);
        }

        blocks
    }

    /// Phân tích một khối thành bản ghi câu hỏi
    ///
    /// Trả về `None` khi khối chỉ là nhiễu (đề bài rỗng sau khi làm sạch).
    fn parse_block(
        &self,
        block: &str,
        style: NumberingStyle,
        side_table: &HashMap<usize, char>,
    ) -> Option<QuestionRecord> {
        let number = self.extract_question_number(block, style);
        let mut body = block.to_string();

        // (a) Đánh dấu ảnh `[img:<ref>]` - lấy đúng một cái rồi gỡ khỏi khối
        let mut image_ref = None;
        let marker = self
            .image_marker
            .captures(&body)
            .and_then(|cap| cap.get(0).map(|m| (m.range(), cap[1].trim().to_string())));
        if let Some((range, reference)) = marker {
            image_ref = Some(ImageRef::Pending(reference));
            body.replace_range(range, "");
        }

        // (b) Phần lời giải ở cuối khối
        let mut explanation = String::new();
        let heading = self
            .explanation_heading
            .find(&body)
            .map(|m| (m.start(), m.end()));
        if let Some((start, end)) = heading {
            explanation = body[end..].trim().to_string();
            body.truncate(start);
        }

        // (c) Chỉ dấu "Chọn <X>" trong thân khối
        let mut correct_letter: Option<char> = None;
        let choice = self
            .inline_choice
            .captures(&body)
            .and_then(|cap| cap.get(0).map(|m| (m.range(), cap[1].chars().next())));
        if let Some((range, letter)) = choice {
            correct_letter = letter.map(|c| c.to_ascii_uppercase());
            body.replace_range(range, "");
        }

        // (d) Tách dòng phương án / dòng đề bài
        let mut options: Vec<String> = Vec::new();
        let mut starred_letter: Option<char> = None;
        let mut stem_lines: Vec<&str> = Vec::new();

        for line in body.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if options.is_empty() {
                    stem_lines.push(line);
                }
                continue;
            }

            if let Some(cap) = self.option_line.captures(trimmed) {
                let starred = cap.get(1).is_some();
                let letter = cap[2].chars().next().unwrap_or('A').to_ascii_uppercase();
                let text = cap[3].trim();

                // Hạn chế đã ghi nhận: mỗi dòng chỉ bắt phương án đầu tiên.
                // Dòng có vẻ chứa thêm phương án khác thì cảnh báo để người
                // rà soát xử lý, không tự tách.
                if self.extra_option_marker.is_match(text) {
                    warn!("Dòng có thể chứa nhiều phương án, cần rà soát: {}", trimmed);
                }

                options.push(format!("{}. {}", letter, text));
                if starred && starred_letter.is_none() {
                    starred_letter = Some(letter);
                }
            } else if options.is_empty() {
                stem_lines.push(line);
            }
        }

        // (e) Ghép đề bài, gỡ cụm đánh số đầu dòng
        let stem_joined = stem_lines.join("\n");
        let content = self
            .leading_number
            .replace(&stem_joined, "")
            .trim()
            .to_string();

        if content.is_empty() {
            return None;
        }

        // (f) Ưu tiên: "Chọn X" > phương án đánh dấu `*` > bảng đáp án cuối
        let resolved_letter = correct_letter
            .or(starred_letter)
            .or_else(|| number.and_then(|n| side_table.get(&n).copied()));

        // (g) Có phương án thì là trắc nghiệm, không thì tự luận
        let kind = if options.is_empty() {
            QuestionKind::Essay
        } else {
            QuestionKind::MultipleChoice
        };

        Some(QuestionRecord {
            id: number
                .map(|n| format!("cau-{}", n))
                .unwrap_or_else(|| "cau-0".to_string()),
            content,
            kind,
            options,
            correct_answer: resolved_letter.map(|c| c.to_string()).unwrap_or_default(),
            explanation,
            bloom_level: BloomLevel::NhanBiet,
            image_ref,
        })
    }

    /// Lấy số thứ tự câu từ dòng đầu khối
    fn extract_question_number(&self, block: &str, style: NumberingStyle) -> Option<usize> {
        let first_line = block.lines().next()?.trim_start();
        let re = match style {
            NumberingStyle::Word => &self.word_numbering,
            NumberingStyle::Bare => &self.bare_numbering,
        };
        re.captures(first_line)?.get(1)?.as_str().parse().ok()
    }
}
