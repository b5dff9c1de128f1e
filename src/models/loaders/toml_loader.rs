use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::models::bloom::BloomLevel;
use crate::models::question::{ImageRef, QuestionKind, QuestionRecord};

/// Một ngân hàng câu hỏi soạn thủ công, nạp từ file TOML
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub name: String,
    pub questions: Vec<QuestionRecord>,
    pub file_path: Option<String>,
}

/// Cấu trúc TOML trung gian của file ngân hàng
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<String>,
    content: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    bloom_level: Option<String>,
    /// Đánh dấu ảnh chờ tải lên
    #[serde(default)]
    image_ref: Option<String>,
    /// Dữ liệu ảnh nhúng sẵn (base64)
    #[serde(default)]
    image_base64: Option<String>,
}

/// Nạp một file TOML thành ngân hàng câu hỏi
///
/// # Tham số
/// - `toml_file_path`: đường dẫn file TOML
///
/// # Trả về
/// Trả về `QuestionBank` với các bản ghi đã chuẩn hóa
pub async fn load_toml_to_question_bank(toml_file_path: &Path) -> Result<QuestionBank> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("Không đọc được file TOML: {}", toml_file_path.display()))?;

    let parsed: TomlBankFile = toml::from_str(&content)
        .with_context(|| format!("Không giải mã được file TOML: {}", toml_file_path.display()))?;

    let bank_name = parsed.bank.name;
    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(idx, q)| convert_question(&bank_name, idx, q))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        name: bank_name,
        questions,
        file_path: Some(toml_file_path.to_string_lossy().to_string()),
    })
}

/// Chuyển một mục TOML thành bản ghi chuẩn hóa
fn convert_question(bank_name: &str, index: usize, q: TomlQuestion) -> Result<QuestionRecord> {
    // Không ghi kind trong file: có phương án thì là trắc nghiệm
    let kind = if q.options.is_empty() {
        QuestionKind::Essay
    } else {
        QuestionKind::MultipleChoice
    };

    let bloom_level = match q.bloom_level.as_deref() {
        Some(s) => BloomLevel::find(s)
            .with_context(|| format!("Mức Bloom không hợp lệ: '{}' (ngân hàng {})", s, bank_name))?,
        None => BloomLevel::NhanBiet,
    };

    let image_ref = match (q.image_base64, q.image_ref) {
        (Some(data), _) => Some(ImageRef::Inline(data)),
        (None, Some(marker)) => Some(ImageRef::Pending(marker)),
        (None, None) => None,
    };

    Ok(QuestionRecord {
        id: q
            .id
            .unwrap_or_else(|| format!("{}-{}", bank_name, index + 1)),
        content: q.content,
        kind,
        options: q.options,
        correct_answer: q.correct_answer,
        explanation: q.explanation,
        bloom_level,
        image_ref,
    })
}

/// Nạp toàn bộ file TOML trong một thư mục thành danh sách ngân hàng
///
/// File hỏng được ghi cảnh báo rồi bỏ qua, không làm hỏng cả lượt nạp.
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<QuestionBank>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("Thư mục không tồn tại: {}", folder_path);
    }

    let mut banks = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("Không đọc được thư mục: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "Đang nạp: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_question_bank(&path).await {
                Ok(bank) => {
                    tracing::info!("Nạp thành công {} câu hỏi", bank.questions.len());
                    banks.push(bank);
                }
                Err(e) => {
                    tracing::warn!("Nạp file thất bại {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BANK: &str = r#"
[bank]
name = "toan-12"

[[questions]]
id = "t12-01"
content = "Giá trị của $2^3$ là bao nhiêu?"
options = ["A. 6", "B. 8", "C. 9", "D. 12"]
correct_answer = "B"
bloom_level = "Nhận biết"

[[questions]]
content = "Trình bày định lý Pythagore."
explanation = "Xem sách giáo khoa chương 2."
bloom_level = "Thông hiểu"
"#;

    #[test]
    fn test_load_valid_bank() {
        let dir = std::env::temp_dir().join("epe_toml_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bank.toml");
        std::fs::write(&path, VALID_BANK).unwrap();

        let bank = tokio_test::block_on(load_toml_to_question_bank(&path)).unwrap();
        assert_eq!(bank.name, "toan-12");
        assert_eq!(bank.questions.len(), 2);

        let mc = &bank.questions[0];
        assert_eq!(mc.id, "t12-01");
        assert_eq!(mc.kind, QuestionKind::MultipleChoice);
        assert_eq!(mc.options.len(), 4);
        assert_eq!(mc.correct_answer, "B");

        // Không có phương án và không có id: tự luận, id sinh theo thứ tự
        let essay = &bank.questions[1];
        assert_eq!(essay.kind, QuestionKind::Essay);
        assert_eq!(essay.id, "toan-12-2");
        assert_eq!(essay.bloom_level, BloomLevel::ThongHieu);
    }

    #[test]
    fn test_load_folder_skips_broken_file() {
        let dir = std::env::temp_dir().join("epe_toml_folder_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("ok.toml"), VALID_BANK).unwrap();
        std::fs::write(dir.join("bad.toml"), "đây không phải [toml hợp lệ }{").unwrap();

        let banks =
            tokio_test::block_on(load_all_toml_files(dir.to_str().unwrap())).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].name, "toan-12");
    }

    #[test]
    fn test_invalid_bloom_level_is_an_error() {
        let dir = std::env::temp_dir().join("epe_toml_bloom_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bank.toml");
        std::fs::write(
            &path,
            r#"
[bank]
name = "x"

[[questions]]
content = "Câu hỏi"
bloom_level = "mức không tồn tại"
"#,
        )
        .unwrap();

        let result = tokio_test::block_on(load_toml_to_question_bank(&path));
        assert!(result.is_err());
    }
}
