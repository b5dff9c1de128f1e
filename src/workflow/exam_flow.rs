//! Luồng ghép đề - tầng luồng
//!
//! Điều phối trọn vẹn một lần ghép đề: rút câu theo ma trận → sinh đề
//! kèm bảng đáp án. Không giữ tài nguyên nào, chỉ ghép các năng lực
//! nghiệp vụ lại với nhau.

use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

use crate::models::matrix::ExamMatrix;
use crate::models::paper::GeneratedPaper;
use crate::models::question::QuestionRecord;
use crate::services::{GeneratorService, SelectorService};

/// Luồng ghép đề hoàn chỉnh
pub struct ExamFlow {
    selector: SelectorService,
    generator: GeneratorService,
}

impl Default for ExamFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamFlow {
    /// Tạo luồng ghép đề mới
    pub fn new() -> Self {
        Self {
            selector: SelectorService::new(),
            generator: GeneratorService::new(),
        }
    }

    /// Ghép đề theo ma trận Bloom
    ///
    /// # Tham số
    /// - `pool`: ảnh chụp ngân hàng câu hỏi
    /// - `matrix`: số câu yêu cầu cho từng mức
    /// - `exam_tag`: mã đề
    /// - `rng`: nguồn ngẫu nhiên
    ///
    /// # Trả về
    /// Đề hoàn chỉnh, hoặc lỗi khi ma trận rỗng / ngân hàng thiếu câu
    pub fn assemble_by_matrix<R: Rng>(
        &self,
        pool: &[QuestionRecord],
        matrix: &ExamMatrix,
        exam_tag: &str,
        rng: &mut R,
    ) -> Result<GeneratedPaper> {
        // Chặn ma trận rỗng từ trước khi rút (tiền điều kiện của selector)
        if matrix.total() == 0 {
            anyhow::bail!("Ma trận đề không yêu cầu câu nào, không thể ghép đề");
        }

        info!("📋 Ghép đề '{}' theo ma trận ({} câu)", exam_tag, matrix.total());

        let ids = self
            .selector
            .select(pool, matrix, rng)
            .with_context(|| format!("Rút câu theo ma trận cho đề '{}' thất bại", exam_tag))?;

        let subset = self.resolve_ids(pool, &ids)?;
        self.generator.generate(&subset, subset.len(), exam_tag, rng)
    }

    /// Sinh đề trực tiếp từ một tập câu đã biết trước
    ///
    /// Dùng khi đề đã được chốt danh sách câu (vd. đề cũ cần xáo lại),
    /// không đi qua bước rút theo ma trận.
    pub fn assemble_fixed<R: Rng>(
        &self,
        subset: &[QuestionRecord],
        count: usize,
        exam_tag: &str,
        rng: &mut R,
    ) -> Result<GeneratedPaper> {
        self.generator.generate(subset, count, exam_tag, rng)
    }

    /// Đổi danh sách định danh thành bản ghi, giữ nguyên thứ tự rút
    fn resolve_ids(
        &self,
        pool: &[QuestionRecord],
        ids: &[String],
    ) -> Result<Vec<QuestionRecord>> {
        ids.iter()
            .map(|id| {
                pool.iter()
                    .find(|q| &q.id == id)
                    .cloned()
                    .with_context(|| format!("Định danh '{}' không có trong ngân hàng", id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::models::bloom::BloomLevel;
    use crate::models::question::QuestionKind;

    fn question(id: &str, level: BloomLevel) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            content: format!("Nội dung {}", id),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "A. Một".to_string(),
                "B. Hai".to_string(),
                "C. Ba".to_string(),
            ],
            correct_answer: "B".to_string(),
            bloom_level: level,
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_by_matrix() {
        let pool = vec![
            question("nb-1", BloomLevel::NhanBiet),
            question("nb-2", BloomLevel::NhanBiet),
            question("th-1", BloomLevel::ThongHieu),
        ];
        let matrix = ExamMatrix::new()
            .with(BloomLevel::NhanBiet, 2)
            .with(BloomLevel::ThongHieu, 1);
        let mut rng = StdRng::seed_from_u64(42);

        let paper = ExamFlow::new()
            .assemble_by_matrix(&pool, &matrix, "101", &mut rng)
            .unwrap();

        assert_eq!(paper.exam_tag, "101");
        assert_eq!(paper.ordered_questions.len(), 3);
        assert_eq!(paper.answer_key.len(), 3);
    }

    #[test]
    fn test_empty_matrix_is_rejected_up_front() {
        let pool = vec![question("nb-1", BloomLevel::NhanBiet)];
        let mut rng = StdRng::seed_from_u64(42);

        let result =
            ExamFlow::new().assemble_by_matrix(&pool, &ExamMatrix::new(), "101", &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_shortage_propagates() {
        let pool = vec![question("nb-1", BloomLevel::NhanBiet)];
        let matrix = ExamMatrix::new().with(BloomLevel::SangTao, 1);
        let mut rng = StdRng::seed_from_u64(42);

        let result = ExamFlow::new().assemble_by_matrix(&pool, &matrix, "101", &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_assemble_fixed_skips_selector() {
        let subset = vec![
            question("q-1", BloomLevel::NhanBiet),
            question("q-2", BloomLevel::SangTao),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        let paper = ExamFlow::new()
            .assemble_fixed(&subset, 2, "102", &mut rng)
            .unwrap();
        assert_eq!(paper.ordered_questions.len(), 2);
    }
}
