//! Bộ rút câu hỏi theo ma trận Bloom - tầng nghiệp vụ
//!
//! Rút ngẫu nhiên, không lặp, đủ hạn ngạch từng mức từ ngân hàng.
//! Thiếu ở mức nào thì báo đủ tất cả các mức thiếu một lượt,
//! không rút dở dang.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::models::bloom::BloomLevel;
use crate::models::matrix::ExamMatrix;
use crate::models::question::QuestionRecord;

/// Thiếu hụt câu hỏi ở một mức Bloom
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Mức '{level}' chỉ có {available} câu, cần {requested}")]
pub struct ShortageError {
    /// Mức bị thiếu
    pub level: BloomLevel,
    /// Số câu hiện có trong ngân hàng
    pub available: usize,
    /// Số câu ma trận yêu cầu
    pub requested: usize,
}

/// Lỗi khi rút câu hỏi theo ma trận
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Một hoặc nhiều mức không đủ câu - liệt kê đầy đủ để
    /// người ra đề thấy toàn cảnh, không báo từng mức một
    #[error("Ngân hàng không đủ câu ở {} mức", .0.len())]
    Shortages(Vec<ShortageError>),
    /// Ma trận rỗng - phía gọi phải chặn từ trước
    #[error("Ma trận đề không yêu cầu câu nào")]
    EmptyMatrix,
}

/// Bộ rút câu hỏi theo hạn ngạch
pub struct SelectorService;

impl Default for SelectorService {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorService {
    /// Tạo bộ rút câu hỏi mới
    pub fn new() -> Self {
        Self
    }

    /// Rút một tập định danh câu hỏi thỏa ma trận
    ///
    /// # Tham số
    /// - `pool`: ảnh chụp ngân hàng câu hỏi (chỉ đọc)
    /// - `matrix`: số câu yêu cầu cho từng mức
    /// - `rng`: nguồn ngẫu nhiên do phía gọi cấp
    ///
    /// # Trả về
    /// Danh sách định danh đã trộn lẫn các mức, hoặc danh sách
    /// đầy đủ các mức bị thiếu. Không bao giờ rút dở dang.
    pub fn select<R: Rng>(
        &self,
        pool: &[QuestionRecord],
        matrix: &ExamMatrix,
        rng: &mut R,
    ) -> Result<Vec<String>, SelectionError> {
        if matrix.total() == 0 {
            return Err(SelectionError::EmptyMatrix);
        }

        let mut shortages = Vec::new();
        let mut selected: Vec<String> = Vec::new();

        for level in BloomLevel::ALL {
            let requested = matrix.requested(level);
            if requested == 0 {
                continue;
            }

            let mut candidates: Vec<&QuestionRecord> =
                pool.iter().filter(|q| q.bloom_level == level).collect();

            debug!(
                "Mức '{}': cần {}, có {}",
                level,
                requested,
                candidates.len()
            );

            if candidates.len() < requested {
                shortages.push(ShortageError {
                    level,
                    available: candidates.len(),
                    requested,
                });
                continue;
            }

            candidates.shuffle(rng);
            selected.extend(candidates[..requested].iter().map(|q| q.id.clone()));
        }

        if !shortages.is_empty() {
            return Err(SelectionError::Shortages(shortages));
        }

        // Trộn lần cuối để các mức xen kẽ nhau thay vì dồn cụm
        selected.shuffle(rng);

        info!("✓ Đã rút {} câu theo ma trận", selected.len());
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: &str, level: BloomLevel) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            content: format!("Câu hỏi {}", id),
            bloom_level: level,
            ..Default::default()
        }
    }

    fn pool() -> Vec<QuestionRecord> {
        vec![
            question("nb-1", BloomLevel::NhanBiet),
            question("nb-2", BloomLevel::NhanBiet),
            question("nb-3", BloomLevel::NhanBiet),
            question("th-1", BloomLevel::ThongHieu),
            question("th-2", BloomLevel::ThongHieu),
            question("vd-1", BloomLevel::VanDung),
        ]
    }

    #[test]
    fn test_quota_satisfied() {
        let matrix = ExamMatrix::new()
            .with(BloomLevel::NhanBiet, 2)
            .with(BloomLevel::ThongHieu, 1);
        let mut rng = StdRng::seed_from_u64(7);

        let ids = SelectorService::new()
            .select(&pool(), &matrix, &mut rng)
            .unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(ids.iter().filter(|id| id.starts_with("nb-")).count(), 2);
        assert_eq!(ids.iter().filter(|id| id.starts_with("th-")).count(), 1);
        // Không rút lặp
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_shortage_reported_with_empty_selection() {
        // Ngân hàng chỉ có 2 câu "Nhận biết" nhưng cần 3
        let small_pool = vec![
            question("nb-1", BloomLevel::NhanBiet),
            question("nb-2", BloomLevel::NhanBiet),
        ];
        let matrix = ExamMatrix::new().with(BloomLevel::NhanBiet, 3);
        let mut rng = StdRng::seed_from_u64(7);

        let err = SelectorService::new()
            .select(&small_pool, &matrix, &mut rng)
            .unwrap_err();

        assert_eq!(
            err,
            SelectionError::Shortages(vec![ShortageError {
                level: BloomLevel::NhanBiet,
                available: 2,
                requested: 3,
            }])
        );
    }

    #[test]
    fn test_all_shortages_reported_at_once() {
        let matrix = ExamMatrix::new()
            .with(BloomLevel::NhanBiet, 2)
            .with(BloomLevel::DanhGia, 1)
            .with(BloomLevel::SangTao, 2);
        let mut rng = StdRng::seed_from_u64(7);

        let err = SelectorService::new()
            .select(&pool(), &matrix, &mut rng)
            .unwrap_err();

        match err {
            SelectionError::Shortages(shortages) => {
                assert_eq!(shortages.len(), 2);
                assert!(shortages.iter().any(|s| s.level == BloomLevel::DanhGia));
                assert!(shortages.iter().any(|s| s.level == BloomLevel::SangTao));
            }
            other => panic!("Lỗi không mong đợi: {:?}", other),
        }
    }

    #[test]
    fn test_no_substitution_across_levels() {
        // Thiếu "Đánh giá" thì không được lấy bù từ mức khác
        let matrix = ExamMatrix::new().with(BloomLevel::DanhGia, 1);
        let mut rng = StdRng::seed_from_u64(7);

        let result = SelectorService::new().select(&pool(), &matrix, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = SelectorService::new()
            .select(&pool(), &ExamMatrix::new(), &mut rng)
            .unwrap_err();
        assert_eq!(err, SelectionError::EmptyMatrix);
    }
}
