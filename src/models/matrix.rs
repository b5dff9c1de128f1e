use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::bloom::BloomLevel;

/// Ma trận đề: số câu yêu cầu cho từng mức Bloom
///
/// Mức không xuất hiện trong bảng được hiểu là yêu cầu 0 câu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamMatrix {
    counts: BTreeMap<BloomLevel, usize>,
}

impl ExamMatrix {
    /// Tạo ma trận rỗng (mọi mức đều 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Đặt số câu yêu cầu cho một mức (kiểu builder)
    pub fn with(mut self, level: BloomLevel, count: usize) -> Self {
        self.counts.insert(level, count);
        self
    }

    /// Số câu yêu cầu ở một mức
    pub fn requested(&self, level: BloomLevel) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    /// Tổng số câu yêu cầu trên toàn ma trận
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Giải mã ma trận từ chuỗi cấu hình dạng `"Nhận biết=3,Thông hiểu=2"`
    ///
    /// Tên mức được tra qua `BloomLevel::find` nên chấp nhận cả bí danh
    /// (`nb=3,th=2`). Trả về `None` khi gặp đoạn không giải mã được.
    pub fn from_spec_str(spec: &str) -> Option<Self> {
        let mut matrix = ExamMatrix::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (name, count) = part.split_once('=')?;
            let level = BloomLevel::find(name)?;
            let count: usize = count.trim().parse().ok()?;
            matrix.counts.insert(level, count);
        }

        Some(matrix)
    }
}
