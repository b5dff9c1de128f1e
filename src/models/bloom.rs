/// Mức độ nhận thức (thang Bloom)
///
/// Sáu mức cố định dùng để xây ma trận đề cân đối.
/// Chỉ có SelectorService đọc trường này khi rút câu hỏi theo hạn ngạch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BloomLevel {
    /// Nhận biết
    #[serde(rename = "Nhận biết")]
    NhanBiet = 1,
    /// Thông hiểu
    #[serde(rename = "Thông hiểu")]
    ThongHieu = 2,
    /// Vận dụng
    #[serde(rename = "Vận dụng")]
    VanDung = 3,
    /// Phân tích
    #[serde(rename = "Phân tích")]
    PhanTich = 4,
    /// Đánh giá
    #[serde(rename = "Đánh giá")]
    DanhGia = 5,
    /// Sáng tạo
    #[serde(rename = "Sáng tạo")]
    SangTao = 6,
}

/// Bảng bí danh tĩnh: tên viết tắt / cách gọi khác → mức Bloom
static BLOOM_ALIASES: phf::Map<&'static str, BloomLevel> = phf::phf_map! {
    "nhận biết" => BloomLevel::NhanBiet,
    "nhớ" => BloomLevel::NhanBiet,
    "nb" => BloomLevel::NhanBiet,
    "thông hiểu" => BloomLevel::ThongHieu,
    "hiểu" => BloomLevel::ThongHieu,
    "th" => BloomLevel::ThongHieu,
    "vận dụng" => BloomLevel::VanDung,
    "áp dụng" => BloomLevel::VanDung,
    "vd" => BloomLevel::VanDung,
    "phân tích" => BloomLevel::PhanTich,
    "pt" => BloomLevel::PhanTich,
    "đánh giá" => BloomLevel::DanhGia,
    "dg" => BloomLevel::DanhGia,
    "sáng tạo" => BloomLevel::SangTao,
    "vận dụng cao" => BloomLevel::SangTao,
    "st" => BloomLevel::SangTao,
};

impl BloomLevel {
    /// Tất cả các mức theo thứ tự từ thấp đến cao
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::NhanBiet,
        BloomLevel::ThongHieu,
        BloomLevel::VanDung,
        BloomLevel::PhanTich,
        BloomLevel::DanhGia,
        BloomLevel::SangTao,
    ];

    /// Lấy mã số của mức
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Lấy tên chuẩn
    pub fn name(self) -> &'static str {
        match self {
            BloomLevel::NhanBiet => "Nhận biết",
            BloomLevel::ThongHieu => "Thông hiểu",
            BloomLevel::VanDung => "Vận dụng",
            BloomLevel::PhanTich => "Phân tích",
            BloomLevel::DanhGia => "Đánh giá",
            BloomLevel::SangTao => "Sáng tạo",
        }
    }

    /// Giải mã mức từ mã số
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(BloomLevel::NhanBiet),
            2 => Some(BloomLevel::ThongHieu),
            3 => Some(BloomLevel::VanDung),
            4 => Some(BloomLevel::PhanTich),
            5 => Some(BloomLevel::DanhGia),
            6 => Some(BloomLevel::SangTao),
            _ => None,
        }
    }

    /// Thử giải mã mức từ chuỗi (khớp chính xác với tên chuẩn)
    pub fn from_str(s: &str) -> Option<Self> {
        BloomLevel::ALL.iter().copied().find(|l| l.name() == s)
    }

    /// Tìm mức từ chuỗi bất kỳ (khớp chính xác rồi tra bảng bí danh)
    pub fn find(s: &str) -> Option<Self> {
        if let Some(level) = Self::from_str(s) {
            return Some(level);
        }

        let key = s.trim().to_lowercase();
        BLOOM_ALIASES.get(key.as_str()).copied()
    }
}

impl std::fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
