/// Cấu hình chương trình
#[derive(Clone, Debug)]
pub struct Config {
    /// Thư mục chứa nguồn câu hỏi (.txt văn bản thô, .toml ngân hàng)
    pub input_folder: String,
    /// Thư mục ghi đề đã sinh (JSON)
    pub output_folder: String,
    /// Số bản đề (mã đề) sinh ra từ cùng một ngân hàng
    pub variant_count: usize,
    /// Số câu mỗi đề; 0 nghĩa là lấy toàn bộ ngân hàng
    pub questions_per_paper: usize,
    /// Tiền tố mã đề, vd. "101" → "101-1", "101-2", ...
    pub exam_tag_prefix: String,
    /// Chuỗi ma trận đề, vd. "Nhận biết=3,Thông hiểu=2"; rỗng thì bỏ qua
    /// bước rút theo ma trận và xáo trực tiếp
    pub exam_matrix: String,
    /// Số bản đề sinh đồng thời tối đa
    pub max_concurrent_variants: usize,
    /// Seed cố định cho nguồn ngẫu nhiên (đóng băng đề để in nhiều bản);
    /// 0 nghĩa là mỗi lần chạy một kết quả khác
    pub rng_seed: u64,
    /// Có ghi log chi tiết không
    pub verbose_logging: bool,
    /// File log đầu ra
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_questions".to_string(),
            output_folder: "output_papers".to_string(),
            variant_count: 1,
            questions_per_paper: 0,
            exam_tag_prefix: "101".to_string(),
            exam_matrix: String::new(),
            max_concurrent_variants: 4,
            rng_seed: 0,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            variant_count: std::env::var("VARIANT_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.variant_count),
            questions_per_paper: std::env::var("QUESTIONS_PER_PAPER").ok().and_then(|v| v.parse().ok()).unwrap_or(default.questions_per_paper),
            exam_tag_prefix: std::env::var("EXAM_TAG_PREFIX").unwrap_or(default.exam_tag_prefix),
            exam_matrix: std::env::var("EXAM_MATRIX").unwrap_or(default.exam_matrix),
            max_concurrent_variants: std::env::var("MAX_CONCURRENT_VARIANTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_variants),
            rng_seed: std::env::var("RNG_SEED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rng_seed),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
