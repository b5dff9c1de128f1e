//! Tầng điều phối ứng dụng
//!
//! Nạp toàn bộ nguồn câu hỏi trong thư mục đầu vào thành một ngân hàng,
//! rồi sinh hàng loạt bản đề (mỗi bản một mã đề) ghi ra thư mục đầu ra.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AssemblyError};
use crate::models::loaders::load_toml_to_question_bank;
use crate::models::matrix::ExamMatrix;
use crate::models::question::QuestionRecord;
use crate::services::ParserService;
use crate::utils::logging;
use crate::workflow::ExamFlow;

/// Ứng dụng sinh đề
pub struct App {
    config: Config,
    pool: Arc<Vec<QuestionRecord>>,
}

impl App {
    /// Khởi tạo ứng dụng: mở file log, nạp ngân hàng câu hỏi
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(config.variant_count, config.max_concurrent_variants);

        if config.variant_count == 0 {
            return Err(AppError::Assembly(AssemblyError::NoVariantsRequested).into());
        }

        let pool = load_pool(&config).await?;
        if pool.is_empty() {
            return Err(AppError::empty_pool().into());
        }

        Ok(Self {
            config,
            pool: Arc::new(pool),
        })
    }

    /// Chạy luồng chính: sinh toàn bộ bản đề theo cấu hình
    pub async fn run(&self) -> Result<()> {
        let matrix = self.parse_matrix()?;

        tokio::fs::create_dir_all(&self.config.output_folder)
            .await
            .with_context(|| {
                format!("Không tạo được thư mục đầu ra: {}", self.config.output_folder)
            })?;

        let stats = self.generate_all_variants(matrix).await;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            self.config.variant_count,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// Đọc ma trận đề từ cấu hình (chuỗi rỗng nghĩa là không dùng ma trận)
    fn parse_matrix(&self) -> Result<Option<ExamMatrix>> {
        let spec = self.config.exam_matrix.trim();
        if spec.is_empty() {
            return Ok(None);
        }

        let matrix = ExamMatrix::from_spec_str(spec)
            .ok_or_else(|| AppError::matrix_spec_invalid(spec))?;
        info!("📋 Dùng ma trận đề: {} ({} câu)", spec, matrix.total());
        Ok(Some(matrix))
    }

    /// Sinh tất cả bản đề, giới hạn số bản chạy đồng thời
    async fn generate_all_variants(&self, matrix: Option<ExamMatrix>) -> ProcessingStats {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_variants));
        let mut handles = Vec::new();

        for variant_index in 1..=self.config.variant_count {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let pool = self.pool.clone();
            let matrix = matrix.clone();
            let config = self.config.clone();
            let exam_tag = format!("{}-{}", config.exam_tag_prefix, variant_index);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                logging::log_variant_start(variant_index, &exam_tag);

                match generate_one_variant(&pool, matrix.as_ref(), &config, variant_index, &exam_tag)
                    .await
                {
                    Ok(path) => {
                        info!("[Đề {}] ✓ Hoàn tất mã đề '{}'", variant_index, exam_tag);
                        if config.verbose_logging {
                            info!("[Đề {}] Đã ghi: {}", variant_index, path);
                        }
                        true
                    }
                    Err(e) => {
                        error!("[Đề {}] ❌ Sinh đề thất bại: {}", variant_index, e);
                        false
                    }
                }
            }));
        }

        let mut stats = ProcessingStats::default();
        for outcome in futures::future::join_all(handles).await {
            match outcome {
                Ok(true) => stats.success += 1,
                Ok(false) => stats.failed += 1,
                Err(e) => {
                    error!("Tác vụ sinh đề bị hủy: {}", e);
                    stats.failed += 1;
                }
            }
        }
        stats
    }
}

/// Thống kê xử lý
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
}

/// Sinh một bản đề và ghi ra file JSON
async fn generate_one_variant(
    pool: &[QuestionRecord],
    matrix: Option<&ExamMatrix>,
    config: &Config,
    variant_index: usize,
    exam_tag: &str,
) -> Result<String> {
    // Seed 0: mỗi lần chạy một kết quả khác; seed khác 0: đóng băng
    // đề theo (seed, số thứ tự bản) để in lại được cùng một bộ đề
    let mut rng = if config.rng_seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(config.rng_seed.wrapping_add(variant_index as u64))
    };

    let flow = ExamFlow::new();
    let paper = match matrix {
        Some(matrix) => flow.assemble_by_matrix(pool, matrix, exam_tag, &mut rng)?,
        None => {
            let count = if config.questions_per_paper == 0 {
                pool.len()
            } else {
                config.questions_per_paper
            };
            flow.assemble_fixed(pool, count, exam_tag, &mut rng)?
        }
    };

    let path = format!("{}/{}.json", config.output_folder, exam_tag);
    let json = serde_json::to_string_pretty(&paper)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| AppError::file_write_failed(&path, e))?;

    Ok(path)
}

/// Nạp ngân hàng câu hỏi từ thư mục đầu vào
///
/// File `.txt` đi qua bộ phân tích văn bản thô, file `.toml` đi qua
/// bộ nạp ngân hàng. File hỏng được cảnh báo rồi bỏ qua.
async fn load_pool(config: &Config) -> Result<Vec<QuestionRecord>> {
    info!("\n📁 Đang quét thư mục nguồn: {}", config.input_folder);

    if !Path::new(&config.input_folder).exists() {
        return Err(AppError::directory_not_found(&config.input_folder).into());
    }

    let parser = ParserService::new();
    let mut pool: Vec<QuestionRecord> = Vec::new();
    let mut sources = 0usize;

    let mut entries = tokio::fs::read_dir(&config.input_folder)
        .await
        .with_context(|| format!("Không đọc được thư mục: {}", config.input_folder))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let stem = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        match path.extension().and_then(|s| s.to_str()) {
            Some("txt") => {
                let raw = match tokio::fs::read_to_string(&path).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("Đọc file thất bại {}: {}", path.display(), e);
                        continue;
                    }
                };

                let mut records = parser.parse(&raw);
                info!(
                    "Phân tích '{}': {} câu",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    records.len()
                );

                // Gắn tên file vào định danh để các nguồn không giẫm nhau
                for record in &mut records {
                    record.id = format!("{}:{}", stem, record.id);
                }
                pool.extend(records);
                sources += 1;
            }
            Some("toml") => match load_toml_to_question_bank(&path).await {
                Ok(bank) => {
                    info!("Nạp ngân hàng '{}': {} câu", bank.name, bank.questions.len());
                    pool.extend(bank.questions);
                    sources += 1;
                }
                Err(e) => {
                    warn!("Nạp ngân hàng thất bại {}: {}", path.display(), e);
                }
            },
            _ => {}
        }
    }

    logging::log_pool_loaded(pool.len(), sources);
    Ok(pool)
}
