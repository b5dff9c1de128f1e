//! Mô-đun tiện ích log
//!
//! Khởi tạo tracing và cung cấp các hàm log định dạng sẵn

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Khởi tạo hệ thống log
///
/// Mức log điều khiển qua biến môi trường `RUST_LOG`, mặc định `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Khởi tạo file log đầu ra
///
/// # Tham số
/// - `log_file_path`: đường dẫn file log
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nNhật ký sinh đề - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// Ghi thông tin khởi động chương trình
///
/// # Tham số
/// - `variant_count`: số bản đề sẽ sinh
/// - `max_concurrent`: số bản sinh đồng thời tối đa
pub fn log_startup(variant_count: usize, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Khởi động - chế độ sinh đề hàng loạt");
    info!("📄 Số bản đề: {}", variant_count);
    info!("📊 Sinh đồng thời tối đa: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// Ghi thông tin ngân hàng đã nạp
///
/// # Tham số
/// - `total`: tổng số câu hỏi trong ngân hàng
/// - `sources`: số nguồn (file) đã nạp
pub fn log_pool_loaded(total: usize, sources: usize) {
    info!("✓ Nạp xong {} câu hỏi từ {} nguồn", total, sources);
}

/// Ghi thông tin bắt đầu một bản đề
///
/// # Tham số
/// - `variant_index`: số thứ tự bản đề
/// - `exam_tag`: mã đề
pub fn log_variant_start(variant_index: usize, exam_tag: &str) {
    info!("\n[Đề {}] {}", variant_index, "─".repeat(30));
    info!("[Đề {}] Bắt đầu sinh mã đề '{}'", variant_index, exam_tag);
}

/// In thống kê cuối cùng
///
/// # Tham số
/// - `success`: số bản đề sinh thành công
/// - `failed`: số bản thất bại
/// - `total`: tổng số bản yêu cầu
/// - `log_file_path`: đường dẫn file log
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Thống kê toàn bộ");
    info!(
        "Thời điểm hoàn tất: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ Thành công: {}/{}", success, total);
    info!("❌ Thất bại: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\nNhật ký đã lưu tại: {}", log_file_path);
}

/// Cắt ngắn văn bản dài để hiển thị trong log
///
/// # Tham số
/// - `text`: văn bản gốc
/// - `max_len`: độ dài tối đa
///
/// # Trả về
/// Văn bản đã cắt ngắn
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
