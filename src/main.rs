use anyhow::Result;
use exam_paper_engine::utils::logging;
use exam_paper_engine::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Khởi tạo log
    logging::init();

    // Nạp cấu hình
    let config = Config::from_env();

    // Khởi tạo rồi chạy ứng dụng
    App::initialize(config).await?.run().await?;

    Ok(())
}
