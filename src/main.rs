use anyhow::{Context, Result};
use std::path::PathBuf;

use exam_stats::utils::{logging, NoticeBoard};
use exam_stats::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().await.context("加载配置失败")?;

    // 初始化日志
    let notices = NoticeBoard::default();
    logging::init_with_notices(config.verbose_logging, &notices);

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    App::new(config, notices)
        .run(&paths)
        .await
        .context("处理工作簿失败")?;

    Ok(())
}
