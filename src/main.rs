use anyhow::Context;
use clap::Parser;
use lotto_etl::core::HotCold;
use lotto_etl::utils::{logger, validation::Validate};
use lotto_etl::{AppConfig, CliConfig, EtlEngine, LocalStorage, LotteryPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting lotto-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    if let Some(window) = cli.window {
        config.analysis.window = Some(window);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 建立存儲與管道
    let storage = LocalStorage::new(config.load.output_path.clone());
    let pipeline = LotteryPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Pipeline completed: {} phases parsed", summary.phase_count);
            print_report(&summary.report);
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!("❌ Pipeline failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_report(report: &HotCold) {
    println!("最近 {} 期的冷熱號碼:\n", report.taken);

    println!("最熱 10 個號碼:");
    for (number, count) in &report.hot {
        println!("{:>2}: 開出 {} 次", number, count);
    }

    println!("\n最冷 10 個號碼:");
    for (number, distance) in &report.cold {
        println!("{:>2}: {} 期未開出", number, distance);
    }
}
