use cbo_cdg_report::core::ConfigProvider;
use cbo_cdg_report::utils::error::ErrorSeverity;
use cbo_cdg_report::utils::{logger, validation::Validate};
use cbo_cdg_report::{
    CliConfig, CostEstimatePipeline, LocalStorage, ReportEngine, ReportError, RunSummary,
    TomlConfig,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => exit_with(&e),
            };
            if cli.today.is_some() {
                config.report.today = cli.today;
            }
            if cli.congress.is_some() {
                config.report.congress = cli.congress;
            }
            run(config).await
        }
        None => run(cli).await,
    };

    match result {
        Ok(summary) => {
            tracing::info!("✅ Report completed successfully");
            println!("Total New: {}", summary.total_new);
            println!("Total Missing: {}", summary.total_missing);
            println!("📁 Report saved to: {}", summary.output_path);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<RunSummary, ReportError> {
    config.validate()?;
    tracing::info!(
        "📋 Congress {}, feed {}, output {}",
        config.congress(),
        config.feed_url(),
        config.output_path()
    );

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CostEstimatePipeline::new(storage, config)?;
    ReportEngine::new(pipeline).run().await
}

fn exit_with(e: &ReportError) -> ! {
    tracing::error!(
        "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
