use crate::config::{CliConfig, LauncherSettings};
use crate::core::report;
use crate::domain::model::Deployment;
use crate::utils::logger;

/// Shared body of the `local-ai-services` and `deploy-network` binaries.
///
/// Returns the process exit code: 1 only when the user-supplied configuration
/// is invalid, 0 otherwise, whether or not the services came up.
pub async fn run(deployment: Deployment, cli: CliConfig) -> i32 {
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting {} AI service launcher", deployment);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let settings = match LauncherSettings::from_cli(deployment, &cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            return 1;
        }
    };

    print!(
        "{}",
        report::render_plan(deployment, &settings.host, &settings.services)
    );
    println!(
        "Waiting for services to start (up to {:?} per service)...",
        settings.readiness.total_wait()
    );

    match crate::launch(settings).await {
        Ok(summary) => {
            println!();
            print!("{}", report::render_summary(&summary));
        }
        Err(e) => {
            tracing::error!("❌ Launcher failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
    }

    0
}
