use clap::Parser;
use local_ai_services::app::runner;
use local_ai_services::{CliConfig, Deployment};

/// Network variant: CORS-enabled servers, health checked through the LAN
/// address, with an access guide for other devices on success.
#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    let exit_code = runner::run(Deployment::Network, config).await;
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
