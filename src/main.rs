use clap::Parser;
use local_ai_services::app::runner;
use local_ai_services::{CliConfig, Deployment};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    let exit_code = runner::run(Deployment::Local, config).await;
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
