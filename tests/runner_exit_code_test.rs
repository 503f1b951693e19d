#![cfg(feature = "cli")]

use clap::Parser;
use local_ai_services::app::runner;
use local_ai_services::{CliConfig, Deployment};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn cli(args: &[&str]) -> CliConfig {
    CliConfig::parse_from(std::iter::once("local-ai-services").chain(args.iter().copied()))
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_services_that_never_start_still_exit_zero() {
    let temp_dir = TempDir::new().unwrap();
    let working_dir = temp_dir.path().to_str().unwrap();

    let config = cli(&[
        "--working-dir",
        working_dir,
        "--interpreter",
        "definitely-not-a-real-interpreter-xyz",
        "--host",
        "127.0.0.1",
        "--max-attempts",
        "1",
        "--request-timeout-secs",
        "1",
    ]);

    let exit_code = runner::run(Deployment::Local, config).await;

    assert_eq!(exit_code, 0);
    // 即使直譯器不存在，檔案仍然會寫出
    assert!(temp_dir.path().join("paddle_server.py").exists());
    assert!(temp_dir.path().join("qwen_server.py").exists());
}

#[tokio::test]
async fn test_missing_config_file_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let config = cli(&["--config", missing.to_str().unwrap()]);

    assert_eq!(runner::run(Deployment::Local, config).await, 1);
}

#[tokio::test]
async fn test_invalid_config_value_exits_one_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let file = config_file("[services.ocr]\nport = 0\n");

    let config = cli(&[
        "--config",
        file.path().to_str().unwrap(),
        "--working-dir",
        temp_dir.path().to_str().unwrap(),
    ]);

    assert_eq!(runner::run(Deployment::Local, config).await, 1);
    assert!(!temp_dir.path().join("paddle_server.py").exists());
}

#[tokio::test]
async fn test_oversized_readiness_delays_exit_one() {
    let temp_dir = TempDir::new().unwrap();
    let file = config_file(
        "[readiness]\n\
         initial_delay_ms = 9223372036854775807\n\
         base_delay_ms = 9223372036854775807\n\
         max_delay_ms = 9223372036854775807\n\
         max_attempts = 2000\n",
    );

    let config = cli(&[
        "--config",
        file.path().to_str().unwrap(),
        "--working-dir",
        temp_dir.path().to_str().unwrap(),
    ]);

    assert_eq!(runner::run(Deployment::Local, config).await, 1);
}
