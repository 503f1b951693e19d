use anyhow::{Context, Result};
use clap::Parser;
use local_ai_services::core::client::DEFAULT_INFERENCE_TIMEOUT;
use local_ai_services::core::health::DEFAULT_REQUEST_TIMEOUT;
use local_ai_services::utils::logger;
use local_ai_services::utils::validation::validate_url;
use local_ai_services::ServiceClient;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "probe-services")]
#[command(about = "Check the local AI services and optionally run an image through them")]
struct Args {
    /// Base URL of the OCR service
    #[arg(long, default_value = "http://localhost:8001")]
    ocr_url: String,

    /// Base URL of the image-enhancement service
    #[arg(long, default_value = "http://localhost:8000")]
    enhance_url: String,

    /// Image to send to /ocr and /enhance
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Prompt for /enhance (the service picks its own default when omitted)
    #[arg(long)]
    prompt: Option<String>,

    /// Where to write the enhanced image
    #[arg(short, long, default_value = "enhanced.jpg")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    validate_url("ocr_url", &args.ocr_url)?;
    validate_url("enhance_url", &args.enhance_url)?;

    let client = ServiceClient::new(DEFAULT_REQUEST_TIMEOUT, DEFAULT_INFERENCE_TIMEOUT)?;

    println!("🔍 Checking services...");
    let ocr_health = client.health(&args.ocr_url).await;
    let enhance_health = client.health(&args.enhance_url).await;
    for (name, url, report) in [
        ("PaddleOCR", &args.ocr_url, &ocr_health),
        ("Qwen", &args.enhance_url, &enhance_health),
    ] {
        if report.running {
            println!(
                "  ✅ {} at {} (version {})",
                name,
                url,
                report.version().unwrap_or("unknown")
            );
        } else {
            println!("  ❌ {} at {} is not reachable", name, url);
        }
    }

    let Some(image_path) = args.image else {
        return Ok(());
    };
    let image = std::fs::read(&image_path)
        .with_context(|| format!("failed to read image {}", image_path.display()))?;

    if ocr_health.running {
        println!("\n📝 OCR results for {}:", image_path.display());
        match client.ocr(&args.ocr_url, &image).await {
            Ok(response) => {
                for block in response.text_blocks() {
                    println!(
                        "  [{:.3}, {:.3}, {:.3}, {:.3}] {:.2} {}",
                        block.position[0],
                        block.position[1],
                        block.position[2],
                        block.position[3],
                        block.score,
                        block.content
                    );
                }
            }
            Err(e) => eprintln!("  ❌ {}", e.user_friendly_message()),
        }
    }

    if enhance_health.running {
        println!("\n🖼️ Enhancing {}...", image_path.display());
        match client
            .enhance(&args.enhance_url, &image, args.prompt.as_deref())
            .await
        {
            Ok(bytes) => {
                std::fs::write(&args.output, &bytes)
                    .with_context(|| format!("failed to write {}", args.output.display()))?;
                println!("  📁 Enhanced image saved to: {}", args.output.display());
            }
            Err(e) => eprintln!("  ❌ {}", e.user_friendly_message()),
        }
    }

    Ok(())
}
