use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transcript_refiner::handler::shared_handler;
use transcript_refiner::models::InvocationEvent;

#[derive(Debug, Parser)]
#[command(name = "transcript-refiner")]
#[command(about = "Polish a raw transcript against its presentation slides")]
struct CliArgs {
    /// Presentation file (.pptx)
    #[arg(long, value_name = "PATH")]
    pptx: Option<PathBuf>,

    /// Raw transcript file (.txt)
    #[arg(long, value_name = "PATH")]
    txt: Option<PathBuf>,

    /// Invocation event JSON, as supplied by the hosting platform. Mutually
    /// exclusive with --pptx/--txt.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["pptx", "txt"])]
    event: Option<PathBuf>,

    /// Function ARN used to derive the inference region.
    #[arg(
        long,
        value_name = "ARN",
        default_value = "arn:aws:lambda:us-east-1:000000000000:function:transcript-refiner"
    )]
    arn: String,
}

/// Build a platform-shaped invocation event from the two raw files.
fn build_event(pptx_bytes: &[u8], txt_bytes: &[u8]) -> InvocationEvent {
    let body = serde_json::json!({
        "pptxFile": BASE64.encode(pptx_bytes),
        "txtFile": BASE64.encode(txt_bytes),
    });
    InvocationEvent {
        body: body.to_string(),
        request_context: None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcript_refiner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let event = if let Some(event_path) = &args.event {
        let raw = fs::read_to_string(event_path)
            .with_context(|| format!("reading event file {}", event_path.display()))?;
        serde_json::from_str(&raw).context("parsing invocation event")?
    } else {
        let (Some(pptx_path), Some(txt_path)) = (&args.pptx, &args.txt) else {
            bail!("either --event or both --pptx and --txt are required");
        };
        let pptx_bytes = fs::read(pptx_path)
            .with_context(|| format!("reading {}", pptx_path.display()))?;
        let txt_bytes =
            fs::read(txt_path).with_context(|| format!("reading {}", txt_path.display()))?;
        build_event(&pptx_bytes, &txt_bytes)
    };

    let handler = shared_handler(&args.arn).await?;
    let response = handler.handle(&event).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.status_code == 200 {
        info!("Request completed successfully");
        Ok(())
    } else {
        error!("Request failed with status {}", response.status_code);
        std::process::exit(1);
    }
}
