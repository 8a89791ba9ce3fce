//! Highlight reel CLI.
//!
//! Usage: `reel <video-file> [output-file]`
//!
//! The vision credential is read from `REEL_API_KEY`.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_pipeline::{PipelineCallbacks, PipelineConfig, PipelineOrchestrator};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reel=info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(input) = args.get(1).map(PathBuf::from) else {
        eprintln!("usage: reel <video-file> [output-file]");
        return ExitCode::from(2);
    };
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(&input));

    let api_key = std::env::var("REEL_API_KEY").unwrap_or_default();
    let config = PipelineConfig::from_env(api_key);

    let callbacks = PipelineCallbacks::new()
        .on_progress(|event| {
            info!("[{:>3}%] {}", event.progress, event.stage);
        })
        .on_log(|message| info!("{message}"));

    let orchestrator = match PipelineOrchestrator::new(config, callbacks) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    // Ctrl-C requests cooperative cancellation
    let cancel = orchestrator.cancel_token();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Cancellation requested");
        cancel.cancel();
    });

    info!("Processing {}", input.display());
    match orchestrator.run(&input).await {
        Ok((blob, stats)) => {
            if let Err(e) = tokio::fs::write(&output, &blob.bytes).await {
                error!("Failed to write {}: {}", output.display(), e);
                return ExitCode::FAILURE;
            }
            info!(
                "Wrote {} ({} bytes, {} clips, {:.1}s, quality {} ({}), {:.1}s elapsed)",
                output.display(),
                stats.output_size,
                stats.clip_count,
                stats.total_duration,
                stats.quality_score,
                grade_for(stats.quality_score),
                stats.processing_time_secs,
            );
            for suggestion in &stats.suggestions {
                info!("suggestion: {suggestion}");
            }
            for warning in &stats.warnings {
                info!("warning: {warning}");
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancelled() => {
            info!("Cancelled, no output written");
            ExitCode::from(130)
        }
        Err(e) => {
            error!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// `<stem>_highlights.<ext>` next to the input.
fn default_output(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "reel".to_string());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp4".to_string());
    input.with_file_name(format!("{stem}_highlights.{ext}"))
}

fn grade_for(score: u8) -> char {
    reel_models::QualityScore::new(score as f64).grade()
}
