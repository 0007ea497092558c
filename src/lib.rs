pub mod cli;
pub mod error;
pub mod gcode;
pub mod models;
pub mod postprocessor;
pub mod review;

use std::process::ExitCode;

use clap::Parser;

use error::AppError;
use models::Postable;
use postprocessor::{PostProcessor, Reviewer, RETURN_ONLY_SINK};
use review::EditorReviewer;

/// sbpost command-line entry point.
///
/// Everything lives here so it can be tested and referenced by the thin
/// `main.rs` binary wrapper.
pub fn run() -> ExitCode {
    // ── Tracing setup (must happen before anything else) ────────────────────
    //
    // Logs are written to a rolling-never (single) file in the OS data dir:
    //   Linux    ~/.local/share/sbpost/sbpost.log
    //   macOS    ~/Library/Application Support/sbpost/sbpost.log
    //   Windows  %LOCALAPPDATA%\sbpost\sbpost.log
    //
    // Log level is controlled by the RUST_LOG environment variable;
    // defaults to INFO when the variable is absent.
    let log_dir = dirs::data_local_dir().unwrap_or_default().join("sbpost");

    // tracing_appender::rolling::never panics if it cannot open the log file,
    // so the directory tree has to exist first.
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::never(&log_dir, "sbpost.log");
    let (non_blocking, _tracing_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    let args = cli::Args::parse();
    tracing::info!(input = %args.input.display(), output = %args.output, "sbpost starting");

    match export(&args) {
        Ok(text) => {
            if args.output == RETURN_ONLY_SINK {
                print!("{text}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the job and configuration named by `args` and exports the program.
/// Returns the final program text.
pub fn export(args: &cli::Args) -> Result<String, AppError> {
    let config = args.load_config()?;
    let json = std::fs::read_to_string(&args.input)?;
    let items: Vec<Postable> = serde_json::from_str(&json)?;

    let reviewer = if config.output.show_editor {
        EditorReviewer::from_env()
    } else {
        None
    };
    if config.output.show_editor && reviewer.is_none() {
        tracing::info!("no $VISUAL or $EDITOR set; skipping review");
    }

    let processor = PostProcessor::new(config)?;
    let text = processor.export(
        &items,
        &args.output,
        reviewer.as_ref().map(|r| r as &dyn Reviewer),
    )?;
    Ok(text)
}
