use clap::Args;
use early_risk::config::AppConfig;
use early_risk::error::AppError;
use early_risk::ingest::{load_path, save_scored};
use early_risk::report::{render_preview, render_tier_chart, top_flagged};
use early_risk::scoring::{RawRecord, RiskEngine};
use early_risk::BatchOutcome;
use early_risk::telemetry;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Input CSV path
    #[arg(long, short = 'i')]
    pub(crate) input: PathBuf,
    /// Output directory (defaults to RISK_OUTPUT_DIR or ./outputs)
    #[arg(long, short = 'o')]
    pub(crate) outdir: Option<PathBuf>,
    /// Number of top flagged customers to preview
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let ScoreArgs { input, outdir, top } = args;
    let outdir = outdir.unwrap_or(config.pipeline.output_dir);
    let limit = top.unwrap_or(config.pipeline.preview_limit);

    info!(input = %input.display(), "loading customer records");
    let records = load_path(&input)?;

    let outcome = score_records(&RiskEngine::default(), &records);
    let saved = save_scored(&outdir, &outcome)?;

    println!("Scored {} customers", outcome.len());
    println!("Saved results to: {}", saved.display());
    println!("\nCount by risk tier");
    print!("{}", render_tier_chart(&outcome.summary));

    if outcome.is_empty() {
        println!("\nTop flagged customers: none");
    } else {
        println!("\nTop flagged customers (preview)");
        print!("{}", render_preview(&top_flagged(&outcome, limit)));
    }

    Ok(())
}

/// Scores an offline batch across every available core.
fn score_records(engine: &RiskEngine, records: &[RawRecord]) -> BatchOutcome {
    let workers = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
    engine.score_batch_parallel(records, workers)
}
