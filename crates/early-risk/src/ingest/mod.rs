mod reader;
mod writer;

pub use reader::read_records;
pub use writer::write_scored;

use crate::batch::BatchOutcome;
use crate::scoring::RawRecord;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const RESULTS_FILE_NAME: &str = "early_risk_results.csv";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported file type '.{extension}'; use .csv")]
    UnsupportedFormat { extension: String },
    #[error("input path has no file extension; use .csv")]
    MissingExtension,
    #[error("No file uploaded")]
    EmptyUpload,
}

/// Reads customer records from a file, dispatching on its extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, IngestError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(IngestError::MissingExtension)?;

    match extension.as_str() {
        "csv" => {
            let file = File::open(path)?;
            let records = read_records(BufReader::new(file))?;
            info!(path = %path.display(), records = records.len(), "loaded customer records");
            Ok(records)
        }
        _ => Err(IngestError::UnsupportedFormat { extension }),
    }
}

/// Writes the scored batch to `<outdir>/early_risk_results.csv`, creating the directory.
pub fn save_scored(outdir: impl AsRef<Path>, outcome: &BatchOutcome) -> Result<PathBuf, IngestError> {
    let outdir = outdir.as_ref();
    fs::create_dir_all(outdir)?;

    let path = outdir.join(RESULTS_FILE_NAME);
    let file = File::create(&path)?;
    write_scored(file, outcome)?;

    info!(path = %path.display(), records = outcome.len(), "saved scored records");
    Ok(path)
}
