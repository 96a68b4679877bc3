use super::IngestError;
use crate::batch::BatchOutcome;
use std::io::Write;

const RESULT_COLUMNS: [&str; 4] = ["risk_score", "risk_tier", "reasons", "target_positive"];

/// Writes the input columns followed by the scoring results, one row per record.
pub fn write_scored<W: Write>(writer: W, outcome: &BatchOutcome) -> Result<(), IngestError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header = outcome
        .columns
        .iter()
        .map(String::as_str)
        .chain(RESULT_COLUMNS);
    csv_writer.write_record(header)?;

    for scored in &outcome.records {
        let mut row: Vec<String> = outcome
            .columns
            .iter()
            .map(|column| {
                scored
                    .input
                    .get_by_name(column)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect();
        row.push(scored.risk_score.to_string());
        row.push(scored.risk_tier.label().to_string());
        row.push(scored.reasons.clone());
        row.push(u8::from(scored.target_positive).to_string());
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
