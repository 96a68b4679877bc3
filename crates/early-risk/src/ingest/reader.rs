use super::IngestError;
use crate::scoring::{RawRecord, RawValue};
use std::io::Read;

/// Parses a headed CSV upload into raw records.
///
/// Empty cells are dropped so they read as missing. Every other cell is kept
/// as text exactly as uploaded; numeric fields are parsed at scoring time.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.replace('\u{feff}', ""))
        .collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(IngestError::EmptyUpload);
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.clone(), RawValue::Text(cell.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}
