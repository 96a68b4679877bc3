mod normalizer;
mod reasons;
mod rules;
mod schema;
mod thresholds;
mod tier;

pub use normalizer::normalize;
pub use reasons::format_reasons;
pub use rules::{evaluate, FlagSet, RiskFlag};
pub use schema::{CanonicalRecord, DpdBucket, Field, FieldUnit, RawRecord, RawValue};
pub use thresholds::RiskThresholds;
pub use tier::{score, tier, RiskTier};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Columns produced by scoring. Input columns with these names are dropped
/// so a re-uploaded result file gets fresh values instead of duplicates.
const RESULT_COLUMNS: [&str; 5] = ["risk_score", "risk_tier", "reasons", "target_positive", "flags"];

pub fn is_result_column(name: &str) -> bool {
    RESULT_COLUMNS.contains(&name)
}

/// Stateless scorer that applies a threshold table to customer records.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    thresholds: RiskThresholds,
}

impl RiskEngine {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, raw: &RawRecord) -> ScoredRecord {
        let record = normalize(raw);
        let flags = evaluate(&record, &self.thresholds);
        let risk_score = score(&flags);

        ScoredRecord {
            input: raw.clone(),
            risk_tier: tier(risk_score),
            reasons: format_reasons(&flags),
            target_positive: record.rolled_forward(),
            record,
            flags,
            risk_score,
        }
    }
}

/// A scored customer: the untouched input row, its canonical reading and the
/// explanation trail.
///
/// Serializes as the input columns followed by `risk_score`, `risk_tier`,
/// `reasons`, `target_positive` and the per-rule flags. Input columns that
/// collide with those names are not repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub input: RawRecord,
    pub record: CanonicalRecord,
    pub flags: FlagSet,
    pub risk_score: u8,
    pub risk_tier: RiskTier,
    pub reasons: String,
    pub target_positive: bool,
}

impl Serialize for ScoredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.input.fields() {
            if is_result_column(name) {
                continue;
            }
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("risk_score", &self.risk_score)?;
        map.serialize_entry("risk_tier", &self.risk_tier)?;
        map.serialize_entry("reasons", &self.reasons)?;
        map.serialize_entry("target_positive", &self.target_positive)?;
        map.serialize_entry("flags", &self.flags)?;
        map.end()
    }
}
