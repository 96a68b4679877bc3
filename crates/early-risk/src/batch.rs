use crate::scoring::{is_result_column, RawRecord, RiskEngine, RiskTier, ScoredRecord};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::thread;
use tracing::debug;

/// Tier counts for a batch. Summaries merge associatively and commutatively,
/// so partial tallies may be combined in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    #[serde(rename = "Low")]
    low: usize,
    #[serde(rename = "Medium")]
    medium: usize,
    #[serde(rename = "High")]
    high: usize,
    total: usize,
}

impl TierSummary {
    pub fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::High => self.high += 1,
        }
        self.total += 1;
    }

    pub fn merge(mut self, other: TierSummary) -> TierSummary {
        self.low += other.low;
        self.medium += other.medium;
        self.high += other.high;
        self.total += other.total;
        self
    }

    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl Extend<RiskTier> for TierSummary {
    fn extend<I: IntoIterator<Item = RiskTier>>(&mut self, iter: I) {
        for tier in iter {
            self.record(tier);
        }
    }
}

impl FromIterator<RiskTier> for TierSummary {
    fn from_iter<I: IntoIterator<Item = RiskTier>>(iter: I) -> Self {
        let mut summary = TierSummary::default();
        summary.extend(iter);
        summary
    }
}

/// Scored rows in input order plus the tier tally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Input column names in first-seen order across the batch, minus any
    /// that collide with the result columns.
    pub columns: Vec<String>,
    pub records: Vec<ScoredRecord>,
    pub summary: TierSummary,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn from_records(records: Vec<ScoredRecord>, summary: TierSummary) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for scored in &records {
            for (name, _) in scored.input.fields() {
                if !is_result_column(name) && !columns.iter().any(|existing| existing == name) {
                    columns.push(name.to_string());
                }
            }
        }

        Self {
            columns,
            records,
            summary,
        }
    }
}

impl RiskEngine {
    /// Scores every record, one output per input, in order.
    pub fn score_batch<'a, I>(&self, records: I) -> BatchOutcome
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut summary = TierSummary::default();
        let scored: Vec<ScoredRecord> = records
            .into_iter()
            .map(|raw| {
                let scored = self.score(raw);
                summary.record(scored.risk_tier);
                scored
            })
            .collect();

        debug!(
            records = summary.total(),
            high = summary.count(RiskTier::High),
            "scored batch"
        );
        BatchOutcome::from_records(scored, summary)
    }

    /// Same result as [`RiskEngine::score_batch`], with contiguous chunks
    /// scored on scoped worker threads.
    pub fn score_batch_parallel(&self, records: &[RawRecord], workers: NonZeroUsize) -> BatchOutcome {
        if records.is_empty() || workers.get() == 1 {
            return self.score_batch(records);
        }

        let chunk_size = records.len().div_ceil(workers.get());
        let partials: Vec<(Vec<ScoredRecord>, TierSummary)> = thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        let scored: Vec<ScoredRecord> =
                            chunk.iter().map(|raw| self.score(raw)).collect();
                        let summary: TierSummary =
                            scored.iter().map(|record| record.risk_tier).collect();
                        (scored, summary)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(partial) => partial,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut scored = Vec::with_capacity(records.len());
        let mut summary = TierSummary::default();
        for (chunk, partial) in partials {
            scored.extend(chunk);
            summary = summary.merge(partial);
        }

        debug!(
            records = summary.total(),
            workers = workers.get(),
            "scored batch in parallel"
        );
        BatchOutcome::from_records(scored, summary)
    }
}
