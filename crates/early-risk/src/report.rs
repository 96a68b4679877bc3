//! Plain-text renderings of a scored batch for terminal output.

use crate::batch::{BatchOutcome, TierSummary};
use crate::scoring::{Field, RiskTier, ScoredRecord};
use std::cmp::Reverse;

const BAR_WIDTH: usize = 40;

/// Highest-scoring records first; ties keep input order.
pub fn top_flagged(outcome: &BatchOutcome, limit: usize) -> Vec<&ScoredRecord> {
    let mut ranked: Vec<&ScoredRecord> = outcome.records.iter().collect();
    ranked.sort_by_key(|scored| Reverse(scored.risk_score));
    ranked.truncate(limit);
    ranked
}

/// Fixed-width table of the preview columns. Absent input columns render as blanks.
pub fn render_preview(records: &[&ScoredRecord]) -> String {
    let headers = [
        Field::CustomerId.header(),
        "risk_score",
        "risk_tier",
        "reasons",
        Field::UtilisationPct.header(),
        Field::AvgPaymentRatio.header(),
        Field::MinDuePaidFrequency.header(),
        Field::CashWithdrawalPct.header(),
        Field::NextDpdBucket.header(),
    ];

    let rows: Vec<[String; 9]> = records
        .iter()
        .map(|scored| {
            let input = |field: Field| {
                scored
                    .input
                    .get(field)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            };
            [
                scored.record.customer_id.clone(),
                scored.risk_score.to_string(),
                scored.risk_tier.to_string(),
                scored.reasons.clone(),
                input(Field::UtilisationPct),
                input(Field::AvgPaymentRatio),
                input(Field::MinDuePaidFrequency),
                input(Field::CashWithdrawalPct),
                input(Field::NextDpdBucket),
            ]
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Horizontal bar per tier, scaled to the largest tier.
pub fn render_tier_chart(summary: &TierSummary) -> String {
    let peak = RiskTier::ordered()
        .into_iter()
        .map(|tier| summary.count(tier))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for tier in RiskTier::ordered() {
        let count = summary.count(tier);
        let bar = if peak == 0 {
            0
        } else {
            (count * BAR_WIDTH).div_ceil(peak)
        };
        out.push_str(&format!(
            "{:<6} {:>6} {}\n",
            tier.label(),
            count,
            "#".repeat(bar)
        ));
    }
    out.push_str(&format!("{:<6} {:>6}\n", "Total", summary.total()));
    out
}
