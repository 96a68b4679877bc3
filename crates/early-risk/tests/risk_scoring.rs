use early_risk::scoring::{
    evaluate, normalize, CanonicalRecord, FlagSet, RawRecord, RawValue, RiskEngine, RiskFlag,
    RiskThresholds, RiskTier,
};

fn customer(fields: &[(&str, f64)]) -> RawRecord {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), RawValue::Number(*value)))
        .collect()
}

#[test]
fn distressed_customer_scores_high_with_four_reasons() {
    let raw = customer(&[
        ("Utilisation %", 91.2),
        ("Recent Spend Change %", 25.0),
        ("Avg Payment Ratio", 0.22),
        ("Min Due Paid Frequency", 4.0),
        ("Cash Withdrawal %", 12.5),
        ("Merchant Mix Index", 0.5),
    ]);

    let scored = RiskEngine::default().score(&raw);

    assert_eq!(
        scored.flags,
        FlagSet {
            utilisation_spike: true,
            minimum_due_streak: true,
            low_payment_ratio: true,
            cash_advance_distress: true,
            merchant_mix_shift: false,
        }
    );
    assert_eq!(scored.risk_score, 4);
    assert_eq!(scored.risk_tier, RiskTier::High);
    assert_eq!(
        scored.reasons,
        "Util Spike, Min Due Streak, Low Payment Ratio, Cash Advance"
    );
}

#[test]
fn healthy_customer_scores_low_without_reasons() {
    let raw = customer(&[
        ("Utilisation %", 20.0),
        ("Recent Spend Change %", 0.0),
        ("Avg Payment Ratio", 0.9),
        ("Min Due Paid Frequency", 0.0),
        ("Cash Withdrawal %", 0.0),
        ("Merchant Mix Index", 0.8),
    ]);

    let scored = RiskEngine::default().score(&raw);

    assert_eq!(scored.risk_score, 0);
    assert_eq!(scored.risk_tier, RiskTier::Low);
    assert_eq!(scored.reasons, "");
}

#[test]
fn percentage_merchant_mix_is_rescaled_before_the_check() {
    let raw = customer(&[("Merchant Mix Index", 80.0)]);

    let record = normalize(&raw);
    assert!((record.merchant_mix_index - 0.8).abs() < 1e-9);

    let flags = evaluate(&record, &RiskThresholds::default());
    assert!(!flags.merchant_mix_shift);
}

#[test]
fn single_flag_is_medium() {
    let raw = customer(&[
        ("Utilisation %", 20.0),
        ("Avg Payment Ratio", 0.3),
        ("Merchant Mix Index", 0.8),
    ]);

    let scored = RiskEngine::default().score(&raw);

    assert_eq!(scored.risk_score, 1);
    assert_eq!(scored.risk_tier, RiskTier::Medium);
    assert_eq!(scored.reasons, "Low Payment Ratio");
}

#[test]
fn unrecognized_columns_fall_back_to_defaults() {
    let raw = RawRecord::new()
        .with("Region", RawValue::Text("West".into()))
        .with("Score", RawValue::Number(700.0));

    assert_eq!(normalize(&raw), CanonicalRecord::default());

    let scored = RiskEngine::default().score(&raw);
    assert_eq!(scored.risk_score, 0);
    assert_eq!(scored.risk_tier, RiskTier::Low);
    assert_eq!(scored.reasons, "");
}

#[test]
fn malformed_cells_never_abort_scoring() {
    let raw = RawRecord::new()
        .with("Utilisation %", RawValue::Text("ninety".into()))
        .with("Avg Payment Ratio", RawValue::Text("0.1".into()))
        .with("Min Due Paid Frequency", RawValue::Text("#REF!".into()));

    let scored = RiskEngine::default().score(&raw);

    assert_eq!(scored.record.utilisation_pct, 0.0);
    assert_eq!(scored.record.min_due_paid_frequency, 0);
    assert_eq!(scored.reasons, "Low Payment Ratio");
}

#[test]
fn score_tier_and_reasons_agree_for_every_flag_combination() {
    let engine = RiskEngine::default();

    for mask in 0u8..32 {
        let bit = |index: u8| mask & (1 << index) != 0;
        let record = CanonicalRecord {
            utilisation_pct: if bit(0) || bit(3) { 95.0 } else { 10.0 },
            recent_spend_change_pct: if bit(0) { 30.0 } else { 0.0 },
            min_due_paid_frequency: if bit(1) { 3 } else { 0 },
            avg_payment_ratio: if bit(2) { 0.1 } else { 0.9 },
            cash_withdrawal_pct: if bit(3) { 5.0 } else { 0.0 },
            merchant_mix_index: if bit(4) { 0.2 } else { 0.9 },
            ..CanonicalRecord::default()
        };

        let scored = engine.score(&record.to_raw());
        let triggered: Vec<RiskFlag> = scored.flags.triggered().collect();

        assert_eq!(usize::from(scored.risk_score), triggered.len(), "mask {mask:05b}");
        assert!(scored.risk_score <= 5);
        let expected_tier = match scored.risk_score {
            0 => RiskTier::Low,
            1 => RiskTier::Medium,
            _ => RiskTier::High,
        };
        assert_eq!(scored.risk_tier, expected_tier, "mask {mask:05b}");

        let labels: Vec<&str> = triggered.iter().map(|flag| flag.label()).collect();
        assert_eq!(scored.reasons, labels.join(", "), "mask {mask:05b}");
        assert_eq!(scored.reasons.is_empty(), scored.risk_score == 0);
    }
}

#[test]
fn alternate_thresholds_are_injected_without_touching_rules() {
    let raw = customer(&[
        ("Utilisation %", 75.0),
        ("Recent Spend Change %", 15.0),
        ("Avg Payment Ratio", 0.9),
        ("Merchant Mix Index", 0.9),
    ]);

    let default_engine = RiskEngine::default();
    assert_eq!(default_engine.score(&raw).risk_score, 0);

    let sensitive = RiskEngine::new(RiskThresholds {
        spike_utilisation_pct: 70.0,
        spike_spend_change_pct: 10.0,
        ..RiskThresholds::default()
    });
    let scored = sensitive.score(&raw);
    assert_eq!(scored.reasons, "Util Spike");
    assert_eq!(scored.risk_tier, RiskTier::Medium);
}
