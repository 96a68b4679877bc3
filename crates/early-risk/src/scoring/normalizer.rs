use super::schema::{CanonicalRecord, DpdBucket, Field, FieldUnit, RawRecord, RawValue};

/// Maps a raw upload row into a canonical record. Never fails: absent or
/// unparsable numeric cells take [`Field::default_number`] and an absent
/// identifier becomes "". The identifier is carried as given, whitespace
/// included; trimming is the reader's job.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    CanonicalRecord {
        customer_id: raw
            .get(Field::CustomerId)
            .map(RawValue::to_string)
            .unwrap_or_default(),
        credit_limit: numeric(raw, Field::CreditLimit),
        utilisation_pct: numeric(raw, Field::UtilisationPct),
        avg_payment_ratio: numeric(raw, Field::AvgPaymentRatio),
        min_due_paid_frequency: count(raw, Field::MinDuePaidFrequency),
        merchant_mix_index: numeric(raw, Field::MerchantMixIndex),
        cash_withdrawal_pct: numeric(raw, Field::CashWithdrawalPct),
        recent_spend_change_pct: numeric(raw, Field::RecentSpendChangePct),
        current_dpd_bucket: raw.get(Field::CurrentDpdBucket).map(DpdBucket::from_raw),
        next_dpd_bucket: raw.get(Field::NextDpdBucket).map(DpdBucket::from_raw),
    }
}

fn numeric(raw: &RawRecord, field: Field) -> f64 {
    let value = raw
        .get(field)
        .and_then(RawValue::as_number)
        .unwrap_or_else(|| field.default_number());

    match field.unit() {
        FieldUnit::Ratio => to_fraction(value),
        _ => value,
    }
}

fn count(raw: &RawRecord, field: Field) -> u32 {
    let value = raw
        .get(field)
        .and_then(RawValue::as_number)
        .unwrap_or(0.0);
    // `as` saturates, so out-of-range counts clamp to the u32 bounds.
    value.trunc().max(0.0) as u32
}

/// Values above 1 are read as percentages. Exactly 1.0 is already a fraction.
pub(crate) fn to_fraction(value: f64) -> f64 {
    let scaled = if value > 1.0 { value / 100.0 } else { value };
    scaled.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawValue {
        RawValue::Text(value.to_string())
    }

    #[test]
    fn empty_record_defaults_every_field() {
        let record = normalize(&RawRecord::new());
        assert_eq!(record, CanonicalRecord::default());
    }

    #[test]
    fn garbage_numeric_cells_take_field_defaults() {
        let raw = RawRecord::new()
            .with("Utilisation %", text("high"))
            .with("Credit Limit", text("1,000"))
            .with("Min Due Paid Frequency", text(""))
            .with("Avg Payment Ratio", text("--"));
        let record = normalize(&raw);
        assert_eq!(record.utilisation_pct, 0.0);
        assert_eq!(record.avg_payment_ratio, 1.0);
        assert_eq!(record.credit_limit, 0.0);
        assert_eq!(record.min_due_paid_frequency, 0);
    }

    #[test]
    fn ratio_fields_rescale_percentages() {
        let raw = RawRecord::new()
            .with("Merchant Mix Index", RawValue::Number(80.0))
            .with("Avg Payment Ratio", text("35"));
        let record = normalize(&raw);
        assert!((record.merchant_mix_index - 0.8).abs() < 1e-9);
        assert!((record.avg_payment_ratio - 0.35).abs() < 1e-9);
    }

    #[test]
    fn ratio_boundary_is_already_fractional() {
        assert_eq!(to_fraction(1.0), 1.0);
        assert_eq!(to_fraction(0.42), 0.42);
        assert_eq!(to_fraction(1.5), 0.015);
        assert_eq!(to_fraction(250.0), 1.0);
        assert_eq!(to_fraction(-0.2), 0.0);
    }

    #[test]
    fn percent_fields_are_not_rescaled() {
        let raw = RawRecord::new().with("Utilisation %", RawValue::Number(0.9));
        assert_eq!(normalize(&raw).utilisation_pct, 0.9);
    }

    #[test]
    fn counts_truncate_and_floor_at_zero() {
        let raw = RawRecord::new().with("Min Due Paid Frequency", RawValue::Number(3.7));
        assert_eq!(normalize(&raw).min_due_paid_frequency, 3);

        let raw = RawRecord::new().with("Min Due Paid Frequency", RawValue::Number(-2.0));
        assert_eq!(normalize(&raw).min_due_paid_frequency, 0);
    }

    #[test]
    fn identifiers_and_buckets_carry_through() {
        let raw = RawRecord::new()
            .with("Customer ID", text(" C-0042 "))
            .with("Current DPD Bucket", RawValue::Number(1.0))
            .with("DPD Bucket Next Month", text(" 30+ "));
        let record = normalize(&raw);
        assert_eq!(record.customer_id, " C-0042 ");
        assert_eq!(record.current_dpd_bucket, Some(DpdBucket::Numeric(1)));
        assert_eq!(record.next_dpd_bucket, Some(DpdBucket::Label(" 30+ ".into())));
    }

    #[test]
    fn text_buckets_still_read_numerically() {
        let raw = RawRecord::new()
            .with("Current DPD Bucket", text("0"))
            .with("DPD Bucket Next Month", text(" 1 "));
        let record = normalize(&raw);
        assert_eq!(record.next_dpd_bucket, Some(DpdBucket::Label(" 1 ".into())));
        assert_eq!(record.next_dpd_bucket.as_ref().and_then(DpdBucket::numeric), Some(1));
        assert!(record.rolled_forward());

        let raw = RawRecord::new().with("DPD Bucket Next Month", RawValue::Number(1.5));
        assert_eq!(
            normalize(&raw).next_dpd_bucket,
            Some(DpdBucket::Label("1.5".into()))
        );
    }

    #[test]
    fn renormalizing_canonical_record_is_a_no_op() {
        let ids = [" C1", "C1 ", "", "0012", "  ", "C-7"];
        let buckets = [
            None,
            Some(DpdBucket::Numeric(0)),
            Some(DpdBucket::Numeric(-3)),
            Some(DpdBucket::Label("2".into())),
            Some(DpdBucket::Label(" 30+ ".into())),
            Some(DpdBucket::Label("1.5".into())),
        ];
        let ratios = [0.0, 0.35, 0.4, 1.0];

        for id in ids {
            for bucket in &buckets {
                for ratio in ratios {
                    let canonical = CanonicalRecord {
                        customer_id: id.into(),
                        credit_limit: 5000.0,
                        utilisation_pct: 91.2,
                        avg_payment_ratio: ratio,
                        min_due_paid_frequency: 4,
                        merchant_mix_index: ratio,
                        cash_withdrawal_pct: 12.5,
                        recent_spend_change_pct: -8.0,
                        current_dpd_bucket: bucket.clone(),
                        next_dpd_bucket: bucket.clone(),
                    };
                    assert_eq!(
                        normalize(&canonical.to_raw()),
                        canonical,
                        "id {id:?}, bucket {bucket:?}, ratio {ratio}"
                    );
                }
            }
        }
    }
}
