use serde::{Serialize, Serializer};
use std::fmt;

/// Scale a field is expressed in once it reaches the rule layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUnit {
    Identifier,
    Amount,
    /// 0-100 scale, passed through as supplied.
    Percent,
    /// 0-1 scale; inputs above 1 are read as percentages and divided by 100.
    Ratio,
    Count,
    Bucket,
}

/// Expected input columns for a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerId,
    CreditLimit,
    UtilisationPct,
    AvgPaymentRatio,
    MinDuePaidFrequency,
    MerchantMixIndex,
    CashWithdrawalPct,
    RecentSpendChangePct,
    CurrentDpdBucket,
    NextDpdBucket,
}

impl Field {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::CustomerId,
            Self::CreditLimit,
            Self::UtilisationPct,
            Self::AvgPaymentRatio,
            Self::MinDuePaidFrequency,
            Self::MerchantMixIndex,
            Self::CashWithdrawalPct,
            Self::RecentSpendChangePct,
            Self::CurrentDpdBucket,
            Self::NextDpdBucket,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::CustomerId => "Customer ID",
            Self::CreditLimit => "Credit Limit",
            Self::UtilisationPct => "Utilisation %",
            Self::AvgPaymentRatio => "Avg Payment Ratio",
            Self::MinDuePaidFrequency => "Min Due Paid Frequency",
            Self::MerchantMixIndex => "Merchant Mix Index",
            Self::CashWithdrawalPct => "Cash Withdrawal %",
            Self::RecentSpendChangePct => "Recent Spend Change %",
            Self::CurrentDpdBucket => "Current DPD Bucket",
            Self::NextDpdBucket => "DPD Bucket Next Month",
        }
    }

    pub const fn unit(self) -> FieldUnit {
        match self {
            Self::CustomerId => FieldUnit::Identifier,
            Self::CreditLimit => FieldUnit::Amount,
            Self::UtilisationPct | Self::CashWithdrawalPct | Self::RecentSpendChangePct => {
                FieldUnit::Percent
            }
            Self::AvgPaymentRatio | Self::MerchantMixIndex => FieldUnit::Ratio,
            Self::MinDuePaidFrequency => FieldUnit::Count,
            Self::CurrentDpdBucket | Self::NextDpdBucket => FieldUnit::Bucket,
        }
    }

    /// Value substituted when a numeric cell is absent or unparsable. Ratios
    /// default to the neutral end of their scale so a missing column never
    /// reads as distress.
    pub const fn default_number(self) -> f64 {
        match self.unit() {
            FieldUnit::Ratio => 1.0,
            _ => 0.0,
        }
    }

    /// Resolves a column header, tolerating case, stray whitespace and BOMs.
    pub fn from_header(header: &str) -> Option<Self> {
        let wanted = normalize_header(header);
        Self::ordered()
            .into_iter()
            .find(|field| normalize_header(field.header()) == wanted)
    }
}

fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// A single cell as it arrived from the upload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Numeric reading of the cell; `None` for blank, unparsable or non-finite values.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Text(text) if text.is_empty())
    }

    /// Reads a JSON cell. `null` is missing; anything that is neither a
    /// number nor a string is kept as its JSON text so it degrades like any
    /// other unparsable cell.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Number(number) => Some(match number.as_f64() {
                Some(value) => RawValue::Number(value),
                None => RawValue::Text(number.to_string()),
            }),
            serde_json::Value::String(text) => Some(RawValue::Text(text)),
            other => Some(RawValue::Text(other.to_string())),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(value) => write!(f, "{value}"),
            RawValue::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawValue::Number(value) if value.is_finite() => serializer.serialize_f64(*value),
            RawValue::Number(_) => serializer.serialize_none(),
            RawValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// One uploaded row: named cells in input column order. Any subset of the
/// expected columns may be present and extra columns are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell, replacing any earlier cell with the same column name.
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.insert(name, value);
        self
    }

    /// First non-empty cell whose header resolves to `field`.
    pub fn get(&self, field: Field) -> Option<&RawValue> {
        self.fields
            .iter()
            .filter(|(name, value)| !value.is_empty() && Field::from_header(name) == Some(field))
            .map(|(_, value)| value)
            .next()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Delinquency bucket as reported by the issuer, either a numeric bucket or a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DpdBucket {
    Numeric(i64),
    Label(String),
}

impl DpdBucket {
    /// Numeric cells become `Numeric` when integral; text is kept verbatim as a `Label`.
    pub(crate) fn from_raw(value: &RawValue) -> Self {
        match value {
            RawValue::Number(number) => match integral(*number) {
                Some(bucket) => DpdBucket::Numeric(bucket),
                None => DpdBucket::Label(value.to_string()),
            },
            RawValue::Text(text) => DpdBucket::Label(text.clone()),
        }
    }

    /// Numeric reading of the bucket; labels such as `"2"` parse, `"30+"` does not.
    pub fn numeric(&self) -> Option<i64> {
        match self {
            DpdBucket::Numeric(value) => Some(*value),
            DpdBucket::Label(label) => label.trim().parse::<f64>().ok().and_then(integral),
        }
    }

    fn to_raw(&self) -> RawValue {
        match self {
            DpdBucket::Numeric(value) => RawValue::Number(*value as f64),
            DpdBucket::Label(label) => RawValue::Text(label.clone()),
        }
    }
}

fn integral(number: f64) -> Option<i64> {
    (number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64)
        .then_some(number as i64)
}

/// Fully-defaulted customer record with every ratio expressed as a fraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub customer_id: String,
    pub credit_limit: f64,
    pub utilisation_pct: f64,
    pub avg_payment_ratio: f64,
    pub min_due_paid_frequency: u32,
    pub merchant_mix_index: f64,
    pub cash_withdrawal_pct: f64,
    pub recent_spend_change_pct: f64,
    pub current_dpd_bucket: Option<DpdBucket>,
    pub next_dpd_bucket: Option<DpdBucket>,
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            credit_limit: Field::CreditLimit.default_number(),
            utilisation_pct: Field::UtilisationPct.default_number(),
            avg_payment_ratio: Field::AvgPaymentRatio.default_number(),
            min_due_paid_frequency: 0,
            merchant_mix_index: Field::MerchantMixIndex.default_number(),
            cash_withdrawal_pct: Field::CashWithdrawalPct.default_number(),
            recent_spend_change_pct: Field::RecentSpendChangePct.default_number(),
            current_dpd_bucket: None,
            next_dpd_bucket: None,
        }
    }
}

impl CanonicalRecord {
    /// Renders the record back into raw form under the expected column headers.
    pub fn to_raw(&self) -> RawRecord {
        let mut raw = RawRecord::new()
            .with(
                Field::CustomerId.header(),
                RawValue::Text(self.customer_id.clone()),
            )
            .with(
                Field::CreditLimit.header(),
                RawValue::Number(self.credit_limit),
            )
            .with(
                Field::UtilisationPct.header(),
                RawValue::Number(self.utilisation_pct),
            )
            .with(
                Field::AvgPaymentRatio.header(),
                RawValue::Number(self.avg_payment_ratio),
            )
            .with(
                Field::MinDuePaidFrequency.header(),
                RawValue::Number(f64::from(self.min_due_paid_frequency)),
            )
            .with(
                Field::MerchantMixIndex.header(),
                RawValue::Number(self.merchant_mix_index),
            )
            .with(
                Field::CashWithdrawalPct.header(),
                RawValue::Number(self.cash_withdrawal_pct),
            )
            .with(
                Field::RecentSpendChangePct.header(),
                RawValue::Number(self.recent_spend_change_pct),
            );

        if let Some(bucket) = &self.current_dpd_bucket {
            raw.insert(Field::CurrentDpdBucket.header(), bucket.to_raw());
        }
        if let Some(bucket) = &self.next_dpd_bucket {
            raw.insert(Field::NextDpdBucket.header(), bucket.to_raw());
        }
        raw
    }

    /// Roll-forward outcome label: the account moved into a worse bucket next month.
    ///
    /// Compares against the current bucket when one is reported, otherwise any
    /// non-zero next-month bucket counts. Missing or non-numeric buckets read as 0.
    pub fn rolled_forward(&self) -> bool {
        let bucket_value = |bucket: &Option<DpdBucket>| {
            bucket.as_ref().and_then(DpdBucket::numeric).unwrap_or(0)
        };
        let next = bucket_value(&self.next_dpd_bucket);

        match &self.current_dpd_bucket {
            Some(_) => next > bucket_value(&self.current_dpd_bucket),
            None => next != 0,
        }
    }
}
