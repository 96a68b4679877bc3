use super::schema::CanonicalRecord;
use super::thresholds::RiskThresholds;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The five risk predicates, in evaluation and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskFlag {
    UtilisationSpike,
    MinimumDueStreak,
    LowPaymentRatio,
    CashAdvanceDistress,
    MerchantMixShift,
}

impl RiskFlag {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::UtilisationSpike,
            Self::MinimumDueStreak,
            Self::LowPaymentRatio,
            Self::CashAdvanceDistress,
            Self::MerchantMixShift,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UtilisationSpike => "Util Spike",
            Self::MinimumDueStreak => "Min Due Streak",
            Self::LowPaymentRatio => "Low Payment Ratio",
            Self::CashAdvanceDistress => "Cash Advance",
            Self::MerchantMixShift => "Merchant Mix Shift",
        }
    }

    /// Column name used when flags are exported alongside a record.
    pub const fn column(self) -> &'static str {
        match self {
            Self::UtilisationSpike => "flag_util_spike",
            Self::MinimumDueStreak => "flag_min_due_streak",
            Self::LowPaymentRatio => "flag_low_pay_ratio",
            Self::CashAdvanceDistress => "flag_cash_advance",
            Self::MerchantMixShift => "flag_merchant_shift",
        }
    }
}

/// Outcome of every predicate for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub utilisation_spike: bool,
    pub minimum_due_streak: bool,
    pub low_payment_ratio: bool,
    pub cash_advance_distress: bool,
    pub merchant_mix_shift: bool,
}

impl FlagSet {
    pub fn is_set(&self, flag: RiskFlag) -> bool {
        match flag {
            RiskFlag::UtilisationSpike => self.utilisation_spike,
            RiskFlag::MinimumDueStreak => self.minimum_due_streak,
            RiskFlag::LowPaymentRatio => self.low_payment_ratio,
            RiskFlag::CashAdvanceDistress => self.cash_advance_distress,
            RiskFlag::MerchantMixShift => self.merchant_mix_shift,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFlag, bool)> + '_ {
        RiskFlag::ordered()
            .into_iter()
            .map(move |flag| (flag, self.is_set(flag)))
    }

    /// Triggered flags in rule order.
    pub fn triggered(&self) -> impl Iterator<Item = RiskFlag> + '_ {
        self.iter().filter(|(_, set)| *set).map(|(flag, _)| flag)
    }

    pub fn count(&self) -> usize {
        self.triggered().count()
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RiskFlag::ordered().len()))?;
        for (flag, set) in self.iter() {
            map.serialize_entry(flag.column(), &set)?;
        }
        map.end()
    }
}

/// Evaluates all five predicates; none depends on another's outcome.
pub fn evaluate(record: &CanonicalRecord, thresholds: &RiskThresholds) -> FlagSet {
    FlagSet {
        utilisation_spike: utilisation_spike(record, thresholds),
        minimum_due_streak: minimum_due_streak(record, thresholds),
        low_payment_ratio: low_payment_ratio(record, thresholds),
        cash_advance_distress: cash_advance_distress(record, thresholds),
        merchant_mix_shift: merchant_mix_shift(record, thresholds),
    }
}

fn utilisation_spike(record: &CanonicalRecord, thresholds: &RiskThresholds) -> bool {
    record.utilisation_pct >= thresholds.spike_utilisation_pct
        && record.recent_spend_change_pct >= thresholds.spike_spend_change_pct
}

fn minimum_due_streak(record: &CanonicalRecord, thresholds: &RiskThresholds) -> bool {
    record.min_due_paid_frequency >= thresholds.min_due_streak
}

fn low_payment_ratio(record: &CanonicalRecord, thresholds: &RiskThresholds) -> bool {
    record.avg_payment_ratio <= thresholds.low_payment_ratio
}

fn cash_advance_distress(record: &CanonicalRecord, thresholds: &RiskThresholds) -> bool {
    record.cash_withdrawal_pct > thresholds.cash_withdrawal_pct
        && record.utilisation_pct > thresholds.cash_advance_utilisation_pct
}

fn merchant_mix_shift(record: &CanonicalRecord, thresholds: &RiskThresholds) -> bool {
    record.merchant_mix_index <= thresholds.merchant_mix_shift
}
