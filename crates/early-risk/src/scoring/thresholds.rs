use serde::{Deserialize, Serialize};

/// Cut-offs applied by the rule evaluator. The service always runs with
/// [`RiskThresholds::default`]; alternate tables are injected in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Utilisation % at or above which a spend spike counts.
    pub spike_utilisation_pct: f64,
    /// Recent spend change % at or above which a spend spike counts.
    pub spike_spend_change_pct: f64,
    pub min_due_streak: u32,
    /// Average payment ratio at or below which payments are considered low.
    pub low_payment_ratio: f64,
    /// Cash withdrawal % strictly above which cash advances count.
    pub cash_withdrawal_pct: f64,
    /// Utilisation % strictly above which cash advances signal distress.
    pub cash_advance_utilisation_pct: f64,
    /// Merchant mix index at or below which spend has narrowed.
    pub merchant_mix_shift: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            spike_utilisation_pct: 80.0,
            spike_spend_change_pct: 20.0,
            min_due_streak: 2,
            low_payment_ratio: 0.4,
            cash_withdrawal_pct: 0.0,
            cash_advance_utilisation_pct: 70.0,
            merchant_mix_shift: 0.35,
        }
    }
}
