//! Sub-score formulas for the coherence score.
//!
//! Constants here are product calibration carried over verbatim; the ordering
//! of influence (temporal > market > regime alignment > simplicity ~
//! consistency) is contractual even where a constant is tunable.

use super::Scenario;
use crate::advisor::regime::MarketRegime;

pub(crate) const TEMPORAL_WEIGHT: f64 = 0.35;
pub(crate) const MARKET_WEIGHT: f64 = 0.25;
pub(crate) const REGIME_WEIGHT: f64 = 0.20;
pub(crate) const SIMPLICITY_WEIGHT: f64 = 0.10;
pub(crate) const CONSISTENCY_WEIGHT: f64 = 0.10;

/// Neutral fallback when the goal or horizon is degenerate.
pub(crate) const NEUTRAL_TEMPORAL: f64 = 50.0;

fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

/// Discipline coverage: contributions over the horizon as a ratio of the
/// goal. No return assumptions anywhere.
pub(crate) fn temporal_sufficiency(goal: f64, months: u32, contribution: Option<f64>) -> f64 {
    if !(goal > 0.0) || months == 0 {
        return NEUTRAL_TEMPORAL;
    }

    let monthly = contribution.unwrap_or(0.0);
    let estimated = monthly * f64::from(months);
    let ratio = estimated / goal;

    if ratio >= 1.1 {
        100.0
    } else if ratio >= 0.9 {
        85.0
    } else if ratio >= 0.7 {
        65.0
    } else if ratio >= 0.5 {
        45.0
    } else {
        25.0
    }
}

/// Scenario-keyed independence from market outcomes, with small contextual
/// adjustments for tight horizons, large goals, and the regime.
pub(crate) fn market_dependence(
    scenario: Scenario,
    goal: f64,
    months: u32,
    regime: MarketRegime,
) -> f64 {
    let mut base = match scenario {
        Scenario::Conservative => 90.0,
        Scenario::Base => 75.0,
        Scenario::Ambitious => 50.0,
    };

    if (1..12).contains(&months) {
        base -= 10.0;
    }
    if goal > 10_000.0 {
        base -= 5.0;
    }

    if regime == MarketRegime::RiskOff {
        base -= 10.0;
    }
    if regime == MarketRegime::RiskOn && scenario == Scenario::Ambitious {
        base += 5.0;
    }

    clamp(base, 0.0, 100.0)
}

/// Fixed regime x scenario lookup. Pure domain judgment, no computation.
pub(crate) fn regime_alignment(regime: MarketRegime, scenario: Scenario) -> f64 {
    match (regime, scenario) {
        (MarketRegime::RiskOn, Scenario::Conservative) => 80.0,
        (MarketRegime::RiskOn, Scenario::Base) => 90.0,
        (MarketRegime::RiskOn, Scenario::Ambitious) => 70.0,
        (MarketRegime::Transitional, Scenario::Conservative) => 85.0,
        (MarketRegime::Transitional, Scenario::Base) => 75.0,
        (MarketRegime::Transitional, Scenario::Ambitious) => 55.0,
        (MarketRegime::RangeBound, Scenario::Conservative) => 90.0,
        (MarketRegime::RangeBound, Scenario::Base) => 80.0,
        (MarketRegime::RangeBound, Scenario::Ambitious) => 60.0,
        (MarketRegime::RiskOff, Scenario::Conservative) => 95.0,
        (MarketRegime::RiskOff, Scenario::Base) => 70.0,
        (MarketRegime::RiskOff, Scenario::Ambitious) => 40.0,
    }
}

/// Starts high and penalizes over-optimization. Floored at 60 so tinkering
/// can dent the score but never tank it.
pub(crate) fn simplicity(months: u32, contribution: Option<f64>, edit_count: u32) -> f64 {
    let mut score = 100.0;

    if edit_count > 1 {
        score -= 15.0;
    }

    if months > 0 && months % 6 != 0 {
        score -= 10.0;
    }

    if let Some(monthly) = contribution {
        if monthly > 0.0 && is_over_precise(monthly) {
            score -= 5.0;
        }
    }

    clamp(score, 60.0, 100.0)
}

fn is_over_precise(monthly: f64) -> bool {
    let cents = (monthly - monthly.round()).abs();
    cents > 1e-9 || (monthly >= 100.0 && (monthly % 5.0).abs() > 1e-9)
}

/// No plan-adherence history is tracked yet, so consistency is a fixed
/// default reserved for a future extension.
pub(crate) fn consistency_default() -> f64 {
    80.0
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    clamp(value, 0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_follows_coverage_ratio_steps() {
        assert_eq!(temporal_sufficiency(1000.0, 10, Some(115.0)), 100.0);
        assert_eq!(temporal_sufficiency(1000.0, 10, Some(95.0)), 85.0);
        assert_eq!(temporal_sufficiency(1000.0, 10, Some(75.0)), 65.0);
        assert_eq!(temporal_sufficiency(1000.0, 10, Some(55.0)), 45.0);
        assert_eq!(temporal_sufficiency(1000.0, 10, Some(10.0)), 25.0);
        assert_eq!(temporal_sufficiency(1000.0, 10, None), 25.0);
    }

    #[test]
    fn temporal_degenerate_inputs_return_neutral() {
        assert_eq!(temporal_sufficiency(0.0, 12, Some(100.0)), NEUTRAL_TEMPORAL);
        assert_eq!(temporal_sufficiency(-5.0, 12, Some(100.0)), NEUTRAL_TEMPORAL);
        assert_eq!(temporal_sufficiency(1000.0, 0, Some(100.0)), NEUTRAL_TEMPORAL);
    }

    #[test]
    fn market_dependence_penalizes_short_horizons_and_large_goals() {
        let base = market_dependence(Scenario::Base, 5_000.0, 36, MarketRegime::Transitional);
        assert_eq!(base, 75.0);

        let tight = market_dependence(Scenario::Base, 5_000.0, 6, MarketRegime::Transitional);
        assert_eq!(tight, 65.0);

        let large = market_dependence(Scenario::Base, 50_000.0, 36, MarketRegime::Transitional);
        assert_eq!(large, 70.0);
    }

    #[test]
    fn risk_on_nudge_applies_to_ambitious_only() {
        assert_eq!(
            market_dependence(Scenario::Ambitious, 5_000.0, 36, MarketRegime::RiskOn),
            55.0
        );
        assert_eq!(
            market_dependence(Scenario::Base, 5_000.0, 36, MarketRegime::RiskOn),
            75.0
        );
    }

    #[test]
    fn simplicity_floors_at_sixty() {
        let floored = simplicity(7, Some(137.37), 5);
        assert_eq!(floored, 70.0);

        let pristine = simplicity(36, Some(150.0), 0);
        assert_eq!(pristine, 100.0);
    }

    #[test]
    fn simplicity_flags_over_precise_contributions() {
        // Cents always count as over-precise.
        assert_eq!(simplicity(36, Some(50.25), 0), 95.0);
        // Below 100 a non-multiple of 5 is fine.
        assert_eq!(simplicity(36, Some(47.0), 0), 100.0);
        // At or above 100 it must land on a multiple of 5.
        assert_eq!(simplicity(36, Some(137.0), 0), 95.0);
        assert_eq!(simplicity(36, Some(135.0), 0), 100.0);
    }
}
