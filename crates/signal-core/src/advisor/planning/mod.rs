//! Goal coherence scoring.
//!
//! Maps a goal, horizon, optional contribution, scenario, regime, and edit
//! count into a bounded 0-100 score with a labeled breakdown. Pure functions
//! of their inputs: no clock, no I/O, safe to recompute on every input change.

mod scoring;

use crate::advisor::regime::MarketRegime;
use serde::{Deserialize, Serialize};

/// User-chosen risk posture for planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Conservative,
    Base,
    Ambitious,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Conservative, Scenario::Base, Scenario::Ambitious];

    pub const fn label(self) -> &'static str {
        match self {
            Scenario::Conservative => "Conservative",
            Scenario::Base => "Base",
            Scenario::Ambitious => "Ambitious",
        }
    }
}

/// Qualitative ladder applied to the final score. Fixed cut points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoherenceLabel {
    Solid,
    Good,
    Fragile,
    Misaligned,
}

impl CoherenceLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= 85 {
            CoherenceLabel::Solid
        } else if score >= 65 {
            CoherenceLabel::Good
        } else if score >= 45 {
            CoherenceLabel::Fragile
        } else {
            CoherenceLabel::Misaligned
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CoherenceLabel::Solid => "Solid",
            CoherenceLabel::Good => "Good",
            CoherenceLabel::Fragile => "Fragile",
            CoherenceLabel::Misaligned => "Misaligned",
        }
    }
}

/// Qualitative strength of one sub-score, used for explanation rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStrength {
    Good,
    Moderate,
    Weak,
}

impl DriverStrength {
    pub fn from_sub_score(value: u8) -> Self {
        if value >= 80 {
            DriverStrength::Good
        } else if value >= 60 {
            DriverStrength::Moderate
        } else {
            DriverStrength::Weak
        }
    }
}

/// The behavioral principle a plan leans on, keyed by scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAnchor {
    DisciplineOverTiming,
    ConsistencyOverIntensity,
    TimeBeatsPrecision,
}

impl PlanAnchor {
    pub const fn for_scenario(scenario: Scenario) -> Self {
        match scenario {
            Scenario::Conservative => PlanAnchor::DisciplineOverTiming,
            Scenario::Base => PlanAnchor::ConsistencyOverIntensity,
            Scenario::Ambitious => PlanAnchor::TimeBeatsPrecision,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlanAnchor::DisciplineOverTiming => "Discipline > Timing",
            PlanAnchor::ConsistencyOverIntensity => "Consistency > Intensity",
            PlanAnchor::TimeBeatsPrecision => "Time beats precision",
        }
    }
}

/// Session-local planning inputs. Callers normally construct these through
/// [`PlanningInputs::sanitized`]; the raw fields stay public so degenerate
/// values can be exercised directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningInputs {
    pub goal: f64,
    pub horizon_months: u32,
    pub contribution: Option<f64>,
    pub scenario: Scenario,
    pub edit_count: u32,
}

impl PlanningInputs {
    /// Clamp raw form values into the documented ranges: goal to
    /// [0, 1_000_000], horizon years to [0.1, 50] before conversion to
    /// months in [1, 600]. Non-finite or non-positive contributions read as
    /// "use the suggested baseline".
    pub fn sanitized(
        goal: f64,
        horizon_years: f64,
        contribution: Option<f64>,
        scenario: Scenario,
        edit_count: u32,
    ) -> Self {
        let goal = if goal.is_finite() {
            goal.clamp(0.0, 1_000_000.0)
        } else {
            0.0
        };
        let years = if horizon_years.is_finite() {
            horizon_years.clamp(0.1, 50.0)
        } else {
            0.1
        };
        let horizon_months = ((years * 12.0).round() as i64).clamp(1, 600) as u32;
        let contribution = contribution.filter(|value| value.is_finite() && *value > 0.0);

        Self {
            goal,
            horizon_months,
            contribution,
            scenario,
            edit_count,
        }
    }
}

/// The five named sub-scores, each rounded into its documented clamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceBreakdown {
    pub temporal: u8,
    pub market: u8,
    pub regime: u8,
    pub simplicity: u8,
    pub consistency: u8,
}

/// Composite result: bounded score, ladder label, and the breakdown that
/// explains it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceResult {
    pub score: u8,
    pub label: CoherenceLabel,
    pub breakdown: CoherenceBreakdown,
}

/// Score a plan against the current regime. Total over all inputs: degenerate
/// goals and horizons degrade to neutral defaults instead of failing.
pub fn score(inputs: &PlanningInputs, regime: MarketRegime) -> CoherenceResult {
    let temporal = scoring::temporal_sufficiency(inputs.goal, inputs.horizon_months, inputs.contribution);
    let market = scoring::market_dependence(inputs.scenario, inputs.goal, inputs.horizon_months, regime);
    let regime_align = scoring::regime_alignment(regime, inputs.scenario);
    let simplicity = scoring::simplicity(inputs.horizon_months, inputs.contribution, inputs.edit_count);
    let consistency = scoring::consistency_default();

    let blended = temporal * scoring::TEMPORAL_WEIGHT
        + market * scoring::MARKET_WEIGHT
        + regime_align * scoring::REGIME_WEIGHT
        + simplicity * scoring::SIMPLICITY_WEIGHT
        + consistency * scoring::CONSISTENCY_WEIGHT;

    let score = scoring::clamp_score(blended).round() as u8;

    CoherenceResult {
        score,
        label: CoherenceLabel::from_score(score),
        breakdown: CoherenceBreakdown {
            temporal: temporal.round() as u8,
            market: market.round() as u8,
            regime: regime_align.round() as u8,
            simplicity: simplicity.round() as u8,
            consistency: consistency.round() as u8,
        },
    }
}

/// Arithmetic baseline for a blank contribution field: goal spread over the
/// horizon, nudged by scenario, floored at 10 units per month.
pub fn suggested_contribution(goal: f64, horizon_months: u32, scenario: Scenario) -> f64 {
    if !(goal > 0.0) || horizon_months == 0 {
        return 75.0;
    }

    let base = goal / f64::from(horizon_months);
    let factor = match scenario {
        Scenario::Conservative => 1.2,
        Scenario::Base => 1.0,
        Scenario::Ambitious => 0.85,
    };

    (base * factor).round().max(10.0)
}

/// Default scenario preselection for the current regime.
pub fn suggested_scenario(regime: MarketRegime) -> Scenario {
    match regime {
        MarketRegime::RiskOff => Scenario::Conservative,
        _ => Scenario::Base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_ladder_cut_points_are_exact() {
        assert_eq!(CoherenceLabel::from_score(85), CoherenceLabel::Solid);
        assert_eq!(CoherenceLabel::from_score(84), CoherenceLabel::Good);
        assert_eq!(CoherenceLabel::from_score(65), CoherenceLabel::Good);
        assert_eq!(CoherenceLabel::from_score(64), CoherenceLabel::Fragile);
        assert_eq!(CoherenceLabel::from_score(45), CoherenceLabel::Fragile);
        assert_eq!(CoherenceLabel::from_score(44), CoherenceLabel::Misaligned);
    }

    #[test]
    fn sanitized_clamps_goal_and_horizon() {
        let inputs = PlanningInputs::sanitized(2_000_000.0, 100.0, Some(-5.0), Scenario::Base, 0);
        assert_eq!(inputs.goal, 1_000_000.0);
        assert_eq!(inputs.horizon_months, 600);
        assert_eq!(inputs.contribution, None);

        let tiny = PlanningInputs::sanitized(500.0, 0.01, None, Scenario::Base, 0);
        assert_eq!(tiny.horizon_months, 1);
    }

    #[test]
    fn suggested_contribution_matches_baseline_arithmetic() {
        assert_eq!(suggested_contribution(5_000.0, 36, Scenario::Base), 139.0);
        assert_eq!(
            suggested_contribution(5_000.0, 36, Scenario::Conservative),
            167.0
        );
        assert_eq!(
            suggested_contribution(5_000.0, 36, Scenario::Ambitious),
            118.0
        );
        // Floor and degenerate fallback.
        assert_eq!(suggested_contribution(50.0, 60, Scenario::Base), 10.0);
        assert_eq!(suggested_contribution(0.0, 36, Scenario::Base), 75.0);
        assert_eq!(suggested_contribution(5_000.0, 0, Scenario::Base), 75.0);
    }

    #[test]
    fn suggested_scenario_defaults_to_base_outside_risk_off() {
        assert_eq!(
            suggested_scenario(MarketRegime::RiskOff),
            Scenario::Conservative
        );
        assert_eq!(suggested_scenario(MarketRegime::RiskOn), Scenario::Base);
        assert_eq!(
            suggested_scenario(MarketRegime::Transitional),
            Scenario::Base
        );
    }

    #[test]
    fn anchors_follow_scenario() {
        assert_eq!(
            PlanAnchor::for_scenario(Scenario::Conservative),
            PlanAnchor::DisciplineOverTiming
        );
        assert_eq!(
            PlanAnchor::for_scenario(Scenario::Ambitious).label(),
            "Time beats precision"
        );
    }
}
