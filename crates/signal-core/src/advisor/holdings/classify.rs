//! Regime-aware holding classification.
//!
//! Pure, total functions: every (regime, type, horizon) combination yields a
//! defined assessment. Fit and risk are computed on independent axes so a
//! holding can read as aligned and still carry high risk.

use super::domain::{
    AssetType, Fit, Holding, HoldingAssessment, Horizon, Importance, Posture, RiskFlag, RiskLevel,
};
use crate::advisor::regime::MarketRegime;

const fn type_base_risk(asset_type: AssetType) -> i8 {
    match asset_type {
        AssetType::Stock => 2,
        AssetType::Etf => 1,
        AssetType::Crypto => 3,
        AssetType::Other => 2,
    }
}

const fn horizon_adjustment(horizon: Horizon) -> i8 {
    match horizon {
        Horizon::Short => 1,
        Horizon::Medium => 0,
        Horizon::Long => -1,
    }
}

const fn regime_adjustment(regime: MarketRegime) -> i8 {
    match regime {
        MarketRegime::RiskOn => -1,
        MarketRegime::RiskOff => 1,
        MarketRegime::Transitional => 1,
        MarketRegime::RangeBound => 0,
    }
}

const fn is_growth_type(asset_type: AssetType) -> bool {
    matches!(asset_type, AssetType::Crypto | AssetType::Stock)
}

/// Classify one holding shape against the current regime.
pub fn classify(regime: MarketRegime, asset_type: AssetType, horizon: Horizon) -> HoldingAssessment {
    let base = type_base_risk(asset_type) + horizon_adjustment(horizon) + regime_adjustment(regime);

    let risk = if base <= 1 {
        RiskLevel::Low
    } else if base <= 3 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    };

    let fit = match regime {
        MarketRegime::RiskOn if is_growth_type(asset_type) => Fit::Aligned,
        MarketRegime::RiskOff if asset_type == AssetType::Crypto => Fit::Misaligned,
        MarketRegime::Transitional if horizon == Horizon::Short && is_growth_type(asset_type) => {
            Fit::Misaligned
        }
        _ => Fit::Neutral,
    };

    let mut flags = Vec::new();
    if asset_type == AssetType::Crypto {
        flags.push(RiskFlag::Volatility);
    }
    if horizon == Horizon::Short {
        flags.push(RiskFlag::HorizonMismatch);
    }
    if matches!(regime, MarketRegime::Transitional | MarketRegime::RiskOff) {
        flags.push(RiskFlag::Correlation);
    }

    HoldingAssessment {
        fit,
        risk,
        flags,
        rationale: fit.rationale(),
    }
}

impl Holding {
    /// Assessment for this holding under the given regime.
    pub fn assess(&self, regime: MarketRegime) -> HoldingAssessment {
        classify(regime, self.asset_type, self.horizon)
    }
}

/// Portfolio-level roll-up of individual fits. A single misalignment with no
/// offsetting alignment already tilts the whole read.
pub fn overall_fit(fits: &[Fit]) -> Fit {
    if fits.is_empty() {
        return Fit::Neutral;
    }
    let misaligned = fits.iter().filter(|fit| **fit == Fit::Misaligned).count();
    let aligned = fits.iter().filter(|fit| **fit == Fit::Aligned).count();

    if misaligned >= 2 {
        Fit::Misaligned
    } else if aligned >= 2 {
        Fit::Aligned
    } else if misaligned == 1 && aligned == 0 {
        Fit::Misaligned
    } else {
        Fit::Neutral
    }
}

fn importance_weight(importance: Importance) -> f64 {
    match importance {
        Importance::Small => 0.5,
        Importance::Medium => 1.0,
        Importance::Large => 2.0,
    }
}

fn type_weight(asset_type: AssetType) -> f64 {
    match asset_type {
        AssetType::Crypto => 2.3,
        AssetType::Stock => 1.7,
        AssetType::Other => 1.4,
        AssetType::Etf => 1.1,
    }
}

/// Importance-weighted exposure "heat" mapped to a posture for the regime.
/// Importance influences only this aggregate, never per-holding fit or risk.
pub fn exposure_posture(regime: MarketRegime, holdings: &[Holding]) -> Posture {
    if holdings.is_empty() {
        return Posture::Neutral;
    }

    let heat: f64 = holdings
        .iter()
        .map(|holding| importance_weight(holding.importance) * type_weight(holding.asset_type))
        .sum();

    match regime {
        MarketRegime::RiskOn => {
            if heat >= 5.0 {
                Posture::Constructive
            } else {
                Posture::Neutral
            }
        }
        MarketRegime::RiskOff => Posture::Caution,
        MarketRegime::Transitional => {
            if heat >= 4.0 {
                Posture::Caution
            } else {
                Posture::Neutral
            }
        }
        MarketRegime::RangeBound => Posture::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_combination_yields_a_defined_assessment() {
        for regime in MarketRegime::ALL {
            for asset_type in AssetType::ALL {
                for horizon in Horizon::ALL {
                    let assessment = classify(regime, asset_type, horizon);
                    assert!(!assessment.rationale.is_empty());
                }
            }
        }
    }

    #[test]
    fn fit_and_risk_axes_are_independent() {
        let assessment = classify(MarketRegime::RiskOn, AssetType::Crypto, Horizon::Short);
        assert_eq!(assessment.fit, Fit::Aligned);
        assert_eq!(assessment.risk, RiskLevel::Moderate);

        // Short crypto in a transitional regime maxes the numeric base.
        let stressed = classify(MarketRegime::Transitional, AssetType::Crypto, Horizon::Short);
        assert_eq!(stressed.fit, Fit::Misaligned);
        assert_eq!(stressed.risk, RiskLevel::High);
    }

    #[test]
    fn risk_off_flags_crypto_only() {
        assert_eq!(
            classify(MarketRegime::RiskOff, AssetType::Crypto, Horizon::Long).fit,
            Fit::Misaligned
        );
        assert_eq!(
            classify(MarketRegime::RiskOff, AssetType::Stock, Horizon::Short).fit,
            Fit::Neutral
        );
    }

    #[test]
    fn range_bound_is_always_neutral() {
        for asset_type in AssetType::ALL {
            for horizon in Horizon::ALL {
                assert_eq!(
                    classify(MarketRegime::RangeBound, asset_type, horizon).fit,
                    Fit::Neutral
                );
            }
        }
    }

    #[test]
    fn flags_follow_type_horizon_and_regime() {
        let assessment = classify(MarketRegime::Transitional, AssetType::Crypto, Horizon::Short);
        assert_eq!(
            assessment.flags,
            vec![
                RiskFlag::Volatility,
                RiskFlag::HorizonMismatch,
                RiskFlag::Correlation
            ]
        );

        let calm = classify(MarketRegime::RangeBound, AssetType::Etf, Horizon::Long);
        assert!(calm.flags.is_empty());
    }

    #[test]
    fn overall_fit_tilts_on_a_single_unanswered_misalignment() {
        assert_eq!(overall_fit(&[]), Fit::Neutral);
        assert_eq!(overall_fit(&[Fit::Neutral, Fit::Misaligned]), Fit::Misaligned);
        assert_eq!(
            overall_fit(&[Fit::Aligned, Fit::Misaligned]),
            Fit::Neutral
        );
        assert_eq!(overall_fit(&[Fit::Aligned, Fit::Aligned]), Fit::Aligned);
        assert_eq!(
            overall_fit(&[Fit::Misaligned, Fit::Misaligned, Fit::Aligned, Fit::Aligned]),
            Fit::Misaligned
        );
    }

    fn holding(asset_type: AssetType, importance: Importance) -> Holding {
        Holding {
            id: "h-1".to_string(),
            name: "test".to_string(),
            ticker: None,
            asset_type,
            horizon: Horizon::Long,
            importance,
            note: None,
            created_at: None,
        }
    }

    #[test]
    fn posture_reflects_weighted_heat() {
        let heavy = vec![
            holding(AssetType::Crypto, Importance::Large),
            holding(AssetType::Stock, Importance::Medium),
        ];
        // heat = 2.0 * 2.3 + 1.0 * 1.7 = 6.3
        assert_eq!(
            exposure_posture(MarketRegime::RiskOn, &heavy),
            Posture::Constructive
        );
        assert_eq!(
            exposure_posture(MarketRegime::Transitional, &heavy),
            Posture::Caution
        );
        assert_eq!(
            exposure_posture(MarketRegime::RiskOff, &heavy),
            Posture::Caution
        );

        let light = vec![holding(AssetType::Etf, Importance::Small)];
        assert_eq!(
            exposure_posture(MarketRegime::RiskOn, &light),
            Posture::Neutral
        );
        assert_eq!(exposure_posture(MarketRegime::RiskOn, &[]), Posture::Neutral);
    }
}
