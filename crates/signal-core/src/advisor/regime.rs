//! Weekly market regime snapshot consumed by the classifier and the scorer.
//!
//! The regime is produced outside this crate (editorial fixture today, model
//! output later). The core only depends on the record shape defined here and
//! never fetches it implicitly; callers pass the value down.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical label describing the current overall market environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketRegime {
    RiskOn,
    RiskOff,
    Transitional,
    RangeBound,
}

impl MarketRegime {
    pub const ALL: [MarketRegime; 4] = [
        MarketRegime::RiskOn,
        MarketRegime::RiskOff,
        MarketRegime::Transitional,
        MarketRegime::RangeBound,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MarketRegime::RiskOn => "Risk-on",
            MarketRegime::RiskOff => "Risk-off",
            MarketRegime::Transitional => "Transitional",
            MarketRegime::RangeBound => "Neutral / Range-bound",
        }
    }

    /// Parse an upstream label. Anything unrecognized coerces to
    /// `Transitional` so a data-shape drift upstream never breaks a render.
    pub fn from_label(value: &str) -> Self {
        match value.trim() {
            "Risk-on" => MarketRegime::RiskOn,
            "Risk-off" => MarketRegime::RiskOff,
            "Neutral / Range-bound" => MarketRegime::RangeBound,
            _ => MarketRegime::Transitional,
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for MarketRegime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for MarketRegime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MarketRegime::from_label(&raw))
    }
}

/// Editorial confidence attached to the weekly regime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Moderate => "Moderate",
            Confidence::High => "High",
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value.trim() {
            "Low" => Confidence::Low,
            "High" => Confidence::High,
            _ => Confidence::Moderate,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Confidence::from_label(&raw))
    }
}

/// The fixed-shape weekly record published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSnapshot {
    pub market_regime: MarketRegime,
    pub confidence: Confidence,
    pub summary: String,
    pub key_risks: Vec<String>,
    pub regime_change_triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RegimeSnapshot {
    /// Shape checks matching the published contract: a real summary, three to
    /// six key risks, two to five change triggers.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.summary.trim().len() < 10 {
            return Err(SnapshotError::SummaryTooShort);
        }
        let risks = self.key_risks.len();
        if !(3..=6).contains(&risks) {
            return Err(SnapshotError::KeyRiskCount(risks));
        }
        let triggers = self.regime_change_triggers.len();
        if !(2..=5).contains(&triggers) {
            return Err(SnapshotError::TriggerCount(triggers));
        }
        Ok(())
    }
}

/// Validation failures for an upstream snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("regime summary must be at least 10 characters")]
    SummaryTooShort,
    #[error("expected 3..=6 key risks, found {0}")]
    KeyRiskCount(usize),
    #[error("expected 2..=5 regime change triggers, found {0}")]
    TriggerCount(usize),
}

/// Error raised when the weekly snapshot cannot be produced.
#[derive(Debug, thiserror::Error)]
pub enum RegimeFetchError {
    #[error("regime source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    InvalidSnapshot(#[from] SnapshotError),
}

/// Source abstraction so views and services can be exercised against fixtures.
pub trait RegimeSource: Send + Sync {
    fn fetch(&self) -> Result<RegimeSnapshot, RegimeFetchError>;
}

/// Serves a fixed snapshot, validated on every fetch.
pub struct StaticRegimeSource {
    snapshot: RegimeSnapshot,
}

impl StaticRegimeSource {
    pub fn new(snapshot: RegimeSnapshot) -> Self {
        Self { snapshot }
    }

    /// The current editorial fixture published to members.
    pub fn weekly() -> Self {
        Self::new(RegimeSnapshot {
            market_regime: MarketRegime::Transitional,
            confidence: Confidence::Moderate,
            summary: "Market conditions remain fragile with mixed signals across risk assets. \
                      Volatility is still elevated while momentum has weakened, suggesting a \
                      market that is searching for direction rather than committing to one."
                .to_string(),
            key_risks: vec![
                "Liquidity-driven reversals following macro headlines".to_string(),
                "Rising asset correlations reducing diversification benefits".to_string(),
                "Overreaction to short-term economic data".to_string(),
                "Narrow leadership increasing downside asymmetry".to_string(),
            ],
            regime_change_triggers: vec![
                "Volatility compresses sustainably across major indices".to_string(),
                "Market breadth improves consistently, not just episodically".to_string(),
                "Macro communication becomes clearer and less reactive".to_string(),
            ],
            week: Some("Week 12".to_string()),
            updated_at: Some("Monday".to_string()),
        })
    }
}

impl RegimeSource for StaticRegimeSource {
    fn fetch(&self) -> Result<RegimeSnapshot, RegimeFetchError> {
        self.snapshot.validate()?;
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_regime_label_coerces_to_transitional() {
        assert_eq!(MarketRegime::from_label("Unknown"), MarketRegime::Transitional);
        assert_eq!(MarketRegime::from_label(""), MarketRegime::Transitional);
        assert_eq!(
            MarketRegime::from_label("  Risk-on "),
            MarketRegime::RiskOn
        );
    }

    #[test]
    fn regime_labels_round_trip_through_serde() {
        for regime in MarketRegime::ALL {
            let raw = serde_json::to_string(&regime).expect("serializes");
            let back: MarketRegime = serde_json::from_str(&raw).expect("deserializes");
            assert_eq!(back, regime);
        }
    }

    #[test]
    fn unknown_confidence_coerces_to_moderate() {
        assert_eq!(Confidence::from_label("Certain"), Confidence::Moderate);
    }

    #[test]
    fn weekly_fixture_passes_validation() {
        let snapshot = StaticRegimeSource::weekly().fetch().expect("fixture is valid");
        assert_eq!(snapshot.market_regime, MarketRegime::Transitional);
        assert_eq!(snapshot.week.as_deref(), Some("Week 12"));
    }

    #[test]
    fn validation_rejects_sparse_risk_lists() {
        let mut snapshot = StaticRegimeSource::weekly().fetch().expect("valid");
        snapshot.key_risks.truncate(2);
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::KeyRiskCount(2))
        ));
    }
}
