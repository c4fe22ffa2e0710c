use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad behavioral category of a holding. We deliberately avoid anything
/// finer grained: the classifier reasons about behavior, not instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[serde(alias = "Stock")]
    Stock,
    #[serde(alias = "ETF")]
    Etf,
    #[serde(alias = "Crypto")]
    Crypto,
    #[serde(alias = "Other")]
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [
        AssetType::Stock,
        AssetType::Etf,
        AssetType::Crypto,
        AssetType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AssetType::Stock => "Stock",
            AssetType::Etf => "ETF",
            AssetType::Crypto => "Crypto",
            AssetType::Other => "Other",
        }
    }
}

/// The window the owner can realistically hold through without stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Short, Horizon::Medium, Horizon::Long];

    pub const fn label(self) -> &'static str {
        match self {
            Horizon::Short => "Short",
            Horizon::Medium => "Medium",
            Horizon::Long => "Long",
        }
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon::Long
    }
}

/// User-assigned relative weight of a holding. Not a monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Small,
    Medium,
    Large,
}

impl Importance {
    pub const fn label(self) -> &'static str {
        match self {
            Importance::Small => "Small",
            Importance::Medium => "Medium",
            Importance::Large => "Large",
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Medium
    }
}

/// Compatibility between a holding's typical behavior and the current regime.
/// Never a price forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Aligned,
    Neutral,
    Misaligned,
}

impl Fit {
    pub const fn label(self) -> &'static str {
        match self {
            Fit::Aligned => "Aligned",
            Fit::Neutral => "Neutral",
            Fit::Misaligned => "Misaligned",
        }
    }

    /// One of exactly three canned rationale templates. Localization is the
    /// presentation layer's job; the core always speaks in these terms.
    pub const fn rationale(self) -> &'static str {
        match self {
            Fit::Aligned => {
                "Generally compatible with the current environment; discipline matters more than activity."
            }
            Fit::Neutral => "Not clearly helped or harmed by the regime. Consistency beats reaction.",
            Fit::Misaligned => {
                "More likely to feel noisy in this regime. Focus on risk control and avoid impulsive changes."
            }
        }
    }
}

/// Qualitative risk band, computed independently of [`Fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

/// Informational annotations surfaced next to an assessment. These never feed
/// back into the fit or risk computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    Volatility,
    Correlation,
    HorizonMismatch,
}

/// Aggregate exposure posture for a whole portfolio in the current regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Constructive,
    Neutral,
    Caution,
}

impl Posture {
    pub const fn label(self) -> &'static str {
        match self {
            Posture::Constructive => "Constructive",
            Posture::Neutral => "Neutral",
            Posture::Caution => "Caution",
        }
    }
}

/// One user-entered asset as persisted inside the portfolio document.
///
/// Field names mirror the stored JSON convention (`type`, `size`,
/// `createdAt`); older documents without horizon or importance fall back to
/// the defaults the entry form used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub horizon: Horizon,
    #[serde(rename = "size", default)]
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Derived, never stored. Recomputed from (regime, type, horizon) on every
/// read; recomputation is idempotent and cheap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingAssessment {
    pub fit: Fit,
    pub risk: RiskLevel,
    pub flags: Vec<RiskFlag>,
    pub rationale: &'static str,
}
