//! Regime-aware holding classification: one user asset in, one explainable
//! (fit, risk, flags, rationale) assessment out.

mod classify;
mod domain;

pub use classify::{classify, exposure_posture, overall_fit};
pub use domain::{
    AssetType, Fit, Holding, HoldingAssessment, Horizon, Importance, Posture, RiskFlag, RiskLevel,
};
