use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::access::{DirectoryError, SubscriberDirectory};
use super::repository::{
    holdings_from_document, DocumentError, PortfolioDocument, PortfolioRepository, RepositoryError,
    UserId,
};
use crate::advisor::holdings::{
    exposure_posture, overall_fit, Fit, Holding, HoldingAssessment, Posture,
};
use crate::advisor::planning::{
    score, suggested_contribution, suggested_scenario, CoherenceResult, DriverStrength, PlanAnchor,
    PlanningInputs, Scenario,
};
use crate::advisor::regime::{RegimeFetchError, RegimeSnapshot, RegimeSource};
use tracing::info;

/// Service composing the portfolio store, the regime source, and the
/// subscriber directory. The regime is fetched once per call and passed down;
/// the scoring core itself never fetches anything.
pub struct AdvisorService<R, S, D> {
    repository: Arc<R>,
    regimes: Arc<S>,
    subscribers: Arc<D>,
}

impl<R, S, D> AdvisorService<R, S, D>
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    pub fn new(repository: Arc<R>, regimes: Arc<S>, subscribers: Arc<D>) -> Self {
        Self {
            repository,
            regimes,
            subscribers,
        }
    }

    /// The validated weekly snapshot, as served to every view.
    pub fn regime(&self) -> Result<RegimeSnapshot, AdvisorServiceError> {
        Ok(self.regimes.fetch()?)
    }

    pub fn entitlement(&self, user: &UserId) -> Result<bool, AdvisorServiceError> {
        Ok(self.subscribers.is_subscriber(user)?)
    }

    pub fn load_portfolio(
        &self,
        user: &UserId,
    ) -> Result<Option<PortfolioDocument>, AdvisorServiceError> {
        Ok(self.repository.get(user)?)
    }

    /// Replace the user's document wholesale. Last write wins.
    pub fn save_portfolio(
        &self,
        user: &UserId,
        data: Value,
    ) -> Result<PortfolioDocument, AdvisorServiceError> {
        if !data.is_object() {
            return Err(AdvisorServiceError::Document(DocumentError::NotAnObject));
        }
        let document = self.repository.put(user, data)?;
        info!(user = %user.0, "portfolio document saved");
        Ok(document)
    }

    /// Classify every stored holding against this week's regime. Requires an
    /// active subscription.
    pub fn portfolio_review(&self, user: &UserId) -> Result<PortfolioReview, AdvisorServiceError> {
        if !self.subscribers.is_subscriber(user)? {
            return Err(AdvisorServiceError::SubscriptionRequired);
        }

        let regime = self.regimes.fetch()?;
        let document = self.repository.get(user)?;
        let holdings = match &document {
            Some(document) => holdings_from_document(&document.data)?,
            None => Vec::new(),
        };

        let rows: Vec<HoldingReview> = holdings
            .iter()
            .map(|holding| HoldingReview {
                holding: holding.clone(),
                assessment: holding.assess(regime.market_regime),
            })
            .collect();

        let fits: Vec<Fit> = rows.iter().map(|row| row.assessment.fit).collect();
        info!(
            user = %user.0,
            holdings = rows.len(),
            regime = %regime.market_regime,
            "portfolio review built"
        );

        Ok(PortfolioReview {
            overall_fit: overall_fit(&fits),
            posture: exposure_posture(regime.market_regime, &holdings),
            holdings: rows,
            regime,
            updated_at: document.map(|document| document.updated_at),
        })
    }

    /// Score a plan against this week's regime. A blank contribution is
    /// backfilled with the suggested baseline before scoring, matching the
    /// planning form's behavior.
    pub fn plan_review(&self, request: PlanRequest) -> Result<PlanReview, AdvisorServiceError> {
        let regime = self.regimes.fetch()?;
        let scenario = request
            .scenario
            .unwrap_or_else(|| suggested_scenario(regime.market_regime));

        let inputs = PlanningInputs::sanitized(
            request.goal,
            request.horizon_years,
            request.contribution,
            scenario,
            request.edit_count,
        );

        let suggested = suggested_contribution(inputs.goal, inputs.horizon_months, scenario);
        let effective_contribution = inputs.contribution.unwrap_or(suggested);
        let scored_inputs = PlanningInputs {
            contribution: Some(effective_contribution),
            ..inputs.clone()
        };

        let result = score(&scored_inputs, regime.market_regime);

        Ok(PlanReview {
            scenario,
            horizon_months: inputs.horizon_months,
            suggested_contribution: suggested,
            effective_contribution,
            anchor: PlanAnchor::for_scenario(scenario),
            drivers: DriverStrengths::from_result(&result),
            result,
            regime,
        })
    }
}

/// Raw planning form values before sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub goal: f64,
    pub horizon_years: f64,
    pub contribution: Option<f64>,
    pub scenario: Option<Scenario>,
    pub edit_count: u32,
}

/// One classified holding row for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingReview {
    #[serde(flatten)]
    pub holding: Holding,
    #[serde(flatten)]
    pub assessment: HoldingAssessment,
}

/// Full portfolio view: per-holding assessments plus the aggregate reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReview {
    pub regime: RegimeSnapshot,
    pub holdings: Vec<HoldingReview>,
    pub overall_fit: Fit,
    pub posture: Posture,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Qualitative strengths for the three drivers the planning view explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriverStrengths {
    pub temporal: DriverStrength,
    pub market: DriverStrength,
    pub regime: DriverStrength,
}

impl DriverStrengths {
    pub fn from_result(result: &CoherenceResult) -> Self {
        Self {
            temporal: DriverStrength::from_sub_score(result.breakdown.temporal),
            market: DriverStrength::from_sub_score(result.breakdown.market),
            regime: DriverStrength::from_sub_score(result.breakdown.regime),
        }
    }
}

/// Full plan view returned to the planning form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReview {
    pub regime: RegimeSnapshot,
    pub scenario: Scenario,
    pub horizon_months: u32,
    pub suggested_contribution: f64,
    pub effective_contribution: f64,
    pub anchor: PlanAnchor,
    pub drivers: DriverStrengths,
    #[serde(flatten)]
    pub result: CoherenceResult,
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error("an active subscription is required")]
    SubscriptionRequired,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Regime(#[from] RegimeFetchError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}
