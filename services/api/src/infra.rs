use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use signal_core::advisor::portfolio::{
    CheckoutError, CheckoutGateway, CheckoutSession, DirectoryError, PortfolioDocument,
    PortfolioRepository, RepositoryError, SubscriberDirectory, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One portfolio document per user, last write wins.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortfolioRepository {
    documents: Arc<Mutex<HashMap<UserId, PortfolioDocument>>>,
}

impl PortfolioRepository for InMemoryPortfolioRepository {
    fn get(&self, user: &UserId) -> Result<Option<PortfolioDocument>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        Ok(guard.get(user).cloned())
    }

    fn put(&self, user: &UserId, data: Value) -> Result<PortfolioDocument, RepositoryError> {
        let document = PortfolioDocument {
            data,
            updated_at: Utc::now(),
        };
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        guard.insert(user.clone(), document.clone());
        Ok(document)
    }
}

/// Entitlement lookup backed by a fixed member list, seeded from
/// `AdvisorConfig::subscribers`. Production deployments swap this for the
/// identity provider's subscription-tier flag.
#[derive(Default, Clone)]
pub(crate) struct StaticSubscriberDirectory {
    members: HashSet<String>,
}

impl StaticSubscriberDirectory {
    pub(crate) fn with_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

impl SubscriberDirectory for StaticSubscriberDirectory {
    fn is_subscriber(&self, user: &UserId) -> Result<bool, DirectoryError> {
        Ok(self.members.contains(&user.0))
    }
}

/// Stand-in payment provider: hands back a deterministic redirect URL.
#[derive(Default, Clone)]
pub(crate) struct StubCheckoutGateway;

impl CheckoutGateway for StubCheckoutGateway {
    fn create_session(&self, user: &UserId, email: &str) -> Result<CheckoutSession, CheckoutError> {
        if email.trim().is_empty() {
            return Err(CheckoutError::Rejected(
                "billing email must not be empty".to_string(),
            ));
        }
        Ok(CheckoutSession {
            url: format!("https://billing.example.com/checkout?user={}", user.0),
        })
    }
}
