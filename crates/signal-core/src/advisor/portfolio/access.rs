use serde::{Deserialize, Serialize};

use super::repository::UserId;

/// Seam to the external identity provider's subscription-tier flag. The core
/// never sees credentials; it only asks whether a known user id is entitled.
pub trait SubscriberDirectory: Send + Sync {
    fn is_subscriber(&self, user: &UserId) -> Result<bool, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Seam to the external payment provider: a user id plus billing email in, a
/// redirect URL out.
pub trait CheckoutGateway: Send + Sync {
    fn create_session(&self, user: &UserId, email: &str) -> Result<CheckoutSession, CheckoutError>;
}

/// Redirect target returned by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout provider rejected the request: {0}")]
    Rejected(String),
    #[error("checkout provider unavailable: {0}")]
    Unavailable(String),
}
