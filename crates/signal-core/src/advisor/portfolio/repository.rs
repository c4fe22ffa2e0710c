use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::advisor::holdings::Holding;

/// Identifier wrapper for the external identity provider's user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The single free-form document stored per user. The payload is opaque to
/// the store; by convention it carries a `holdings` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDocument {
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction: one document per user, upsert semantics, last write
/// wins. Concurrent saves from two sessions silently overwrite one another;
/// that is the accepted contract of the surrounding system.
pub trait PortfolioRepository: Send + Sync {
    fn get(&self, user: &UserId) -> Result<Option<PortfolioDocument>, RepositoryError>;
    fn put(&self, user: &UserId, data: Value) -> Result<PortfolioDocument, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("portfolio store unavailable: {0}")]
    Unavailable(String),
}

/// Problems with the shape of a stored document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("portfolio document must be a JSON object")]
    NotAnObject,
    #[error("portfolio document has a malformed holdings array: {source}")]
    MalformedHoldings {
        #[source]
        source: serde_json::Error,
    },
}

/// Extract the conventional `holdings` array from a stored document. A
/// missing or null key reads as an empty portfolio; a present but malformed
/// array is an error the caller can surface.
pub fn holdings_from_document(data: &Value) -> Result<Vec<Holding>, DocumentError> {
    match data.get("holdings") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|source| DocumentError::MalformedHoldings { source }),
    }
}
