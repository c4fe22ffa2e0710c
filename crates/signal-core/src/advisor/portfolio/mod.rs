//! Portfolio document persistence, entitlement seams, and the advisor
//! service that ties the scoring core to its external collaborators.

pub mod access;
pub mod repository;
pub mod router;
pub mod service;

pub use access::{
    CheckoutError, CheckoutGateway, CheckoutSession, DirectoryError, SubscriberDirectory,
};
pub use repository::{
    holdings_from_document, DocumentError, PortfolioDocument, PortfolioRepository, RepositoryError,
    UserId,
};
pub use router::{advisor_router, PlanScoreRequest};
pub use service::{
    AdvisorService, AdvisorServiceError, DriverStrengths, HoldingReview, PlanRequest, PlanReview,
    PortfolioReview,
};
