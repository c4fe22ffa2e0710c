//! The advisory core: regime snapshot model, holding classification, goal
//! coherence scoring, and the portfolio service that composes them.

pub mod holdings;
pub mod planning;
pub mod portfolio;
pub mod regime;
