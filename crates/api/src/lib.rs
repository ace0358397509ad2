//! DevFolio Web API
//!
//! Axum-based REST API serving GitHub data, the contact form, and the
//! portfolio document.

mod contact;
mod error;
mod handlers;
mod portfolio;
mod routes;

pub use contact::{ContactForm, ContactResponse, ContactService, LogNotifier, Notifier};
pub use error::{ApiError, Result};
pub use handlers::ApiResponse;
pub use portfolio::{
    Experience, PersonalInfo, PortfolioError, PortfolioPage, PortfolioProfile, SkillCategory,
};
pub use routes::create_router;

use devfolio_analyzer::Aggregator;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub aggregator: Aggregator,
    pub contact: ContactService,
    pub portfolio: PortfolioProfile,
}

impl AppState {
    pub fn new(aggregator: Aggregator, contact: ContactService, portfolio: PortfolioProfile) -> Self {
        Self {
            aggregator,
            contact,
            portfolio,
        }
    }
}

pub type SharedState = Arc<AppState>;
