pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;

use services::GenerationClient;
use std::sync::Arc;

/// Shared application state for the relay handlers
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<dyn GenerationClient>,
    /// Region label derived from the invocation ARN at startup. Logged only,
    /// never affects request handling.
    pub region: String,
}

impl AppState {
    pub fn new(generation: Arc<dyn GenerationClient>, region: String) -> Self {
        Self { generation, region }
    }
}
