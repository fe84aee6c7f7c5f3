//! Upstream client abstraction and supporting service logic.

pub mod metrics;
pub mod prompt;
pub mod upstream;

use crate::error::RelayError;
use crate::models::{GenerationRequest, GenerationResult};
use async_trait::async_trait;

/// Seam between the relay handler and the upstream text-generation service,
/// so tests can substitute a mock for the HTTP client.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Forward a prompt to the upstream `/generate` endpoint.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResult, RelayError>;

    /// Lightweight probe against the upstream `/health` path.
    async fn health_check(&self) -> Result<(), RelayError>;
}
