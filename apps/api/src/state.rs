use std::sync::Arc;

use crate::config::Config;
use crate::criteria::generator::CriteriaGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Immutable after startup. The last generated set lives with the HTTP client,
/// never here.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<CriteriaGenerator>,
    pub config: Config,
}
