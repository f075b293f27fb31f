use std::sync::Arc;

use crate::config::Config;
use crate::controller::AnalysisTransport;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upload path to the analysis service. Default: `AnalyzerClient`.
    pub analyzer: Arc<dyn AnalysisTransport>,
    pub config: Config,
}
