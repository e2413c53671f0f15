use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::llm_client::SuggestionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<Analyzer>,
    /// Optional model-backed delegation. `None` keeps every analysis local.
    pub suggestion_service: Option<Arc<dyn SuggestionService>>,
}

impl AppState {
    /// Local-only state built from `config`.
    pub fn new(config: Config) -> Self {
        Self {
            analyzer: Arc::new(Analyzer::new(&config.engine)),
            config,
            suggestion_service: None,
        }
    }

    pub fn with_suggestion_service(mut self, service: Arc<dyn SuggestionService>) -> Self {
        self.suggestion_service = Some(service);
        self
    }
}
