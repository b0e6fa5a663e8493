//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedMapplsClient;
use crate::estimate::{Estimator, EstimatorConfig};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cost estimator over the cached Mappls client
    pub estimator: Arc<Estimator<CachedMapplsClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(mappls: CachedMapplsClient, config: EstimatorConfig) -> Self {
        Self {
            estimator: Arc::new(Estimator::new(mappls, config)),
        }
    }

    /// The cached Mappls client, for passthrough endpoints.
    pub fn mappls(&self) -> &CachedMapplsClient {
        self.estimator.provider()
    }
}
