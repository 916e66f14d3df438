use std::sync::Arc;

use crate::config::FilterConfig;
use crate::rules::{EncryptedRoomFilter, ThirdPartyEventRules};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FilterConfig>,
    /// Rules consulted by the filter endpoints
    pub rules: Arc<dyn ThirdPartyEventRules>,
}

impl AppState {
    pub fn new(config: Arc<FilterConfig>) -> Self {
        let rules = Arc::new(EncryptedRoomFilter::new(Arc::clone(&config)));
        Self { config, rules }
    }
}
