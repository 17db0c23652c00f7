use std::sync::Arc;
use crate::rate_limit::RateLimiter;
use crate::store::ContactStore;
// app's shared state

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,      // where contact info is read from
    pub rate_limiter: Arc<RateLimiter>,    // per-client quota, shared with the pruner
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            store,
            rate_limiter,
        }
    }
}
