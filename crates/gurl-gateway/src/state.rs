use std::sync::Arc;

use gurl_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    assume_tls: bool,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, assume_tls: bool) -> Self {
        Self {
            shortener,
            assume_tls,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Whether short URLs should use `https` even without a forwarded-proto hint.
    pub fn assume_tls(&self) -> bool {
        self.assume_tls
    }
}
