use grperform_core::proxy::ChatRouter;
use std::sync::Arc;

/// Shared application state. The router (and the throttle gate inside it) is
/// the only state crossing request boundaries; everything in it is immutable
/// after startup except the gate's timestamp.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ChatRouter>,
}

impl AppState {
    pub fn new(router: ChatRouter) -> Self {
        Self { router: Arc::new(router) }
    }
}
