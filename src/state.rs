use std::sync::Arc;

use crate::domain::allow_list::AllowList;
use crate::geo::GeoResolver;
use crate::notify::Notifier;

/// Shared application state injected into handlers.
///
/// All fields are immutable after startup; the outbound collaborators are
/// trait objects so tests can substitute in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub allow_list: Arc<AllowList>,
    pub geo: Arc<dyn GeoResolver>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        allow_list: Arc<AllowList>,
        geo: Arc<dyn GeoResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            allow_list,
            geo,
            notifier,
        }
    }
}
