//! Application state shared by handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use rsvp_core::environment::Clock;
use rsvp_core::{EventDetails, RecordStore};
use std::sync::Arc;

/// State cloned into every handler.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(store, EventDetails::default(), Arc::new(SystemClock));
/// let app = build_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// RSVP record store.
    pub store: RecordStore,
    /// Event exported by the calendar endpoint.
    pub event: Arc<EventDetails>,
    /// Clock used to stamp calendar exports.
    pub clock: Arc<dyn Clock>,
    /// Prometheus handle; `/metrics` is only mounted when set.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state without a metrics endpoint.
    #[must_use]
    pub fn new(store: RecordStore, event: EventDetails, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            event: Arc::new(event),
            clock,
            metrics: None,
        }
    }

    /// Expose metrics rendered through `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("event", &self.event.title)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
