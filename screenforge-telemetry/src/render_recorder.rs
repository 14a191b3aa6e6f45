use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

use crate::visitor::EventFields;

/// Field that marks an event as render telemetry.
pub const RENDER_EVENT_FIELD: &str = "render.event";
/// Field carrying the screen identifier of a render event.
pub const SCREEN_ID_FIELD: &str = "screen.id";

/// Render event names captured by [`RenderFailureRecorder`].
pub const SLOT_FAILED: &str = "slot_failed";
pub const SCREEN_BLOCKED: &str = "screen_blocked";
pub const PATTERN_UNAVAILABLE: &str = "pattern_unavailable";
pub const ASSET_FAILED: &str = "asset_failed";

/// One captured render failure with all of its structured fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RenderFailure {
    pub kind: String,
    pub screen_id: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl RenderFailure {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// In-memory sink for render failures reported through `tracing`.
///
/// Failures are kept in arrival order and indexed by screen id so a
/// diagnostics surface can show what went wrong for a given screen.
#[derive(Debug, Clone, Default)]
pub struct RenderFailureRecorder {
    failures: Arc<RwLock<Vec<RenderFailure>>>,
    screen_index: Arc<RwLock<HashMap<String, Vec<usize>>>>,
}

impl RenderFailureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured failures, oldest first.
    pub fn failures(&self) -> Vec<RenderFailure> {
        self.failures.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Failures reported for one screen.
    pub fn failures_for_screen(&self, screen_id: &str) -> Vec<RenderFailure> {
        let positions = {
            let index = self.screen_index.read().unwrap_or_else(|e| e.into_inner());
            match index.get(screen_id) {
                Some(positions) => positions.clone(),
                None => return Vec::new(),
            }
        };

        let failures = self.failures.read().unwrap_or_else(|e| e.into_inner());
        positions.into_iter().filter_map(|i| failures.get(i).cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.failures.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.failures.write().unwrap_or_else(|e| e.into_inner()).clear();
        self.screen_index.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(&self, mut fields: BTreeMap<String, String>) {
        let Some(kind) = fields.remove(RENDER_EVENT_FIELD) else {
            return;
        };
        let screen_id = fields.get(SCREEN_ID_FIELD).cloned();

        let position = {
            let mut failures = self.failures.write().unwrap_or_else(|e| e.into_inner());
            failures.push(RenderFailure { kind, screen_id: screen_id.clone(), fields });
            failures.len() - 1
        };

        if let Some(screen_id) = screen_id {
            let mut index = self.screen_index.write().unwrap_or_else(|e| e.into_inner());
            index.entry(screen_id).or_default().push(position);
        }
    }
}

/// Tracing layer feeding render events into a [`RenderFailureRecorder`].
pub struct RenderFailureLayer {
    recorder: RenderFailureRecorder,
}

impl RenderFailureLayer {
    pub fn new(recorder: RenderFailureRecorder) -> Self {
        Self { recorder }
    }
}

impl<S> Layer<S> for RenderFailureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let has_marker = event.metadata().fields().iter().any(|f| f.name() == RENDER_EVENT_FIELD);
        if !has_marker {
            return;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);
        self.recorder.record(fields.into_inner());
    }
}
