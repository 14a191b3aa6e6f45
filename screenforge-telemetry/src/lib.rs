//! # screenforge-telemetry
//!
//! Logging setup for Screenforge binaries and services, plus a recorder that
//! keeps render failures (failed slots, blocked screens, unavailable patterns,
//! broken hero assets) observable after they were contained by the renderer.

pub mod init;
pub mod render_recorder;
pub mod visitor;

pub use init::{TelemetryConfig, init_telemetry, init_with_config, init_with_render_recorder};
pub use render_recorder::{
    ASSET_FAILED, PATTERN_UNAVAILABLE, RENDER_EVENT_FIELD, RenderFailure, RenderFailureLayer,
    RenderFailureRecorder, SCREEN_BLOCKED, SCREEN_ID_FIELD, SLOT_FAILED,
};
