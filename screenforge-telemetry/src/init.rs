//! Telemetry initialization and configuration

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render_recorder::{RenderFailureLayer, RenderFailureRecorder};

static INIT: Once = Once::new();

/// Configuration for the telemetry system
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub default_level: Option<String>,
    pub log_directives: Vec<String>,
    pub json: bool,
    pub recorder: Option<RenderFailureRecorder>,
}

impl TelemetryConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), ..Default::default() }
    }

    /// Set the default log level (e.g., "debug", "info").
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Add a custom tracing directive (e.g., "screenforge_ui=debug").
    pub fn with_log_directive(mut self, directive: impl Into<String>) -> Self {
        self.log_directives.push(directive.into());
        self
    }

    /// Emit newline-delimited JSON instead of human-readable lines.
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Capture render failures into `recorder`.
    pub fn with_render_recorder(mut self, recorder: RenderFailureRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Supported variables:
    /// - `SERVICE_NAME`: The name of the service (default: "screenforge")
    /// - `LOG_LEVEL`: Default log level (default: "info")
    /// - `SCREENFORGE_LOG_JSON`: Set to "true" for JSON output
    pub fn from_env() -> Self {
        let service_name =
            std::env::var("SERVICE_NAME").unwrap_or_else(|_| "screenforge".to_string());
        let default_level = std::env::var("LOG_LEVEL").ok();
        let json = std::env::var("SCREENFORGE_LOG_JSON").map(|v| v == "true").unwrap_or(false);

        Self { service_name, default_level, log_directives: Vec::new(), json, recorder: None }
    }
}

/// Initialize telemetry with basic console logging
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_with_config(TelemetryConfig::new(service_name))
}

/// Initialize telemetry and return a recorder collecting render failures
pub fn init_with_render_recorder(
    service_name: &str,
) -> Result<RenderFailureRecorder, Box<dyn std::error::Error>> {
    let recorder = RenderFailureRecorder::new();
    init_with_config(TelemetryConfig::new(service_name).with_render_recorder(recorder.clone()))?;
    Ok(recorder)
}

/// Unified initialization. Only the first call installs a subscriber.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::fmt;

    let mut filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_level.as_deref().unwrap_or("info"))?,
    };
    for directive in &config.log_directives {
        filter = filter.add_directive(directive.parse()?);
    }

    INIT.call_once(|| {
        let plain_layer = (!config.json)
            .then(|| fmt::layer().with_target(true).with_thread_ids(true).with_line_number(true));
        let json_layer = config.json.then(|| fmt::layer().json().with_target(true));
        let recorder_layer = config.recorder.clone().map(RenderFailureLayer::new);

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(plain_layer)
            .with(json_layer)
            .with(recorder_layer)
            .try_init();

        if installed.is_ok() {
            tracing::info!(
                service.name = config.service_name,
                log.json = config.json,
                render.recorder = config.recorder.is_some(),
                log.level = config.default_level.as_deref().unwrap_or("env"),
                "Telemetry system initialized"
            );
        }
    });

    Ok(())
}
