//! Pipeline configuration.
//!
//! ```toml
//! [patterns]
//! dir = "./patterns"
//!
//! [assembly]
//! repair = true
//! strict = false
//!
//! [layout]
//! tablet_min_width = 768
//! desktop_min_width = 1024
//!
//! [library]
//! enabled = true
//! min_score = 1.0
//!
//! [library.weights]
//! slot_match = 120.0
//! ```

use crate::layout::BreakpointThresholds;
use crate::library::{ScoringWeights, SelectorSettings};
use crate::patterns::{BuiltinPatternSource, LayeredPatternSource, PatternRegistry, PatternSource};
use crate::synthesis::SynthesisOptions;
use screenforge_core::{Result, ScreenforgeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenforgeConfig {
    pub patterns: PatternsConfig,
    pub assembly: AssemblyConfig,
    pub layout: LayoutConfig,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternsConfig {
    /// Directory of `<FAMILY>_<variant>.json|toml` documents, searched before
    /// the built-in set.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblyConfig {
    pub repair: bool,
    /// Disables repair regardless of `repair`.
    pub strict: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self { repair: true, strict: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub tablet_min_width: Option<u32>,
    pub desktop_min_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    pub enabled: bool,
    pub min_score: f64,
    pub weights: ScoringWeights,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let settings = SelectorSettings::default();
        Self { enabled: settings.enabled, min_score: settings.min_score, weights: settings.weights }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(
                name,
                value = %value,
                "ignoring unparsable boolean environment variable"
            );
            None
        }
    }
}

impl ScreenforgeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Read a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `SCREENFORGE_PATTERN_DIR`, `SCREENFORGE_STRICT` and
    /// `SCREENFORGE_LIBRARY_ENABLED`.
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os("SCREENFORGE_PATTERN_DIR").filter(|d| !d.is_empty()) {
            self.patterns.dir = Some(PathBuf::from(dir));
        }
        if let Some(strict) = env_flag("SCREENFORGE_STRICT") {
            self.assembly.strict = strict;
        }
        if let Some(enabled) = env_flag("SCREENFORGE_LIBRARY_ENABLED") {
            self.library.enabled = enabled;
        }
    }

    fn check(&self) -> Result<()> {
        let thresholds = self.breakpoints();
        if thresholds.tablet_min_width >= thresholds.desktop_min_width {
            return Err(ScreenforgeError::InvalidInput(format!(
                "layout: tablet_min_width ({}) must be below desktop_min_width ({})",
                thresholds.tablet_min_width, thresholds.desktop_min_width
            )));
        }
        if !self.library.min_score.is_finite() {
            return Err(ScreenforgeError::InvalidInput(
                "library: min_score must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions { repair: self.assembly.repair && !self.assembly.strict }
    }

    pub fn breakpoints(&self) -> BreakpointThresholds {
        let defaults = BreakpointThresholds::default();
        BreakpointThresholds {
            tablet_min_width: self.layout.tablet_min_width.unwrap_or(defaults.tablet_min_width),
            desktop_min_width: self.layout.desktop_min_width.unwrap_or(defaults.desktop_min_width),
        }
    }

    pub fn selector_settings(&self) -> SelectorSettings {
        SelectorSettings {
            enabled: self.library.enabled,
            min_score: self.library.min_score,
            weights: self.library.weights,
        }
    }

    pub fn pattern_source(&self) -> Arc<dyn PatternSource> {
        match &self.patterns.dir {
            Some(dir) => Arc::new(LayeredPatternSource::directory_over_builtin(dir)),
            None => Arc::new(BuiltinPatternSource),
        }
    }

    pub fn pattern_registry(&self) -> PatternRegistry {
        PatternRegistry::new(self.pattern_source())
    }
}
