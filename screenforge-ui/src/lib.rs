//! # screenforge-ui
//!
//! Assembly, validation and pattern-constrained layout of generated screens.
//!
//! ## Overview
//!
//! A screen is described by a [`ScreenSpecification`]: a hero image, a
//! palette, a mood, a named layout pattern and an ordered list of content
//! components. This crate builds that document from an upstream
//! [`GenerationPlan`](plan::GenerationPlan), a resolved hero image and an
//! optional [`ScreenIntentOverride`], and guarantees it satisfies the slot
//! contract of its pattern before anything persists or renders it.
//!
//! ## Pipeline
//!
//! - **Patterns** ([`patterns`]): immutable layout templates, loaded through a
//!   cached [`PatternRegistry`].
//! - **Synthesis** ([`synthesis`]): one component per slot, in row-major
//!   order, with deterministic call-to-action cascades and generic repairs.
//! - **Overrides** ([`overrides`]) and **effects** ([`effects`]).
//! - **Validation** ([`validation`]): schema checks, then pattern-slot checks.
//!   Only a passing screen becomes a [`ValidatedScreen`].
//! - **Layout** ([`layout`]): breakpoint-aware spacing and slot placement.
//! - **Library** ([`library`]): weighted selection of richer slot renderers.
//! - **Render** ([`render`]): per-slot failure isolation and HTML output.
//!
//! ## Quick Start
//!
//! ```rust
//! use screenforge_ui::{ScreenAssembler, patterns::builtin, plan::ResolvedHeroImage};
//!
//! let pattern = builtin::pattern("CTA_CENTER", 1).unwrap();
//! let plan = serde_json::from_value(serde_json::json!({
//!     "name": "Launch",
//!     "screenId": "screen-7",
//!     "pattern": { "family": "CTA_CENTER", "variant": 1 },
//!     "textPlan": { "tone": "bold", "styleCues": ["neon"] },
//!     "heroPlan": { "imagePrompt": "city at night", "aspectRatio": "16:9" }
//! }))
//! .unwrap();
//! let hero = ResolvedHeroImage::from_url("https://cdn.example.com/city.png");
//!
//! let screen = ScreenAssembler::default().assemble(&pattern, &plan, &hero, None).unwrap();
//! assert!(screen.is_valid());
//! ```

pub mod assembler;
pub mod config;
pub mod effects;
pub mod layout;
pub mod library;
pub mod overrides;
pub mod patterns;
pub mod plan;
pub mod render;
pub mod schema;
pub mod synthesis;
pub mod validation;

pub use assembler::{AssembledScreen, ScreenAssembler};
pub use config::ScreenforgeConfig;
pub use effects::{EffectDescriptor, EffectPreset, resolve_effects};
pub use layout::{BreakpointThresholds, Placement, ResolvedLayout, place_slots, resolve};
pub use overrides::{OverrideMetadata, ScreenIntentOverride, apply_override};
pub use patterns::{Breakpoint, PatternDefinition, PatternKey, PatternRegistry};
pub use render::{RenderContext, RenderedScreen, ScreenRenderer, ScreenView};
pub use schema::{
    Component, ComponentKind, MIME_TYPE_SCREEN, Mood, Palette, PaletteInput, ScreenSpecification,
    screen_json_schema,
};
pub use synthesis::{ComponentSynthesizer, Synthesis, SynthesisOptions, synthesize};
pub use validation::{ValidatedScreen, ValidationResult, validate, validate_json};
