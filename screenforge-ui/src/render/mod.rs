//! # Render surface
//!
//! [`ScreenRenderer`] is the only consumer of persisted specifications. It
//! re-validates every screen against its pattern and refuses to render one
//! that fails, producing [`RenderedScreen::Blocked`] instead of partial UI.
//!
//! Failures below the screen level stay local: a slot whose renderer fails
//! (or panics) shows a diagnostic placeholder, and an unreachable hero image
//! only affects the image region. Every such failure is reported as a
//! `tracing` event carrying a `render.event` field.

pub mod asset;
pub mod html;
pub mod isolation;
pub mod slot;

pub use asset::{AssetProbe, HeroView, SyntaxProbe, probe_with_retry};
pub use html::to_html;
pub use isolation::render_isolated;
pub use slot::{
    DEFAULT_RENDERER_ID, DefaultSlotRenderer, RenderError, RendererRegistry, SlotRenderContext,
    SlotRenderer, StyledRenderer,
};

use crate::effects::EffectDescriptor;
use crate::layout::{Placement, ResolvedLayout, place_slots, resolve};
use crate::library::{ComplexityTier, LibrarySelector, SelectionContext, TierRequest};
use crate::patterns::{
    Breakpoint, HeroPlacement, LatestTaskGuard, LoadOutcome, PatternDefinition, PatternKey,
    PatternRegistry,
};
use crate::schema::{Component, ComponentKind, Mood, Palette, ScreenSpecification};
use crate::validation::validate;
use screenforge_telemetry::{ASSET_FAILED, PATTERN_UNAVAILABLE, SCREEN_BLOCKED, SLOT_FAILED};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// Shown in place of a screen that failed validation.
pub const BLOCKED_NOTICE: &str =
    "Validation failed. Rendering was blocked to prevent invalid output from reaching end users.";

/// Request-level information for renderer selection and telemetry.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub screen_id: Option<String>,
    pub screen_type: Option<String>,
    pub complexity: Option<ComplexityTier>,
    pub preferred_category: Option<String>,
    pub tier: TierRequest,
}

impl RenderContext {
    pub fn for_screen(screen_id: impl Into<String>) -> Self {
        Self { screen_id: Some(screen_id.into()), ..Default::default() }
    }

    pub fn with_screen_type(mut self, screen_type: impl Into<String>) -> Self {
        self.screen_type = Some(screen_type.into());
        self
    }

    pub fn with_tier(mut self, tier: TierRequest) -> Self {
        self.tier = tier;
        self
    }

    fn screen_id(&self) -> &str {
        self.screen_id.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    Rendered { renderer: String, html: String },
    /// The slot shows a diagnostic placeholder.
    Failed { renderer: String, reason: String },
}

impl SlotOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub slot: String,
    pub kind: ComponentKind,
    pub placement: Placement,
    pub outcome: SlotOutcome,
}

/// A fully rendered screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub screen_id: Option<String>,
    pub pattern: PatternKey,
    pub layout: ResolvedLayout,
    pub palette: Palette,
    pub mood: Mood,
    pub hero: Option<HeroView>,
    pub slots: Vec<SlotView>,
    pub effects: Option<EffectDescriptor>,
}

impl ScreenView {
    pub fn failed_slots(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().filter(|s| s.outcome.is_failed())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedScreen {
    pub screen_id: Option<String>,
    pub pattern: PatternKey,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenderedScreen {
    Rendered(ScreenView),
    /// Validation failed; nothing of the screen is shown.
    Blocked(BlockedScreen),
    /// The pattern could not be loaded even after a cache clear.
    PatternUnavailable { pattern: PatternKey, reason: String },
}

impl RenderedScreen {
    pub fn view(&self) -> Option<&ScreenView> {
        match self {
            Self::Rendered(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

pub struct ScreenRenderer {
    patterns: Arc<PatternRegistry>,
    renderers: RendererRegistry,
    library: Option<Arc<LibrarySelector>>,
    probe: Arc<dyn AssetProbe>,
    asset_retries: u32,
    guard: LatestTaskGuard,
}

impl ScreenRenderer {
    pub fn new(patterns: Arc<PatternRegistry>) -> Self {
        Self {
            patterns,
            renderers: RendererRegistry::builtin(),
            library: None,
            probe: Arc::new(SyntaxProbe),
            asset_retries: 1,
            guard: LatestTaskGuard::new(),
        }
    }

    pub fn with_library(mut self, selector: Arc<LibrarySelector>) -> Self {
        self.library = Some(selector);
        self
    }

    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_asset_probe(mut self, probe: Arc<dyn AssetProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_asset_retries(mut self, retries: u32) -> Self {
        self.asset_retries = retries;
        self
    }

    /// Render `spec` at `breakpoint`.
    pub async fn render(
        &self,
        spec: &ScreenSpecification,
        breakpoint: Breakpoint,
        context: &RenderContext,
    ) -> RenderedScreen {
        let key = spec.pattern_key();
        let pattern = match self.patterns.load_with_retry(&key).await {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::error!(
                    render.event = PATTERN_UNAVAILABLE,
                    screen.id = context.screen_id(),
                    pattern.family = %key.family,
                    pattern.variant = key.variant,
                    error = %e,
                    "pattern unavailable, screen not rendered"
                );
                return RenderedScreen::PatternUnavailable { pattern: key, reason: e.to_string() };
            }
        };

        let validation = validate(spec, Some(&pattern));
        if !validation.success {
            tracing::warn!(
                render.event = SCREEN_BLOCKED,
                screen.id = context.screen_id(),
                pattern.family = %key.family,
                pattern.variant = key.variant,
                errors = validation.errors.len(),
                "screen failed validation, rendering blocked"
            );
            return RenderedScreen::Blocked(BlockedScreen {
                screen_id: context.screen_id.clone(),
                pattern: key,
                errors: validation.errors,
            });
        }

        let placed = match place_slots(&pattern) {
            Ok(placed) => placed,
            Err(e) => {
                return RenderedScreen::PatternUnavailable { pattern: key, reason: e.to_string() };
            }
        };

        let hero = match placed.iter().find(|p| p.hero) {
            Some(_) => Some(self.hero_view(spec, pattern.hero.as_ref(), context).await),
            None => None,
        };

        // Selection is async; slots resolve concurrently but keep placement order.
        let pending = placed.iter().filter(|p| !p.hero).filter_map(|placed_slot| {
            let kind = ComponentKind::from_slot_name(&placed_slot.slot)?;
            let component = spec.component(kind)?;
            Some(self.render_slot(
                spec,
                &pattern,
                &placed_slot.slot,
                placed_slot.placement,
                component,
                context,
            ))
        });
        let slots = join_all(pending).await;

        RenderedScreen::Rendered(ScreenView {
            screen_id: context.screen_id.clone(),
            pattern: key,
            layout: resolve(&pattern, breakpoint),
            palette: spec.palette.clone(),
            mood: spec.mood,
            hero,
            slots,
            effects: spec.animations.clone(),
        })
    }

    /// [`ScreenRenderer::render`] for a view whose inputs may change while the
    /// render is in flight. A render superseded by a newer one is discarded.
    pub async fn render_latest(
        &self,
        spec: &ScreenSpecification,
        breakpoint: Breakpoint,
        context: &RenderContext,
    ) -> LoadOutcome<RenderedScreen> {
        self.guard.run(self.render(spec, breakpoint, context)).await
    }

    /// Drop any in-flight [`ScreenRenderer::render_latest`] (the view went away).
    pub fn cancel(&self) {
        self.guard.cancel_all();
    }

    /// User-triggered retry of a failed hero image.
    pub async fn retry_hero(&self, hero: &HeroView) -> HeroView {
        match hero {
            HeroView::Ready { .. } => hero.clone(),
            HeroView::Failed { id, url, alt, fit, position, .. } => {
                match probe_with_retry(self.probe.as_ref(), url, 0).await {
                    Ok(()) => HeroView::Ready {
                        id: id.clone(),
                        url: url.clone(),
                        alt: alt.clone(),
                        fit: *fit,
                        position: *position,
                    },
                    Err(reason) => HeroView::Failed {
                        id: id.clone(),
                        url: url.clone(),
                        alt: alt.clone(),
                        reason,
                        fit: *fit,
                        position: *position,
                    },
                }
            }
        }
    }

    async fn hero_view(
        &self,
        spec: &ScreenSpecification,
        placement: Option<&HeroPlacement>,
        context: &RenderContext,
    ) -> HeroView {
        let hero = &spec.hero_image;
        let fit = placement.map(|p| p.fit).unwrap_or_default();
        let position = placement.map(|p| p.position).unwrap_or_default();

        match probe_with_retry(self.probe.as_ref(), &hero.url, self.asset_retries).await {
            Ok(()) => HeroView::Ready {
                id: hero.id.clone(),
                url: hero.url.clone(),
                alt: hero.prompt.clone(),
                fit,
                position,
            },
            Err(reason) => {
                tracing::warn!(
                    render.event = ASSET_FAILED,
                    screen.id = context.screen_id(),
                    asset = %hero.id,
                    url = %hero.url,
                    error = %reason,
                    "hero image failed to load"
                );
                HeroView::Failed {
                    id: hero.id.clone(),
                    url: hero.url.clone(),
                    alt: hero.prompt.clone(),
                    reason,
                    fit,
                    position,
                }
            }
        }
    }

    async fn render_slot(
        &self,
        spec: &ScreenSpecification,
        pattern: &PatternDefinition,
        slot: &str,
        placement: Placement,
        component: &Component,
        context: &RenderContext,
    ) -> SlotView {
        let renderer = self.pick_renderer(spec, slot, component.kind(), context).await;
        let slot_context = SlotRenderContext {
            palette: &spec.palette,
            animation: spec.animations.as_ref().and_then(|a| a.slots.get(slot)),
        };

        let outcome = match render_isolated(renderer.as_ref(), component, &slot_context) {
            Ok(html) => SlotOutcome::Rendered { renderer: renderer.id().to_string(), html },
            Err(reason) => {
                tracing::error!(
                    render.event = SLOT_FAILED,
                    screen.id = context.screen_id(),
                    pattern.family = %pattern.family,
                    pattern.variant = pattern.variant,
                    slot,
                    renderer = renderer.id(),
                    error = %reason,
                    "slot failed to render"
                );
                SlotOutcome::Failed { renderer: renderer.id().to_string(), reason }
            }
        };

        SlotView { slot: slot.to_string(), kind: component.kind(), placement, outcome }
    }

    async fn pick_renderer(
        &self,
        spec: &ScreenSpecification,
        slot: &str,
        kind: ComponentKind,
        context: &RenderContext,
    ) -> Arc<dyn SlotRenderer> {
        let Some(library) = &self.library else {
            return self.renderers.default_renderer();
        };

        let selection = SelectionContext {
            slot: slot.to_string(),
            kind,
            screen_type: context.screen_type.clone(),
            complexity: context.complexity,
            mood: Some(spec.mood),
            preferred_category: context.preferred_category.clone(),
            tier: context.tier,
        };
        let picked = library.select(&selection).await;

        match picked.and_then(|candidate| self.renderers.get(candidate.id())) {
            Some(renderer) => renderer,
            None => self.renderers.default_renderer(),
        }
    }
}
