//! Render surface: fail-closed validation, per-slot isolation, asset
//! failures and the telemetry they produce.

use async_trait::async_trait;
use screenforge_telemetry::{
    ASSET_FAILED, PATTERN_UNAVAILABLE, RenderFailureLayer, RenderFailureRecorder, SCREEN_BLOCKED,
    SLOT_FAILED,
};
use screenforge_ui::library::{LibraryCatalog, LibrarySelector, SelectorSettings, TierRequest};
use screenforge_ui::patterns::{Breakpoint, PatternRegistry, builtin};
use screenforge_ui::plan::{GenerationPlan, ResolvedHeroImage};
use screenforge_ui::render::{
    AssetProbe, BLOCKED_NOTICE, HeroView, RenderError, RendererRegistry, SlotOutcome,
    SlotRenderContext, SlotRenderer, to_html,
};
use screenforge_ui::{
    Component, RenderContext, RenderedScreen, ScreenAssembler, ScreenRenderer, ScreenSpecification,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;

fn record_failures() -> (RenderFailureRecorder, DefaultGuard) {
    let recorder = RenderFailureRecorder::new();
    let subscriber = tracing_subscriber::registry().with(RenderFailureLayer::new(recorder.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (recorder, guard)
}

fn cta_screen() -> ScreenSpecification {
    let pattern = builtin::pattern("CTA_CENTER", 1).unwrap();
    let plan: GenerationPlan = serde_json::from_value(serde_json::json!({
        "name": "Launch day",
        "screenId": "screen-9",
        "pattern": { "family": "CTA_CENTER", "variant": 1 },
        "textPlan": { "tone": "bold", "styleCues": ["vivid"] },
        "heroPlan": { "imagePrompt": "rocket launch", "aspectRatio": "16:9" }
    }))
    .unwrap();
    let hero = ResolvedHeroImage::from_url("https://cdn.example.com/rocket.png");
    let screen = ScreenAssembler::default().assemble(&pattern, &plan, &hero, None).unwrap();
    assert!(screen.is_valid(), "{:?}", screen.validation.errors);
    screen.spec
}

fn renderer() -> ScreenRenderer {
    let selector =
        LibrarySelector::from_catalog(LibraryCatalog::builtin(), SelectorSettings::default());
    ScreenRenderer::new(Arc::new(PatternRegistry::builtin())).with_library(Arc::new(selector))
}

fn enhanced(screen_id: &str) -> RenderContext {
    RenderContext::for_screen(screen_id).with_tier(TierRequest::Enhanced)
}

struct Exploding;

impl SlotRenderer for Exploding {
    fn id(&self) -> &str {
        "gradient_title"
    }

    fn render(&self, _: &Component, _: &SlotRenderContext<'_>) -> Result<String, RenderError> {
        panic!("gradient engine offline")
    }
}

/// Fails the first `n` probes.
struct Flaky(AtomicU32);

#[async_trait]
impl AssetProbe for Flaky {
    async fn probe(&self, _url: &str) -> Result<(), String> {
        let left = self.0.load(Ordering::SeqCst);
        if left == 0 {
            return Ok(());
        }
        self.0.store(left - 1, Ordering::SeqCst);
        Err("connection reset".to_string())
    }
}

#[tokio::test]
async fn valid_screen_renders_with_library_renderers() {
    let (recorder, _guard) = record_failures();
    let spec = cta_screen();

    let rendered = renderer().render(&spec, Breakpoint::Desktop, &enhanced("screen-9")).await;

    let view = rendered.view().expect("screen renders");
    assert!(view.hero.as_ref().is_some_and(HeroView::is_ready));
    assert_eq!(view.layout.padding, 64);

    let renderers: Vec<_> = view
        .slots
        .iter()
        .map(|s| match &s.outcome {
            SlotOutcome::Rendered { renderer, .. } => (s.slot.as_str(), renderer.as_str()),
            SlotOutcome::Failed { reason, .. } => panic!("slot {} failed: {reason}", s.slot),
        })
        .collect();
    assert_eq!(
        renderers,
        [("title", "gradient_title"), ("subtitle", "default"), ("button", "pill_cta")]
    );

    let html = to_html(&rendered);
    assert!(html.starts_with("<main class=\"sf-screen\" data-pattern=\"CTA_CENTER/1\""));
    assert!(html.contains("sf-title--gradient"));
    assert!(html.contains("data-effect=\"subtle\""));
    assert!(html.contains("--sf-transition: 350ms ease-out;"));
    assert!(html.contains("data-animation=\"fade\""));
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn default_tier_keeps_default_renderers_for_titles() {
    let spec = cta_screen();
    let rendered =
        renderer().render(&spec, Breakpoint::Mobile, &RenderContext::for_screen("s")).await;

    let view = rendered.view().unwrap();
    let title = view.slots.iter().find(|s| s.slot == "title").unwrap();
    assert!(matches!(
        &title.outcome,
        SlotOutcome::Rendered { renderer, .. } if renderer == "default"
    ));
}

#[tokio::test]
async fn invalid_screen_is_blocked_and_reported() {
    let (recorder, _guard) = record_failures();
    let mut spec = cta_screen();
    spec.components.clear();

    let rendered = renderer().render(&spec, Breakpoint::Desktop, &enhanced("screen-9")).await;

    let RenderedScreen::Blocked(blocked) = &rendered else {
        panic!("expected a blocked screen, got {rendered:?}");
    };
    assert!(!blocked.errors.is_empty());
    let html = to_html(&rendered);
    assert!(html.contains(BLOCKED_NOTICE));
    assert!(!html.contains("sf-slot"));

    let failures = recorder.failures_for_screen("screen-9");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, SCREEN_BLOCKED);
}

#[tokio::test]
async fn panicking_slot_is_isolated() {
    let (recorder, _guard) = record_failures();
    let mut registry = RendererRegistry::builtin();
    registry.register(Arc::new(Exploding));
    let renderer = renderer().with_renderers(registry);

    let rendered = renderer.render(&cta_screen(), Breakpoint::Tablet, &enhanced("screen-9")).await;

    let view = rendered.view().expect("the rest of the screen still renders");
    let failed: Vec<_> = view.failed_slots().map(|s| s.slot.as_str()).collect();
    assert_eq!(failed, ["title"]);
    assert_eq!(view.slots.len(), 3);
    assert!(to_html(&rendered).contains("title could not be displayed"));

    let failures = recorder.failures_for_screen("screen-9");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, SLOT_FAILED);
    assert_eq!(failures[0].field("slot"), Some("title"));
    assert_eq!(failures[0].field("renderer"), Some("gradient_title"));
    assert!(failures[0].field("error").unwrap().contains("gradient engine offline"));
}

#[tokio::test]
async fn broken_hero_only_affects_the_image_region() {
    let (recorder, _guard) = record_failures();
    let renderer =
        renderer().with_asset_probe(Arc::new(Flaky(AtomicU32::new(2)))).with_asset_retries(1);

    let rendered = renderer.render(&cta_screen(), Breakpoint::Desktop, &enhanced("screen-9")).await;

    let view = rendered.view().unwrap();
    let hero = view.hero.clone().unwrap();
    assert!(!hero.is_ready());
    assert_eq!(view.failed_slots().count(), 0);
    assert!(to_html(&rendered).contains("data-action=\"retry-hero\""));
    assert_eq!(recorder.failures()[0].kind, ASSET_FAILED);

    let retried = renderer.retry_hero(&hero).await;
    assert!(retried.is_ready());
    assert_eq!(retried.url(), hero.url());
    assert_eq!(hero.alt(), Some("rocket launch"));
    assert_eq!(retried.alt(), hero.alt());
}

#[tokio::test]
async fn unknown_pattern_is_unavailable() {
    let (recorder, _guard) = record_failures();
    let mut spec = cta_screen();
    spec.pattern_family = "MISSING_FAMILY".to_string();

    let rendered = renderer().render(&spec, Breakpoint::Desktop, &enhanced("screen-9")).await;

    assert!(matches!(rendered, RenderedScreen::PatternUnavailable { .. }));
    assert_eq!(recorder.failures_for_screen("screen-9")[0].kind, PATTERN_UNAVAILABLE);
}

#[tokio::test]
async fn superseded_render_is_discarded() {
    let renderer = renderer();
    let spec = cta_screen();
    let context = RenderContext::for_screen("s");

    let (first, second) = tokio::join!(
        renderer.render_latest(&spec, Breakpoint::Mobile, &context),
        async {
            tokio::task::yield_now().await;
            renderer.render_latest(&spec, Breakpoint::Desktop, &context).await
        }
    );

    assert!(second.ready().is_some());
    // The first render may finish before the second starts; it is never
    // applied after being superseded.
    if let Some(screen) = first.ready() {
        assert_eq!(screen.view().unwrap().layout.breakpoint, Breakpoint::Mobile);
    }
}
