use crate::cli::{AssembleArgs, LayoutArgs, RenderArgs, ViewportArgs};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use screenforge_ui::library::{LibraryCatalog, LibrarySelector};
use screenforge_ui::plan::{GenerationPlan, ResolvedHeroImage};
use screenforge_ui::render::to_html;
use screenforge_ui::{
    Breakpoint, BreakpointThresholds, PatternKey, RenderContext, RenderedScreen, ScreenAssembler,
    ScreenIntentOverride, ScreenRenderer, ScreenSpecification, ScreenforgeConfig, place_slots,
    resolve, screen_json_schema, validate_json,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// File configuration overlaid with the environment.
pub fn load_config(path: &Path) -> Result<ScreenforgeConfig> {
    let mut config = ScreenforgeConfig::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.apply_env();
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Parse `FAMILY/VARIANT`.
pub fn parse_pattern_key(value: &str) -> Result<PatternKey> {
    let (family, variant) = value
        .split_once('/')
        .ok_or_else(|| anyhow!("pattern '{value}' must be written FAMILY/VARIANT"))?;
    let variant: u8 =
        variant.trim().parse().with_context(|| format!("invalid pattern variant in '{value}'"))?;
    Ok(PatternKey::new(family.trim(), variant))
}

fn breakpoint(viewport: &ViewportArgs, thresholds: &BreakpointThresholds) -> Breakpoint {
    match (viewport.breakpoint, viewport.width) {
        (Some(bp), _) => bp.into(),
        (None, Some(width)) => thresholds.breakpoint_for(width),
        (None, None) => Breakpoint::Desktop,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssembleReport<'a> {
    pattern: &'a PatternKey,
    spec: &'a ScreenSpecification,
    validation: &'a screenforge_ui::ValidationResult,
    repairs: &'a [screenforge_ui::synthesis::Repair],
    #[serde(skip_serializing_if = "Option::is_none")]
    override_metadata: Option<&'a screenforge_ui::OverrideMetadata>,
}

pub async fn assemble(mut config: ScreenforgeConfig, args: AssembleArgs) -> Result<ExitCode> {
    if args.strict {
        config.assembly.strict = true;
    }
    let plan: GenerationPlan = read_json(&args.plan)?;
    let hero = match (&args.hero, &args.hero_url) {
        (Some(path), _) => read_json::<ResolvedHeroImage>(path)?,
        (None, Some(url)) => ResolvedHeroImage::from_url(url.clone()),
        (None, None) => bail!("either --hero or --hero-url is required"),
    };
    let intent = args.intent.as_deref().map(read_json::<ScreenIntentOverride>).transpose()?;
    let key = match &args.pattern {
        Some(value) => parse_pattern_key(value)?,
        None => plan.pattern.key(),
    };

    let registry = config.pattern_registry();
    let pattern = registry.load_with_retry(&key).await.with_context(|| format!("pattern {key}"))?;

    let assembled = ScreenAssembler::new(config.synthesis_options())
        .assemble(&pattern, &plan, &hero, intent.as_ref())
        .context("assembly failed")?;
    print_json(&AssembleReport {
        pattern: &key,
        spec: &assembled.spec,
        validation: &assembled.validation,
        repairs: &assembled.repairs,
        override_metadata: assembled.override_metadata.as_ref(),
    })?;
    Ok(exit_code(assembled.is_valid()))
}

pub async fn validate(
    config: ScreenforgeConfig,
    screen: &Path,
    schema_only: bool,
) -> Result<ExitCode> {
    let value: serde_json::Value = read_json(screen)?;

    // A document that does not even parse is reported by the schema stage.
    let key = serde_json::from_value::<ScreenSpecification>(value.clone())
        .ok()
        .filter(|_| !schema_only)
        .map(|spec| spec.pattern_key());
    let pattern = match key {
        Some(key) => Some(
            config
                .pattern_registry()
                .load_with_retry(&key)
                .await
                .with_context(|| format!("pattern {key}"))?,
        ),
        None => None,
    };

    let result = validate_json(value, pattern.as_deref());
    print_json(&result)?;
    Ok(exit_code(result.success))
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    pattern: &'a PatternKey,
    layout: screenforge_ui::ResolvedLayout,
    slots: Vec<screenforge_ui::layout::PlacedSlot>,
}

pub async fn layout(config: ScreenforgeConfig, args: LayoutArgs) -> Result<ExitCode> {
    let key = PatternKey::new(args.family, args.variant);
    let pattern = config
        .pattern_registry()
        .load_with_retry(&key)
        .await
        .with_context(|| format!("pattern {key}"))?;
    let breakpoint = breakpoint(&args.viewport, &config.breakpoints());

    print_json(&LayoutReport {
        pattern: &key,
        layout: resolve(&pattern, breakpoint),
        slots: place_slots(&pattern)?,
    })?;
    Ok(ExitCode::SUCCESS)
}

pub async fn render(config: ScreenforgeConfig, args: RenderArgs) -> Result<ExitCode> {
    let spec: ScreenSpecification = read_json(&args.screen)?;
    let breakpoint = breakpoint(&args.viewport, &config.breakpoints());

    let selector =
        LibrarySelector::from_catalog(LibraryCatalog::builtin(), config.selector_settings());
    let renderer =
        ScreenRenderer::new(Arc::new(config.pattern_registry())).with_library(Arc::new(selector));

    let screen_id = spec
        .metadata
        .as_ref()
        .and_then(|m| m.get("screenId"))
        .and_then(|v| v.as_str())
        .unwrap_or("cli")
        .to_string();
    let mut context = RenderContext::for_screen(screen_id).with_tier(args.tier.into());
    if let Some(screen_type) = args.screen_type {
        context = context.with_screen_type(screen_type);
    }

    let rendered = renderer.render(&spec, breakpoint, &context).await;
    if args.html {
        println!("{}", to_html(&rendered));
    } else {
        print_json(&rendered)?;
    }
    Ok(exit_code(matches!(rendered, RenderedScreen::Rendered(_))))
}

pub async fn patterns(config: ScreenforgeConfig) -> Result<ExitCode> {
    let registry = config.pattern_registry();
    let mut keys = registry.available().await.context("failed to list patterns")?;
    keys.sort();
    for key in keys {
        println!("{key}");
    }
    Ok(ExitCode::SUCCESS)
}

pub fn schema() -> Result<ExitCode> {
    print_json(&screen_json_schema()?)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BreakpointArg;

    #[test]
    fn pattern_key_parsing() {
        let key = parse_pattern_key("CTA_CENTER/2").unwrap();
        assert_eq!(key, PatternKey::new("CTA_CENTER", 2));
        assert!(parse_pattern_key("CTA_CENTER").is_err());
        assert!(parse_pattern_key("CTA_CENTER/x").is_err());
    }

    #[test]
    fn explicit_breakpoint_wins_over_width() {
        let thresholds = BreakpointThresholds::default();
        let explicit = ViewportArgs { breakpoint: Some(BreakpointArg::Mobile), width: Some(2000) };
        assert_eq!(breakpoint(&explicit, &thresholds), Breakpoint::Mobile);

        let wide = ViewportArgs { breakpoint: None, width: Some(2000) };
        assert_eq!(breakpoint(&wide, &thresholds), Breakpoint::Desktop);

        let none = ViewportArgs { breakpoint: None, width: None };
        assert_eq!(breakpoint(&none, &thresholds), Breakpoint::Desktop);
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_ok());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenforge.toml");
        let toml = "[layout]\ntablet_min_width = 1200\ndesktop_min_width = 800\n";
        std::fs::write(&path, toml).unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("tablet_min_width"));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<GenerationPlan>(&path).unwrap_err();
        assert!(err.to_string().contains("plan.json"));
    }
}
