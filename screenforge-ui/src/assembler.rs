//! One-call assembly of a screen specification.
//!
//! [`ScreenAssembler::assemble`] chains synthesis, the optional override,
//! effect resolution, palette and mood resolution, and validation. Synthesis
//! and configuration failures are returned as `Err`; validation failures are
//! part of the returned [`AssembledScreen`].

use crate::effects::resolve_effects;
use crate::overrides::{OverrideMetadata, ScreenIntentOverride, apply_override};
use crate::patterns::PatternDefinition;
use crate::plan::{GenerationPlan, ResolvedHeroImage};
use crate::schema::{HeroImage, Mood, Palette, ScreenSpecification};
use crate::synthesis::{ComponentSynthesizer, Repair, SynthesisOptions, hero_image_id};
use crate::validation::{ValidatedScreen, ValidationResult, validate};
use screenforge_core::Result;
use std::collections::BTreeMap;

/// Output of [`ScreenAssembler::assemble`].
#[derive(Debug, Clone)]
pub struct AssembledScreen {
    pub spec: ScreenSpecification,
    pub validation: ValidationResult,
    pub repairs: Vec<Repair>,
    pub override_metadata: Option<OverrideMetadata>,
}

impl AssembledScreen {
    pub fn is_valid(&self) -> bool {
        self.validation.success
    }

    /// The persistable screen, or the field-level errors.
    pub fn into_validated(self) -> std::result::Result<ValidatedScreen, Vec<String>> {
        let errors = self.validation.errors.clone();
        self.validation.into_validated().map_err(|_| errors)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenAssembler {
    synthesizer: ComponentSynthesizer,
}

impl ScreenAssembler {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { synthesizer: ComponentSynthesizer::new(options) }
    }

    pub fn assemble(
        &self,
        pattern: &PatternDefinition,
        plan: &GenerationPlan,
        hero: &ResolvedHeroImage,
        intent: Option<&ScreenIntentOverride>,
    ) -> Result<AssembledScreen> {
        let synthesis = self.synthesizer.synthesize(pattern, plan, hero)?;
        let mut components = synthesis.components;

        let override_metadata = match intent {
            Some(intent) => {
                intent.validate()?;
                let applied = apply_override(intent, pattern, &components);
                components = applied.components;
                Some(applied.metadata)
            }
            None => None,
        };

        let fx_preset = override_metadata.as_ref().and_then(|m| m.fx_preset.as_deref());
        let animations = resolve_effects(fx_preset, effect_text(plan, intent));

        let mut metadata = BTreeMap::new();
        metadata.insert("screenId".to_string(), serde_json::Value::String(plan.screen_id.clone()));
        if let Some(template_id) = &plan.template_id {
            metadata
                .insert("templateId".to_string(), serde_json::Value::String(template_id.clone()));
        }
        if !synthesis.repairs.is_empty() {
            metadata.insert("repairs".to_string(), serde_json::to_value(&synthesis.repairs)?);
        }
        if let Some(overrides) = &override_metadata {
            metadata.insert("overrides".to_string(), serde_json::to_value(overrides)?);
        }

        let spec = ScreenSpecification {
            hero_image: HeroImage {
                id: hero_image_id(plan, hero),
                url: hero.image.url.trim().to_string(),
                prompt: hero.image.prompt.clone().or_else(|| {
                    Some(plan.hero_plan.image_prompt.clone()).filter(|p| !p.trim().is_empty())
                }),
                seed: hero.image.seed,
                aspect_ratio: hero.image.aspect_ratio.clone().or_else(|| {
                    Some(plan.hero_plan.aspect_ratio.clone()).filter(|a| !a.trim().is_empty())
                }),
                style: hero.image.style.clone(),
            },
            supporting_images: Vec::new(),
            palette: Palette::resolve(hero.palette.as_ref()),
            mood: resolve_mood(plan, hero),
            pattern_family: pattern.family.clone(),
            pattern_variant: pattern.variant,
            components,
            navigation: None,
            animations: Some(animations),
            metadata: Some(metadata),
        };

        let validation = validate(&spec, Some(pattern));
        if validation.success {
            tracing::info!(
                screen.id = %plan.screen_id,
                pattern.family = %pattern.family,
                pattern.variant = pattern.variant,
                components = spec.components.len(),
                repaired = !synthesis.repairs.is_empty(),
                "screen assembled"
            );
        } else {
            tracing::warn!(
                screen.id = %plan.screen_id,
                pattern.family = %pattern.family,
                pattern.variant = pattern.variant,
                errors = validation.errors.len(),
                "assembled screen failed validation"
            );
        }

        Ok(AssembledScreen { spec, validation, repairs: synthesis.repairs, override_metadata })
    }
}

/// Image vibe first, then the text plan's colour mood, then the hero plan's.
fn resolve_mood(plan: &GenerationPlan, hero: &ResolvedHeroImage) -> Mood {
    [
        hero.vibe.as_deref(),
        plan.text_plan.color_mood.as_deref(),
        plan.hero_plan.color_mood.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(Mood::parse)
    .unwrap_or_default()
}

/// Free text searched for effect keywords.
/// Free text for effect inference: the override's screen name, else the plan's.
fn effect_text<'a>(plan: &'a GenerationPlan, intent: Option<&'a ScreenIntentOverride>) -> &'a str {
    intent
        .map(|i| i.screen_name.as_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&plan.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectPreset;
    use crate::patterns::builtin;
    use crate::schema::{Component, ComponentKind, PaletteInput};

    fn plan(family: &str, tone: &str) -> GenerationPlan {
        serde_json::from_value(serde_json::json!({
            "name": "Welcome",
            "screenId": "screen-1",
            "pattern": { "family": family, "variant": 1 },
            "textPlan": { "tone": tone, "styleCues": ["clean"], "contentFocus": "Welcome" },
            "heroPlan": { "imagePrompt": "sunrise", "aspectRatio": "16:9", "colorMood": "calm" }
        }))
        .unwrap()
    }

    fn hero() -> ResolvedHeroImage {
        let mut hero = ResolvedHeroImage::from_url("https://cdn.example.com/hero.png");
        hero.palette = Some(PaletteInput { primary: "#112233".to_string(), ..Default::default() });
        hero
    }

    #[test]
    fn assembles_a_valid_screen() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let screen = ScreenAssembler::default()
            .assemble(&pattern, &plan("ONB_HERO_TOP", "friendly"), &hero(), None)
            .unwrap();

        assert!(screen.is_valid(), "{:?}", screen.validation.errors);
        assert_eq!(screen.spec.palette.secondary, "#112233");
        assert_eq!(screen.spec.mood, Mood::Calm);
        assert_eq!(screen.spec.animations.as_ref().unwrap().preset, EffectPreset::Subtle);
        assert_eq!(screen.spec.hero_image.prompt.as_deref(), Some("sunrise"));
        assert!(screen.repairs.is_empty());
        assert!(screen.into_validated().is_ok());
    }

    #[test]
    fn vibe_wins_over_plan_moods() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut hero = hero();
        hero.vibe = Some("Moody".to_string());
        let screen = ScreenAssembler::default()
            .assemble(&pattern, &plan("ONB_HERO_TOP", "friendly"), &hero, None)
            .unwrap();
        assert_eq!(screen.spec.mood, Mood::Dark);
    }

    #[test]
    fn effects_are_inferred_from_the_screen_name_only() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut hero = hero();
        hero.vibe = Some("neon night".to_string());

        // "clean" style cue and "neon night" vibe do not pick a preset.
        let mut plan = plan("ONB_HERO_TOP", "playful");
        let screen = ScreenAssembler::default().assemble(&pattern, &plan, &hero, None).unwrap();
        assert_eq!(screen.spec.animations.as_ref().unwrap().preset, EffectPreset::Subtle);

        plan.name = "Cinematic intro".to_string();
        let screen = ScreenAssembler::default().assemble(&pattern, &plan, &hero, None).unwrap();
        assert_eq!(screen.spec.animations.as_ref().unwrap().preset, EffectPreset::Cinematic);
    }

    #[test]
    fn override_metadata_is_recorded() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let intent: ScreenIntentOverride = serde_json::from_value(serde_json::json!({
            "screenName": "Neon Launch",
            "screenType": "onboarding",
            "layout": {
                "main": "hero",
                "bottomCenterButton": { "label": "Let's go" },
                "fxPreset": "neon"
            }
        }))
        .unwrap();

        let screen = ScreenAssembler::default()
            .assemble(&pattern, &plan("ONB_HERO_TOP", "friendly"), &hero(), Some(&intent))
            .unwrap();

        assert!(screen.is_valid());
        let button = screen.spec.component(ComponentKind::Button).unwrap();
        assert_eq!(button.content(), "Let's go");
        assert_eq!(screen.spec.animations.as_ref().unwrap().preset, EffectPreset::Neon);
        let metadata = screen.spec.metadata.as_ref().unwrap();
        assert_eq!(metadata["overrides"]["screenType"], "onboarding");
    }

    #[test]
    fn invalid_override_is_an_input_error() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let intent: ScreenIntentOverride = serde_json::from_value(serde_json::json!({
            "screenType": "",
            "layout": { "main": "hero" }
        }))
        .unwrap();
        let err = ScreenAssembler::default()
            .assemble(&pattern, &plan("ONB_HERO_TOP", "friendly"), &hero(), Some(&intent))
            .unwrap_err();
        assert!(err.to_string().contains("screenType"));
    }

    #[test]
    fn missing_hero_url_fails_before_a_spec_exists() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let hero = ResolvedHeroImage::from_url("");
        let plan = plan("ONB_HERO_TOP", "friendly");
        assert!(ScreenAssembler::default().assemble(&pattern, &plan, &hero, None).is_err());
    }

    #[test]
    fn title_component_comes_first() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let plan = plan("ONB_HERO_TOP", "friendly");
        let screen = ScreenAssembler::default().assemble(&pattern, &plan, &hero(), None).unwrap();
        assert!(matches!(screen.spec.components[0], Component::Title(_)));
    }
}
