//! # Component synthesis
//!
//! Turns a [`GenerationPlan`] into the ordered component list of a screen,
//! following the slot contract of a [`PatternDefinition`].
//!
//! Synthesis is a pure function of `(pattern, plan, hero)`: slots are filled
//! in row-major order and no content depends on randomness or the clock, so
//! identical inputs always produce identical components.
//!
//! ```rust
//! use screenforge_ui::patterns::builtin;
//! use screenforge_ui::plan::{GenerationPlan, ResolvedHeroImage};
//! use screenforge_ui::synthesis::synthesize;
//!
//! let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
//! let plan: GenerationPlan = serde_json::from_value(serde_json::json!({
//!     "name": "Welcome",
//!     "screenId": "screen-1",
//!     "pattern": { "family": "ONB_HERO_TOP", "variant": 1 },
//!     "textPlan": { "tone": "friendly", "styleCues": [], "contentFocus": "Welcome" },
//!     "heroPlan": { "imagePrompt": "sunrise over hills", "aspectRatio": "16:9" }
//! }))
//! .unwrap();
//! let hero = ResolvedHeroImage::from_url("https://cdn.example.com/hero.png");
//!
//! let components = synthesize(&pattern, &plan, &hero).unwrap();
//! assert_eq!(components[2].content(), "Get started free");
//! ```

pub mod cta;
pub mod repair;

pub use cta::{CtaChoice, CtaSource, FALLBACK_CTA, choose_cta, family_presets, tone_presets};
pub use repair::{
    GENERIC_BUTTON, GENERIC_SUBTITLE, GENERIC_TITLE, Repair, RepairReason, generic_fallback,
};

use crate::patterns::{OrderedSlot, PatternDefinition, ordered_slots};
use crate::plan::{GenerationPlan, ResolvedHeroImage, audience_for};
use crate::schema::{
    Component, ComponentKind, FieldType, FormContent, FormField, Hints, ImageContent,
};
use screenforge_core::{Result, ScreenforgeError};
use uuid::Uuid;

/// Namespace for image ids derived from `screen_id:image_prompt`.
const IMAGE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2d4e_8a3b_4c5d_9e0f_1a2b_3c4d_5e6f);

/// Options for [`ComponentSynthesizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Run the repair pass for missing title, subtitle and button slots.
    pub repair: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self { repair: true }
    }
}

impl SynthesisOptions {
    /// Every required slot must be filled from the plan itself.
    pub fn strict() -> Self {
        Self { repair: false }
    }
}

/// Components plus a report of what the repair pass injected.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub components: Vec<Component>,
    pub repairs: Vec<Repair>,
}

impl Synthesis {
    pub fn was_repaired(&self) -> bool {
        !self.repairs.is_empty()
    }
}

/// Synthesize with default options (repair enabled).
pub fn synthesize(
    pattern: &PatternDefinition,
    plan: &GenerationPlan,
    hero: &ResolvedHeroImage,
) -> Result<Vec<Component>> {
    ComponentSynthesizer::default().synthesize(pattern, plan, hero).map(|s| s.components)
}

/// Deterministic id of the hero image.
///
/// The id supplied by the image pipeline wins; otherwise one is derived from
/// the plan's screen id and image prompt.
pub fn hero_image_id(plan: &GenerationPlan, hero: &ResolvedHeroImage) -> String {
    if let Some(id) = hero.image_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    let name = format!("{}:{}", plan.screen_id, plan.hero_plan.image_prompt);
    Uuid::new_v5(&IMAGE_ID_NAMESPACE, name.as_bytes()).to_string()
}

/// Check that the hero image carries a well-formed URL.
pub fn require_hero_url(hero: &ResolvedHeroImage) -> Result<url::Url> {
    let raw = hero.image.url.trim();
    if raw.is_empty() {
        return Err(ScreenforgeError::InvalidInput("hero image url is missing".to_string()));
    }
    url::Url::parse(raw).map_err(|e| {
        ScreenforgeError::InvalidInput(format!("hero image url '{raw}' is malformed: {e}"))
    })
}

#[derive(Debug, Clone, Default)]
pub struct ComponentSynthesizer {
    options: SynthesisOptions,
}

impl ComponentSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SynthesisOptions {
        self.options
    }

    pub fn synthesize(
        &self,
        pattern: &PatternDefinition,
        plan: &GenerationPlan,
        hero: &ResolvedHeroImage,
    ) -> Result<Synthesis> {
        let hero_url = require_hero_url(hero)?;
        let slots = ordered_slots(pattern)?;
        let context = SlotContext { pattern, plan, hero, hero_url: hero_url.as_str() };

        let mut filled: Vec<(OrderedSlot<'_>, Option<Component>)> = slots
            .into_iter()
            .map(|slot| {
                let content = context.derive(slot.kind);
                (slot, content)
            })
            .collect();

        if !self.options.repair {
            if let Some((slot, _)) = filled.iter().find(|(s, c)| s.required && c.is_none()) {
                return Err(ScreenforgeError::synthesis(
                    slot.name,
                    "the plan has no content for this required slot",
                ));
            }
        }

        let mut repairs = Vec::new();
        let mut components: Vec<Component> = Vec::with_capacity(filled.len());

        if filled.iter().all(|(_, c)| c.is_none()) {
            let fallback = Component::title(GENERIC_TITLE);
            match filled.iter_mut().find(|(s, _)| s.kind == ComponentKind::Title) {
                Some((slot, content)) => {
                    repairs.push(repair_for(slot, RepairReason::EmptyComponentList));
                    *content = Some(fallback);
                }
                None => {
                    repairs.push(Repair {
                        slot: ComponentKind::Title.as_str().to_string(),
                        kind: ComponentKind::Title,
                        reason: RepairReason::EmptyComponentList,
                    });
                    components.push(fallback);
                }
            }
        }

        if self.options.repair {
            for (slot, content) in filled.iter_mut().filter(|(s, c)| s.required && c.is_none()) {
                if let Some(fallback) = generic_fallback(slot.kind) {
                    repairs.push(repair_for(slot, RepairReason::MissingRequiredSlot));
                    *content = Some(fallback);
                }
            }
        }

        for (slot, content) in filled {
            match content {
                Some(component) => components.push(component),
                None if slot.required => {
                    return Err(ScreenforgeError::synthesis(
                        slot.name,
                        format!("no content and no generic {} fallback exists", slot.kind),
                    ));
                }
                None => {
                    tracing::debug!(slot = slot.name, "optional slot left empty");
                }
            }
        }

        if !repairs.is_empty() {
            tracing::warn!(
                pattern.family = %pattern.family,
                pattern.variant = pattern.variant,
                screen.id = %plan.screen_id,
                repaired = ?repairs.iter().map(|r| r.slot.as_str()).collect::<Vec<_>>(),
                "repair pass injected generic content"
            );
        }
        tracing::debug!(
            pattern.family = %pattern.family,
            pattern.variant = pattern.variant,
            components = components.len(),
            "components synthesized"
        );

        Ok(Synthesis { components, repairs })
    }
}

fn repair_for(slot: &OrderedSlot<'_>, reason: RepairReason) -> Repair {
    Repair { slot: slot.name.to_string(), kind: slot.kind, reason }
}

struct SlotContext<'a> {
    pattern: &'a PatternDefinition,
    plan: &'a GenerationPlan,
    hero: &'a ResolvedHeroImage,
    hero_url: &'a str,
}

impl SlotContext<'_> {
    fn derive(&self, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Title => self.focus().map(Component::title),
            ComponentKind::Subtitle => self.subtitle().map(Component::subtitle),
            ComponentKind::Text => self.body().map(Component::text),
            ComponentKind::Button => Some(Component::button(self.cta().label)),
            ComponentKind::Form => Some(self.form()),
            ComponentKind::Image => Some(self.image()),
        }
    }

    fn custom(&self, pick: impl Fn(&crate::plan::CustomFields) -> Option<&String>) -> Option<&str> {
        self.plan
            .text_plan
            .custom_fields
            .as_ref()
            .and_then(pick)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Content focus, falling back to the plan name.
    fn focus(&self) -> Option<String> {
        non_blank(self.plan.text_plan.content_focus.as_deref())
            .or_else(|| non_blank(Some(&self.plan.name)))
            .map(str::to_string)
    }

    fn subtitle(&self) -> Option<String> {
        if let Some(subtitle) = self.custom(|c| c.subtitle.as_ref()) {
            return Some(subtitle.to_string());
        }
        let tone = humanize(&self.plan.text_plan.tone);
        let cues: Vec<&str> = self
            .plan
            .text_plan
            .style_cues
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        match (tone.is_empty(), cues.is_empty()) {
            (true, true) => None,
            (false, true) => Some(format!("{tone} by design")),
            (true, false) => Some(format!("Designed to feel {}", join_list(&cues))),
            (false, false) => Some(format!("{tone} by design, {}", join_list(&cues))),
        }
    }

    fn body(&self) -> Option<String> {
        if let Some(body) = self.custom(|c| c.body.as_ref()) {
            return Some(body.to_string());
        }
        let focus = self.focus()?;
        let focus = focus.trim_end_matches(['.', '!', '?']);
        let audience = audience_for(self.plan.flow.as_ref());
        let voice = humanize(&self.plan.text_plan.tone).to_lowercase();
        if voice.is_empty() {
            Some(format!("{focus}. Crafted for {audience}."))
        } else {
            Some(format!("{focus}. Crafted in a {voice} voice for {audience}."))
        }
    }

    fn cta(&self) -> CtaChoice {
        choose_cta(
            self.custom(|c| c.cta_label.as_ref()),
            &self.plan.text_plan.tone,
            &self.pattern.family,
        )
    }

    fn form(&self) -> Component {
        let title = self
            .custom(|c| c.form_title.as_ref())
            .map(str::to_string)
            .or_else(|| self.focus())
            .unwrap_or_else(|| "Tell us about yourself".to_string());
        let fields = self
            .plan
            .text_plan
            .custom_fields
            .as_ref()
            .and_then(|c| c.form_fields.clone())
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(default_form_fields);

        Component::Form(FormContent {
            id: None,
            content: title,
            fields,
            submit_label: self.cta().label,
            hints: Hints::new(),
        })
    }

    fn image(&self) -> Component {
        let alt = non_blank(self.hero.image.prompt.as_deref())
            .or_else(|| non_blank(Some(&self.plan.hero_plan.image_prompt)))
            .map(str::to_string);
        Component::Image(ImageContent {
            id: hero_image_id(self.plan, self.hero),
            content: self.hero_url.to_string(),
            alt,
            hints: Hints::new(),
        })
    }
}

/// Name, work email, company and goal.
pub fn default_form_fields() -> Vec<FormField> {
    vec![
        FormField::new("name", "Full name", FieldType::Text, true),
        FormField::new("work_email", "Work email", FieldType::Email, true),
        FormField::new("company", "Company", FieldType::Text, false),
        FormField::new("goal", "What do you want to achieve?", FieldType::Textarea, false),
    ]
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `"highly_technical"` -> `"Highly technical"`.
fn humanize(tone: &str) -> String {
    let words = tone.trim().replace(['_', '-'], " ").to_lowercase();
    let words = words.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `["a", "b", "c"]` -> `"a, b and c"`.
fn join_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::builtin;
    use crate::plan::{CustomFields, FlowContext, HeroPlan, PatternRef, TextPlan};

    fn plan(family: &str, variant: u8) -> GenerationPlan {
        GenerationPlan {
            name: "Welcome".to_string(),
            screen_id: "screen-1".to_string(),
            template_id: None,
            pattern: PatternRef { family: family.to_string(), variant },
            text_plan: TextPlan {
                tone: "friendly".to_string(),
                style_cues: vec![],
                color_mood: None,
                content_focus: Some("Welcome".to_string()),
                custom_fields: None,
            },
            hero_plan: HeroPlan {
                image_prompt: "sunrise".to_string(),
                aspect_ratio: "16:9".to_string(),
                color_mood: None,
            },
            flow: None,
        }
    }

    fn hero() -> ResolvedHeroImage {
        ResolvedHeroImage::from_url("https://cdn.example.com/hero.png")
    }

    #[test]
    fn humanize_and_join() {
        assert_eq!(humanize("highly_technical"), "Highly technical");
        assert_eq!(humanize("  "), "");
        assert_eq!(join_list(&["a", "b", "c"]), "a, b and c");
        assert_eq!(join_list(&["a"]), "a");
    }

    #[test]
    fn minimal_plan_fills_onboarding_slots() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let components = synthesize(&pattern, &plan("ONB_HERO_TOP", 1), &hero()).unwrap();

        let kinds: Vec<_> = components.iter().map(Component::kind).collect();
        assert_eq!(kinds, [ComponentKind::Title, ComponentKind::Subtitle, ComponentKind::Button]);
        assert_eq!(components[0].content(), "Welcome");
        assert!(components[1].content().contains("Friendly"));
        assert_eq!(components[2].content(), "Get started free");
    }

    #[test]
    fn subtitle_joins_style_cues() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut plan = plan("ONB_HERO_TOP", 1);
        plan.text_plan.style_cues = vec!["minimal".to_string(), "bold".to_string()];
        let components = synthesize(&pattern, &plan, &hero()).unwrap();
        assert_eq!(components[1].content(), "Friendly by design, minimal and bold");
    }

    #[test]
    fn missing_hero_url_fails() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let err = synthesize(&pattern, &plan("ONB_HERO_TOP", 1), &ResolvedHeroImage::from_url(""))
            .unwrap_err();
        assert!(matches!(err, ScreenforgeError::InvalidInput(_)));
    }

    #[test]
    fn malformed_hero_url_fails() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let hero = ResolvedHeroImage::from_url("not a url");
        assert!(synthesize(&pattern, &plan("ONB_HERO_TOP", 1), &hero).is_err());
    }

    #[test]
    fn body_mentions_audience_from_flow_domain() {
        let pattern = builtin::pattern("CONTENT_STACK", 1).unwrap();
        let mut plan = plan("CONTENT_STACK", 1);
        plan.flow = Some(FlowContext { domain: Some("retail".to_string()), audience: None });
        let components = synthesize(&pattern, &plan, &hero()).unwrap();
        let body = components.iter().find(|c| c.kind() == ComponentKind::Text).unwrap();
        assert_eq!(body.content(), "Welcome. Crafted in a friendly voice for shoppers.");
    }

    #[test]
    fn form_uses_defaults_and_cta_cascade() {
        let pattern = builtin::pattern("LEAD_FORM_SPLIT", 1).unwrap();
        let mut plan = plan("LEAD_FORM_SPLIT", 1);
        plan.text_plan.tone = "unheard-of".to_string();
        let components = synthesize(&pattern, &plan, &hero()).unwrap();
        let Component::Form(form) =
            components.iter().find(|c| c.kind() == ComponentKind::Form).unwrap()
        else {
            panic!("expected a form");
        };
        assert_eq!(form.submit_label, "Request access");
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "work_email", "company", "goal"]);
    }

    #[test]
    fn custom_form_title_wins() {
        let pattern = builtin::pattern("LEAD_FORM_SPLIT", 1).unwrap();
        let mut plan = plan("LEAD_FORM_SPLIT", 1);
        plan.text_plan.custom_fields = Some(CustomFields {
            form_title: Some("Join the beta".to_string()),
            ..Default::default()
        });
        let components = synthesize(&pattern, &plan, &hero()).unwrap();
        let form = components.iter().find(|c| c.kind() == ComponentKind::Form).unwrap();
        assert_eq!(form.content(), "Join the beta");
    }

    #[test]
    fn image_id_is_derived_deterministically() {
        let plan = plan("CONTENT_STACK", 1);
        let first = hero_image_id(&plan, &hero());
        assert_eq!(first, hero_image_id(&plan, &hero()));

        let mut supplied = hero();
        supplied.image_id = Some("img-42".to_string());
        assert_eq!(hero_image_id(&plan, &supplied), "img-42");
    }

    #[test]
    fn repair_fills_missing_title_and_subtitle() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut plan = plan("ONB_HERO_TOP", 1);
        plan.name = " ".to_string();
        plan.text_plan.content_focus = None;
        plan.text_plan.tone = String::new();

        let synthesis =
            ComponentSynthesizer::default().synthesize(&pattern, &plan, &hero()).unwrap();
        assert!(synthesis.was_repaired());
        assert_eq!(synthesis.components[0].content(), GENERIC_TITLE);
        assert_eq!(synthesis.components[1].content(), GENERIC_SUBTITLE);
        let slots: Vec<_> = synthesis.repairs.iter().map(|r| r.slot.as_str()).collect();
        assert_eq!(slots, ["title", "subtitle"]);
    }

    #[test]
    fn strict_mode_reports_missing_slot() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut plan = plan("ONB_HERO_TOP", 1);
        plan.text_plan.tone = String::new();

        let err = ComponentSynthesizer::new(SynthesisOptions::strict())
            .synthesize(&pattern, &plan, &hero())
            .unwrap_err();
        assert!(matches!(err, ScreenforgeError::Synthesis { ref slot, .. } if slot == "subtitle"));
    }
}
