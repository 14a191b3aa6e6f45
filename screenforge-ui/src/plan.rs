//! Inbound documents produced by the upstream planner and image pipeline.
//!
//! The planner's output is trusted to conform to these shapes; anything that
//! the synthesizer needs and may legitimately be absent is an `Option`.

use crate::patterns::PatternKey;
use crate::schema::{FormField, PaletteInput};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upstream plan for one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPlan {
    pub name: String,
    pub screen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub pattern: PatternRef,
    pub text_plan: TextPlan,
    pub hero_plan: HeroPlan,
    /// Metadata of the flow the screen belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PatternRef {
    pub family: String,
    pub variant: u8,
}

impl PatternRef {
    pub fn key(&self) -> PatternKey {
        PatternKey::new(&self.family, self.variant)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextPlan {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub style_cues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFields>,
}

/// Explicit values that win over anything derived from tone or pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<Vec<FormField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Fields this version does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroPlan {
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub aspect_ratio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mood: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlowContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// Hero image as delivered by the image pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHeroImage {
    pub image: HeroImageAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageAsset {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ResolvedHeroImage {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image: HeroImageAsset { url: url.into(), ..Default::default() },
            palette: None,
            vibe: None,
            image_id: None,
        }
    }
}

/// Audience phrase for body copy, derived from flow metadata.
pub(crate) fn audience_for(flow: Option<&FlowContext>) -> String {
    let Some(flow) = flow else {
        return "your audience".to_string();
    };
    if let Some(audience) = flow.audience.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        return audience.to_string();
    }
    let domain = flow.domain.as_deref().unwrap_or_default().trim().to_ascii_lowercase();
    match domain.as_str() {
        "saas" | "b2b" | "productivity" => "busy teams",
        "ecommerce" | "retail" | "shopping" => "shoppers",
        "health" | "healthcare" | "wellness" => "people taking charge of their health",
        "education" | "edtech" | "learning" => "curious learners",
        "finance" | "fintech" | "banking" => "people managing their money",
        "travel" | "hospitality" => "travelers",
        "gaming" | "games" => "players",
        _ => "your audience",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_plan() {
        let plan: GenerationPlan = serde_json::from_value(serde_json::json!({
            "name": "Welcome",
            "screenId": "screen-1",
            "pattern": { "family": "ONB_HERO_TOP", "variant": 1 },
            "textPlan": {
                "tone": "friendly",
                "styleCues": ["minimal"],
                "contentFocus": "Welcome",
                "customFields": { "ctaLabel": "Join", "campaign": "spring" }
            },
            "heroPlan": { "imagePrompt": "sunrise", "aspectRatio": "16:9" }
        }))
        .unwrap();

        assert_eq!(plan.pattern.key(), PatternKey::new("ONB_HERO_TOP", 1));
        let custom = plan.text_plan.custom_fields.unwrap();
        assert_eq!(custom.cta_label.as_deref(), Some("Join"));
        assert_eq!(custom.extra["campaign"], "spring");
    }

    #[test]
    fn audience_prefers_explicit_value() {
        let flow = FlowContext {
            domain: Some("fintech".to_string()),
            audience: Some("founders".to_string()),
        };
        assert_eq!(audience_for(Some(&flow)), "founders");
    }

    #[test]
    fn audience_derived_from_domain() {
        let flow = FlowContext { domain: Some("Retail".to_string()), audience: None };
        assert_eq!(audience_for(Some(&flow)), "shoppers");
        assert_eq!(audience_for(None), "your audience");
    }
}
