//! Effect presets.
//!
//! An [`EffectDescriptor`] bundles per-slot entrance animations, global visual
//! effects and the screen transition. Descriptors are expanded from a small
//! static table of [`EffectPreset`]s; when no usable preset name is given, one
//! is inferred from free text such as the screen name.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EffectPreset {
    /// Explicitly no preset; resolution falls through to inference.
    None,
    #[default]
    Subtle,
    Parallax,
    Glassmorphism,
    Neon,
    Cinematic,
    Bouncy,
    Minimal,
    Moody,
}

impl EffectPreset {
    pub const ALL: [EffectPreset; 9] = [
        EffectPreset::None,
        EffectPreset::Subtle,
        EffectPreset::Parallax,
        EffectPreset::Glassmorphism,
        EffectPreset::Neon,
        EffectPreset::Cinematic,
        EffectPreset::Bouncy,
        EffectPreset::Minimal,
        EffectPreset::Moody,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Subtle => "subtle",
            Self::Parallax => "parallax",
            Self::Glassmorphism => "glassmorphism",
            Self::Neon => "neon",
            Self::Cinematic => "cinematic",
            Self::Bouncy => "bouncy",
            Self::Minimal => "minimal",
            Self::Moody => "moody",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "none" | "off" => Some(Self::None),
            "subtle" | "fade" | "default" => Some(Self::Subtle),
            "parallax" => Some(Self::Parallax),
            "glassmorphism" | "glass" | "frosted_glass" => Some(Self::Glassmorphism),
            "neon" | "cyberpunk" => Some(Self::Neon),
            "cinematic" => Some(Self::Cinematic),
            "bouncy" | "bounce" => Some(Self::Bouncy),
            "minimal" => Some(Self::Minimal),
            "moody" | "dark" => Some(Self::Moody),
            _ => None,
        }
    }
}

impl fmt::Display for EffectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    None,
    Fade,
    FadeUp,
    SlideUp,
    Scale,
    Parallax,
    Bounce,
    Glow,
}

impl AnimationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fade => "fade",
            Self::FadeUp => "fade_up",
            Self::SlideUp => "slide_up",
            Self::Scale => "scale",
            Self::Parallax => "parallax",
            Self::Bounce => "bounce",
            Self::Glow => "glow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotAnimation {
    pub kind: AnimationKind,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: String,
}

/// Screen-wide visual effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEffects {
    /// Backdrop blur radius in pixels.
    pub blur: u32,
    /// Glow intensity, 0.0 to 1.0.
    pub glow: f32,
    /// Elevation level of cards and buttons, 0 to 3.
    pub shadow: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectDescriptor {
    pub preset: EffectPreset,
    /// Entrance animation per slot name.
    pub slots: BTreeMap<String, SlotAnimation>,
    pub effects: GlobalEffects,
    pub transition: Transition,
}

/// Substring rules tried in order against lowercased free text.
const KEYWORD_RULES: &[(&str, EffectPreset)] = &[
    ("parallax", EffectPreset::Parallax),
    ("glass", EffectPreset::Glassmorphism),
    ("frosted", EffectPreset::Glassmorphism),
    ("neon", EffectPreset::Neon),
    ("cyber", EffectPreset::Neon),
    ("arcade", EffectPreset::Neon),
    ("cinematic", EffectPreset::Cinematic),
    ("film", EffectPreset::Cinematic),
    ("trailer", EffectPreset::Cinematic),
    ("bounce", EffectPreset::Bouncy),
    ("playful", EffectPreset::Bouncy),
    ("kids", EffectPreset::Bouncy),
    ("minimal", EffectPreset::Minimal),
    ("clean", EffectPreset::Minimal),
    ("moody", EffectPreset::Moody),
    ("night", EffectPreset::Moody),
    ("noir", EffectPreset::Moody),
];

/// Infer a preset from free text, defaulting to [`EffectPreset::Subtle`].
pub fn infer_preset(text: &str) -> EffectPreset {
    let text = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, preset)| *preset)
        .unwrap_or_default()
}

/// Resolve the effects of a screen. Never fails.
///
/// A recognised preset name other than `none` is expanded directly. Anything
/// else (absent, `none`, unknown) falls through to keyword inference on
/// `free_text`.
pub fn resolve_effects(preset: Option<&str>, free_text: &str) -> EffectDescriptor {
    let explicit = preset.and_then(EffectPreset::parse).filter(|p| *p != EffectPreset::None);
    if preset.is_some() && explicit.is_none() {
        tracing::debug!(preset = ?preset, "effect preset not usable, inferring from text");
    }
    explicit.unwrap_or_else(|| infer_preset(free_text)).descriptor()
}

fn anim(kind: AnimationKind, duration_ms: u32, delay_ms: u32, easing: &str) -> SlotAnimation {
    SlotAnimation { kind, duration_ms, delay_ms, easing: easing.to_string() }
}

/// Slots animated by every preset, with their stagger index.
const STAGGERED_SLOTS: [&str; 7] =
    ["hero_image", "title", "subtitle", "text", "image", "form", "button"];

impl EffectPreset {
    /// Expand the preset into a full descriptor.
    pub fn descriptor(self) -> EffectDescriptor {
        let (kind, duration, stagger, easing) = match self {
            Self::None => (AnimationKind::None, 0, 0, "linear"),
            Self::Subtle => (AnimationKind::Fade, 400, 60, "ease-out"),
            Self::Parallax => (AnimationKind::FadeUp, 600, 90, "cubic-bezier(0.22, 1, 0.36, 1)"),
            Self::Glassmorphism => (AnimationKind::Scale, 450, 70, "ease-out"),
            Self::Neon => (AnimationKind::Glow, 500, 80, "ease-in-out"),
            Self::Cinematic => (AnimationKind::SlideUp, 900, 150, "cubic-bezier(0.16, 1, 0.3, 1)"),
            Self::Bouncy => (AnimationKind::Bounce, 550, 80, "cubic-bezier(0.34, 1.56, 0.64, 1)"),
            Self::Minimal => (AnimationKind::Fade, 250, 0, "linear"),
            Self::Moody => (AnimationKind::Fade, 800, 120, "ease-in"),
        };

        let mut slots: BTreeMap<String, SlotAnimation> = STAGGERED_SLOTS
            .iter()
            .zip(0u32..)
            .map(|(slot, index)| (slot.to_string(), anim(kind, duration, index * stagger, easing)))
            .collect();
        if self == Self::Parallax {
            slots.insert("hero_image".to_string(), anim(AnimationKind::Parallax, 0, 0, "linear"));
        }

        let effects = match self {
            Self::None | Self::Minimal => GlobalEffects::default(),
            Self::Subtle => GlobalEffects { shadow: 1, ..Default::default() },
            Self::Parallax => GlobalEffects { shadow: 2, ..Default::default() },
            Self::Glassmorphism => GlobalEffects {
                blur: 16,
                shadow: 2,
                backdrop: Some("rgba(255, 255, 255, 0.18)".to_string()),
                ..Default::default()
            },
            Self::Neon => GlobalEffects {
                glow: 0.8,
                shadow: 0,
                backdrop: Some("rgba(10, 10, 25, 0.85)".to_string()),
                ..Default::default()
            },
            Self::Cinematic => GlobalEffects {
                shadow: 3,
                backdrop: Some(
                    "linear-gradient(180deg, transparent, rgba(0, 0, 0, 0.6))".to_string(),
                ),
                ..Default::default()
            },
            Self::Bouncy => GlobalEffects { shadow: 2, glow: 0.1, ..Default::default() },
            Self::Moody => GlobalEffects {
                blur: 4,
                shadow: 3,
                backdrop: Some("rgba(0, 0, 0, 0.45)".to_string()),
                ..Default::default()
            },
        };

        let transition = match self {
            Self::None => Transition { duration_ms: 0, easing: "linear".to_string() },
            Self::Cinematic | Self::Moody => {
                Transition { duration_ms: 700, easing: "ease-in-out".to_string() }
            }
            Self::Minimal => Transition { duration_ms: 200, easing: "linear".to_string() },
            _ => Transition { duration_ms: 350, easing: "ease-out".to_string() },
        };

        EffectDescriptor { preset: self, slots, effects, transition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_preset_is_expanded() {
        let descriptor = resolve_effects(Some("Glass"), "Checkout");
        assert_eq!(descriptor.preset, EffectPreset::Glassmorphism);
        assert_eq!(descriptor.effects.blur, 16);
    }

    #[test]
    fn none_and_unknown_fall_through_to_inference() {
        assert_eq!(resolve_effects(Some("none"), "Neon arcade").preset, EffectPreset::Neon);
        let frosted = resolve_effects(Some("sparkles"), "Frosted login");
        assert_eq!(frosted.preset, EffectPreset::Glassmorphism);
    }

    #[test]
    fn rules_apply_in_order() {
        // "parallax" precedes "night" in the rule list.
        assert_eq!(infer_preset("Night parallax gallery"), EffectPreset::Parallax);
    }

    #[test]
    fn no_match_yields_subtle() {
        let descriptor = resolve_effects(None, "Account settings");
        assert_eq!(descriptor.preset, EffectPreset::Subtle);
        assert_eq!(descriptor.slots["title"].kind, AnimationKind::Fade);
    }

    #[test]
    fn slot_animations_are_staggered() {
        let descriptor = EffectPreset::Cinematic.descriptor();
        assert_eq!(descriptor.slots["hero_image"].delay_ms, 0);
        assert_eq!(descriptor.slots["title"].delay_ms, 150);
        assert!(descriptor.slots["button"].delay_ms > descriptor.slots["subtitle"].delay_ms);
    }

    #[test]
    fn parallax_moves_the_hero() {
        let descriptor = EffectPreset::Parallax.descriptor();
        assert_eq!(descriptor.slots["hero_image"].kind, AnimationKind::Parallax);
    }

    #[test]
    fn every_preset_parses_from_its_name() {
        for preset in EffectPreset::ALL {
            assert_eq!(EffectPreset::parse(preset.as_str()), Some(preset));
        }
    }
}
