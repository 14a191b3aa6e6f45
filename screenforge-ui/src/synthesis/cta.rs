//! Call-to-action label presets.
//!
//! Labels are chosen by a fixed cascade: explicit custom label, then the
//! first preset for the plan's tone, then the first preset for the pattern
//! family, then [`FALLBACK_CTA`].

use serde::{Deserialize, Serialize};

pub const FALLBACK_CTA: &str = "Continue";

const TONE_PRESETS: &[(&str, &[&str])] = &[
    ("friendly", &["Get started free", "Let's do this", "Join us"]),
    ("professional", &["Request a demo", "Get started", "Talk to sales"]),
    ("playful", &["Let's play", "Jump in", "Count me in"]),
    ("bold", &["Start now", "Claim yours", "Go all in"]),
    ("calm", &["Take the first step", "Begin gently", "Explore"]),
    ("urgent", &["Claim your spot", "Act now", "Reserve today"]),
    ("luxurious", &["Discover the collection", "Request access"]),
    ("elegant", &["Discover more", "Explore the collection"]),
    ("technical", &["Start building", "Read the docs", "View the API"]),
    ("inspirational", &["Start your journey", "Make it happen"]),
    ("warm", &["Come on in", "Say hello"]),
    ("minimal", &["Begin", "Next"]),
];

const FAMILY_PRESETS: &[(&str, &[&str])] = &[
    ("ONB_HERO_TOP", &["Get started", "Continue"]),
    ("LEAD_FORM_SPLIT", &["Request access", "Submit"]),
    ("CTA_CENTER", &["Start now", "Try it free"]),
    ("CONTENT_STACK", &["Learn more", "Read on"]),
];

/// Which tier of the cascade produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaSource {
    Custom,
    Tone,
    PatternFamily,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaChoice {
    pub label: String,
    pub source: CtaSource,
}

pub(crate) fn normalize_tone(tone: &str) -> String {
    tone.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

pub fn tone_presets(tone: &str) -> Option<&'static [&'static str]> {
    let tone = normalize_tone(tone);
    TONE_PRESETS.iter().find(|(name, _)| *name == tone).map(|(_, labels)| *labels)
}

pub fn family_presets(family: &str) -> Option<&'static [&'static str]> {
    FAMILY_PRESETS.iter().find(|(name, _)| *name == family).map(|(_, labels)| *labels)
}

/// Pick the call-to-action label for a button or form submit.
pub fn choose_cta(custom: Option<&str>, tone: &str, family: &str) -> CtaChoice {
    if let Some(label) = custom.filter(|l| !l.trim().is_empty()) {
        return CtaChoice { label: label.to_string(), source: CtaSource::Custom };
    }
    if let Some(label) = tone_presets(tone).and_then(|labels| labels.first()) {
        return CtaChoice { label: (*label).to_string(), source: CtaSource::Tone };
    }
    if let Some(label) = family_presets(family).and_then(|labels| labels.first()) {
        return CtaChoice { label: (*label).to_string(), source: CtaSource::PatternFamily };
    }
    CtaChoice { label: FALLBACK_CTA.to_string(), source: CtaSource::Fallback }
}
