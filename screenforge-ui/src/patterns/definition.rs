use crate::schema::ComponentKind;
use regex::Regex;
use schemars::JsonSchema;
use screenforge_core::{Result, ScreenforgeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

pub const MIN_VARIANT: u8 = 1;
pub const MAX_VARIANT: u8 = 5;

/// Slot names reserved for the hero image.
pub const HERO_SLOT_NAMES: &[&str] = &["hero_image", "heroImage", "hero"];

static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("family pattern is valid"));

pub fn is_hero_slot(name: &str) -> bool {
    HERO_SLOT_NAMES.contains(&name)
}

pub fn is_valid_family(family: &str) -> bool {
    FAMILY_RE.is_match(family)
}

/// Identity of a pattern definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub family: String,
    pub variant: u8,
}

impl PatternKey {
    pub fn new(family: impl Into<String>, variant: u8) -> Self {
        Self { family: family.into(), variant }
    }

    /// Base file name used by directory-backed sources (`FAMILY_variant`).
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.family, self.variant)
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.variant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStructure {
    #[default]
    Grid,
    Flex,
}

/// Abstract slot position in pattern units (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SlotPosition {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// Fixed order walked when a breakpoint has no override of its own.
    pub const FALLBACK_ORDER: [Breakpoint; 3] =
        [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobile" | "sm" => Some(Self::Mobile),
            "tablet" | "md" => Some(Self::Tablet),
            "desktop" | "lg" => Some(Self::Desktop),
            _ => None,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Spacing {
    pub padding: u32,
    pub gap: u32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self { padding: 24, gap: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GridTemplate {
    pub columns: String,
    pub rows: String,
}

impl Default for GridTemplate {
    fn default() -> Self {
        Self { columns: "1fr".to_string(), rows: "auto".to_string() }
    }
}

/// Per-breakpoint overrides; absent fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_columns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_rows: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HeroPosition {
    #[default]
    Top,
    Background,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeroPlacement {
    #[serde(default = "default_hero_slot")]
    pub slot: String,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub position: HeroPosition,
}

fn default_hero_slot() -> String {
    "hero_image".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportingImagePlacement {
    #[serde(default)]
    pub max_count: u8,
    #[serde(default)]
    pub fit: ImageFit,
}

/// An immutable, named layout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    pub family: String,
    pub variant: u8,
    #[serde(default)]
    pub structure: LayoutStructure,
    /// Slot name to abstract position.
    pub slots: BTreeMap<String, SlotPosition>,
    pub required_slots: Vec<String>,
    #[serde(default)]
    pub optional_slots: Vec<String>,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub grid: GridTemplate,
    #[serde(default)]
    pub breakpoints: BTreeMap<Breakpoint, LayoutOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroPlacement>,
    #[serde(default)]
    pub supporting_images: SupportingImagePlacement,
}

impl PatternDefinition {
    pub fn key(&self) -> PatternKey {
        PatternKey::new(&self.family, self.variant)
    }

    pub fn is_required(&self, slot: &str) -> bool {
        self.required_slots.iter().any(|s| s == slot)
    }

    pub fn is_optional(&self, slot: &str) -> bool {
        self.optional_slots.iter().any(|s| s == slot)
    }

    /// Whether the pattern declares a slot holding `kind`.
    pub fn declares_kind(&self, kind: ComponentKind) -> bool {
        self.required_slots
            .iter()
            .chain(&self.optional_slots)
            .any(|s| ComponentKind::from_slot_name(s) == Some(kind))
    }

    /// Name and position of the hero slot, if the pattern has one.
    pub fn hero_slot(&self) -> Option<(&str, SlotPosition)> {
        if let Some(hero) = &self.hero {
            return self.slots.get(&hero.slot).map(|pos| (hero.slot.as_str(), *pos));
        }
        self.slots.iter().find(|(name, _)| is_hero_slot(name)).map(|(n, p)| (n.as_str(), *p))
    }

    /// Check the definition for authoring bugs.
    pub fn check(&self) -> Result<()> {
        let fail =
            |reason: String| ScreenforgeError::configuration(&self.family, self.variant, reason);

        if !is_valid_family(&self.family) {
            return Err(fail(format!("family '{}' must be UPPER_SNAKE_CASE", self.family)));
        }
        if !(MIN_VARIANT..=MAX_VARIANT).contains(&self.variant) {
            return Err(fail(format!(
                "variant {} outside {MIN_VARIANT}..={MAX_VARIANT}",
                self.variant
            )));
        }

        let mut declared = BTreeSet::new();
        let mut kinds = BTreeSet::new();
        for slot in self.required_slots.iter().chain(&self.optional_slots) {
            if !declared.insert(slot.as_str()) {
                return Err(fail(format!("slot '{slot}' is declared more than once")));
            }
            if is_hero_slot(slot) {
                continue;
            }
            let Some(kind) = ComponentKind::from_slot_name(slot) else {
                return Err(fail(format!("slot '{slot}' has an unsupported content kind")));
            };
            if !kinds.insert(kind) {
                return Err(fail(format!("slot '{slot}' repeats content kind '{kind}'")));
            }
            if !self.slots.contains_key(slot) {
                return Err(fail(format!("slot '{slot}' has no layout position")));
            }
        }

        for (name, position) in &self.slots {
            if position.width == 0 || position.height == 0 {
                return Err(fail(format!("slot '{name}' has an empty area")));
            }
            let fits = position.x.checked_add(position.width).is_some()
                && position.y.checked_add(position.height).is_some();
            if !fits {
                return Err(fail(format!("slot '{name}' lies outside the addressable grid")));
            }
            if !is_hero_slot(name) && !declared.contains(name.as_str()) {
                return Err(fail(format!("slot '{name}' is neither required nor optional")));
            }
        }

        if let Some(hero) = &self.hero {
            if !self.slots.contains_key(&hero.slot) {
                return Err(fail(format!("hero slot '{}' has no layout position", hero.slot)));
            }
        }

        Ok(())
    }
}
