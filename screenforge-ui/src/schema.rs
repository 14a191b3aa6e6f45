//! The screen specification DSL.
//!
//! A [`ScreenSpecification`] is the only artifact that is persisted and the only
//! artifact the render surface accepts. It is rebuilt from scratch on every
//! generation request and validated by [`crate::validation`] before use.

use crate::effects::EffectDescriptor;
use crate::patterns::PatternKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MIME_TYPE_SCREEN: &str = "application/vnd.screenforge.screen+json";

pub const DEFAULT_PRIMARY: &str = "#111827";
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Open bag of rendering hints (style, variant, alignment, ...).
pub type Hints = BTreeMap<String, serde_json::Value>;

/// Content kinds a slot can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Title,
    Subtitle,
    Text,
    Button,
    Form,
    Image,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Title,
        ComponentKind::Subtitle,
        ComponentKind::Text,
        ComponentKind::Button,
        ComponentKind::Form,
        ComponentKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Text => "text",
            Self::Button => "button",
            Self::Form => "form",
            Self::Image => "image",
        }
    }

    /// Map a pattern slot name to the content kind it holds.
    pub fn from_slot_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "subtitle" => Some(Self::Subtitle),
            "text" | "body" => Some(Self::Text),
            "button" | "cta" => Some(Self::Button),
            "form" => Some(Self::Form),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content component of a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Title(TextContent),
    Subtitle(TextContent),
    Text(TextContent),
    Button(ButtonContent),
    Form(FormContent),
    Image(ImageContent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: Hints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ButtonContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Button label
    pub content: String,
    #[serde(default)]
    pub variant: ButtonVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ButtonShape>,
    /// Optional icon name to display with the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: Hints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
    Outline,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ButtonShape {
    Rounded,
    Pill,
    Square,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Form title
    pub content: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: Hints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormField {
    /// Field name (used as key in submission)
    pub name: String,
    /// Label displayed to the user
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Options for select fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormField {
    pub fn new(name: &str, label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            placeholder: None,
            required,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Url,
    Textarea,
    Select,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Url => "url",
            Self::Textarea => "textarea",
            Self::Select => "select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Stable image identifier
    pub id: String,
    /// Image URL
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: Hints,
}

impl Component {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(TextContent::new(content))
    }

    pub fn subtitle(content: impl Into<String>) -> Self {
        Self::Subtitle(TextContent::new(content))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextContent::new(content))
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::Button(ButtonContent {
            id: None,
            content: label.into(),
            variant: ButtonVariant::Primary,
            shape: None,
            icon: None,
            hints: Hints::new(),
        })
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Title(_) => ComponentKind::Title,
            Self::Subtitle(_) => ComponentKind::Subtitle,
            Self::Text(_) => ComponentKind::Text,
            Self::Button(_) => ComponentKind::Button,
            Self::Form(_) => ComponentKind::Form,
            Self::Image(_) => ComponentKind::Image,
        }
    }

    /// The primary text of the component (label, title or URL).
    pub fn content(&self) -> &str {
        match self {
            Self::Title(c) | Self::Subtitle(c) | Self::Text(c) => &c.content,
            Self::Button(b) => &b.content,
            Self::Form(f) => &f.content,
            Self::Image(i) => &i.content,
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        match self {
            Self::Title(c) | Self::Subtitle(c) | Self::Text(c) => c.content = content,
            Self::Button(b) => b.content = content,
            Self::Form(f) => f.content = content,
            Self::Image(i) => i.content = content,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Title(c) | Self::Subtitle(c) | Self::Text(c) => c.id.as_deref(),
            Self::Button(b) => b.id.as_deref(),
            Self::Form(f) => f.id.as_deref(),
            Self::Image(i) => Some(&i.id),
        }
    }

    pub fn hints(&self) -> &Hints {
        match self {
            Self::Title(c) | Self::Subtitle(c) | Self::Text(c) => &c.hints,
            Self::Button(b) => &b.hints,
            Self::Form(f) => &f.hints,
            Self::Image(i) => &i.hints,
        }
    }
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self { id: None, content: content.into(), hints: Hints::new() }
    }
}

/// Closed set of visual moods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Modern,
    Playful,
    Minimal,
    Bold,
    Elegant,
    Calm,
    Energetic,
    Professional,
    Warm,
    Dark,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Playful => "playful",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
            Self::Elegant => "elegant",
            Self::Calm => "calm",
            Self::Energetic => "energetic",
            Self::Professional => "professional",
            Self::Warm => "warm",
            Self::Dark => "dark",
        }
    }

    /// Parse a free-form mood label, accepting common synonyms.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "modern" | "sleek" | "contemporary" => Some(Self::Modern),
            "playful" | "fun" | "whimsical" | "friendly" => Some(Self::Playful),
            "minimal" | "minimalist" | "clean" | "simple" => Some(Self::Minimal),
            "bold" | "striking" | "vivid" => Some(Self::Bold),
            "elegant" | "luxurious" | "sophisticated" | "refined" => Some(Self::Elegant),
            "calm" | "serene" | "peaceful" | "soft" => Some(Self::Calm),
            "energetic" | "vibrant" | "dynamic" => Some(Self::Energetic),
            "professional" | "corporate" | "trustworthy" => Some(Self::Professional),
            "warm" | "cozy" | "inviting" => Some(Self::Warm),
            "dark" | "moody" | "mysterious" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Like [`Mood::parse`] but falls back to [`Mood::Modern`].
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved four-colour palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

/// Palette as extracted by the image pipeline, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaletteInput {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Palette {
    /// Fill the gaps of an extracted palette.
    ///
    /// Secondary and accent default to the primary colour, background
    /// defaults to white. Without any input the default primary is used.
    pub fn resolve(input: Option<&PaletteInput>) -> Self {
        let Some(input) = input.filter(|p| !p.primary.trim().is_empty()) else {
            return Self::from_primary(DEFAULT_PRIMARY);
        };
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let primary = input.primary.trim().to_string();

        Self {
            secondary: pick(&input.secondary, &primary),
            accent: pick(&input.accent, &primary),
            background: pick(&input.background, DEFAULT_BACKGROUND),
            primary,
        }
    }

    pub fn from_primary(primary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: primary.to_string(),
            accent: primary.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    pub id: String,
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupportingImage {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Where the primary action of the screen leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Navigation {
    /// Push another screen of the same flow.
    Push {
        #[serde(rename = "targetScreenId")]
        target_screen_id: String,
    },
    /// Replace the current screen.
    Replace {
        #[serde(rename = "targetScreenId")]
        target_screen_id: String,
    },
    /// Leave the flow for an external URL.
    External { url: String },
    Back,
}

/// The declarative description of one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSpecification {
    pub hero_image: HeroImage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supporting_images: Vec<SupportingImage>,
    pub palette: Palette,
    pub mood: Mood,
    pub pattern_family: String,
    pub pattern_variant: u8,
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<EffectDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl ScreenSpecification {
    pub fn pattern_key(&self) -> PatternKey {
        PatternKey::new(&self.pattern_family, self.pattern_variant)
    }

    /// First component of `kind`, if any.
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.kind() == kind)
    }
}

/// JSON Schema of [`ScreenSpecification`].
pub fn screen_json_schema() -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(ScreenSpecification))
}
