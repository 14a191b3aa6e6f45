use crate::schema::{ComponentKind, Mood};
use screenforge_core::{Result, ScreenforgeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Capability tier of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTier {
    #[default]
    Default,
    Enhanced,
}

/// Visual complexity of a renderer or of the screen asking for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    #[default]
    Moderate,
    Rich,
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Rich => "rich",
        })
    }
}

/// Sparse affinity strengths, each in `0.0..=1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affinity {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub screen_types: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub complexity: BTreeMap<ComplexityTier, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub moods: BTreeMap<Mood, f64>,
}

/// A registered renderer that may replace the default one for a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryComponentDescriptor {
    pub id: String,
    pub kind: ComponentKind,
    /// Slot names matched exactly.
    #[serde(default)]
    pub allowed_slots: Vec<String>,
    /// Slot name prefixes matched as roles, e.g. `cta` for `cta_secondary`.
    #[serde(default)]
    pub slot_roles: Vec<String>,
    /// Screen types the renderer supports. Empty means every type.
    #[serde(default)]
    pub screen_types: Vec<String>,
    #[serde(default)]
    pub complexity: ComplexityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tier: CapabilityTier,
    #[serde(default)]
    pub affinity: Affinity,
}

impl LibraryComponentDescriptor {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            allowed_slots: vec![kind.as_str().to_string()],
            slot_roles: Vec::new(),
            screen_types: Vec::new(),
            complexity: ComplexityTier::default(),
            category: None,
            tier: CapabilityTier::Enhanced,
            affinity: Affinity::default(),
        }
    }

    pub fn with_slots(mut self, slots: &[&str]) -> Self {
        self.allowed_slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.slot_roles = roles.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_screen_types(mut self, types: &[&str]) -> Self {
        self.screen_types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tier(mut self, tier: CapabilityTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_mood(mut self, mood: Mood, strength: f64) -> Self {
        self.affinity.moods.insert(mood, strength);
        self
    }

    pub fn with_slot_affinity(mut self, slot: &str, strength: f64) -> Self {
        self.affinity.slots.insert(slot.to_string(), strength);
        self
    }

    pub fn with_screen_type_affinity(mut self, screen_type: &str, strength: f64) -> Self {
        self.affinity.screen_types.insert(screen_type.to_string(), strength);
        self
    }

    pub fn with_complexity_affinity(mut self, complexity: ComplexityTier, strength: f64) -> Self {
        self.affinity.complexity.insert(complexity, strength);
        self
    }
}

/// Append-only catalog of library renderers. Registration order is kept and
/// breaks score ties.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    entries: Vec<Arc<LibraryComponentDescriptor>>,
}

impl LibraryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: LibraryComponentDescriptor) -> Result<()> {
        if descriptor.id.trim().is_empty() {
            return Err(ScreenforgeError::InvalidInput("library component id is empty".to_string()));
        }
        if self.get(&descriptor.id).is_some() {
            return Err(ScreenforgeError::InvalidInput(format!(
                "library component '{}' is already registered",
                descriptor.id
            )));
        }
        tracing::debug!(
            component = %descriptor.id,
            kind = %descriptor.kind,
            "library component registered"
        );
        self.entries.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<LibraryComponentDescriptor>> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[Arc<LibraryComponentDescriptor>] {
        &self.entries
    }

    pub fn of_kind(
        &self,
        kind: ComponentKind,
    ) -> impl Iterator<Item = &Arc<LibraryComponentDescriptor>> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The renderers shipped with the crate.
    pub fn builtin() -> Self {
        let descriptors = [
            LibraryComponentDescriptor::new("gradient_title", ComponentKind::Title)
                .with_roles(&["heading"])
                .with_screen_types(&["onboarding", "landing", "promo"])
                .with_complexity(ComplexityTier::Rich)
                .with_category("typography")
                .with_mood(Mood::Bold, 1.0)
                .with_mood(Mood::Energetic, 0.8)
                .with_mood(Mood::Playful, 0.6),
            LibraryComponentDescriptor::new("serif_title", ComponentKind::Title)
                .with_roles(&["heading"])
                .with_complexity(ComplexityTier::Moderate)
                .with_category("typography")
                .with_mood(Mood::Elegant, 1.0)
                .with_mood(Mood::Calm, 0.5)
                .with_mood(Mood::Professional, 0.4),
            LibraryComponentDescriptor::new("pill_cta", ComponentKind::Button)
                .with_slots(&["button", "cta"])
                .with_roles(&["cta", "action"])
                .with_complexity(ComplexityTier::Simple)
                .with_category("actions")
                .with_mood(Mood::Playful, 1.0)
                .with_mood(Mood::Modern, 0.5)
                .with_mood(Mood::Warm, 0.5),
            LibraryComponentDescriptor::new("glow_cta", ComponentKind::Button)
                .with_slots(&["button", "cta"])
                .with_roles(&["cta"])
                .with_screen_types(&["landing", "promo"])
                .with_complexity(ComplexityTier::Rich)
                .with_category("actions")
                .with_mood(Mood::Dark, 1.0)
                .with_mood(Mood::Energetic, 0.7),
            LibraryComponentDescriptor::new("stepper_form", ComponentKind::Form)
                .with_roles(&["form", "signup"])
                .with_screen_types(&["signup", "lead_capture", "onboarding"])
                .with_complexity(ComplexityTier::Rich)
                .with_category("forms")
                .with_screen_type_affinity("lead_capture", 1.0)
                .with_mood(Mood::Professional, 0.6),
            LibraryComponentDescriptor::new("lead_paragraph", ComponentKind::Text)
                .with_slots(&["text", "body"])
                .with_complexity(ComplexityTier::Simple)
                .with_category("typography")
                .with_tier(CapabilityTier::Default)
                .with_mood(Mood::Minimal, 0.8)
                .with_mood(Mood::Calm, 0.6),
        ];

        Self { entries: descriptors.into_iter().map(Arc::new).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = LibraryCatalog::new();
        catalog.register(LibraryComponentDescriptor::new("a", ComponentKind::Title)).unwrap();
        let err = catalog.register(LibraryComponentDescriptor::new("a", ComponentKind::Button));
        assert!(err.is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn builtin_catalog_keeps_registration_order() {
        let catalog = LibraryCatalog::builtin();
        let titles: Vec<_> = catalog.of_kind(ComponentKind::Title).map(|d| d.id.as_str()).collect();
        assert_eq!(titles, ["gradient_title", "serif_title"]);
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = LibraryCatalog::builtin();
        let mut rebuilt = LibraryCatalog::new();
        for descriptor in catalog.entries() {
            rebuilt.register(descriptor.as_ref().clone()).unwrap();
        }
        assert_eq!(rebuilt.len(), catalog.len());
    }

    #[test]
    fn descriptor_parses_from_json() {
        let descriptor: LibraryComponentDescriptor = serde_json::from_value(serde_json::json!({
            "id": "neon_button",
            "kind": "button",
            "allowedSlots": ["button"],
            "tier": "enhanced",
            "affinity": { "moods": { "dark": 0.9 } }
        }))
        .unwrap();
        assert_eq!(descriptor.affinity.moods[&Mood::Dark], 0.9);
        assert_eq!(descriptor.complexity, ComplexityTier::Moderate);
    }
}
