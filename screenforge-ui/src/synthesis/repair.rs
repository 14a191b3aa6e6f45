//! The repair pass.
//!
//! Runs after synthesis proper and fills gaps with generic content so a screen
//! stays renderable. Every injected component is reported as a [`Repair`], so
//! callers can tell a clean synthesis from a repaired one.

use crate::schema::{Component, ComponentKind};
use serde::{Deserialize, Serialize};

pub const GENERIC_TITLE: &str = "Welcome";
pub const GENERIC_SUBTITLE: &str = "Let's get started";
pub const GENERIC_BUTTON: &str = "Get Started";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairReason {
    /// Nothing at all was synthesized.
    EmptyComponentList,
    /// A required slot had no content.
    MissingRequiredSlot,
}

/// One component injected by the repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repair {
    pub slot: String,
    pub kind: ComponentKind,
    pub reason: RepairReason,
}

/// Generic stand-in for `kind`, if one is defined.
///
/// Only titles, subtitles and buttons have one. Body text, forms and images
/// carry information a generic value cannot invent.
pub fn generic_fallback(kind: ComponentKind) -> Option<Component> {
    match kind {
        ComponentKind::Title => Some(Component::title(GENERIC_TITLE)),
        ComponentKind::Subtitle => Some(Component::subtitle(GENERIC_SUBTITLE)),
        ComponentKind::Button => Some(Component::button(GENERIC_BUTTON)),
        ComponentKind::Text | ComponentKind::Form | ComponentKind::Image => None,
    }
}
