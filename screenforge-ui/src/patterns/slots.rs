//! Slot contract of a pattern: which content slots exist and in which order
//! they are filled.

use super::definition::{PatternDefinition, SlotPosition, is_hero_slot};
use crate::schema::ComponentKind;
use screenforge_core::{Result, ScreenforgeError};

/// A fillable slot, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSlot<'a> {
    pub name: &'a str,
    pub kind: ComponentKind,
    pub position: SlotPosition,
    pub required: bool,
}

/// Content kind held by `slot`, or a configuration error.
pub fn slot_kind(pattern: &PatternDefinition, slot: &str) -> Result<ComponentKind> {
    ComponentKind::from_slot_name(slot).ok_or_else(|| {
        ScreenforgeError::configuration(
            &pattern.family,
            pattern.variant,
            format!("slot '{slot}' does not map to a renderable content kind"),
        )
    })
}

/// Content slots of `pattern` sorted by row, then column (slot name breaks ties).
///
/// The hero image slot is excluded. Every slot must map to a known content
/// kind and have a layout position.
pub fn ordered_slots(pattern: &PatternDefinition) -> Result<Vec<OrderedSlot<'_>>> {
    let mut slots = Vec::with_capacity(pattern.slots.len());

    for name in pattern.required_slots.iter().chain(&pattern.optional_slots) {
        if is_hero_slot(name) {
            continue;
        }
        let kind = slot_kind(pattern, name)?;
        let position = pattern.slots.get(name).copied().ok_or_else(|| {
            ScreenforgeError::configuration(
                &pattern.family,
                pattern.variant,
                format!("slot '{name}' has no layout position"),
            )
        })?;
        slots.push(OrderedSlot {
            name: name.as_str(),
            kind,
            position,
            required: pattern.is_required(name),
        });
    }

    slots.sort_by(|a, b| {
        (a.position.y, a.position.x, a.name).cmp(&(b.position.y, b.position.x, b.name))
    });
    Ok(slots)
}
