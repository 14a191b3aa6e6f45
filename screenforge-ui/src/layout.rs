//! Breakpoint-aware layout resolution.
//!
//! [`resolve`] picks spacing and grid templates for a breakpoint, and
//! [`place_slot`] turns an abstract slot position into concrete grid or flex
//! placement.

use crate::patterns::{
    Breakpoint, LayoutOverride, LayoutStructure, PatternDefinition, SlotPosition, ordered_slots,
};
use screenforge_core::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLET_MIN_WIDTH: u32 = 768;
pub const DEFAULT_DESKTOP_MIN_WIDTH: u32 = 1024;

/// Viewport widths at which the tablet and desktop breakpoints start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointThresholds {
    pub tablet_min_width: u32,
    pub desktop_min_width: u32,
}

impl Default for BreakpointThresholds {
    fn default() -> Self {
        Self {
            tablet_min_width: DEFAULT_TABLET_MIN_WIDTH,
            desktop_min_width: DEFAULT_DESKTOP_MIN_WIDTH,
        }
    }
}

impl BreakpointThresholds {
    pub fn breakpoint_for(&self, width: u32) -> Breakpoint {
        if width >= self.desktop_min_width {
            Breakpoint::Desktop
        } else if width >= self.tablet_min_width {
            Breakpoint::Tablet
        } else {
            Breakpoint::Mobile
        }
    }
}

/// Where a resolved layout's values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "breakpoint", rename_all = "snake_case")]
pub enum LayoutSource {
    /// The requested breakpoint's own override.
    Exact(Breakpoint),
    /// Another breakpoint's override, found by walking the fallback order.
    Fallback(Breakpoint),
    /// The pattern's base spacing and grid.
    Base,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayout {
    pub breakpoint: Breakpoint,
    pub structure: LayoutStructure,
    pub padding: u32,
    pub gap: u32,
    pub grid_template_columns: String,
    pub grid_template_rows: String,
    pub source: LayoutSource,
}

/// Find the override that applies at `breakpoint`.
fn override_for(
    pattern: &PatternDefinition,
    breakpoint: Breakpoint,
) -> Option<(&LayoutOverride, LayoutSource)> {
    if let Some(exact) = pattern.breakpoints.get(&breakpoint) {
        return Some((exact, LayoutSource::Exact(breakpoint)));
    }
    Breakpoint::FALLBACK_ORDER
        .iter()
        .find_map(|bp| pattern.breakpoints.get(bp).map(|o| (o, LayoutSource::Fallback(*bp))))
}

/// Spacing and grid template for `pattern` at `breakpoint`.
///
/// The exact breakpoint's override is used if present; otherwise the first
/// override in mobile, tablet, desktop order; otherwise the base values.
/// Fields an override leaves unset keep the base value.
pub fn resolve(pattern: &PatternDefinition, breakpoint: Breakpoint) -> ResolvedLayout {
    let base = ResolvedLayout {
        breakpoint,
        structure: pattern.structure,
        padding: pattern.spacing.padding,
        gap: pattern.spacing.gap,
        grid_template_columns: pattern.grid.columns.clone(),
        grid_template_rows: pattern.grid.rows.clone(),
        source: LayoutSource::Base,
    };

    match override_for(pattern, breakpoint) {
        Some((layer, source)) => ResolvedLayout {
            padding: layer.padding.unwrap_or(base.padding),
            gap: layer.gap.unwrap_or(base.gap),
            grid_template_columns: layer.grid_columns.clone().unwrap_or(base.grid_template_columns),
            grid_template_rows: layer.grid_rows.clone().unwrap_or(base.grid_template_rows),
            source,
            ..base
        },
        None => base,
    }
}

/// Concrete placement of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Placement {
    /// 1-based CSS grid lines; `*_span` is the number of tracks covered.
    Grid { column_start: u32, column_span: u32, row_start: u32, row_span: u32 },
    /// Flex item ordering weight and grow factor.
    Flex { order: u32, flex_grow: u32 },
}

impl Placement {
    /// CSS declarations for the placement.
    pub fn to_css(&self) -> String {
        match self {
            Self::Grid { column_start, column_span, row_start, row_span } => format!(
                "grid-column: {column_start} / span {column_span}; \
                 grid-row: {row_start} / span {row_span};"
            ),
            Self::Flex { order, flex_grow } => format!("order: {order}; flex-grow: {flex_grow};"),
        }
    }
}

pub fn place_slot(position: SlotPosition, structure: LayoutStructure) -> Placement {
    match structure {
        LayoutStructure::Grid => Placement::Grid {
            column_start: position.x.saturating_add(1),
            column_span: position.width.max(1),
            row_start: position.y.saturating_add(1),
            row_span: position.height.max(1),
        },
        LayoutStructure::Flex => Placement::Flex { order: position.y, flex_grow: position.width },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSlot {
    pub slot: String,
    pub hero: bool,
    pub placement: Placement,
}

/// Full placement plan of a pattern: the hero slot first, then the content
/// slots in row-major order.
pub fn place_slots(pattern: &PatternDefinition) -> Result<Vec<PlacedSlot>> {
    let mut placed = Vec::with_capacity(pattern.slots.len());
    if let Some((name, position)) = pattern.hero_slot() {
        placed.push(PlacedSlot {
            slot: name.to_string(),
            hero: true,
            placement: place_slot(position, pattern.structure),
        });
    }
    for slot in ordered_slots(pattern)? {
        placed.push(PlacedSlot {
            slot: slot.name.to_string(),
            hero: false,
            placement: place_slot(slot.position, pattern.structure),
        });
    }
    Ok(placed)
}
