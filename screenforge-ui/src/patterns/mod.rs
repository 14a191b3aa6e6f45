//! # Layout patterns
//!
//! A pattern is a named, versioned layout template (`family` + `variant`)
//! declaring the content slots a screen must and may fill, where each slot
//! sits, and how spacing changes per breakpoint.
//!
//! Definitions are immutable once loaded. The [`PatternRegistry`] fetches them
//! from a [`PatternSource`] and keeps them in a [`PatternCache`] that can be
//! invalidated when an entry turns out to be stale.
//!
//! ```rust
//! use screenforge_ui::patterns::{builtin, ordered_slots};
//!
//! let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
//! let names: Vec<_> = ordered_slots(&pattern).unwrap().iter().map(|s| s.name).collect();
//! assert_eq!(names, ["title", "subtitle", "button"]);
//! ```

pub mod builtin;
pub mod definition;
pub mod loader;
pub mod registry;
pub mod slots;
pub mod source;

pub use definition::{
    Breakpoint, GridTemplate, HERO_SLOT_NAMES, HeroPlacement, HeroPosition, ImageFit,
    LayoutOverride, LayoutStructure, MAX_VARIANT, MIN_VARIANT, PatternDefinition, PatternKey,
    SlotPosition, Spacing, SupportingImagePlacement, is_hero_slot, is_valid_family,
};
pub use loader::{LatestTaskGuard, LoadOutcome, PatternLoader, TaskTicket};
pub use registry::{PatternCache, PatternRegistry};
pub use slots::{OrderedSlot, ordered_slots, slot_kind};
pub use source::{BuiltinPatternSource, DirectoryPatternSource, LayeredPatternSource, PatternSource};
