//! # Library components
//!
//! Richer renderers that may replace the default renderer of a slot. They are
//! registered once into an append-only [`LibraryCatalog`], ranked by an
//! additive weighted score and picked per slot by tier.
//!
//! Selection never blocks rendering: when it fails or finds nothing, the
//! slot keeps its default renderer.

pub mod catalog;
pub mod scorer;
pub mod selector;

pub use catalog::{
    Affinity, CapabilityTier, ComplexityTier, LibraryCatalog, LibraryComponentDescriptor,
};
pub use scorer::{
    ScoreBreakdown, ScoredCandidate, ScoringWeights, SelectionContext, TierRequest,
    score, score_candidate,
};
pub use selector::{
    LibraryProvider, LibrarySelector, SelectorSettings, filter_tier, rank, select,
};
