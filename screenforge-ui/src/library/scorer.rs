//! Additive scoring of library candidates.
//!
//! Every factor contributes independently and contributes zero when it does
//! not apply. Affinity strengths (`0.0..=1.0`) are scaled by the weight of
//! the factor they belong to.

use super::catalog::{CapabilityTier, ComplexityTier, LibraryComponentDescriptor};
use crate::schema::{ComponentKind, Mood};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoringWeights {
    pub slot_match: f64,
    /// Fraction of `slot_match` granted to a slot-role prefix match.
    pub role_factor: f64,
    pub screen_type_bonus: f64,
    pub screen_type_penalty: f64,
    pub complexity_bonus: f64,
    pub complexity_penalty: f64,
    pub mood_factor: f64,
    pub category_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            slot_match: 100.0,
            role_factor: 0.8,
            screen_type_bonus: 30.0,
            screen_type_penalty: 40.0,
            complexity_bonus: 20.0,
            complexity_penalty: 5.0,
            mood_factor: 15.0,
            category_bonus: 10.0,
        }
    }
}

/// Which capability tier the requester wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierRequest {
    #[default]
    Default,
    /// Enhanced renderers, falling back to default ones.
    Enhanced,
    /// Enhanced renderers or nothing.
    EnhancedOnly,
}

/// What the requesting slot looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub slot: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub screen_type: Option<String>,
    #[serde(default)]
    pub complexity: Option<ComplexityTier>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub preferred_category: Option<String>,
    #[serde(default)]
    pub tier: TierRequest,
}

impl SelectionContext {
    pub fn new(slot: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            slot: slot.into(),
            kind,
            screen_type: None,
            complexity: None,
            mood: None,
            preferred_category: None,
            tier: TierRequest::default(),
        }
    }

    pub fn with_screen_type(mut self, screen_type: impl Into<String>) -> Self {
        self.screen_type = Some(screen_type.into());
        self
    }

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.preferred_category = Some(category.into());
        self
    }

    pub fn with_tier(mut self, tier: TierRequest) -> Self {
        self.tier = tier;
        self
    }
}

/// Per-factor contributions of one candidate's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub slot: f64,
    pub screen_type: f64,
    pub complexity: f64,
    pub mood: f64,
    pub category: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.slot + self.screen_type + self.complexity + self.mood + self.category
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub descriptor: Arc<LibraryComponentDescriptor>,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn tier(&self) -> CapabilityTier {
        self.descriptor.tier
    }
}

/// Score one candidate against `context`.
pub fn score_candidate(
    candidate: &LibraryComponentDescriptor,
    context: &SelectionContext,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let slot = &context.slot;

    let match_weight = if candidate.allowed_slots.iter().any(|s| s == slot) {
        weights.slot_match
    } else if candidate
        .slot_roles
        .iter()
        .any(|role| !role.is_empty() && slot.starts_with(role.as_str()))
    {
        weights.slot_match * weights.role_factor
    } else {
        0.0
    };
    let slot_affinity = candidate.affinity.slots.get(slot).copied().unwrap_or_default();
    let slot_score = match_weight + slot_affinity * weights.slot_match;

    let screen_type = match context.screen_type.as_deref() {
        None => 0.0,
        Some(screen_type) => {
            let supported = candidate.screen_types.is_empty()
                || candidate.screen_types.iter().any(|t| t.eq_ignore_ascii_case(screen_type));
            if supported {
                let affinity = candidate
                    .affinity
                    .screen_types
                    .iter()
                    .find(|(t, _)| t.eq_ignore_ascii_case(screen_type))
                    .map(|(_, strength)| *strength)
                    .unwrap_or_default();
                weights.screen_type_bonus + affinity * weights.screen_type_bonus
            } else {
                -weights.screen_type_penalty
            }
        }
    };

    let complexity = match context.complexity {
        None => 0.0,
        Some(wanted) if wanted == candidate.complexity => weights.complexity_bonus,
        Some(wanted) => match candidate.affinity.complexity.get(&wanted) {
            Some(affinity) => affinity * weights.complexity_bonus,
            None => -weights.complexity_penalty,
        },
    };

    let mood = context
        .mood
        .and_then(|m| candidate.affinity.moods.get(&m).copied())
        .map(|affinity| affinity * weights.mood_factor)
        .unwrap_or_default();

    let category = match (&context.preferred_category, &candidate.category) {
        (Some(wanted), Some(actual)) if wanted.eq_ignore_ascii_case(actual) => {
            weights.category_bonus
        }
        _ => 0.0,
    };

    ScoreBreakdown { slot: slot_score, screen_type, complexity, mood, category }
}

/// Score and rank `candidates`, highest first. Equal scores keep the order of
/// `candidates`.
pub fn score<'a>(
    candidates: impl IntoIterator<Item = &'a Arc<LibraryComponentDescriptor>>,
    context: &SelectionContext,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|descriptor| {
            let breakdown = score_candidate(descriptor, context, weights);
            ScoredCandidate { descriptor: descriptor.clone(), score: breakdown.total(), breakdown }
        })
        .collect();
    // `sort_by` is stable, so ties keep registration order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
