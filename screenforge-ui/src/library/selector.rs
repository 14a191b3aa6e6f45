use super::catalog::{CapabilityTier, LibraryCatalog, LibraryComponentDescriptor};
use super::scorer::{ScoredCandidate, ScoringWeights, SelectionContext, TierRequest, score};
use crate::patterns::{LatestTaskGuard, LoadOutcome};
use crate::schema::ComponentKind;
use async_trait::async_trait;
use screenforge_core::Result;
use std::sync::Arc;

/// Supplies library candidates, possibly from a remote registry.
#[async_trait]
pub trait LibraryProvider: Send + Sync {
    async fn candidates(&self, kind: ComponentKind) -> Result<Vec<Arc<LibraryComponentDescriptor>>>;
}

#[async_trait]
impl LibraryProvider for LibraryCatalog {
    async fn candidates(
        &self,
        kind: ComponentKind,
    ) -> Result<Vec<Arc<LibraryComponentDescriptor>>> {
        Ok(self.of_kind(kind).cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorSettings {
    pub enabled: bool,
    /// Candidates scoring below this are never selected.
    pub min_score: f64,
    pub weights: ScoringWeights,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self { enabled: true, min_score: 1.0, weights: ScoringWeights::default() }
    }
}

/// Keep the candidates that match the requested tier.
///
/// `Enhanced` falls back to default-tier candidates when no enhanced one is
/// left; `EnhancedOnly` does not.
pub fn filter_tier(ranked: Vec<ScoredCandidate>, request: TierRequest) -> Vec<ScoredCandidate> {
    let of = |tier: CapabilityTier| -> Vec<ScoredCandidate> {
        ranked.iter().filter(|c| c.tier() == tier).cloned().collect()
    };
    match request {
        TierRequest::Default => of(CapabilityTier::Default),
        TierRequest::EnhancedOnly => of(CapabilityTier::Enhanced),
        TierRequest::Enhanced => {
            let enhanced = of(CapabilityTier::Enhanced);
            if enhanced.is_empty() { of(CapabilityTier::Default) } else { enhanced }
        }
    }
}

/// Rank `candidates` for `context`, dropping other kinds and low scores.
pub fn rank<'a>(
    candidates: impl IntoIterator<Item = &'a Arc<LibraryComponentDescriptor>>,
    context: &SelectionContext,
    settings: &SelectorSettings,
) -> Vec<ScoredCandidate> {
    let matching = candidates.into_iter().filter(|d| d.kind == context.kind);
    score(matching, context, &settings.weights)
        .into_iter()
        .filter(|c| c.score >= settings.min_score)
        .collect()
}

/// Pick the best candidate from a catalog.
pub fn select(
    catalog: &LibraryCatalog,
    context: &SelectionContext,
    settings: &SelectorSettings,
) -> Option<ScoredCandidate> {
    if !settings.enabled {
        return None;
    }
    let ranked = rank(catalog.entries(), context, settings);
    filter_tier(ranked, context.tier).into_iter().next()
}

/// Asynchronous selection whose failures mean "no substitution".
pub struct LibrarySelector {
    provider: Arc<dyn LibraryProvider>,
    settings: SelectorSettings,
}

impl LibrarySelector {
    pub fn new(provider: Arc<dyn LibraryProvider>, settings: SelectorSettings) -> Self {
        Self { provider, settings }
    }

    pub fn from_catalog(catalog: LibraryCatalog, settings: SelectorSettings) -> Self {
        Self::new(Arc::new(catalog), settings)
    }

    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    /// Best candidate for `context`, or `None`. Provider errors are logged and
    /// swallowed so they never block the default renderer.
    pub async fn select(&self, context: &SelectionContext) -> Option<ScoredCandidate> {
        if !self.settings.enabled {
            return None;
        }
        let candidates = match self.provider.candidates(context.kind).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    slot = %context.slot,
                    error = %e,
                    "library selection failed, using default renderer"
                );
                return None;
            }
        };
        let ranked = rank(&candidates, context, &self.settings);
        let picked = filter_tier(ranked, context.tier).into_iter().next();
        if let Some(candidate) = &picked {
            tracing::debug!(
                slot = %context.slot,
                component = candidate.id(),
                score = candidate.score,
                "library component selected"
            );
        }
        picked
    }

    /// [`LibrarySelector::select`] under `guard`, so an older selection for
    /// the same view is discarded once a newer one starts.
    pub async fn select_latest(
        &self,
        guard: &LatestTaskGuard,
        context: &SelectionContext,
    ) -> LoadOutcome<Option<ScoredCandidate>> {
        guard.run(self.select(context)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ComplexityTier;
    use crate::schema::Mood;
    use screenforge_core::ScreenforgeError;

    struct Unreachable;

    #[async_trait]
    impl LibraryProvider for Unreachable {
        async fn candidates(
            &self,
            _kind: ComponentKind,
        ) -> Result<Vec<Arc<LibraryComponentDescriptor>>> {
            Err(ScreenforgeError::InvalidInput("registry offline".to_string()))
        }
    }

    fn catalog() -> LibraryCatalog {
        let mut catalog = LibraryCatalog::new();
        catalog
            .register(
                LibraryComponentDescriptor::new("plain_button", ComponentKind::Button)
                    .with_tier(CapabilityTier::Default),
            )
            .unwrap();
        catalog
            .register(
                LibraryComponentDescriptor::new("fancy_button", ComponentKind::Button)
                    .with_complexity(ComplexityTier::Rich)
                    .with_mood(Mood::Bold, 1.0),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn enhanced_request_prefers_enhanced_tier() {
        let context =
            SelectionContext::new("button", ComponentKind::Button).with_tier(TierRequest::Enhanced);
        let picked = select(&catalog(), &context, &SelectorSettings::default()).unwrap();
        assert_eq!(picked.id(), "fancy_button");
    }

    #[test]
    fn enhanced_request_falls_back_to_default_tier() {
        let mut catalog = LibraryCatalog::new();
        catalog
            .register(
                LibraryComponentDescriptor::new("plain_button", ComponentKind::Button)
                    .with_tier(CapabilityTier::Default),
            )
            .unwrap();
        let context =
            SelectionContext::new("button", ComponentKind::Button).with_tier(TierRequest::Enhanced);
        let picked = select(&catalog, &context, &SelectorSettings::default()).unwrap();
        assert_eq!(picked.id(), "plain_button");

        let strict = context.with_tier(TierRequest::EnhancedOnly);
        assert!(select(&catalog, &strict, &SelectorSettings::default()).is_none());
    }

    #[test]
    fn other_kinds_and_low_scores_are_dropped() {
        let context =
            SelectionContext::new("title", ComponentKind::Title).with_tier(TierRequest::Enhanced);
        assert!(select(&catalog(), &context, &SelectorSettings::default()).is_none());

        let settings = SelectorSettings { min_score: 500.0, ..Default::default() };
        let context =
            SelectionContext::new("button", ComponentKind::Button).with_tier(TierRequest::Enhanced);
        assert!(select(&catalog(), &context, &settings).is_none());
    }

    #[test]
    fn disabled_selector_selects_nothing() {
        let settings = SelectorSettings { enabled: false, ..Default::default() };
        let context =
            SelectionContext::new("button", ComponentKind::Button).with_tier(TierRequest::Enhanced);
        assert!(select(&catalog(), &context, &settings).is_none());
    }

    #[tokio::test]
    async fn provider_failure_is_swallowed() {
        let selector = LibrarySelector::new(Arc::new(Unreachable), SelectorSettings::default());
        let context = SelectionContext::new("button", ComponentKind::Button);
        assert!(selector.select(&context).await.is_none());
    }

    #[tokio::test]
    async fn async_selection_matches_sync_selection() {
        let selector = LibrarySelector::from_catalog(catalog(), SelectorSettings::default());
        let context = SelectionContext::new("button", ComponentKind::Button)
            .with_mood(Mood::Bold)
            .with_tier(TierRequest::Enhanced);
        let picked = selector.select(&context).await.unwrap();
        assert_eq!(picked.id(), "fancy_button");

        let guard = LatestTaskGuard::new();
        let latest = selector.select_latest(&guard, &context).await.ready().flatten().unwrap();
        assert_eq!(latest.id(), "fancy_button");
    }
}
