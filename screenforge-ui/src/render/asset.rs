//! Hero and supporting image availability.

use crate::patterns::{HeroPosition, ImageFit};
use async_trait::async_trait;
use serde::Serialize;

/// Checks whether an image URL can be loaded.
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), String>;
}

/// Accepts any `http`, `https` or `data` URL without fetching it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxProbe;

#[async_trait]
impl AssetProbe for SyntaxProbe {
    async fn probe(&self, url: &str) -> Result<(), String> {
        let parsed = url::Url::parse(url).map_err(|e| e.to_string())?;
        match parsed.scheme() {
            "http" | "https" | "data" => Ok(()),
            other => Err(format!("unsupported scheme '{other}'")),
        }
    }
}

/// Probe `url`, retrying `retries` more times on failure.
pub async fn probe_with_retry(
    probe: &dyn AssetProbe,
    url: &str,
    retries: u32,
) -> Result<(), String> {
    let mut attempt = 0;
    loop {
        match probe.probe(url).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::debug!(url, attempt, error = %e, "asset probe failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// State of the hero image region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HeroView {
    Ready {
        id: String,
        url: String,
        alt: Option<String>,
        fit: ImageFit,
        position: HeroPosition,
    },
    /// Only the image region is affected; the user may retry it.
    Failed {
        id: String,
        url: String,
        alt: Option<String>,
        reason: String,
        fit: ImageFit,
        position: HeroPosition,
    },
}

impl HeroView {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Ready { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn alt(&self) -> Option<&str> {
        match self {
            Self::Ready { alt, .. } | Self::Failed { alt, .. } => alt.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FailsTimes(AtomicU32);

    #[async_trait]
    impl AssetProbe for FailsTimes {
        async fn probe(&self, _url: &str) -> Result<(), String> {
            let left = self.0.load(Ordering::SeqCst);
            if left == 0 {
                return Ok(());
            }
            self.0.store(left - 1, Ordering::SeqCst);
            Err("timeout".to_string())
        }
    }

    #[tokio::test]
    async fn syntax_probe_checks_scheme() {
        assert!(SyntaxProbe.probe("https://cdn.example.com/a.png").await.is_ok());
        assert!(SyntaxProbe.probe("ftp://cdn.example.com/a.png").await.is_err());
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failure() {
        let probe = FailsTimes(AtomicU32::new(1));
        assert!(probe_with_retry(&probe, "https://x.test/a.png", 1).await.is_ok());

        let probe = FailsTimes(AtomicU32::new(2));
        let outcome = probe_with_retry(&probe, "https://x.test/a.png", 1).await;
        assert_eq!(outcome, Err("timeout".to_string()));
    }
}
