use super::builtin;
use super::definition::{PatternDefinition, PatternKey};
use async_trait::async_trait;
use screenforge_core::{Result, ScreenforgeError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where pattern definitions come from.
#[async_trait]
pub trait PatternSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the definition for `key`. Returns [`ScreenforgeError::PatternNotFound`]
    /// when the source does not know the key.
    async fn fetch(&self, key: &PatternKey) -> Result<PatternDefinition>;

    /// Keys this source can serve.
    async fn list(&self) -> Result<Vec<PatternKey>>;
}

/// Serves the patterns embedded in the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPatternSource;

#[async_trait]
impl PatternSource for BuiltinPatternSource {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn fetch(&self, key: &PatternKey) -> Result<PatternDefinition> {
        builtin::get(key)
    }

    async fn list(&self) -> Result<Vec<PatternKey>> {
        Ok(builtin::keys())
    }
}

/// Reads `FAMILY_variant.json` or `FAMILY_variant.toml` documents from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryPatternSource {
    root: PathBuf,
}

impl DirectoryPatternSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn parse(key: &PatternKey, path: &Path, raw: &str) -> Result<PatternDefinition> {
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str::<PatternDefinition>(raw).map_err(|e| e.to_string()),
            _ => serde_json::from_str::<PatternDefinition>(raw).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| ScreenforgeError::PatternLoad {
            family: key.family.clone(),
            variant: key.variant,
            reason: format!("{}: {reason}", path.display()),
        })
    }
}

/// Split `FAMILY_variant` back into a key.
fn key_from_stem(stem: &str) -> Option<PatternKey> {
    let (family, variant) = stem.rsplit_once('_')?;
    let variant = variant.parse().ok()?;
    Some(PatternKey::new(family, variant))
}

#[async_trait]
impl PatternSource for DirectoryPatternSource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch(&self, key: &PatternKey) -> Result<PatternDefinition> {
        let stem = key.file_stem();
        for extension in ["json", "toml"] {
            let path = self.root.join(format!("{stem}.{extension}"));
            match tokio::fs::read_to_string(&path).await {
                Ok(raw) => {
                    tracing::debug!(
                        path = %path.display(),
                        pattern = %key,
                        "read pattern document"
                    );
                    return Self::parse(key, &path, &raw);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ScreenforgeError::PatternNotFound { family: key.family.clone(), variant: key.variant })
    }

    async fn list(&self) -> Result<Vec<PatternKey>> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let supported =
                matches!(path.extension().and_then(|e| e.to_str()), Some("json" | "toml"));
            if !supported {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(key_from_stem) {
                keys.push(key);
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

/// Tries each source in order; the first one that knows a key wins.
#[derive(Clone)]
pub struct LayeredPatternSource {
    layers: Vec<Arc<dyn PatternSource>>,
}

impl LayeredPatternSource {
    pub fn new(layers: Vec<Arc<dyn PatternSource>>) -> Self {
        Self { layers }
    }

    /// A directory overlay on top of the built-in patterns.
    pub fn directory_over_builtin(root: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            Arc::new(DirectoryPatternSource::new(root)),
            Arc::new(BuiltinPatternSource),
        ])
    }
}

#[async_trait]
impl PatternSource for LayeredPatternSource {
    fn name(&self) -> &str {
        "layered"
    }

    async fn fetch(&self, key: &PatternKey) -> Result<PatternDefinition> {
        for layer in &self.layers {
            match layer.fetch(key).await {
                Err(ScreenforgeError::PatternNotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(ScreenforgeError::PatternNotFound { family: key.family.clone(), variant: key.variant })
    }

    async fn list(&self) -> Result<Vec<PatternKey>> {
        let mut keys = Vec::new();
        for layer in &self.layers {
            keys.extend(layer.list().await?);
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_parse_into_keys() {
        assert_eq!(key_from_stem("ONB_HERO_TOP_2"), Some(PatternKey::new("ONB_HERO_TOP", 2)));
        assert_eq!(key_from_stem("README"), None);
    }

    #[tokio::test]
    async fn directory_reads_toml_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("PROMO_BANNER_1.toml"),
            r#"
family = "PROMO_BANNER"
variant = 1
structure = "flex"
requiredSlots = ["title"]
optionalSlots = ["button"]

[slots.title]
x = 0
y = 0
width = 1
height = 1

[slots.button]
x = 0
y = 1
width = 1
height = 1
"#,
        )
        .unwrap();

        let source = DirectoryPatternSource::new(dir.path());
        let definition = source.fetch(&PatternKey::new("PROMO_BANNER", 1)).await.unwrap();
        assert_eq!(definition.required_slots, vec!["title"]);
        assert_eq!(source.list().await.unwrap(), vec![PatternKey::new("PROMO_BANNER", 1)]);
    }

    #[tokio::test]
    async fn malformed_document_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BROKEN_1.json"), "{ not json").unwrap();

        let err = DirectoryPatternSource::new(dir.path())
            .fetch(&PatternKey::new("BROKEN", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenforgeError::PatternLoad { .. }));
    }

    #[tokio::test]
    async fn layered_source_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let source = LayeredPatternSource::directory_over_builtin(dir.path());
        let definition = source.fetch(&PatternKey::new("CTA_CENTER", 1)).await.unwrap();
        assert_eq!(definition.family, "CTA_CENTER");

        let missing = source.fetch(&PatternKey::new("NOPE", 3)).await.unwrap_err();
        assert!(matches!(missing, ScreenforgeError::PatternNotFound { .. }));
    }
}
