//! Pattern definitions shipped with the crate.

use super::definition::{PatternDefinition, PatternKey};
use screenforge_core::{Result, ScreenforgeError};

const DOCUMENTS: &[(&str, u8, &str)] = &[
    ("ONB_HERO_TOP", 1, include_str!("../../patterns/ONB_HERO_TOP_1.json")),
    ("ONB_HERO_TOP", 2, include_str!("../../patterns/ONB_HERO_TOP_2.json")),
    ("LEAD_FORM_SPLIT", 1, include_str!("../../patterns/LEAD_FORM_SPLIT_1.json")),
    ("CONTENT_STACK", 1, include_str!("../../patterns/CONTENT_STACK_1.json")),
    ("CTA_CENTER", 1, include_str!("../../patterns/CTA_CENTER_1.json")),
];

/// Keys of all built-in patterns.
pub fn keys() -> Vec<PatternKey> {
    DOCUMENTS.iter().map(|(family, variant, _)| PatternKey::new(*family, *variant)).collect()
}

/// Parse and check the built-in pattern `family/variant`.
pub fn pattern(family: &str, variant: u8) -> Result<PatternDefinition> {
    let (_, _, document) = DOCUMENTS
        .iter()
        .find(|(f, v, _)| *f == family && *v == variant)
        .ok_or_else(|| ScreenforgeError::PatternNotFound {
            family: family.to_string(),
            variant,
        })?;

    let definition: PatternDefinition = serde_json::from_str(document)?;
    definition.check()?;
    Ok(definition)
}

pub fn get(key: &PatternKey) -> Result<PatternDefinition> {
    pattern(&key.family, key.variant)
}
