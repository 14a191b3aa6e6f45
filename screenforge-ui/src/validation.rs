//! Two-stage validation of screen specifications.
//!
//! Stage A checks the document on its own: field formats, value ranges and
//! well-formed navigation. Stage B runs only when Stage A passed and a pattern
//! is supplied, and checks the components against the pattern's slot contract.
//!
//! Failures are returned as data. A [`ValidatedScreen`] can only be obtained
//! from a successful [`ValidationResult`], which is what persistence and
//! rendering accept.

use crate::patterns::{PatternDefinition, is_hero_slot, is_valid_family, MAX_VARIANT, MIN_VARIANT};
use crate::schema::{Component, ComponentKind, FieldType, Navigation, ScreenSpecification};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    /// Stage A: the document on its own.
    Schema,
    /// Stage B: the document against its pattern.
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub stage: ValidationStage,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of [`validate`]. Callers must check `success` before persisting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScreenSpecification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(spec: Option<ScreenSpecification>, issues: Vec<ValidationIssue>) -> Self {
        let success = issues.is_empty();
        Self {
            success,
            data: if success { spec } else { None },
            errors: issues.iter().map(ToString::to_string).collect(),
            issues,
        }
    }

    /// Issues raised by `stage`.
    pub fn issues_in(&self, stage: ValidationStage) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.stage == stage)
    }

    /// The validated screen, or the issues that blocked it.
    pub fn into_validated(self) -> Result<ValidatedScreen, Vec<ValidationIssue>> {
        match self.data {
            Some(spec) if self.success => Ok(ValidatedScreen(spec)),
            _ => Err(self.issues),
        }
    }
}

/// A specification that passed both validation stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedScreen(ScreenSpecification);

impl ValidatedScreen {
    pub fn spec(&self) -> &ScreenSpecification {
        &self.0
    }

    pub fn into_inner(self) -> ScreenSpecification {
        self.0
    }
}

impl AsRef<ScreenSpecification> for ValidatedScreen {
    fn as_ref(&self) -> &ScreenSpecification {
        &self.0
    }
}

/// Validate `spec`, checking it against `pattern` when one is given.
pub fn validate(
    spec: &ScreenSpecification,
    pattern: Option<&PatternDefinition>,
) -> ValidationResult {
    let mut issues = Issues::new(ValidationStage::Schema);
    check_structure(spec, &mut issues);

    if issues.is_empty() {
        if let Some(pattern) = pattern {
            issues.stage = ValidationStage::Pattern;
            check_pattern_contract(spec, pattern, &mut issues);
        }
    }

    let result = ValidationResult::from_issues(Some(spec.clone()), issues.into_inner());
    tracing::debug!(
        pattern.family = %spec.pattern_family,
        pattern.variant = spec.pattern_variant,
        success = result.success,
        errors = result.errors.len(),
        "screen validated"
    );
    result
}

/// Validate a raw JSON document. Deserialization failures are Stage A errors.
pub fn validate_json(
    value: serde_json::Value,
    pattern: Option<&PatternDefinition>,
) -> ValidationResult {
    match serde_json::from_value::<ScreenSpecification>(value) {
        Ok(spec) => validate(&spec, pattern),
        Err(e) => ValidationResult::from_issues(
            None,
            vec![ValidationIssue {
                stage: ValidationStage::Schema,
                field: "$".to_string(),
                message: e.to_string(),
            }],
        ),
    }
}

struct Issues {
    stage: ValidationStage,
    items: Vec<ValidationIssue>,
}

impl Issues {
    fn new(stage: ValidationStage) -> Self {
        Self { stage, items: Vec::new() }
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.items.push(ValidationIssue {
            stage: self.stage,
            field: field.into(),
            message: message.into(),
        });
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn into_inner(self) -> Vec<ValidationIssue> {
        self.items
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_url(field: &str, value: &str, issues: &mut Issues) {
    if is_blank(value) {
        issues.push(field, "must not be empty");
    } else if let Err(e) = url::Url::parse(value.trim()) {
        issues.push(field, format!("is not a valid URL ({e})"));
    }
}

fn check_hex(field: &str, value: &str, issues: &mut Issues) {
    if !HEX_COLOR_RE.is_match(value) {
        issues.push(field, format!("'{value}' is not a hex color"));
    }
}

fn check_structure(spec: &ScreenSpecification, issues: &mut Issues) {
    if is_blank(&spec.hero_image.id) {
        issues.push("heroImage.id", "must not be empty");
    }
    check_url("heroImage.url", &spec.hero_image.url, issues);

    for (i, image) in spec.supporting_images.iter().enumerate() {
        if is_blank(&image.id) {
            issues.push(format!("supportingImages[{i}].id"), "must not be empty");
        }
        check_url(&format!("supportingImages[{i}].url"), &image.url, issues);
    }

    check_hex("palette.primary", &spec.palette.primary, issues);
    check_hex("palette.secondary", &spec.palette.secondary, issues);
    check_hex("palette.accent", &spec.palette.accent, issues);
    check_hex("palette.background", &spec.palette.background, issues);

    if !is_valid_family(&spec.pattern_family) {
        issues.push(
            "patternFamily",
            format!("'{}' is not an UPPER_SNAKE_CASE family", spec.pattern_family),
        );
    }
    if !(MIN_VARIANT..=MAX_VARIANT).contains(&spec.pattern_variant) {
        issues.push(
            "patternVariant",
            format!("{} is outside {MIN_VARIANT}..={MAX_VARIANT}", spec.pattern_variant),
        );
    }

    if spec.components.is_empty() {
        issues.push("components", "must contain at least one component");
    }
    for (i, component) in spec.components.iter().enumerate() {
        check_component(&format!("components[{i}]"), component, issues);
    }

    if let Some(navigation) = &spec.navigation {
        match navigation {
            Navigation::Push { target_screen_id } | Navigation::Replace { target_screen_id } => {
                if is_blank(target_screen_id) {
                    issues.push("navigation.targetScreenId", "must not be empty");
                }
            }
            Navigation::External { url } => check_url("navigation.url", url, issues),
            Navigation::Back => {}
        }
    }
}

fn check_component(field: &str, component: &Component, issues: &mut Issues) {
    match component {
        Component::Image(image) => {
            if is_blank(&image.id) {
                issues.push(format!("{field}.id"), "must not be empty");
            }
            check_url(&format!("{field}.content"), &image.content, issues);
        }
        Component::Form(form) => {
            if is_blank(&form.content) {
                issues.push(format!("{field}.content"), "must not be empty");
            }
            if is_blank(&form.submit_label) {
                issues.push(format!("{field}.submitLabel"), "must not be empty");
            }
            if form.fields.is_empty() {
                issues.push(format!("{field}.fields"), "a form needs at least one field");
            }
            let mut names = BTreeSet::new();
            for (j, input) in form.fields.iter().enumerate() {
                let path = format!("{field}.fields[{j}]");
                if is_blank(&input.name) {
                    issues.push(format!("{path}.name"), "must not be empty");
                } else if !names.insert(input.name.as_str()) {
                    issues.push(format!("{path}.name"), format!("'{}' is used twice", input.name));
                }
                if is_blank(&input.label) {
                    issues.push(format!("{path}.label"), "must not be empty");
                }
                if input.field_type == FieldType::Select && input.options.is_empty() {
                    issues.push(format!("{path}.options"), "a select field needs options");
                }
            }
        }
        other => {
            if is_blank(other.content()) {
                issues.push(format!("{field}.content"), "must not be empty");
            }
        }
    }
}

fn check_pattern_contract(
    spec: &ScreenSpecification,
    pattern: &PatternDefinition,
    issues: &mut Issues,
) {
    if spec.pattern_key() != pattern.key() {
        issues.push(
            "patternFamily",
            format!("screen uses {} but was checked against {}", spec.pattern_key(), pattern.key()),
        );
        return;
    }

    let count = |kind: ComponentKind| spec.components_of(kind).count();

    for slot in &pattern.required_slots {
        if is_hero_slot(slot) {
            continue;
        }
        let Some(kind) = ComponentKind::from_slot_name(slot) else {
            issues.push(format!("slots.{slot}"), "pattern slot has no content kind");
            continue;
        };
        match count(kind) {
            0 => issues
                .push(format!("slots.{slot}"), format!("required slot has no {kind} component")),
            1 => {}
            n => issues
                .push(format!("slots.{slot}"), format!("required slot has {n} {kind} components")),
        }
    }

    for slot in &pattern.optional_slots {
        if let Some(kind) = ComponentKind::from_slot_name(slot) {
            let n = count(kind);
            if n > 1 {
                issues.push(
                    format!("slots.{slot}"),
                    format!("optional slot has {n} {kind} components"),
                );
            }
        }
    }

    for (i, component) in spec.components.iter().enumerate() {
        let kind = component.kind();
        if !pattern.declares_kind(kind) {
            issues.push(
                format!("components[{i}]"),
                format!("pattern {} has no slot for {kind} content", pattern.key()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::builtin;
    use crate::schema::{HeroImage, Mood, Palette};

    fn spec() -> ScreenSpecification {
        ScreenSpecification {
            hero_image: HeroImage {
                id: "hero-1".to_string(),
                url: "https://cdn.example.com/hero.png".to_string(),
                prompt: None,
                seed: None,
                aspect_ratio: None,
                style: None,
            },
            supporting_images: vec![],
            palette: Palette::from_primary("#112233"),
            mood: Mood::Playful,
            pattern_family: "ONB_HERO_TOP".to_string(),
            pattern_variant: 1,
            components: vec![
                Component::title("Welcome"),
                Component::subtitle("Friendly by design"),
                Component::button("Get started free"),
            ],
            navigation: None,
            animations: None,
            metadata: None,
        }
    }

    #[test]
    fn valid_screen_passes_both_stages() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let result = validate(&spec(), Some(&pattern));
        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.data, Some(spec()));
        assert!(result.into_validated().is_ok());
    }

    #[test]
    fn bad_hex_and_variant_fail_stage_a() {
        let mut spec = spec();
        spec.palette.accent = "blue".to_string();
        spec.pattern_variant = 9;
        let result = validate(&spec, None);
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.issues_in(ValidationStage::Schema).count(), 2);
        assert!(result.errors.iter().any(|e| e.starts_with("palette.accent")));
    }

    #[test]
    fn stage_b_is_skipped_when_stage_a_fails() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut spec = spec();
        spec.components = vec![];
        let result = validate(&spec, Some(&pattern));
        assert_eq!(result.issues_in(ValidationStage::Pattern).count(), 0);
        assert_eq!(result.errors, vec!["components: must contain at least one component"]);
    }

    #[test]
    fn missing_required_slot_fails_stage_b() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut spec = spec();
        spec.components.retain(|c| c.kind() != ComponentKind::Subtitle);
        let result = validate(&spec, Some(&pattern));
        let issue = result.issues_in(ValidationStage::Pattern).next().unwrap();
        assert_eq!(issue.field, "slots.subtitle");
    }

    #[test]
    fn duplicates_and_foreign_kinds_are_flagged() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let mut spec = spec();
        spec.components.push(Component::button("Again"));
        spec.components.push(Component::text("Stray body"));
        let result = validate(&spec, Some(&pattern));
        let fields: Vec<_> = result.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["slots.button", "components[4]"]);
    }

    #[test]
    fn navigation_must_be_well_formed() {
        let mut spec = spec();
        spec.navigation = Some(Navigation::External { url: "nope".to_string() });
        assert!(!validate(&spec, None).success);
        spec.navigation = Some(Navigation::Push { target_screen_id: "screen-2".to_string() });
        assert!(validate(&spec, None).success);
    }

    #[test]
    fn json_with_unknown_mood_is_a_schema_error() {
        let mut value = serde_json::to_value(spec()).unwrap();
        value["mood"] = serde_json::json!("grumpy");
        let result = validate_json(value, None);
        assert!(!result.success);
        assert_eq!(result.issues[0].field, "$");
    }

    #[test]
    fn result_serializes_without_issues() {
        let json = serde_json::to_value(validate(&spec(), None)).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("errors").is_none());
        assert!(json.get("issues").is_none());
    }
}
