//! Screen intent overrides.
//!
//! A [`ScreenIntentOverride`] rewrites specific fields of synthesized
//! components (the title and the primary button). It never removes a
//! component it does not reference. Tab bars and backgrounds do not become
//! components; they are carried as [`OverrideMetadata`] for the layout and
//! render layers.

use crate::patterns::PatternDefinition;
use crate::schema::{ButtonContent, ButtonShape, ButtonVariant, Component, ComponentKind, Hints};
use schemars::JsonSchema;
use screenforge_core::{Result, ScreenforgeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenIntentOverride {
    #[serde(default)]
    pub screen_name: String,
    pub screen_type: String,
    pub layout: OverrideLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bar: Option<TopBar>,
    /// Main area type, e.g. `hero`, `form`, `list`.
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_center_button: Option<OverrideButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_bar: Option<TabBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_preset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_action: Option<TopBarAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopBarAction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideButton {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ButtonShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TabBar {
    pub items: Vec<TabItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TabItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundStyle {
    /// `solid`, `gradient`, `image` or `blur`.
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ScreenIntentOverride {
    /// Structural checks run before the override touches any component.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ScreenforgeError::InvalidInput(format!("override: {msg}")));

        if self.screen_type.trim().is_empty() {
            return invalid("screenType is empty".to_string());
        }
        if self.layout.main.trim().is_empty() {
            return invalid("layout.main is empty".to_string());
        }
        if let Some(action) = self.layout.top_bar.as_ref().and_then(|t| t.right_action.as_ref()) {
            if action.id.trim().is_empty() {
                return invalid("layout.topBar.rightAction.id is empty".to_string());
            }
        }
        if let Some(button) = &self.layout.bottom_center_button {
            if button.label.trim().is_empty() {
                return invalid("layout.bottomCenterButton.label is empty".to_string());
            }
        }
        if let Some(tab_bar) = &self.layout.tab_bar {
            let mut ids = BTreeSet::new();
            for (i, item) in tab_bar.items.iter().enumerate() {
                if item.id.trim().is_empty() || item.label.trim().is_empty() {
                    return invalid(format!("layout.tabBar.items[{i}] needs an id and a label"));
                }
                if !ids.insert(item.id.as_str()) {
                    return invalid(format!("layout.tabBar.items[{i}] repeats id '{}'", item.id));
                }
            }
            if let Some(active) = &tab_bar.active {
                if !ids.contains(active.as_str()) {
                    return invalid(format!("layout.tabBar.active '{active}' is not a tab"));
                }
            }
        }
        Ok(())
    }

    /// Title text the override asks for.
    ///
    /// An explicit top bar title wins. The bare screen name is used only when
    /// the override declares a top bar without a title of its own.
    pub fn title_text(&self) -> Option<&str> {
        let top_bar = self.layout.top_bar.as_ref()?;
        top_bar
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.screen_name.trim()).filter(|n| !n.is_empty()))
    }
}

/// Parts of an override kept for the layout and render layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideMetadata {
    pub screen_type: String,
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_bar: Option<TabBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundStyle>,
    /// Top bar action superseded by a bottom-center button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bar_action: Option<TopBarAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_preset: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideResult {
    pub components: Vec<Component>,
    pub metadata: OverrideMetadata,
}

/// Apply `intent` to `components`.
///
/// Overridden components come first (title, then button), followed by every
/// untouched original in its original order. A component is created only if
/// the pattern declares a slot for its kind.
pub fn apply_override(
    intent: &ScreenIntentOverride,
    pattern: &PatternDefinition,
    components: &[Component],
) -> OverrideResult {
    let layout = &intent.layout;
    let mut metadata = OverrideMetadata {
        screen_type: intent.screen_type.clone(),
        main: layout.main.clone(),
        tab_bar: layout.tab_bar.clone(),
        background: layout.background.clone(),
        top_bar_action: None,
        fx_preset: layout.fx_preset.clone(),
    };

    let position = |kind: ComponentKind| components.iter().position(|c| c.kind() == kind);
    let mut consumed = BTreeSet::new();
    let mut overridden = Vec::new();

    if let Some(text) = intent.title_text() {
        match position(ComponentKind::Title) {
            Some(index) => {
                let mut title = components[index].clone();
                title.set_content(text);
                consumed.insert(index);
                overridden.push(title);
            }
            None if pattern.declares_kind(ComponentKind::Title) => {
                overridden.push(Component::title(text));
            }
            None => tracing::debug!("pattern has no title slot, override title ignored"),
        }
    }

    let existing_button = position(ComponentKind::Button);
    let can_create_button =
        existing_button.is_some() || pattern.declares_kind(ComponentKind::Button);
    let base_button = || match existing_button.map(|i| &components[i]) {
        Some(Component::Button(button)) => button.clone(),
        _ => blank_button(),
    };

    let right_action = layout.top_bar.as_ref().and_then(|t| t.right_action.as_ref());
    let mut button: Option<ButtonContent> = None;

    if let Some(action) = right_action {
        let mut ghost = base_button();
        if let Some(label) = action.label.as_deref().filter(|l| !l.trim().is_empty()) {
            ghost.content = label.to_string();
        } else if ghost.content.is_empty() {
            ghost.content = action.id.clone();
        }
        ghost.variant = ButtonVariant::Ghost;
        ghost.id = Some(action.id.clone());
        ghost.icon = action.icon.clone();
        button = Some(ghost);
    }

    if let Some(bottom) = &layout.bottom_center_button {
        if let Some(action) = right_action {
            metadata.top_bar_action = Some(action.clone());
        }
        let mut primary = base_button();
        primary.content = bottom.label.clone();
        primary.variant = bottom.variant.unwrap_or(ButtonVariant::Primary);
        primary.shape = bottom.shape.or(primary.shape);
        primary.icon = bottom.icon.clone().or(primary.icon);
        button = Some(primary);
    }

    if let Some(button) = button {
        if can_create_button {
            if let Some(index) = existing_button {
                consumed.insert(index);
            }
            overridden.push(Component::Button(button));
        } else {
            tracing::debug!("pattern has no button slot, override button kept as metadata");
            if metadata.top_bar_action.is_none() {
                metadata.top_bar_action = right_action.cloned();
            }
        }
    }

    let untouched = components
        .iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index))
        .map(|(_, component)| component.clone());
    overridden.extend(untouched);

    OverrideResult { components: overridden, metadata }
}

fn blank_button() -> ButtonContent {
    ButtonContent {
        id: None,
        content: String::new(),
        variant: ButtonVariant::Primary,
        shape: None,
        icon: None,
        hints: Hints::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::builtin;

    fn components() -> Vec<Component> {
        vec![
            Component::title("Welcome"),
            Component::subtitle("Friendly by design"),
            Component::button("Get started free"),
        ]
    }

    fn intent(layout: OverrideLayout) -> ScreenIntentOverride {
        ScreenIntentOverride {
            screen_name: "Home".to_string(),
            screen_type: "onboarding".to_string(),
            layout,
        }
    }

    fn layout() -> OverrideLayout {
        OverrideLayout {
            top_bar: None,
            main: "hero".to_string(),
            bottom_center_button: None,
            tab_bar: None,
            background: None,
            fx_preset: None,
        }
    }

    #[test]
    fn bottom_button_only_rewrites_the_button() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let intent = intent(OverrideLayout {
            bottom_center_button: Some(OverrideButton {
                label: "Continue".to_string(),
                variant: None,
                shape: Some(ButtonShape::Pill),
                icon: Some("arrow-right".to_string()),
            }),
            ..layout()
        });

        let result = apply_override(&intent, &pattern, &components());
        assert_eq!(result.components.len(), 3);
        let Component::Button(button) = &result.components[0] else { panic!("button first") };
        assert_eq!(button.content, "Continue");
        assert_eq!(button.shape, Some(ButtonShape::Pill));
        assert_eq!(result.components[1], components()[0]);
        assert_eq!(result.components[2], components()[1]);
    }

    #[test]
    fn top_bar_title_and_ghost_action() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let intent = intent(OverrideLayout {
            top_bar: Some(TopBar {
                title: Some("Dashboard".to_string()),
                right_action: Some(TopBarAction {
                    id: "settings".to_string(),
                    label: None,
                    icon: Some("gear".to_string()),
                }),
            }),
            ..layout()
        });

        let result = apply_override(&intent, &pattern, &components());
        assert_eq!(result.components[0].content(), "Dashboard");
        let Component::Button(button) = &result.components[1] else { panic!("button second") };
        assert_eq!(button.variant, ButtonVariant::Ghost);
        assert_eq!(button.id.as_deref(), Some("settings"));
        assert_eq!(button.content, "Get started free");
        assert_eq!(result.components[2].kind(), ComponentKind::Subtitle);
    }

    #[test]
    fn screen_name_is_title_only_with_a_top_bar() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let without = apply_override(&intent(layout()), &pattern, &components());
        assert_eq!(without.components, components());

        let with = intent(OverrideLayout { top_bar: Some(TopBar::default()), ..layout() });
        let result = apply_override(&with, &pattern, &components());
        assert_eq!(result.components[0].content(), "Home");
    }

    #[test]
    fn bottom_button_wins_over_top_bar_action() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let action =
            TopBarAction { id: "skip".to_string(), label: Some("Skip".to_string()), icon: None };
        let intent = intent(OverrideLayout {
            top_bar: Some(TopBar { title: None, right_action: Some(action.clone()) }),
            bottom_center_button: Some(OverrideButton {
                label: "Next".to_string(),
                variant: Some(ButtonVariant::Secondary),
                shape: None,
                icon: None,
            }),
            ..layout()
        });

        let result = apply_override(&intent, &pattern, &components());
        let buttons: Vec<_> =
            result.components.iter().filter(|c| c.kind() == ComponentKind::Button).collect();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].content(), "Next");
        assert_eq!(result.metadata.top_bar_action, Some(action));
    }

    #[test]
    fn tab_bar_and_background_become_metadata() {
        let pattern = builtin::pattern("ONB_HERO_TOP", 1).unwrap();
        let intent = intent(OverrideLayout {
            tab_bar: Some(TabBar {
                items: vec![TabItem {
                    id: "home".to_string(),
                    label: "Home".to_string(),
                    icon: None,
                }],
                active: Some("home".to_string()),
            }),
            background: Some(BackgroundStyle {
                style: "gradient".to_string(),
                color: Some("#000000".to_string()),
                image_url: None,
            }),
            ..layout()
        });
        intent.validate().unwrap();

        let result = apply_override(&intent, &pattern, &components());
        assert_eq!(result.components, components());
        assert_eq!(result.metadata.tab_bar.unwrap().items.len(), 1);
        assert_eq!(result.metadata.background.unwrap().style, "gradient");
    }

    #[test]
    fn title_is_not_created_without_a_title_slot() {
        let mut pattern = builtin::pattern("CTA_CENTER", 1).unwrap();
        pattern.required_slots.retain(|s| s != "title");
        pattern.slots.remove("title");
        let intent = intent(OverrideLayout {
            top_bar: Some(TopBar { title: Some("Hi".to_string()), right_action: None }),
            ..layout()
        });
        let result = apply_override(&intent, &pattern, &[Component::button("Go")]);
        assert_eq!(result.components, vec![Component::button("Go")]);
    }

    #[test]
    fn validation_rejects_unknown_active_tab() {
        let intent = intent(OverrideLayout {
            tab_bar: Some(TabBar {
                items: vec![TabItem {
                    id: "home".to_string(),
                    label: "Home".to_string(),
                    icon: None,
                }],
                active: Some("profile".to_string()),
            }),
            ..layout()
        });
        assert!(matches!(intent.validate(), Err(ScreenforgeError::InvalidInput(_))));
    }

    #[test]
    fn parses_camel_case_document() {
        let intent: ScreenIntentOverride = serde_json::from_value(serde_json::json!({
            "screenName": "Welcome",
            "screenType": "onboarding",
            "layout": {
                "topBar": { "rightAction": { "id": "help", "icon": "question" } },
                "main": "hero",
                "bottomCenterButton": { "label": "Start", "variant": "primary", "shape": "pill" },
                "fxPreset": "glassmorphism"
            }
        }))
        .unwrap();
        intent.validate().unwrap();
        assert_eq!(intent.layout.fx_preset.as_deref(), Some("glassmorphism"));
    }
}
