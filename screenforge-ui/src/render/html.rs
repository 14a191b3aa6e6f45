//! HTML output of rendered screens.

use super::{BLOCKED_NOTICE, BlockedScreen, HeroView, RenderedScreen, ScreenView, SlotOutcome};
use crate::effects::EffectDescriptor;
use crate::patterns::{HeroPosition, ImageFit, LayoutStructure};
use html_escape::{encode_double_quoted_attribute, encode_text};

fn container_style(view: &ScreenView) -> String {
    let layout = &view.layout;
    let palette = &view.palette;
    let structure = match layout.structure {
        LayoutStructure::Grid => format!(
            "display: grid; grid-template-columns: {}; grid-template-rows: {};",
            layout.grid_template_columns, layout.grid_template_rows
        ),
        LayoutStructure::Flex => "display: flex; flex-direction: column;".to_string(),
    };
    let mut style = format!(
        "{structure} padding: {}px; gap: {}px; --sf-primary: {}; --sf-secondary: {}; \
         --sf-accent: {}; background: {};",
        layout.padding,
        layout.gap,
        palette.primary,
        palette.secondary,
        palette.accent,
        palette.background
    );
    if let Some(effects) = &view.effects {
        style.push(' ');
        style.push_str(&effect_style(effects));
    }
    style
}

/// Screen-wide effects as CSS custom properties.
fn effect_style(descriptor: &EffectDescriptor) -> String {
    let effects = &descriptor.effects;
    let mut style = format!(
        "--sf-blur: {}px; --sf-glow: {}; --sf-shadow: {}; --sf-transition: {}ms {};",
        effects.blur,
        effects.glow,
        effects.shadow,
        descriptor.transition.duration_ms,
        descriptor.transition.easing
    );
    if let Some(backdrop) = &effects.backdrop {
        style.push_str(&format!(" --sf-backdrop: {backdrop};"));
    }
    style
}

fn hero_html(hero: &HeroView) -> String {
    match hero {
        HeroView::Ready { id, url, alt, fit, position } => format!(
            "<img class=\"sf-hero\" id=\"{}\" src=\"{}\" alt=\"{}\" \
             data-fit=\"{}\" data-position=\"{}\">",
            encode_double_quoted_attribute(id),
            encode_double_quoted_attribute(url),
            encode_double_quoted_attribute(alt.as_deref().unwrap_or_default()),
            fit_name(*fit),
            position_name(*position)
        ),
        HeroView::Failed { id, alt, reason, .. } => format!(
            "<div class=\"sf-hero sf-hero--failed\" data-asset=\"{}\" \
             role=\"img\" aria-label=\"{}\">\
             <span>Image unavailable: {}</span>\
             <button type=\"button\" data-action=\"retry-hero\">Retry</button></div>",
            encode_double_quoted_attribute(id),
            encode_double_quoted_attribute(alt.as_deref().unwrap_or_default()),
            encode_text(reason)
        ),
    }
}

fn fit_name(fit: ImageFit) -> &'static str {
    match fit {
        ImageFit::Cover => "cover",
        ImageFit::Contain => "contain",
    }
}

fn position_name(position: HeroPosition) -> &'static str {
    match position {
        HeroPosition::Top => "top",
        HeroPosition::Background => "background",
        HeroPosition::Left => "left",
        HeroPosition::Right => "right",
    }
}

/// HTML document fragment for a rendered screen.
pub fn screen_html(view: &ScreenView) -> String {
    let effect = view
        .effects
        .as_ref()
        .map(|e| format!(" data-effect=\"{}\"", e.preset))
        .unwrap_or_default();
    let mut html = format!(
        "<main class=\"sf-screen\" data-pattern=\"{}\" data-breakpoint=\"{}\" \
         data-mood=\"{}\"{effect} style=\"{}\">",
        encode_double_quoted_attribute(&view.pattern.to_string()),
        view.layout.breakpoint.as_str(),
        view.mood,
        encode_double_quoted_attribute(&container_style(view))
    );
    if let Some(hero) = &view.hero {
        html.push_str(&hero_html(hero));
    }
    for slot in &view.slots {
        html.push_str(&format!(
            "<div class=\"sf-slot\" data-slot=\"{}\" style=\"{}\">",
            encode_double_quoted_attribute(&slot.slot),
            slot.placement.to_css()
        ));
        match &slot.outcome {
            SlotOutcome::Rendered { html: fragment, .. } => html.push_str(fragment),
            SlotOutcome::Failed { renderer, reason } => html.push_str(&format!(
                "<div class=\"sf-slot--failed\" data-renderer=\"{}\">\
                 {} could not be displayed: {}</div>",
                encode_double_quoted_attribute(renderer),
                encode_text(&slot.slot),
                encode_text(reason)
            )),
        }
        html.push_str("</div>");
    }
    html.push_str("</main>");
    html
}

pub fn blocked_html(blocked: &BlockedScreen) -> String {
    let mut html = format!(
        "<main class=\"sf-screen sf-screen--blocked\" data-pattern=\"{}\">\
         <p role=\"alert\">{}</p><ul>",
        encode_double_quoted_attribute(&blocked.pattern.to_string()),
        BLOCKED_NOTICE
    );
    for error in &blocked.errors {
        html.push_str(&format!("<li>{}</li>", encode_text(error)));
    }
    html.push_str("</ul></main>");
    html
}

pub fn to_html(screen: &RenderedScreen) -> String {
    match screen {
        RenderedScreen::Rendered(view) => screen_html(view),
        RenderedScreen::Blocked(blocked) => blocked_html(blocked),
        RenderedScreen::PatternUnavailable { pattern, reason } => format!(
            "<main class=\"sf-screen sf-screen--unavailable\" data-pattern=\"{}\">\
             <p role=\"alert\">Layout unavailable: {}</p></main>",
            encode_double_quoted_attribute(&pattern.to_string()),
            encode_text(reason)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternKey;

    #[test]
    fn error_text_is_escaped() {
        let blocked = BlockedScreen {
            screen_id: None,
            pattern: PatternKey::new("CTA_CENTER", 1),
            errors: vec!["title: <script> & friends".to_string()],
        };
        let html = to_html(&RenderedScreen::Blocked(blocked));
        assert!(html.contains("<li>title: &lt;script&gt; &amp; friends</li>"));
    }

    #[test]
    fn blocked_screen_lists_errors_without_content() {
        let blocked = BlockedScreen {
            screen_id: None,
            pattern: PatternKey::new("CTA_CENTER", 1),
            errors: vec!["components: must contain at least one component".to_string()],
        };
        let html = to_html(&RenderedScreen::Blocked(blocked));
        assert!(html.contains(BLOCKED_NOTICE));
        assert!(html.contains("<li>components: must contain at least one component</li>"));
        assert!(!html.contains("sf-slot"));
    }
}
