//! Slot renderers: the default markup for every component kind and the
//! library renderers that may replace it.

use crate::effects::{AnimationKind, SlotAnimation};
use crate::schema::{ButtonVariant, Component, ComponentKind, Palette};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("renderer '{renderer}' cannot render {actual} content (expects {expected})")]
    Unsupported { renderer: String, expected: ComponentKind, actual: ComponentKind },

    #[error("invalid content: {0}")]
    Content(String),
}

/// Everything a renderer may use besides the component itself.
#[derive(Debug, Clone, Copy)]
pub struct SlotRenderContext<'a> {
    pub palette: &'a Palette,
    /// Entrance animation of the slot, from the screen's effect descriptor.
    pub animation: Option<&'a SlotAnimation>,
}

/// Renders one component into an HTML fragment.
pub trait SlotRenderer: Send + Sync {
    fn id(&self) -> &str;

    fn render(
        &self,
        component: &Component,
        context: &SlotRenderContext<'_>,
    ) -> Result<String, RenderError>;
}

pub const DEFAULT_RENDERER_ID: &str = "default";

/// Plain markup for every component kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSlotRenderer;

impl SlotRenderer for DefaultSlotRenderer {
    fn id(&self) -> &str {
        DEFAULT_RENDERER_ID
    }

    fn render(
        &self,
        component: &Component,
        context: &SlotRenderContext<'_>,
    ) -> Result<String, RenderError> {
        markup(component, "", "", context.animation)
    }
}

fn variant_class(variant: ButtonVariant) -> &'static str {
    match variant {
        ButtonVariant::Primary => "primary",
        ButtonVariant::Secondary => "secondary",
        ButtonVariant::Ghost => "ghost",
        ButtonVariant::Outline => "outline",
        ButtonVariant::Link => "link",
    }
}

/// Class, inline style and entrance animation attributes of a root element.
fn attrs(class: &str, extra_class: &str, style: &str, animation: Option<&SlotAnimation>) -> String {
    let mut out = format!(" class=\"{class}");
    if !extra_class.is_empty() {
        out.push(' ');
        out.push_str(extra_class);
    }
    out.push('"');
    if !style.is_empty() {
        out.push_str(&format!(" style=\"{}\"", encode_double_quoted_attribute(style)));
    }
    if let Some(animation) = animation.filter(|a| a.kind != AnimationKind::None) {
        out.push_str(&format!(
            " data-animation=\"{}\" data-animation-duration=\"{}ms\" \
             data-animation-delay=\"{}ms\" data-animation-easing=\"{}\"",
            animation.kind.as_str(),
            animation.duration_ms,
            animation.delay_ms,
            encode_double_quoted_attribute(&animation.easing)
        ));
    }
    out
}

fn id_attr(id: Option<&str>) -> String {
    id.map(|id| format!(" id=\"{}\"", encode_double_quoted_attribute(id))).unwrap_or_default()
}

/// Shared markup; library renderers add a class and inline style.
fn markup(
    component: &Component,
    extra_class: &str,
    style: &str,
    animation: Option<&SlotAnimation>,
) -> Result<String, RenderError> {
    let root = |class: &str| attrs(class, extra_class, style, animation);
    let html = match component {
        Component::Title(t) => format!(
            "<h1{}{}>{}</h1>",
            id_attr(t.id.as_deref()),
            root("sf-title"),
            encode_text(&t.content)
        ),
        Component::Subtitle(t) => format!(
            "<p{}{}>{}</p>",
            id_attr(t.id.as_deref()),
            root("sf-subtitle"),
            encode_text(&t.content)
        ),
        Component::Text(t) => format!(
            "<p{}{}>{}</p>",
            id_attr(t.id.as_deref()),
            root("sf-text"),
            encode_text(&t.content)
        ),
        Component::Button(b) => {
            let class = format!("sf-button sf-button--{}", variant_class(b.variant));
            let icon = b
                .icon
                .as_deref()
                .map(|icon| {
                    format!(
                        "<span class=\"sf-icon\" data-icon=\"{}\"></span>",
                        encode_double_quoted_attribute(icon)
                    )
                })
                .unwrap_or_default();
            format!(
                "<button type=\"button\"{}{}>{icon}{}</button>",
                id_attr(b.id.as_deref()),
                root(&class),
                encode_text(&b.content)
            )
        }
        Component::Form(f) => {
            if f.fields.is_empty() {
                return Err(RenderError::Content("form has no fields".to_string()));
            }
            let mut html = format!(
                "<form{}{}><h2 class=\"sf-form-title\">{}</h2>",
                id_attr(f.id.as_deref()),
                root("sf-form"),
                encode_text(&f.content)
            );
            for (step, field) in f.fields.iter().enumerate() {
                let name = encode_double_quoted_attribute(&field.name);
                let required = if field.required { " required" } else { "" };
                html.push_str(&format!(
                    "<label class=\"sf-field\" data-step=\"{}\"><span>{}</span>",
                    step + 1,
                    encode_text(&field.label)
                ));
                match field.field_type.as_str() {
                    "textarea" => {
                        html.push_str(&format!("<textarea name=\"{name}\"{required}></textarea>"))
                    }
                    "select" => {
                        html.push_str(&format!("<select name=\"{name}\"{required}>"));
                        for option in &field.options {
                            html.push_str(&format!(
                                "<option value=\"{}\">{}</option>",
                                encode_double_quoted_attribute(option),
                                encode_text(option)
                            ));
                        }
                        html.push_str("</select>");
                    }
                    input_type => {
                        let placeholder = field
                            .placeholder
                            .as_deref()
                            .map(|p| {
                                format!(" placeholder=\"{}\"", encode_double_quoted_attribute(p))
                            })
                            .unwrap_or_default();
                        html.push_str(&format!(
                            "<input type=\"{input_type}\" name=\"{name}\"{placeholder}{required}>"
                        ));
                    }
                }
                html.push_str("</label>");
            }
            html.push_str(&format!(
                "<button type=\"submit\" class=\"sf-button sf-button--primary\">{}</button></form>",
                encode_text(&f.submit_label)
            ));
            html
        }
        Component::Image(i) => {
            let url = url::Url::parse(&i.content)
                .map_err(|e| RenderError::Content(format!("image url '{}': {e}", i.content)))?;
            format!(
                "<img id=\"{}\"{} src=\"{}\" alt=\"{}\">",
                encode_double_quoted_attribute(&i.id),
                root("sf-image"),
                encode_double_quoted_attribute(url.as_str()),
                encode_double_quoted_attribute(i.alt.as_deref().unwrap_or_default())
            )
        }
    };
    Ok(html)
}

/// A library renderer: default markup plus a class and a palette-derived style.
pub struct StyledRenderer {
    id: &'static str,
    kind: ComponentKind,
    class: &'static str,
    style: fn(&Palette) -> String,
}

impl StyledRenderer {
    pub fn new(
        id: &'static str,
        kind: ComponentKind,
        class: &'static str,
        style: fn(&Palette) -> String,
    ) -> Self {
        Self { id, kind, class, style }
    }
}

impl SlotRenderer for StyledRenderer {
    fn id(&self) -> &str {
        self.id
    }

    fn render(
        &self,
        component: &Component,
        context: &SlotRenderContext<'_>,
    ) -> Result<String, RenderError> {
        if component.kind() != self.kind {
            return Err(RenderError::Unsupported {
                renderer: self.id.to_string(),
                expected: self.kind,
                actual: component.kind(),
            });
        }
        markup(component, self.class, &(self.style)(context.palette), context.animation)
    }
}

/// Renderers by id, plus the default renderer.
#[derive(Clone)]
pub struct RendererRegistry {
    default: Arc<dyn SlotRenderer>,
    library: HashMap<String, Arc<dyn SlotRenderer>>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self { default: Arc::new(DefaultSlotRenderer), library: HashMap::new() }
    }
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, renderer: Arc<dyn SlotRenderer>) {
        self.library.insert(renderer.id().to_string(), renderer);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn SlotRenderer>> {
        self.library.get(id).cloned()
    }

    pub fn default_renderer(&self) -> Arc<dyn SlotRenderer> {
        self.default.clone()
    }

    /// Implementations of the built-in library catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let renderers = [
            StyledRenderer::new("gradient_title", ComponentKind::Title, "sf-title--gradient", |p| {
                format!(
                    "background: linear-gradient(90deg, {}, {}); \
                     -webkit-background-clip: text; color: transparent;",
                    p.primary, p.accent
                )
            }),
            StyledRenderer::new("serif_title", ComponentKind::Title, "sf-title--serif", |p| {
                format!(
                    "font-family: Georgia, serif; letter-spacing: 0.01em; color: {};",
                    p.primary
                )
            }),
            StyledRenderer::new("pill_cta", ComponentKind::Button, "sf-button--pill", |p| {
                format!("border-radius: 999px; background: {}; color: {};", p.primary, p.background)
            }),
            StyledRenderer::new("glow_cta", ComponentKind::Button, "sf-button--glow", |p| {
                format!("box-shadow: 0 0 24px {}; background: {};", p.accent, p.primary)
            }),
            StyledRenderer::new("stepper_form", ComponentKind::Form, "sf-form--stepper", |p| {
                format!("--sf-step-color: {};", p.secondary)
            }),
            StyledRenderer::new("lead_paragraph", ComponentKind::Text, "sf-text--lead", |_| {
                "font-size: 1.25rem; line-height: 1.6;".to_string()
            }),
        ];
        for renderer in renderers {
            registry.register(Arc::new(renderer));
        }
        registry
    }
}
