//! Per-slot failure isolation.

use super::slot::{SlotRenderContext, SlotRenderer};
use crate::schema::Component;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `renderer`, turning both errors and panics into an error message so
/// one broken slot cannot take the rest of the screen down.
pub fn render_isolated(
    renderer: &dyn SlotRenderer,
    component: &Component,
    context: &SlotRenderContext<'_>,
) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(component, context))) {
        Ok(Ok(html)) => Ok(html),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => {
            Err(format!("renderer '{}' panicked: {}", renderer.id(), panic_message(&*payload)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::slot::{DefaultSlotRenderer, RenderError};
    use crate::schema::Palette;

    struct Exploding;

    impl SlotRenderer for Exploding {
        fn id(&self) -> &str {
            "exploding"
        }

        fn render(&self, _: &Component, _: &SlotRenderContext<'_>) -> Result<String, RenderError> {
            panic!("boom")
        }
    }

    fn context(palette: &Palette) -> SlotRenderContext<'_> {
        SlotRenderContext { palette, animation: None }
    }

    #[test]
    fn panics_become_errors() {
        let palette = Palette::from_primary("#111827");
        let err =
            render_isolated(&Exploding, &Component::title("Hi"), &context(&palette)).unwrap_err();
        assert_eq!(err, "renderer 'exploding' panicked: boom");
    }

    #[test]
    fn successful_render_passes_through() {
        let palette = Palette::from_primary("#111827");
        let title = Component::title("Hi");
        let html = render_isolated(&DefaultSlotRenderer, &title, &context(&palette)).unwrap();
        assert!(html.starts_with("<h1"));
    }
}
