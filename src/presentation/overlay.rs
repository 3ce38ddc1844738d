//! Overlay surface: a fixed layer above the original page

use crate::config::ReaderConfig;
use crate::dom::{attr, element_from_markup, set_attr, set_style_property, style_property, Page};
use crate::extraction::SanitizedContent;
use crate::presentation::style::overlay_stylesheet;
use crate::presentation::toolbar::toolbar_markup;
use crate::presentation::{
    fill_pane, ReaderSurface, Renderer, Strategy, Theme, CONTENT_CLASS, OVERLAY_ID,
    SAVED_OVERFLOW_ATTR,
};
use kuchikikiki::NodeRef;
use tracing::{debug, info, instrument};

/// Renders the reader as a layer appended to the page body
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    title_label: String,
    placeholder: String,
    theme: Theme,
}

impl OverlayRenderer {
    /// Create an overlay renderer
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            title_label: config.title_label.clone(),
            placeholder: config.placeholder.clone(),
            theme: config.default_theme,
        }
    }

    /// The overlay layer currently in `page`, if any
    pub fn find_layer(page: &Page) -> Option<NodeRef> {
        page.document()
            .select_first(&format!("#{}", OVERLAY_ID))
            .ok()
            .map(|layer| layer.as_node().clone())
    }

    fn layer_markup(&self) -> String {
        format!(
            r#"<div id="{id}" class="{theme}"><style>{css}</style>{toolbar}<div class="reader-content-wrapper"><div class="{content}"></div></div></div>"#,
            id = OVERLAY_ID,
            theme = self.theme.class_name(),
            css = overlay_stylesheet(),
            toolbar = toolbar_markup(&self.title_label, "Close Reader Mode"),
            content = CONTENT_CLASS,
        )
    }
}

impl Renderer for OverlayRenderer {
    fn strategy(&self) -> Strategy {
        Strategy::Overlay
    }

    #[instrument(skip(self, page, content))]
    fn render(&self, page: &mut Page, content: SanitizedContent) -> Option<ReaderSurface> {
        let body = page.body()?;
        let root_element = page.root_element()?;

        let layer = element_from_markup(&self.layer_markup());
        let pane = layer
            .select_first(&format!(".{}", CONTENT_CLASS))
            .ok()?
            .as_node()
            .clone();
        fill_pane(&pane, content, &self.placeholder);

        // At most one layer per page; a stale layer's lock is not the
        // page's own overflow
        let saved_overflow = match Self::find_layer(page) {
            Some(stale) => {
                debug!("Removing stale overlay layer");
                stale.detach();
                attr(&stale, SAVED_OVERFLOW_ATTR)
            }
            None => style_property(&root_element, "overflow"),
        };
        if let Some(value) = &saved_overflow {
            set_attr(&layer, SAVED_OVERFLOW_ATTR, value);
        }
        set_style_property(&root_element, "overflow", "hidden");
        body.append(layer.clone());
        info!("Overlay attached");

        Some(ReaderSurface {
            strategy: Strategy::Overlay,
            root: layer,
            content: pane,
            generation: page.generation(),
            saved_overflow,
        })
    }
}
