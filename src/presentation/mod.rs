//! Reader surface presentation
//!
//! A sanitized copy of the content is turned into a reading surface by one
//! of two renderers: `Overlay` layers it above the page, `Replace` swaps
//! the whole page for a standalone document. Both expose the same toolbar
//! so `PresentationController` can drive either.

pub mod controller;
pub mod overlay;
pub mod replace;
pub mod style;
pub mod toolbar;

pub use controller::{CloseOutcome, ControlOutcome, DisplayState, PresentationController};
pub use overlay::OverlayRenderer;
pub use replace::ReplaceRenderer;
pub use toolbar::ToolbarAction;

use crate::config::ReaderConfig;
use crate::dom::{element_from_markup, remove_style_property, set_style_property, Page};
use crate::error::Error;
use crate::extraction::SanitizedContent;
use kuchikikiki::NodeRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id of the injected overlay layer
pub const OVERLAY_ID: &str = "reader-mode-overlay";
/// Body class marking a replaced page as the reader page
pub const READER_PAGE_CLASS: &str = "simple-reader-page";
/// Body class hiding media on the reader page
pub const TEXT_ONLY_CLASS: &str = "reader-text-only";
/// Class of the content pane
pub const CONTENT_CLASS: &str = "reader-content";
/// Custom property carrying the content font size
pub const FONT_SIZE_VAR: &str = "--reader-font-size";
/// Overlay layer attribute holding the root's `overflow` from before the
/// scroll lock
pub const SAVED_OVERFLOW_ATTR: &str = "data-saved-overflow";

/// Color theme of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background (default)
    #[default]
    Light,
    /// Warm paper tone
    Sepia,
    /// Dark background
    Dark,
}

impl Theme {
    /// Every theme, in toolbar order
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Sepia, Theme::Dark];

    /// Lowercase name, as used in `data-theme`
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Sepia => "sepia",
            Theme::Dark => "dark",
        }
    }

    /// Marker class on the themed element
    pub fn class_name(&self) -> String {
        format!("reader-theme-{}", self.as_str())
    }

    /// Toolbar button label
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Sepia => "Sepia",
            Theme::Dark => "Dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

/// How a surface is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fixed layer above the page, removable in place (default)
    #[default]
    Overlay,
    /// Standalone document substituted for the page
    Replace,
}

impl Strategy {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Overlay => "overlay",
            Strategy::Replace => "replace",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlay" => Ok(Strategy::Overlay),
            "replace" => Ok(Strategy::Replace),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// A rendered surface attached to a page
#[derive(Debug, Clone)]
pub struct ReaderSurface {
    /// Strategy that built it
    pub strategy: Strategy,
    /// Element carrying the theme and text-only markers: the overlay
    /// layer, or the reader page's body
    pub root: NodeRef,
    /// The content pane
    pub content: NodeRef,
    /// Page generation the surface was attached at
    pub generation: u64,
    /// Root element `overflow` before the overlay locked scrolling
    pub saved_overflow: Option<String>,
}

impl ReaderSurface {
    /// Whether the surface is still part of the page's live document
    pub fn is_attached(&self, page: &Page) -> bool {
        if self.generation != page.generation() {
            return false;
        }
        match self.strategy {
            Strategy::Overlay => self.root.parent().is_some(),
            Strategy::Replace => true,
        }
    }

    /// Undo the overlay's scroll lock on the page's root element
    pub fn restore_scroll(&self, page: &Page) {
        if self.strategy != Strategy::Overlay {
            return;
        }
        if let Some(root) = page.root_element() {
            match &self.saved_overflow {
                Some(value) => set_style_property(&root, "overflow", value),
                None => remove_style_property(&root, "overflow"),
            }
        }
    }
}

/// Builds a surface from sanitized content and attaches it to a page
pub trait Renderer {
    /// Strategy this renderer implements
    fn strategy(&self) -> Strategy;

    /// Render and attach
    ///
    /// Returns `None`, leaving the page as it was, when the page lacks the
    /// structure the surface needs.
    fn render(&self, page: &mut Page, content: SanitizedContent) -> Option<ReaderSurface>;
}

/// The renderer for the configured strategy
pub fn renderer_for(config: &ReaderConfig) -> Box<dyn Renderer> {
    match config.strategy {
        Strategy::Overlay => Box::new(OverlayRenderer::new(config)),
        Strategy::Replace => Box::new(ReplaceRenderer::new(config)),
    }
}

/// Placeholder paragraph for content with nothing readable left
pub(crate) fn placeholder_markup(placeholder: &str) -> String {
    format!("<p>{}</p>", htmlescape::encode_minimal(placeholder))
}

/// Move the content into `pane`, or the placeholder when it is empty
pub(crate) fn fill_pane(pane: &NodeRef, content: SanitizedContent, placeholder: &str) {
    if content.has_readable_content() {
        let children: Vec<NodeRef> = content.root.children().collect();
        for child in children {
            pane.append(child);
        }
    } else {
        pane.append(element_from_markup(&placeholder_markup(placeholder)));
    }
}
