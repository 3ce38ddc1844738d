//! Display state and toolbar wiring for a live surface

use crate::config::{FontConfig, ReaderConfig};
use crate::dom::{
    add_class, attr, has_class, remove_class, set_style_property, style_property, toggle_class,
    Page,
};
use crate::error::{Error, Result};
use crate::presentation::toolbar::{self, ToolbarAction};
use crate::presentation::{
    OverlayRenderer, ReaderSurface, Strategy, Theme, CONTENT_CLASS, FONT_SIZE_VAR,
    READER_PAGE_CLASS, SAVED_OVERFLOW_ATTR, TEXT_ONLY_CLASS,
};
use kuchikikiki::NodeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Snapshot of a surface's display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Strategy of the surface
    pub strategy: Strategy,
    /// Active theme
    pub theme: Theme,
    /// Content font size in pixels
    pub font_size: u32,
    /// Whether media is hidden
    pub text_only: bool,
}

/// How a close left the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseOutcome {
    /// Overlay removed, scrolling restored
    Removed,
    /// Navigated back in history
    WentBack,
    /// No history to go back to; page reloaded
    Reloaded,
}

/// Result of one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Theme now active
    Theme(Theme),
    /// Font size now applied
    FontSize(u32),
    /// Text-only flag now set
    TextOnly(bool),
    /// Surface is gone
    Closed(CloseOutcome),
}

/// Owns the display state of one surface and applies it to the surface's
/// markers
pub struct PresentationController {
    surface: ReaderSurface,
    theme: Theme,
    font_size: u32,
    text_only: bool,
    font: FontConfig,
    bindings: Vec<(NodeRef, ToolbarAction)>,
}

impl PresentationController {
    /// Bind controls to a freshly attached surface
    pub fn bind(surface: ReaderSurface, config: &ReaderConfig) -> Self {
        let bindings = toolbar::bindings(&surface.root);
        debug!("Bound {} toolbar controls", bindings.len());
        let controller = Self {
            surface,
            theme: config.default_theme,
            font_size: config.font.default,
            text_only: false,
            font: config.font.clone(),
            bindings,
        };
        controller.apply_theme();
        controller.apply_font_size();
        controller
    }

    /// Re-bind to a surface that is already in place, reading its markers
    /// back: the reader page's body, or an overlay layer left on the page.
    /// `None` when the page carries neither.
    pub fn resume(page: &Page, config: &ReaderConfig) -> Option<Self> {
        let body = page.body()?;
        let (strategy, root, saved_overflow) = if has_class(&body, READER_PAGE_CLASS) {
            (Strategy::Replace, body, None)
        } else {
            let layer = OverlayRenderer::find_layer(page)?;
            let saved = attr(&layer, SAVED_OVERFLOW_ATTR);
            (Strategy::Overlay, layer, saved)
        };
        let content = root
            .select_first(&format!(".{}", CONTENT_CLASS))
            .ok()?
            .as_node()
            .clone();

        let theme = Theme::ALL
            .into_iter()
            .find(|theme| has_class(&root, &theme.class_name()))
            .unwrap_or(config.default_theme);
        let font_size = style_property(&content, FONT_SIZE_VAR)
            .and_then(|value| value.trim_end_matches("px").trim().parse().ok())
            .map(|size: u32| size.clamp(config.font.min, config.font.max))
            .unwrap_or(config.font.default);
        let text_only = strategy == Strategy::Replace && has_class(&root, TEXT_ONLY_CLASS);

        let surface = ReaderSurface {
            strategy,
            root,
            content,
            generation: page.generation(),
            saved_overflow,
        };
        let controller = Self {
            bindings: toolbar::bindings(&surface.root),
            surface,
            theme,
            font_size,
            text_only,
            font: config.font.clone(),
        };
        controller.apply_theme();
        controller.apply_font_size();
        info!("Resumed {} surface ({}, {}px)", strategy, theme, font_size);
        Some(controller)
    }

    /// The surface under control
    pub fn surface(&self) -> &ReaderSurface {
        &self.surface
    }

    /// Strategy of the surface
    pub fn strategy(&self) -> Strategy {
        self.surface.strategy
    }

    /// Active theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current font size in pixels
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Whether media is hidden
    pub fn text_only(&self) -> bool {
        self.text_only
    }

    /// Buttons wired to this surface
    pub fn bindings(&self) -> &[(NodeRef, ToolbarAction)] {
        &self.bindings
    }

    /// Current display state
    pub fn snapshot(&self) -> DisplayState {
        DisplayState {
            strategy: self.surface.strategy,
            theme: self.theme,
            font_size: self.font_size,
            text_only: self.text_only,
        }
    }

    /// Make `theme` the only active theme
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.apply_theme();
        debug!("Theme set to {}", theme);
    }

    /// One step larger, up to the maximum
    pub fn grow_font(&mut self) -> u32 {
        self.font_size = (self.font_size + self.font.step).min(self.font.max);
        self.apply_font_size();
        self.font_size
    }

    /// One step smaller, down to the minimum
    pub fn shrink_font(&mut self) -> u32 {
        self.font_size = self
            .font_size
            .saturating_sub(self.font.step)
            .max(self.font.min);
        self.apply_font_size();
        self.font_size
    }

    /// Show or hide media in the content pane; Replace surfaces only
    pub fn toggle_text_only(&mut self) -> Result<bool> {
        if self.surface.strategy != Strategy::Replace {
            return Err(Error::unsupported(
                self.surface.strategy.as_str(),
                "toggle_text_only",
            ));
        }
        self.text_only = toggle_class(&self.surface.root, TEXT_ONLY_CLASS);
        debug!("Text-only {}", self.text_only);
        Ok(self.text_only)
    }

    /// Leave reader mode
    ///
    /// Overlay: the layer goes and the root's scroll state comes back.
    /// Replace: back in history when there is any, otherwise a reload,
    /// which discards the reader page for good.
    #[instrument(skip(self, page))]
    pub fn close(&mut self, page: &mut Page) -> CloseOutcome {
        let outcome = match self.surface.strategy {
            Strategy::Overlay => {
                self.surface.root.detach();
                self.surface.restore_scroll(page);
                CloseOutcome::Removed
            }
            Strategy::Replace => {
                if page.history_len() > 1 && page.go_back() {
                    CloseOutcome::WentBack
                } else {
                    page.reload();
                    CloseOutcome::Reloaded
                }
            }
        };
        info!("Reader closed: {:?}", outcome);
        outcome
    }

    /// Apply a toolbar action
    pub fn dispatch(&mut self, action: ToolbarAction, page: &mut Page) -> ControlOutcome {
        match action {
            ToolbarAction::SetTheme(theme) => {
                self.set_theme(theme);
                ControlOutcome::Theme(theme)
            }
            ToolbarAction::GrowFont => ControlOutcome::FontSize(self.grow_font()),
            ToolbarAction::ShrinkFont => ControlOutcome::FontSize(self.shrink_font()),
            ToolbarAction::Close => ControlOutcome::Closed(self.close(page)),
        }
    }

    /// Click a bound toolbar button; `None` for anything not bound here
    pub fn click(&mut self, button: &NodeRef, page: &mut Page) -> Option<ControlOutcome> {
        let action = self
            .bindings
            .iter()
            .find(|(bound, _)| bound == button)
            .map(|(_, action)| *action)?;
        Some(self.dispatch(action, page))
    }

    fn apply_theme(&self) {
        for theme in Theme::ALL {
            remove_class(&self.surface.root, &theme.class_name());
        }
        add_class(&self.surface.root, &self.theme.class_name());
    }

    fn apply_font_size(&self) {
        set_style_property(
            &self.surface.content,
            FONT_SIZE_VAR,
            &format!("{}px", self.font_size),
        );
    }
}
