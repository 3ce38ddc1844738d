//! Reader session: the activation entry point
//!
//! A session holds the live surface, if any, so deciding between "open",
//! "close" and "toggle text-only" never depends on probing the page.
//!
//! ```text
//! activate ──▶ Locator ──▶ Sanitizer ──▶ Renderer(strategy) ──▶ Controller
//!    │                                                             │
//!    └──────────── surface live? close / toggle text-only ◀────────┘
//! ```

use crate::config::ReaderConfig;
use crate::dom::Page;
use crate::error::{Error, Result};
use crate::extraction::{ContentLocator, ContentSanitizer, LocateRule, SanitizeReport};
use crate::presentation::{
    renderer_for, CloseOutcome, ControlOutcome, DisplayState, PresentationController, Renderer,
    Strategy, Theme,
};
use kuchikikiki::NodeRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// What the last extraction did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Locator rule that fired
    pub rule: LocateRule,
    /// Sanitizer removals
    pub removed: SanitizeReport,
    /// Whether the placeholder was shown instead of content
    pub placeholder: bool,
}

/// What an activation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new surface is live
    Opened(ExtractionSummary),
    /// The overlay was torn down
    Closed(CloseOutcome),
    /// Already on the reader page; text-only flag flipped to this value
    TextOnlyToggled(bool),
    /// The page lacks the structure a surface needs; nothing changed
    Skipped,
}

/// A scripted session step, as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// The activation toggle
    Activate,
    /// Switch theme
    Theme(Theme),
    /// Font size up
    Grow,
    /// Font size down
    Shrink,
    /// Flip text-only mode
    TextOnly,
    /// Close the surface
    Close,
}

impl FromStr for SessionAction {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(theme) = s.strip_prefix("theme=") {
            return Ok(SessionAction::Theme(theme.parse()?));
        }
        match s {
            "activate" => Ok(SessionAction::Activate),
            "grow" => Ok(SessionAction::Grow),
            "shrink" => Ok(SessionAction::Shrink),
            "text-only" => Ok(SessionAction::TextOnly),
            "close" => Ok(SessionAction::Close),
            _ => Err(Error::UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Activate => f.write_str("activate"),
            SessionAction::Theme(theme) => write!(f, "theme={}", theme),
            SessionAction::Grow => f.write_str("grow"),
            SessionAction::Shrink => f.write_str("shrink"),
            SessionAction::TextOnly => f.write_str("text-only"),
            SessionAction::Close => f.write_str("close"),
        }
    }
}

/// Result of a scripted step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The step was an activation
    Activation(Activation),
    /// The step drove the live surface
    Control(ControlOutcome),
    /// No live surface to drive
    Inactive,
}

/// Serializable summary of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Configured strategy
    pub strategy: Strategy,
    /// Whether a surface is live
    pub active: bool,
    /// Display state of the live surface
    pub state: Option<DisplayState>,
    /// Last extraction, if any ran
    pub extraction: Option<ExtractionSummary>,
}

/// Process-scoped reader state for one page
pub struct ReaderSession {
    config: ReaderConfig,
    locator: ContentLocator,
    sanitizer: ContentSanitizer,
    renderer: Box<dyn Renderer>,
    controller: Option<PresentationController>,
    last_extraction: Option<ExtractionSummary>,
}

impl ReaderSession {
    /// Create a session for the configured strategy
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            locator: ContentLocator::new(&config),
            sanitizer: ContentSanitizer::new(&config),
            renderer: renderer_for(&config),
            controller: None,
            last_extraction: None,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Strategy every activation uses
    pub fn strategy(&self) -> Strategy {
        self.renderer.strategy()
    }

    /// Controller of the live surface
    pub fn controller(&self) -> Option<&PresentationController> {
        self.controller.as_ref()
    }

    /// Mutable controller of the live surface
    pub fn controller_mut(&mut self) -> Option<&mut PresentationController> {
        self.controller.as_mut()
    }

    /// Whether a surface is live on `page`
    pub fn is_active(&self, page: &Page) -> bool {
        self.controller
            .as_ref()
            .map_or(false, |controller| controller.surface().is_attached(page))
    }

    /// Summary for reporting
    pub fn report(&self, page: &Page) -> SessionReport {
        let active = self.is_active(page);
        SessionReport {
            strategy: self.strategy(),
            active,
            state: self
                .controller
                .as_ref()
                .filter(|_| active)
                .map(PresentationController::snapshot),
            extraction: self.last_extraction,
        }
    }

    /// The toggle entry point
    ///
    /// Overlay: remove the layer if one is live, otherwise build one.
    /// Replace: on the reader page, flip text-only instead of extracting
    /// again; anywhere else, extract and replace the page.
    #[instrument(skip(self, page))]
    pub fn activate(&mut self, page: &mut Page) -> Result<Activation> {
        self.forget_detached(page);

        // A layer some earlier session left behind is torn down, not stacked
        if self.controller.is_none() && self.strategy() == Strategy::Overlay {
            self.resume(page);
        }

        if let Some(controller) = self.controller.as_mut() {
            return match controller.strategy() {
                Strategy::Overlay => {
                    let outcome = controller.close(page);
                    self.controller = None;
                    Ok(Activation::Closed(outcome))
                }
                Strategy::Replace => Ok(Activation::TextOnlyToggled(controller.toggle_text_only()?)),
            };
        }

        if page.body().is_none() {
            warn!("Page has no body; activation skipped");
            return Ok(Activation::Skipped);
        }

        let candidate = self.locator.locate(page.document());
        let content = self.sanitizer.sanitize(candidate);
        let summary = ExtractionSummary {
            rule: content.rule,
            removed: content.report,
            placeholder: !content.has_readable_content(),
        };

        let Some(surface) = self.renderer.render(page, content) else {
            warn!("Renderer could not attach a surface");
            return Ok(Activation::Skipped);
        };
        self.controller = Some(PresentationController::bind(surface, &self.config));
        self.last_extraction = Some(summary);
        info!("Reader opened via {:?}", summary.rule);
        Ok(Activation::Opened(summary))
    }

    /// Re-bind to a surface of this session's strategy that is already on
    /// the page: a reader page, or an overlay layer
    ///
    /// Returns whether the session now controls it.
    pub fn resume(&mut self, page: &Page) -> bool {
        self.controller = PresentationController::resume(page, &self.config)
            .filter(|controller| controller.strategy() == self.strategy());
        self.controller.is_some()
    }

    /// Close the live surface, if any
    pub fn close(&mut self, page: &mut Page) -> Option<CloseOutcome> {
        self.forget_detached(page);
        let mut controller = self.controller.take()?;
        Some(controller.close(page))
    }

    /// Click a toolbar button of the live surface
    pub fn click(&mut self, button: &NodeRef, page: &mut Page) -> Option<ControlOutcome> {
        self.forget_detached(page);
        let outcome = self.controller.as_mut()?.click(button, page)?;
        if matches!(outcome, ControlOutcome::Closed(_)) {
            self.controller = None;
        }
        Some(outcome)
    }

    /// Run one scripted step
    pub fn apply(&mut self, action: SessionAction, page: &mut Page) -> Result<ActionOutcome> {
        debug!("Applying {}", action);
        match action {
            SessionAction::Activate => Ok(ActionOutcome::Activation(self.activate(page)?)),
            SessionAction::Close => Ok(self
                .close(page)
                .map(|outcome| ActionOutcome::Control(ControlOutcome::Closed(outcome)))
                .unwrap_or(ActionOutcome::Inactive)),
            SessionAction::Theme(theme) => self.control(page, action, |controller| {
                controller.set_theme(theme);
                Ok(ControlOutcome::Theme(theme))
            }),
            SessionAction::Grow => self.control(page, action, |controller| {
                Ok(ControlOutcome::FontSize(controller.grow_font()))
            }),
            SessionAction::Shrink => self.control(page, action, |controller| {
                Ok(ControlOutcome::FontSize(controller.shrink_font()))
            }),
            SessionAction::TextOnly => self.control(page, action, |controller| {
                Ok(ControlOutcome::TextOnly(controller.toggle_text_only()?))
            }),
        }
    }

    fn control<F>(&mut self, page: &Page, action: SessionAction, f: F) -> Result<ActionOutcome>
    where
        F: FnOnce(&mut PresentationController) -> Result<ControlOutcome>,
    {
        self.forget_detached(page);
        match self.controller.as_mut() {
            Some(controller) => Ok(ActionOutcome::Control(f(controller)?)),
            None => {
                warn!("No live reader surface for {}", action);
                Ok(ActionOutcome::Inactive)
            }
        }
    }

    /// Drop a surface the page no longer shows (navigation, or the layer
    /// removed from outside)
    fn forget_detached(&mut self, page: &Page) {
        let Some(surface) = self.controller.as_ref().map(PresentationController::surface) else {
            return;
        };
        if surface.is_attached(page) {
            return;
        }
        // Same document, layer removed from outside: the lock is still ours
        if surface.generation == page.generation() {
            surface.restore_scroll(page);
        }
        debug!("Live surface no longer attached; forgetting it");
        self.controller = None;
    }
}
