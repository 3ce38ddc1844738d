//! ReasonKit Reader - Reader Mode for Arbitrary Web Pages
//!
//! This crate pulls the readable part out of an unstructured page, strips
//! ads and clutter from it, and presents it on a simplified, theme-able
//! surface with adjustable typography.
//!
//! # Features
//!
//! - **Content Location**: article/main elements first, then gathered
//!   paragraphs and headings, then the whole body
//! - **Sanitization**: ad containers by id/class/attribute shape, scripts,
//!   frames and styles, and standalone "Sponsored"-style labels
//! - **Two Surfaces**: an overlay layered above the page, or a standalone
//!   document replacing it
//! - **Controls**: exclusive themes, clamped font sizing, text-only mode
//!
//! # Architecture
//!
//! ```text
//! Page ──▶ ContentLocator ──▶ ContentSanitizer ──▶ Renderer ──▶ PresentationController
//!            (deep copy)        (two passes)          │
//!                                              ┌──────┴──────┐
//!                                              ▼             ▼
//!                                           Overlay       Replace
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use reasonkit_reader::{Activation, Page, ReaderConfig, ReaderSession};
//!
//! let mut page = Page::parse("<body><article><p>Hello reader</p></article></body>");
//! let mut session = ReaderSession::new(ReaderConfig::default());
//!
//! // First activation opens the overlay, the second closes it again
//! assert!(matches!(session.activate(&mut page).unwrap(), Activation::Opened(_)));
//! assert!(matches!(session.activate(&mut page).unwrap(), Activation::Closed(_)));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dom;
pub mod error;
pub mod extraction;
pub mod presentation;
pub mod session;

// Re-exports for convenience
pub use config::{FontConfig, ReaderConfig};
pub use dom::Page;
pub use error::{ConfigError, Error, Result};
pub use extraction::{ContentLocator, ContentSanitizer, LocateRule, SanitizedContent};
pub use presentation::{
    CloseOutcome, DisplayState, PresentationController, Renderer, Strategy, Theme,
};
pub use session::{Activation, ReaderSession, SessionAction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
