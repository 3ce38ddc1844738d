//! Content extraction module
//!
//! Locates the main content of a page and strips ads and clutter from a
//! detached copy of it. The live page is only ever read here.

pub mod locator;
pub mod sanitizer;

pub use locator::{CandidateNode, ContentLocator, LocateRule};
pub use sanitizer::{ContentSanitizer, SanitizeReport, SanitizedContent};
