//! Reader configuration
//!
//! Everything here has a default matching the stock reader surface, so an
//! empty JSON object is a valid configuration file.

use crate::error::{ConfigError, Result};
use crate::presentation::{Strategy, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Font size bounds for the content pane, in CSS pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Size applied when a surface is created (default: 18)
    pub default: u32,
    /// Smallest size the shrink control reaches (default: 12)
    pub min: u32,
    /// Largest size the grow control reaches (default: 30)
    pub max: u32,
    /// Amount added or removed per control press (default: 2)
    pub step: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            default: 18,
            min: 12,
            max: 30,
            step: 2,
        }
    }
}

/// Configuration for a reader session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Presentation strategy used for every activation (default: overlay)
    pub strategy: Strategy,
    /// Theme active on a fresh surface (default: light)
    pub default_theme: Theme,
    /// Font size bounds
    pub font: FontConfig,
    /// Below this many characters of paragraph/heading text the locator
    /// falls back to the whole body (default: 200)
    pub min_text_length: usize,
    /// Toolbar label, also the document title when the page has none
    pub title_label: String,
    /// Message shown when nothing readable survives sanitization
    pub placeholder: String,
    /// Leaf texts that mark a standalone ad label
    pub ad_words: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Overlay,
            default_theme: Theme::Light,
            font: FontConfig::default(),
            min_text_length: 200,
            title_label: "Reader Mode".to_string(),
            placeholder: "(No readable content found.)".to_string(),
            ad_words: [
                "advertisement",
                "advertisements",
                "sponsored",
                "sponsored content",
                "ad",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
        }
    }
}

impl ReaderConfig {
    /// Create a new config builder
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    /// Load a JSON configuration file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading reader config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a JSON configuration document and validate it
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ReaderConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the controller relies on
    pub fn validate(&self) -> Result<()> {
        let font = &self.font;
        if font.min > font.max || font.default < font.min || font.default > font.max {
            return Err(ConfigError::FontRange {
                min: font.min,
                default: font.default,
                max: font.max,
            }
            .into());
        }
        if font.step == 0 {
            return Err(ConfigError::ZeroFontStep.into());
        }
        if self.ad_words.iter().any(|w| w.trim().is_empty()) {
            return Err(ConfigError::BlankAdWord.into());
        }
        Ok(())
    }
}

/// Builder for ReaderConfig
#[derive(Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Set the presentation strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the theme of a fresh surface
    pub fn default_theme(mut self, theme: Theme) -> Self {
        self.config.default_theme = theme;
        self
    }

    /// Set font bounds
    pub fn font(mut self, default: u32, min: u32, max: u32, step: u32) -> Self {
        self.config.font = FontConfig {
            default,
            min,
            max,
            step,
        };
        self
    }

    /// Set the locator's fallback threshold
    pub fn min_text_length(mut self, chars: usize) -> Self {
        self.config.min_text_length = chars;
        self
    }

    /// Set the toolbar label
    pub fn title_label<S: Into<String>>(mut self, label: S) -> Self {
        self.config.title_label = label.into();
        self
    }

    /// Set the empty-content placeholder
    pub fn placeholder<S: Into<String>>(mut self, text: S) -> Self {
        self.config.placeholder = text.into();
        self
    }

    /// Add an ad label word
    pub fn ad_word<S: Into<String>>(mut self, word: S) -> Self {
        self.config.ad_words.push(word.into());
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<ReaderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
