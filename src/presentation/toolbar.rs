//! The toolbar shared by both surfaces
//!
//! Buttons carry their meaning in markup (`data-theme`, `data-size`, the
//! close class), so any surface built from `toolbar_markup` binds the same
//! way.

use crate::dom::{attr, has_class};
use crate::presentation::Theme;
use kuchikikiki::NodeRef;
use std::fmt::Write;

/// What a toolbar button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Switch to a theme
    SetTheme(Theme),
    /// Font size up one step
    GrowFont,
    /// Font size down one step
    ShrinkFont,
    /// Leave reader mode
    Close,
}

impl ToolbarAction {
    /// Resolve a button element to its action
    pub fn from_button(button: &NodeRef) -> Option<Self> {
        if has_class(button, "reader-theme-btn") {
            return attr(button, "data-theme")?
                .parse()
                .ok()
                .map(ToolbarAction::SetTheme);
        }
        if has_class(button, "reader-font-btn") {
            return match attr(button, "data-size")?.as_str() {
                "larger" => Some(ToolbarAction::GrowFont),
                "smaller" => Some(ToolbarAction::ShrinkFont),
                _ => None,
            };
        }
        if has_class(button, "reader-close-btn") {
            return Some(ToolbarAction::Close);
        }
        None
    }
}

/// Toolbar markup: title label, three theme buttons, two font buttons, close
pub fn toolbar_markup(title_label: &str, close_title: &str) -> String {
    let mut themes = String::new();
    for theme in Theme::ALL {
        let _ = write!(
            themes,
            r#"<button class="reader-btn reader-theme-btn" data-theme="{}">{}</button>"#,
            theme.as_str(),
            theme.label()
        );
    }

    format!(
        r#"<div class="reader-toolbar"><div class="reader-left"><span class="reader-title">{title}</span></div><div class="reader-center">{themes}</div><div class="reader-right"><button class="reader-btn reader-font-btn" data-size="smaller">A-</button><button class="reader-btn reader-font-btn" data-size="larger">A+</button><button class="reader-btn reader-close-btn" title="{close}">✕</button></div></div>"#,
        title = htmlescape::encode_minimal(title_label),
        themes = themes,
        close = htmlescape::encode_attribute(close_title),
    )
}

/// Every toolbar button under `root` with its action, in document order
pub fn bindings(root: &NodeRef) -> Vec<(NodeRef, ToolbarAction)> {
    let Ok(buttons) = root.select(".reader-toolbar .reader-btn") else {
        return Vec::new();
    };
    buttons
        .filter_map(|button| {
            let node = button.as_node().clone();
            ToolbarAction::from_button(&node).map(|action| (node, action))
        })
        .collect()
}
