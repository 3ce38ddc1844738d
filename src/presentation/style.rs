//! Stylesheets for the reader surfaces
//!
//! Toolbar and content rules are shared; `SCOPE` is replaced by the themed
//! element's selector (`#reader-mode-overlay` or `body`).

use crate::presentation::OVERLAY_ID;

const OVERLAY_BASE: &str = r#"
SCOPE {
  position: fixed;
  inset: 0;
  z-index: 999999999;
  display: flex;
  flex-direction: column;
  font-family: system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
}
SCOPE, SCOPE * { box-sizing: border-box; }
"#;

const PAGE_BASE: &str = r#"
html, body { margin: 0; padding: 0; height: 100%; }
SCOPE {
  font-family: system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
  display: flex;
  flex-direction: column;
}
"#;

const THEMES: &str = r#"
SCOPE.reader-theme-light { background-color: #f5f5f5; color: #111111; }
SCOPE.reader-theme-sepia { background-color: #f4ecd8; color: #3b2f26; }
SCOPE.reader-theme-dark { background-color: #181a1b; color: #e4e4e4; }
"#;

const TOOLBAR: &str = r#"
SCOPE .reader-toolbar {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 8px 16px;
  border-bottom: 1px solid rgba(0,0,0,0.15);
  position: sticky;
  top: 0;
  z-index: 1;
}
SCOPE.reader-theme-dark .reader-toolbar { border-bottom-color: rgba(255,255,255,0.15); }
SCOPE .reader-left, SCOPE .reader-center, SCOPE .reader-right { display: flex; align-items: center; gap: 8px; }
SCOPE .reader-title { font-weight: 600; font-size: 14px; }
SCOPE .reader-btn {
  border: none;
  padding: 4px 10px;
  border-radius: 999px;
  font-size: 13px;
  cursor: pointer;
  background: rgba(0,0,0,0.05);
  color: inherit;
}
SCOPE.reader-theme-dark .reader-btn { background: rgba(255,255,255,0.08); }
"#;

const CONTENT: &str = r#"
SCOPE .reader-content-wrapper { flex: 1; overflow-y: auto; padding: 16px 0 32px; }
SCOPE .reader-content {
  max-width: 720px;
  margin: 0 auto;
  padding: 0 16px 32px;
  line-height: 1.6;
  font-size: var(--reader-font-size, 18px);
}
SCOPE .reader-content h1 { font-size: 1.6em; margin: 0.6em 0 0.4em; }
SCOPE .reader-content h2 { font-size: 1.4em; margin: 0.8em 0 0.4em; }
SCOPE .reader-content h3 { font-size: 1.2em; margin: 0.8em 0 0.4em; }
SCOPE .reader-content p { margin: 0.4em 0 0.6em; }
SCOPE .reader-content a { color: inherit; text-decoration: underline; }
SCOPE .reader-content img, SCOPE .reader-content figure {
  max-width: 100%;
  height: auto;
  margin: 12px auto;
  display: block;
}
SCOPE .reader-content blockquote { border-left: 3px solid currentColor; padding-left: 0.8em; margin-left: 0; }
SCOPE .reader-content table { border-collapse: collapse; width: 100%; }
SCOPE .reader-content th, SCOPE .reader-content td { border: 1px solid rgba(0,0,0,0.2); padding: 4px 6px; }
"#;

const TEXT_ONLY: &str = r#"
SCOPE.reader-text-only .reader-content img,
SCOPE.reader-text-only .reader-content figure,
SCOPE.reader-text-only .reader-content picture,
SCOPE.reader-text-only .reader-content video,
SCOPE.reader-text-only .reader-content iframe {
  display: none !important;
}
"#;

/// Stylesheet for the overlay layer
pub fn overlay_stylesheet() -> String {
    let scope = format!("#{}", OVERLAY_ID);
    [OVERLAY_BASE, THEMES, TOOLBAR, CONTENT]
        .concat()
        .replace("SCOPE", &scope)
}

/// Stylesheet for the standalone reader page
pub fn page_stylesheet() -> String {
    [PAGE_BASE, THEMES, TEXT_ONLY, TOOLBAR, CONTENT]
        .concat()
        .replace("SCOPE", "body")
}
