//! Replace surface: a standalone reader document substituted for the page

use crate::config::ReaderConfig;
use crate::dom::Page;
use crate::extraction::SanitizedContent;
use crate::presentation::style::page_stylesheet;
use crate::presentation::toolbar::toolbar_markup;
use crate::presentation::{
    placeholder_markup, ReaderSurface, Renderer, Strategy, Theme, CONTENT_CLASS,
    READER_PAGE_CLASS,
};
use tracing::{info, instrument, warn};

/// Renders the reader as a complete document replacing the page
#[derive(Debug, Clone)]
pub struct ReplaceRenderer {
    title_label: String,
    placeholder: String,
    theme: Theme,
}

impl ReplaceRenderer {
    /// Create a replace renderer
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            title_label: config.title_label.clone(),
            placeholder: config.placeholder.clone(),
            theme: config.default_theme,
        }
    }

    /// The standalone reader document for `title` around `article_html`
    pub fn document_markup(&self, title: &str, article_html: &str) -> String {
        let title = if title.trim().is_empty() {
            self.title_label.as_str()
        } else {
            title
        };
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8" />
<title>{title}</title>
<style>{css}</style>
</head>
<body class="{page_class} {theme}">
{toolbar}
<div class="reader-content-wrapper">
<div class="{content}">
{article}
</div>
</div>
</body>
</html>"#,
            title = htmlescape::encode_minimal(title),
            css = page_stylesheet(),
            page_class = READER_PAGE_CLASS,
            theme = self.theme.class_name(),
            toolbar = toolbar_markup(&self.title_label, "Exit Reader"),
            content = CONTENT_CLASS,
            article = article_html,
        )
    }
}

impl Renderer for ReplaceRenderer {
    fn strategy(&self) -> Strategy {
        Strategy::Replace
    }

    #[instrument(skip(self, page, content))]
    fn render(&self, page: &mut Page, content: SanitizedContent) -> Option<ReaderSurface> {
        page.body()?;

        let article_html = if content.has_readable_content() {
            content.inner_html()
        } else {
            placeholder_markup(&self.placeholder)
        };
        let markup = self.document_markup(&page.title(), &article_html);

        // Build, attach, then look the live nodes up in the new document
        page.replace_document(&markup);
        let body = page.body()?;
        let Ok(pane) = page.document().select_first(&format!(".{}", CONTENT_CLASS)) else {
            warn!("Reader document has no content pane");
            return None;
        };
        info!("Page replaced with reader document");

        Some(ReaderSurface {
            strategy: Strategy::Replace,
            root: body,
            content: pane.as_node().clone(),
            generation: page.generation(),
            saved_overflow: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::has_class;
    use crate::extraction::{ContentLocator, ContentSanitizer};
    use kuchikikiki::NodeRef;

    fn render(page: &mut Page) -> Option<ReaderSurface> {
        let candidate = ContentLocator::default().locate(page.document());
        let content = ContentSanitizer::default().sanitize(candidate);
        ReplaceRenderer::new(&ReaderConfig::default()).render(page, content)
    }

    #[test]
    fn test_replaced_document_markers() {
        let mut page = Page::parse(
            "<html><head><title>News &amp; Views</title></head><body><nav>menu</nav><article><h1>Head</h1><p>Body</p><script>x()</script></article></body></html>",
        );
        let surface = render(&mut page).unwrap();

        assert_eq!(page.title(), "News & Views");
        assert!(has_class(&surface.root, "simple-reader-page"));
        assert!(has_class(&surface.root, "reader-theme-light"));
        assert!(!has_class(&surface.root, "reader-text-only"));
        assert_eq!(surface.content.text_contents().trim(), "HeadBody");
        assert!(!page.to_html().contains("menu"));
        assert!(!page.to_html().contains("x()"));
        assert!(page.to_html().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_missing_title_uses_label() {
        let renderer = ReplaceRenderer::new(&ReaderConfig::default());
        let markup = renderer.document_markup("  ", "<p>x</p>");
        assert!(markup.contains("<title>Reader Mode</title>"));
    }

    #[test]
    fn test_title_escaped() {
        let renderer = ReplaceRenderer::new(&ReaderConfig::default());
        let markup = renderer.document_markup("</title><script>", "");
        assert!(markup.contains("<title>&lt;/title&gt;&lt;script&gt;</title>"));
    }

    #[test]
    fn test_placeholder_when_empty() {
        let mut page = Page::parse("<body><span>Advertisement</span></body>");
        let surface = render(&mut page).unwrap();
        assert_eq!(
            surface.content.text_contents().trim(),
            "(No readable content found.)"
        );
    }

    #[test]
    fn test_no_body_leaves_page() {
        let mut page = Page::from_document(NodeRef::new_document());
        assert!(render(&mut page).is_none());
        assert_eq!(page.generation(), 0);
    }
}
