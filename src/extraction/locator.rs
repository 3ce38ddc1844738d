//! Main content location
//!
//! Picks the subtree most likely to hold the article body and deep-clones it,
//! so nothing downstream can reach back into the live page. A reader layer
//! already on the page is never part of the candidate.

use crate::config::ReaderConfig;
use crate::dom::{attr, deep_clone, element_from_markup};
use crate::presentation::OVERLAY_ID;
use kuchikikiki::NodeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const ARTICLE_SELECTOR: &str = "article, [role~=article]";
const MAIN_SELECTOR: &str = "main, [role~=main]";
const TEXT_BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6";

/// Which rule produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocateRule {
    /// First article-role element
    Article,
    /// First main-role element
    Main,
    /// Paragraphs and headings gathered into a fresh container
    Synthetic,
    /// Whole body, the page had too little block text
    Body,
    /// The page had no body at all
    Empty,
}

/// A detached deep copy of the chosen subtree
#[derive(Debug, Clone)]
pub struct CandidateNode {
    /// Root of the copy
    pub root: NodeRef,
    /// Rule that selected it
    pub rule: LocateRule,
    /// Rendered text length, in characters
    pub text_length: usize,
}

/// Main content locator
#[derive(Debug, Clone)]
pub struct ContentLocator {
    min_text_length: usize,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(&ReaderConfig::default())
    }
}

impl ContentLocator {
    /// Create a locator using the config's fallback threshold
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
        }
    }

    /// Locate the main content of `document`
    ///
    /// Never fails; the worst case is a copy of the body, or an empty
    /// container when there is no body either.
    #[instrument(skip(self, document))]
    pub fn locate(&self, document: &NodeRef) -> CandidateNode {
        if let Some(candidate) = Self::clone_first(document, ARTICLE_SELECTOR, LocateRule::Article)
        {
            return candidate;
        }
        if let Some(candidate) = Self::clone_first(document, MAIN_SELECTOR, LocateRule::Main) {
            return candidate;
        }

        let container = element_from_markup("<div></div>");
        let mut text_length = 0;
        if let Ok(blocks) = document.select(TEXT_BLOCK_SELECTOR) {
            for block in blocks.filter(|block| !in_reader_layer(block.as_node())) {
                let text = block.as_node().text_contents();
                if text.trim().is_empty() {
                    continue;
                }
                text_length += text.chars().count();
                container.append(deep_clone(block.as_node()));
            }
        }

        if text_length >= self.min_text_length {
            info!("Gathered {} chars of paragraph/heading text", text_length);
            return CandidateNode {
                root: container,
                rule: LocateRule::Synthetic,
                text_length,
            };
        }

        debug!(
            "Only {} chars of block text (< {}), falling back to body",
            text_length, self.min_text_length
        );
        match document.select_first("body") {
            Ok(body) => {
                let root = deep_clone(body.as_node());
                strip_reader_layers(&root);
                let text_length = root.text_contents().chars().count();
                CandidateNode {
                    root,
                    rule: LocateRule::Body,
                    text_length,
                }
            }
            Err(()) => CandidateNode {
                root: element_from_markup("<div></div>"),
                rule: LocateRule::Empty,
                text_length: 0,
            },
        }
    }

    fn clone_first(document: &NodeRef, selector: &str, rule: LocateRule) -> Option<CandidateNode> {
        let found = document
            .select(selector)
            .ok()?
            .find(|found| !in_reader_layer(found.as_node()))?;
        let root = deep_clone(found.as_node());
        strip_reader_layers(&root);
        let text_length = root.text_contents().chars().count();
        info!("Located {:?} element with {} chars", rule, text_length);
        Some(CandidateNode {
            root,
            rule,
            text_length,
        })
    }
}

fn is_reader_layer(node: &NodeRef) -> bool {
    attr(node, "id").as_deref() == Some(OVERLAY_ID)
}

fn in_reader_layer(node: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|ancestor| is_reader_layer(&ancestor))
}

/// Drop copies of a reader layer from a cloned subtree
fn strip_reader_layers(root: &NodeRef) {
    let layers: Vec<NodeRef> = root
        .descendants()
        .filter(|node| is_reader_layer(node))
        .collect();
    for layer in layers {
        debug!("Excluding existing reader layer from candidate");
        layer.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{attr, Page};

    fn long_text(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn test_article_wins_over_main() {
        let page = Page::parse(
            "<body><main id='m'><p>main</p></main><article id='a1'><p>one</p></article><article id='a2'></article></body>",
        );
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Article);
        assert_eq!(attr(&candidate.root, "id").as_deref(), Some("a1"));
        assert!(candidate.root.parent().is_none());
    }

    #[test]
    fn test_role_attribute_counts() {
        let page = Page::parse("<body><div role='main' id='r'><p>hi</p></div></body>");
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Main);
        assert_eq!(attr(&candidate.root, "id").as_deref(), Some("r"));
    }

    #[test]
    fn test_synthetic_container_skips_blank_blocks() {
        let markup = format!(
            "<body><h1>Title</h1><p>   </p><div><p>{}</p></div></body>",
            long_text(250)
        );
        let page = Page::parse(&markup);
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Synthetic);
        assert_eq!(candidate.root.children().count(), 2);
        assert_eq!(candidate.text_length, 255);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let markup = format!("<body><p>{}</p></body>", long_text(200));
        let page = Page::parse(&markup);
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Synthetic);
    }

    #[test]
    fn test_short_page_falls_back_to_body() {
        let page = Page::parse("<body><p>short</p><span>other</span></body>");
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Body);
        assert!(candidate.root.text_contents().contains("other"));
    }

    #[test]
    fn test_configurable_threshold() {
        let config = ReaderConfig::builder().min_text_length(3).build().unwrap();
        let page = Page::parse("<body><p>short</p></body>");
        let candidate = ContentLocator::new(&config).locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Synthetic);
    }

    #[test]
    fn test_existing_reader_layer_excluded() {
        let page = Page::parse(
            "<body><p>short text</p><div id='reader-mode-overlay'><article><p>old pane</p></article></div></body>",
        );
        let candidate = ContentLocator::default().locate(page.document());
        assert_eq!(candidate.rule, LocateRule::Body);
        assert!(candidate.root.select_first("#reader-mode-overlay").is_err());
        assert_eq!(candidate.root.text_contents(), "short text");
    }

    #[test]
    fn test_no_body_gives_empty_container() {
        let candidate = ContentLocator::default().locate(&NodeRef::new_document());
        assert_eq!(candidate.rule, LocateRule::Empty);
        assert_eq!(candidate.text_length, 0);
    }
}
