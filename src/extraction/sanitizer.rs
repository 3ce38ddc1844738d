//! Ad and clutter removal
//!
//! Two passes over a candidate copy. The structural pass drops whole
//! subtrees by tag and attribute shape; the textual pass then drops leaf
//! blocks whose entire text is an ad label such as "Sponsored".

use crate::config::ReaderConfig;
use crate::dom::{has_element_children, inner_html, is_element_named};
use crate::extraction::locator::{CandidateNode, LocateRule};
use kuchikikiki::NodeRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Elements that never belong in reader output
const ALWAYS_REMOVED: &[&str] = &["iframe", "frame", "script", "style"];

/// Attributes ad networks put on their slots
const AD_SLOT_ATTRIBUTES: &[&str] = &["data-ad", "data-ad-slot", "data-ad-client"];

/// Block kinds the textual pass looks at
const LABEL_KINDS: &[&str] = &["p", "div", "span"];

/// Elements that count as readable even without text
const MEDIA_KINDS: &[&str] = &["img", "picture", "figure", "video", "svg"];

/// `ad-…`, `…-ad`, `ad_…`, `…_ad`, or anything mentioning advert/sponsor
fn ad_shape() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^ad[-_]|[-_]ad$|advert|sponsor").expect("ad shape pattern is valid")
    })
}

/// `ad-`, `-ad`, `ad_`, `_ad`, advert or sponsor anywhere in a class token
fn ad_fragment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)ad[-_]|[-_]ad|advert|sponsor").expect("ad fragment pattern is valid")
    })
}

fn is_ad_class_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("ad") || ad_fragment().is_match(token)
}

fn is_ad_test_id(value: &str) -> bool {
    value.to_ascii_lowercase().contains("ad")
}

/// Counts of what a sanitize run removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    /// Subtrees dropped by tag or attribute shape
    pub structural_removed: usize,
    /// Leaf blocks dropped for being a bare ad label
    pub textual_removed: usize,
}

impl SanitizeReport {
    /// Total number of removed nodes (subtree roots)
    pub fn total(&self) -> usize {
        self.structural_removed + self.textual_removed
    }
}

/// A candidate after sanitization
#[derive(Debug, Clone)]
pub struct SanitizedContent {
    /// Root of the cleaned copy
    pub root: NodeRef,
    /// Rule the locator used
    pub rule: LocateRule,
    /// What the sanitizer removed
    pub report: SanitizeReport,
}

impl SanitizedContent {
    /// Markup of the root's children
    pub fn inner_html(&self) -> String {
        inner_html(&self.root)
    }

    /// Whether anything worth showing survived: some text, or some media
    pub fn has_readable_content(&self) -> bool {
        if !self.root.text_contents().trim().is_empty() {
            return true;
        }
        self.root
            .descendants()
            .any(|node| is_element_named(&node, MEDIA_KINDS))
    }
}

/// Ad and clutter filter
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    /// Normalized (trimmed, lowercased) ad labels
    ad_words: Vec<String>,
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new(&ReaderConfig::default())
    }
}

impl ContentSanitizer {
    /// Create a sanitizer with the config's ad label list
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            ad_words: config
                .ad_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .collect(),
        }
    }

    /// Sanitize a located candidate
    #[instrument(skip(self, candidate), fields(rule = ?candidate.rule))]
    pub fn sanitize(&self, candidate: CandidateNode) -> SanitizedContent {
        let report = self.sanitize_node(&candidate.root);
        debug!(
            "Removed {} structural and {} textual nodes",
            report.structural_removed, report.textual_removed
        );
        SanitizedContent {
            root: candidate.root,
            rule: candidate.rule,
            report,
        }
    }

    /// Run both passes over the descendants of `root`, in place
    ///
    /// `root` itself is never removed.
    pub fn sanitize_node(&self, root: &NodeRef) -> SanitizeReport {
        let mut matched = Vec::new();
        Self::collect_structural(root, &mut matched);
        for node in &matched {
            node.detach();
        }

        let textual_removed = self.strip_ad_labels(root);
        SanitizeReport {
            structural_removed: matched.len(),
            textual_removed,
        }
    }

    /// Whether no descendant of `root` would be removed by either pass
    pub fn is_clean(&self, root: &NodeRef) -> bool {
        root.descendants().all(|node| {
            !Self::is_structural_match(&node) && !self.is_ad_label_leaf(&node)
        })
    }

    /// Structural rule: tag, id shape, class token shape, or ad-slot attribute
    pub fn is_structural_match(node: &NodeRef) -> bool {
        let Some(el) = node.as_element() else {
            return false;
        };
        if ALWAYS_REMOVED.contains(&&*el.name.local) {
            return true;
        }

        let attrs = el.attributes.borrow();
        if attrs.get("id").map_or(false, |id| ad_shape().is_match(id)) {
            return true;
        }
        if attrs
            .get("class")
            .map_or(false, |class| class.split_whitespace().any(is_ad_class_token))
        {
            return true;
        }
        if AD_SLOT_ATTRIBUTES.iter().any(|name| attrs.contains(*name)) {
            return true;
        }
        attrs.get("data-testid").map_or(false, is_ad_test_id)
    }

    /// Whether a normalized text is exactly one of the ad labels
    pub fn is_ad_label(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        self.ad_words.iter().any(|word| *word == normalized)
    }

    fn is_ad_label_leaf(&self, node: &NodeRef) -> bool {
        is_element_named(node, LABEL_KINDS)
            && !has_element_children(node)
            && self.is_ad_label(&node.text_contents())
    }

    /// Collect the outermost structural matches below `node`
    fn collect_structural(node: &NodeRef, matched: &mut Vec<NodeRef>) {
        for child in node.children() {
            if Self::is_structural_match(&child) {
                matched.push(child);
            } else {
                Self::collect_structural(&child, matched);
            }
        }
    }

    /// Children before parents, so a container emptied here is judged as
    /// the leaf it has become
    fn strip_ad_labels(&self, node: &NodeRef) -> usize {
        let mut removed = 0;
        let children: Vec<NodeRef> = node
            .children()
            .filter(|child| child.as_element().is_some())
            .collect();
        for child in children {
            removed += self.strip_ad_labels(&child);
            if self.is_ad_label_leaf(&child) {
                child.detach();
                removed += 1;
            }
        }
        removed
    }
}
