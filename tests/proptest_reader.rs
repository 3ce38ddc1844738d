//! Property-based tests for the reader
//!
//! Uses proptest to check invariants that must hold for any page shape or
//! control sequence, not just the hand-written fixtures.

use proptest::prelude::*;
use reasonkit_reader::extraction::{ContentLocator, ContentSanitizer};
use reasonkit_reader::{Page, ReaderConfig, ReaderSession, SessionAction, Theme};

// ============================================================================
// Strategies
// ============================================================================

/// Attribute fragments, some of them ad-shaped
pub fn arb_attribute() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(r#" class="story""#.to_string()),
        Just(r#" class="ad-slot""#.to_string()),
        Just(r#" class="header_ad""#.to_string()),
        Just(r#" id="advert-7""#.to_string()),
        Just(r#" id="lead""#.to_string()),
        Just(r#" data-ad-client="x""#.to_string()),
        Just(r#" data-testid="sponsored-card""#.to_string()),
    ]
}

/// Leaf text, some of it an exact ad label
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Sponsored".to_string()),
        Just(" ADVERTISEMENT ".to_string()),
        Just("Ad".to_string()),
        Just("Sponsored discussion".to_string()),
        "[a-z ]{0,40}",
    ]
}

/// Arbitrary nested markup built from a handful of block kinds
pub fn arb_markup() -> impl Strategy<Value = String> {
    let leaf = (
        prop::sample::select(vec!["p", "span", "div", "h2", "script", "iframe"]),
        arb_attribute(),
        arb_text(),
    )
        .prop_map(|(tag, attrs, text)| format!("<{tag}{attrs}>{text}</{tag}>"));

    leaf.prop_recursive(4, 48, 6, |inner| {
        (
            prop::sample::select(vec!["div", "section", "aside", "span"]),
            arb_attribute(),
            prop::collection::vec(inner, 0..6),
        )
            .prop_map(|(tag, attrs, children)| {
                format!("<{tag}{attrs}>{}</{tag}>", children.concat())
            })
    })
}

pub fn arb_control() -> impl Strategy<Value = SessionAction> {
    prop_oneof![
        Just(SessionAction::Grow),
        Just(SessionAction::Shrink),
        prop::sample::select(Theme::ALL.to_vec()).prop_map(SessionAction::Theme),
    ]
}

// ============================================================================
// Sanitizer properties
// ============================================================================

proptest! {
    #[test]
    fn prop_sanitize_is_idempotent(markup in arb_markup()) {
        let page = Page::parse(&format!("<body><main>{}</main></body>", markup));
        let sanitizer = ContentSanitizer::default();
        let candidate = ContentLocator::default().locate(page.document());

        let content = sanitizer.sanitize(candidate);
        let once = content.root.to_string();
        let again = sanitizer.sanitize_node(&content.root);

        prop_assert_eq!(again.total(), 0);
        prop_assert_eq!(content.root.to_string(), once);
        prop_assert!(sanitizer.is_clean(&content.root));
    }

    #[test]
    fn prop_locate_leaves_page_untouched(markup in arb_markup()) {
        let page = Page::parse(&format!("<body>{}</body>", markup));
        let before = page.to_html();

        let candidate = ContentLocator::default().locate(page.document());
        ContentSanitizer::default().sanitize(candidate);

        prop_assert_eq!(page.to_html(), before);
    }
}

// ============================================================================
// Controller properties
// ============================================================================

proptest! {
    #[test]
    fn prop_font_size_stays_in_bounds(controls in prop::collection::vec(arb_control(), 0..40)) {
        let config = ReaderConfig::default();
        let mut page = Page::parse("<body><article><p>Text</p></article></body>");
        let mut session = ReaderSession::new(config.clone());
        session.activate(&mut page).unwrap();

        let mut last_theme = config.default_theme;
        for control in controls {
            if let SessionAction::Theme(theme) = control {
                last_theme = theme;
            }
            session.apply(control, &mut page).unwrap();

            let controller = session.controller().unwrap();
            prop_assert!(controller.font_size() >= config.font.min);
            prop_assert!(controller.font_size() <= config.font.max);
            prop_assert_eq!(controller.theme(), last_theme);
        }
    }
}
