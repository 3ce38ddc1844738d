//! Reader session tests
//!
//! These tests drive whole activations against both surfaces and check the
//! page afterwards.

use pretty_assertions::assert_eq;
use reasonkit_reader::dom::{has_class, style_property};
use reasonkit_reader::presentation::{OVERLAY_ID, READER_PAGE_CLASS, TEXT_ONLY_CLASS};
use reasonkit_reader::session::ActionOutcome;
use reasonkit_reader::{
    Activation, CloseOutcome, Error, Page, ReaderConfig, ReaderSession, SessionAction, Strategy,
    Theme,
};

const STORY: &str = r#"<html>
<head><title>Harbour news</title></head>
<body>
  <nav>Home | World | Sport</nav>
  <article>
    <h1>Boats return</h1>
    <p>The fleet came back at dawn.</p>
    <div class="ad-banner"><img src="buy.png"></div>
    <p>Sponsored</p>
    <figure><img src="boats.jpg"><figcaption>Boats</figcaption></figure>
  </article>
</body>
</html>"#;

fn session(strategy: Strategy) -> ReaderSession {
    ReaderSession::new(ReaderConfig::builder().strategy(strategy).build().unwrap())
}

fn overlay_count(page: &Page) -> usize {
    page.document()
        .select(&format!("#{}", OVERLAY_ID))
        .map(|nodes| nodes.count())
        .unwrap_or(0)
}

// ============================================================================
// Overlay
// ============================================================================

#[test]
fn test_overlay_opens_with_clean_content() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Overlay);

    let Activation::Opened(summary) = session.activate(&mut page).unwrap() else {
        panic!("expected the overlay to open");
    };
    assert_eq!(summary.removed.structural_removed, 1);
    assert_eq!(summary.removed.textual_removed, 1);
    assert!(!summary.placeholder);

    assert_eq!(overlay_count(&page), 1);
    let root = page.root_element().unwrap();
    assert_eq!(style_property(&root, "overflow").as_deref(), Some("hidden"));

    let overlay = page.document().select_first(".reader-content").unwrap();
    let text = overlay.as_node().text_contents();
    assert!(text.contains("The fleet came back"));
    assert!(!text.contains("Sponsored"));
    assert!(overlay.as_node().select_first("img[src='buy.png']").is_err());

    // Original page stays underneath, untouched
    assert!(page.document().select_first("nav").is_ok());
    assert!(page.document().select_first(".ad-banner").is_ok());
}

#[test]
fn test_overlay_double_activation_restores_page() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Overlay);

    session.activate(&mut page).unwrap();
    let outcome = session.activate(&mut page).unwrap();

    assert_eq!(outcome, Activation::Closed(CloseOutcome::Removed));
    assert_eq!(overlay_count(&page), 0);
    let root = page.root_element().unwrap();
    assert_eq!(style_property(&root, "overflow"), None);
    assert!(!session.is_active(&page));
}

#[test]
fn test_overlay_never_stacks() {
    let mut page = Page::parse(STORY);
    for expected in [1, 0, 1, 0] {
        let mut session = session(Strategy::Overlay);
        session.activate(&mut page).unwrap();
        assert_eq!(overlay_count(&page), expected);
    }
    let root = page.root_element().unwrap();
    assert_eq!(style_property(&root, "overflow"), None);
}

#[test]
fn test_short_page_with_leftover_layer_closes_it() {
    let mut page = Page::parse("<body><p>short text</p></body>");
    session(Strategy::Overlay).activate(&mut page).unwrap();

    let mut fresh = session(Strategy::Overlay);
    assert_eq!(
        fresh.activate(&mut page).unwrap(),
        Activation::Closed(CloseOutcome::Removed)
    );
    assert_eq!(overlay_count(&page), 0);

    assert!(matches!(fresh.activate(&mut page).unwrap(), Activation::Opened(_)));
    assert_eq!(overlay_count(&page), 1);
    let toolbars = page.document().select(".reader-toolbar").unwrap().count();
    assert_eq!(toolbars, 1);
    let pane = page.document().select_first(".reader-content").unwrap();
    assert_eq!(pane.as_node().text_contents().trim(), "short text");
}

#[test]
fn test_saved_overlay_round_trip_unlocks_scroll() {
    let mut page = Page::parse(STORY);
    session(Strategy::Overlay).activate(&mut page).unwrap();

    let mut saved = Page::parse(&page.to_html());
    let mut fresh = session(Strategy::Overlay);
    assert!(fresh.resume(&saved));
    assert_eq!(
        fresh.activate(&mut saved).unwrap(),
        Activation::Closed(CloseOutcome::Removed)
    );
    assert_eq!(overlay_count(&saved), 0);
    let root = saved.root_element().unwrap();
    assert_eq!(style_property(&root, "overflow"), None);
}

#[test]
fn test_overlay_text_only_is_unsupported() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Overlay);
    session.activate(&mut page).unwrap();

    assert!(matches!(
        session.apply(SessionAction::TextOnly, &mut page),
        Err(Error::Unsupported { .. })
    ));
    assert_eq!(overlay_count(&page), 1);
}

#[test]
fn test_close_button_removes_overlay() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Overlay);
    session.activate(&mut page).unwrap();

    let close = page
        .document()
        .select_first(".reader-close-btn")
        .unwrap()
        .as_node()
        .clone();
    session.click(&close, &mut page).unwrap();

    assert_eq!(overlay_count(&page), 0);
    assert!(session.controller().is_none());
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn test_font_size_clamped_both_ways() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Overlay);
    session.activate(&mut page).unwrap();

    for _ in 0..8 {
        session.apply(SessionAction::Grow, &mut page).unwrap();
    }
    assert_eq!(session.controller().unwrap().font_size(), 30);

    // Closing and reopening starts over at the default size
    session.activate(&mut page).unwrap();
    session.activate(&mut page).unwrap();
    assert_eq!(session.controller().unwrap().font_size(), 18);
    for _ in 0..8 {
        session.apply(SessionAction::Shrink, &mut page).unwrap();
    }
    assert_eq!(session.controller().unwrap().font_size(), 12);
}

#[test]
fn test_last_theme_wins() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Replace);
    session.activate(&mut page).unwrap();

    session
        .apply(SessionAction::Theme(Theme::Dark), &mut page)
        .unwrap();
    session
        .apply(SessionAction::Theme(Theme::Sepia), &mut page)
        .unwrap();

    let body = page.body().unwrap();
    let active: Vec<Theme> = Theme::ALL
        .into_iter()
        .filter(|theme| has_class(&body, &theme.class_name()))
        .collect();
    assert_eq!(active, vec![Theme::Sepia]);
}

// ============================================================================
// Replace
// ============================================================================

#[test]
fn test_replace_builds_reader_document() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Replace);
    let generation = page.generation();

    assert!(matches!(
        session.activate(&mut page).unwrap(),
        Activation::Opened(_)
    ));
    assert!(page.generation() > generation);
    assert_eq!(page.title(), "Harbour news");

    let body = page.body().unwrap();
    assert!(has_class(&body, READER_PAGE_CLASS));
    assert!(has_class(&body, "reader-theme-light"));
    assert!(page.document().select_first("nav").is_err());
    assert!(page.document().select_first("style").is_ok());
}

#[test]
fn test_replace_reactivation_toggles_text_only() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Replace);
    session.activate(&mut page).unwrap();
    let content_before = page
        .document()
        .select_first(".reader-content")
        .unwrap()
        .as_node()
        .to_string();
    let generation = page.generation();

    assert_eq!(
        session.activate(&mut page).unwrap(),
        Activation::TextOnlyToggled(true)
    );
    assert!(has_class(&page.body().unwrap(), TEXT_ONLY_CLASS));
    assert_eq!(page.generation(), generation);

    assert_eq!(
        session.activate(&mut page).unwrap(),
        Activation::TextOnlyToggled(false)
    );
    assert!(!has_class(&page.body().unwrap(), TEXT_ONLY_CLASS));

    // Media only hidden by style, never removed
    let content_after = page
        .document()
        .select_first(".reader-content")
        .unwrap()
        .as_node()
        .to_string();
    assert_eq!(content_after, content_before);
}

#[test]
fn test_replace_close_goes_back() {
    let mut page = Page::with_history(vec![
        "<html><head><title>Front page</title></head><body></body></html>".to_string(),
        STORY.to_string(),
    ]);
    let mut session = session(Strategy::Replace);
    session.activate(&mut page).unwrap();

    let outcome = session.apply(SessionAction::Close, &mut page).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Control(reasonkit_reader::presentation::ControlOutcome::Closed(
            CloseOutcome::WentBack
        ))
    ));
    assert_eq!(page.title(), "Front page");
}

#[test]
fn test_replace_close_without_history_reloads() {
    let mut page = Page::parse(STORY);
    let mut session = session(Strategy::Replace);
    session.activate(&mut page).unwrap();

    assert_eq!(session.close(&mut page), Some(CloseOutcome::Reloaded));
    assert!(page.document().select_first("nav").is_ok());
    assert!(!has_class(&page.body().unwrap(), READER_PAGE_CLASS));
}

#[test]
fn test_resume_saved_reader_page() {
    let mut page = Page::parse(STORY);
    let mut first = session(Strategy::Replace);
    first.activate(&mut page).unwrap();
    first.apply(SessionAction::Grow, &mut page).unwrap();

    let mut saved = Page::parse(&page.to_html());
    let mut second = session(Strategy::Replace);
    assert!(second.resume(&saved));
    assert_eq!(second.controller().unwrap().font_size(), 20);
    assert_eq!(
        second.activate(&mut saved).unwrap(),
        Activation::TextOnlyToggled(true)
    );
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_empty_page_shows_placeholder() {
    let mut page = Page::parse("<html><body><script>x()</script></body></html>");
    let mut session = session(Strategy::Overlay);

    let Activation::Opened(summary) = session.activate(&mut page).unwrap() else {
        panic!("expected the overlay to open");
    };
    assert!(summary.placeholder);
    let pane = page.document().select_first(".reader-content").unwrap();
    assert!(pane
        .as_node()
        .text_contents()
        .contains("(No readable content found.)"));
}

#[test]
fn test_bodyless_document_is_skipped() {
    let mut page = Page::from_document(kuchikikiki::NodeRef::new_document());
    let mut session = session(Strategy::Overlay);

    assert_eq!(session.activate(&mut page).unwrap(), Activation::Skipped);
    assert!(!session.is_active(&page));
}
