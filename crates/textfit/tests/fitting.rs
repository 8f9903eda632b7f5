use textfit::{Document, ElementData, FitConfig, Fitter, SimDocument};

fn fitter(doc: SimDocument) -> Fitter<SimDocument> {
    let _ = env_logger::builder().is_test(true).try_init();
    Fitter::new(doc, FitConfig::default()).expect("fitter")
}

#[test]
fn shrinks_overflowing_text_until_it_fits() {
    // Visible width 100px; 26 chars at 20px render at 260px scroll width
    // under the 0.5 advance model. Largest integer fit: 13s <= 100 -> 7px.
    let mut doc = SimDocument::new();
    let node = doc.insert(ElementData::new("div", &"x".repeat(26), 100.0, 20.0).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    let doc = fitter.document();
    assert_eq!(doc.effective_font_size(node), Some(7.0));
    assert_eq!(doc.rule_property(0, "font-size"), Some("7px"));
    // Fit guarantee: content width no longer exceeds visible width.
    assert!(doc.scroll_width(node).unwrap() <= doc.client_width(node).unwrap());
}

#[test]
fn fitting_text_keeps_its_original_size() {
    let mut doc = SimDocument::new();
    // 8 chars at 20px -> 80px intrinsic, fits in 100px.
    let node = doc.insert(ElementData::new("div", "headline", 100.0, 20.0).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    assert_eq!(fitter.document().effective_font_size(node), Some(20.0));
    // One measurement: the probe already fit.
    assert_eq!(fitter.total_measurements(), 1);
}

#[test]
fn committed_size_never_exceeds_the_original() {
    let mut doc = SimDocument::new();
    let wide = doc.insert(ElementData::new("div", "ok", 100.0, 20.0).with_class("card"));
    let narrow = doc.insert(ElementData::new("div", &"y".repeat(40), 60.0, 18.0).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    for charge in fitter.charges() {
        let original = fitter.original_font_size(charge.node).unwrap();
        let committed = fitter.document().effective_font_size(charge.node).unwrap();
        assert!(committed <= original, "{committed} > {original}");
    }
    assert_eq!(fitter.original_font_size(wide), Some(20.0));
    assert_eq!(fitter.original_font_size(narrow), Some(18.0));
}

#[test]
fn floor_stops_the_loop_without_fit() {
    let mut doc = SimDocument::new();
    // 100 chars in a 4px box never fit: 50s > 4 for any s >= 1.
    let node = doc.insert(ElementData::new("div", &"z".repeat(100), 4.0, 20.0).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    let doc = fitter.document();
    assert_eq!(doc.effective_font_size(node), Some(1.0));
    // Still overflowing at the floor; that is the documented boundary case.
    assert!(doc.scroll_width(node).unwrap() > doc.client_width(node).unwrap());
}

#[test]
fn configured_floor_is_respected() {
    let mut doc = SimDocument::new();
    let node = doc.insert(ElementData::new("div", &"z".repeat(100), 4.0, 20.0).with_class("card"));
    let _ = env_logger::builder().is_test(true).try_init();
    let config = FitConfig {
        min_font_px: 5.0,
        ..FitConfig::default()
    };
    let mut fitter = Fitter::new(doc, config).expect("fitter");
    fitter.init(&[".card"]).unwrap();

    assert_eq!(fitter.document().effective_font_size(node), Some(5.0));
}

#[test]
fn display_none_elements_are_skipped() {
    let mut doc = SimDocument::new();
    let hidden = doc.insert(ElementData::new("div", &"x".repeat(80), 100.0, 20.0).with_class("card").hidden());
    let visible = doc.insert(ElementData::new("div", &"x".repeat(26), 100.0, 20.0).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    // The hidden element commits its starting size untouched; the visible
    // one still shrinks the shared group afterwards.
    assert_eq!(fitter.passes_completed(), 1);
    assert_eq!(fitter.document().effective_font_size(visible), Some(7.0));
    // The hidden element shares the rule, so it picks the group size up too.
    assert_eq!(fitter.document().effective_font_size(hidden), Some(7.0));
}

#[test]
fn fractional_originals_search_integer_sizes() {
    let mut doc = SimDocument::new();
    // 10 chars, 20px box: 5s <= 20 -> 4px; the 16.5px original first snaps
    // down to 16 and then steps by whole pixels.
    let node = doc.insert(ElementData::new("div", &"q".repeat(10), 20.0, 16.5).with_class("card"));
    let mut fitter = fitter(doc);
    fitter.init(&[".card"]).unwrap();

    let committed = fitter.document().effective_font_size(node).unwrap();
    assert_eq!(committed, 4.0);
    assert_eq!(committed.fract(), 0.0);
}
