use super::*;
use crate::assets::fonts::{FontBook, FontSpec};

const WHITE: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

fn system_font(spec: &FontSpec) -> Option<ResolvedFont> {
    let book = FontBook::new();
    if book.face_count() == 0 {
        eprintln!("skipping: host has no font faces");
        return None;
    }
    Some(book.resolve(spec).unwrap())
}

fn params(size_px: f32) -> TextParams {
    TextParams {
        size_px,
        weight: 700,
        italic: false,
        brush: WHITE,
    }
}

#[test]
fn invalid_size_is_rejected() {
    let font = ResolvedFont {
        bytes: Arc::new(Vec::new()),
        index: 0,
        family: None,
    };
    let mut engine = TextLayoutEngine::new();
    assert!(matches!(
        engine.layout_line("x", &font, params(0.0)),
        Err(BadgeError::Validation(_))
    ));
    assert!(matches!(
        engine.layout_line("x", &font, params(f32::NAN)),
        Err(BadgeError::Validation(_))
    ));
}

#[test]
fn garbage_font_bytes_are_asset_load_error() {
    let font = ResolvedFont {
        bytes: Arc::new(b"not a font".to_vec()),
        index: 0,
        family: None,
    };
    let mut engine = TextLayoutEngine::new();
    assert!(matches!(
        engine.layout_line("x", &font, params(48.0)),
        Err(BadgeError::AssetLoad(_))
    ));
}

#[test]
fn longer_text_is_wider_and_centered_on_anchor() {
    let Some(font) = system_font(&FontSpec::bold("Arial")) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let short = engine.layout_line("Ada", &font, params(48.0)).unwrap();
    let long = engine
        .layout_line("Ada Lovelace", &font, params(48.0))
        .unwrap();
    assert!(!long.font_family.trim().is_empty());
    assert!(long.width > short.width);
    assert!(long.baseline > 0.0 && long.baseline <= 96.0);

    let anchor = TextAnchor { x: 600.0, y: 580.0 };
    let origin = long.origin_for_anchor(anchor);
    let center = origin.x + f64::from(long.width) / 2.0;
    assert!((center - 600.0).abs() < 1e-3);
    assert!((origin.y + f64::from(long.baseline) - 580.0).abs() < 1e-3);
}

#[test]
fn control_whitespace_shapes_as_one_line() {
    let Some(font) = system_font(&FontSpec::bold("Arial")) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let spaced = engine
        .layout_line("Ada Lovelace", &font, params(48.0))
        .unwrap();
    for text in ["Ada\nLovelace", "Ada\r\nLovelace", "Ada\tLovelace"] {
        let prepared = engine.layout_line(text, &font, params(48.0)).unwrap();
        assert_eq!(prepared.layout.lines().count(), 1, "{text:?}");
        assert_eq!(prepared.baseline, spaced.baseline, "{text:?}");
    }
    let lf = engine
        .layout_line("Ada\nLovelace", &font, params(48.0))
        .unwrap();
    assert!((lf.width - spaced.width).abs() < 1e-3);
}

#[test]
fn trailing_spaces_count_toward_width() {
    let Some(font) = system_font(&FontSpec::bold("Arial")) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let bare = engine.layout_line("Ada", &font, params(48.0)).unwrap();
    let padded = engine
        .layout_line("Ada      ", &font, params(48.0))
        .unwrap();
    assert!(padded.width > bare.width + 10.0);

    let anchor = TextAnchor { x: 600.0, y: 580.0 };
    assert!(padded.origin_for_anchor(anchor).x < bare.origin_for_anchor(anchor).x);
}
