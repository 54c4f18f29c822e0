use super::*;

#[test]
fn timeout_parsing_falls_back_on_garbage() {
    assert_eq!(parse_timeout_ms(None), Duration::from_secs(10));
    assert_eq!(parse_timeout_ms(Some("250")), Duration::from_millis(250));
    assert_eq!(parse_timeout_ms(Some(" 42 ")), Duration::from_millis(42));
    assert_eq!(parse_timeout_ms(Some("0")), Duration::from_secs(10));
    assert_eq!(parse_timeout_ms(Some("soon")), Duration::from_secs(10));
}

#[test]
fn strict_switches_policy_only() {
    let opts = CompositorOpts {
        photo_failure: PhotoFailurePolicy::Degrade,
        timeout: Duration::from_millis(5),
    };
    let strict = opts.strict();
    assert_eq!(strict.photo_failure, PhotoFailurePolicy::Abort);
    assert_eq!(strict.timeout, Duration::from_millis(5));
    assert_eq!(PhotoFailurePolicy::default(), PhotoFailurePolicy::Degrade);
}

#[test]
fn rendered_badge_helpers() {
    let badge = RenderedBadge {
        width: 1,
        height: 1,
        png: vec![1, 2, 3],
    };
    assert_eq!(badge.data_url(), "data:image/png;base64,AQID");
    assert!(badge.to_rgba8().is_err());
    assert_eq!(
        RenderedBadge::file_name_for("Ada Lovelace"),
        "Ada_Lovelace_HER_DAO_Badge.png"
    );
}

#[test]
fn request_builder() {
    let req = BadgeRequest::new("Ada", "Engineer").with_photo(ImageSource::from_path("ada.png"));
    assert_eq!(req.name, "Ada");
    assert_eq!(req.role, "Engineer");
    assert_eq!(req.photo, Some(ImageSource::File("ada.png".into())));
}
