use super::*;

#[test]
fn empty_database_is_environment_error() {
    let book = FontBook::with_database(usvg::fontdb::Database::new());
    assert_eq!(book.face_count(), 0);
    let err = book.resolve(&FontSpec::bold("Arial")).unwrap_err();
    assert!(matches!(err, BadgeError::Environment(_)));
}

#[test]
fn missing_font_file_is_asset_load_error() {
    let spec = FontSpec {
        file: Some(PathBuf::from("target/no/such/font.ttf")),
        ..FontSpec::default()
    };
    let book = FontBook::with_database(usvg::fontdb::Database::new());
    let err = book.resolve(&spec).unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));
}

#[test]
fn system_lookup_falls_back_and_caches() {
    let book = FontBook::new();
    if book.face_count() == 0 {
        eprintln!("skipping: host has no font faces");
        return;
    }

    let spec = FontSpec::bold("Definitely Not A Real Family");
    let a = book.resolve(&spec).unwrap();
    assert!(!a.bytes.is_empty());

    let b = book.resolve(&spec).unwrap();
    assert!(Arc::ptr_eq(&a.bytes, &b.bytes));
}

#[test]
fn spec_defaults_deserialize_from_partial_json() {
    let spec: FontSpec = serde_json::from_str(r#"{ "weight": 700 }"#).unwrap();
    assert_eq!(spec, FontSpec::bold("Arial"));

    let spec: FontSpec = serde_json::from_str(r#"{ "italic": true }"#).unwrap();
    assert_eq!(spec, FontSpec::italic("Arial"));
}
