use super::*;

#[test]
fn data_url_roundtrips_payload_and_mime() {
    let url = to_data_url("image/png", b"\x89PNG-ish");
    assert!(url.starts_with("data:image/png;base64,"));

    let parsed = parse_data_url(&url).unwrap();
    assert_eq!(parsed.mime, "image/png");
    assert_eq!(parsed.payload, b"\x89PNG-ish");

    let src = ImageSource::DataUrl(url);
    assert_eq!(&*src.load_bytes().unwrap(), b"\x89PNG-ish");
}

#[test]
fn data_url_without_base64_flag_is_rejected() {
    let err = parse_data_url("data:image/png,rawbytes").unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));
}

#[test]
fn data_url_with_bad_payload_is_asset_load_error() {
    let err = parse_data_url("data:image/jpeg;base64,@@@").unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));

    let err = parse_data_url("https://example.com/a.png").unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));
}

#[test]
fn missing_file_is_asset_load_error() {
    let src = ImageSource::from_path("target/definitely/missing/template.png");
    let err = src.load_bytes().unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));
    assert!(err.to_string().contains("template.png"));
}

#[test]
fn in_memory_bytes_are_shared() {
    let src = ImageSource::from_bytes(vec![1u8, 2, 3]);
    let a = src.load_bytes().unwrap();
    let b = src.load_bytes().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(
        normalize_rel_path("./art//frame.png").unwrap(),
        "art/frame.png"
    );
    assert_eq!(normalize_rel_path("art\\frame.png").unwrap(), "art/frame.png");
    assert!(normalize_rel_path("/abs/frame.png").is_err());
    assert!(normalize_rel_path("../frame.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}
