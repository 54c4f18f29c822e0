use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("badgeforge-template-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn asset_path_is_anchored_at_json_directory() {
    let f = TemplateFile::from_reader(r#"{ "asset": "./art/badge.png" }"#.as_bytes()).unwrap();
    let t = f.resolve(Path::new("/srv/templates")).unwrap();
    assert_eq!(
        t.asset,
        ImageSource::File(PathBuf::from("/srv/templates/art/badge.png"))
    );
    assert_eq!(t.layout, TemplateLayout::her_dao());
}

#[test]
fn preset_field_selects_layout() {
    let f = TemplateFile::from_reader(
        r#"{ "asset": "badge.png", "preset": "her-dao-compact" }"#.as_bytes(),
    )
    .unwrap();
    let t = f.resolve(Path::new(".")).unwrap();
    assert_eq!(t.layout, TemplateLayout::her_dao_compact());

    let f = TemplateFile::from_reader(r#"{ "asset": "badge.png", "preset": "x" }"#.as_bytes())
        .unwrap();
    assert!(matches!(
        f.resolve(Path::new(".")),
        Err(BadgeError::Validation(_))
    ));
}

#[test]
fn traversal_and_unknown_fields_are_rejected() {
    let f = TemplateFile::from_reader(r#"{ "asset": "../secret.png" }"#.as_bytes()).unwrap();
    assert!(f.resolve(Path::new(".")).is_err());

    let err = TemplateFile::from_reader(r#"{ "asset": "a.png", "colour": 1 }"#.as_bytes())
        .unwrap_err();
    assert!(matches!(err, BadgeError::Validation(_)));
}

#[test]
fn font_files_are_relative_to_json() {
    let f = TemplateFile::from_reader(
        r#"{
            "asset": "a.png",
            "layout": {
                "name": {
                    "anchor": { "x": 400, "y": 500 },
                    "size_px": 40,
                    "font": { "family": "Inter", "weight": 700, "file": "fonts/Inter-Bold.ttf" }
                }
            }
        }"#
        .as_bytes(),
    )
    .unwrap();
    let t = f.resolve(Path::new("/tpl")).unwrap();
    assert_eq!(
        t.layout.name.font.file.as_deref(),
        Some(Path::new("/tpl/fonts/Inter-Bold.ttf"))
    );
    assert_eq!(t.layout.role, TemplateLayout::her_dao().role);
}

#[test]
fn from_json_path_reads_file_and_reports_missing() {
    let dir = scratch_dir("load");
    let json = dir.join("badge.json");
    std::fs::write(&json, r#"{ "asset": "badge.svg", "preset": "her-dao" }"#).unwrap();

    let t = Template::from_json_path(&json).unwrap();
    assert_eq!(t.asset, ImageSource::File(dir.join("badge.svg")));

    let err = Template::from_json_path(dir.join("missing.json")).unwrap_err();
    assert!(matches!(err, BadgeError::AssetLoad(_)));
}

#[test]
fn from_arg_accepts_preset_names() {
    let asset = ImageSource::from_bytes(vec![1u8, 2, 3]);
    let t = Template::from_arg("her-dao-compact", Some(asset.clone())).unwrap();
    assert_eq!(t.asset, asset);
    assert_eq!(t.layout.photo_slot.r, 105.0);

    assert!(matches!(
        Template::from_arg("her-dao", None),
        Err(BadgeError::Validation(_))
    ));
}
