use super::*;

#[test]
fn default_shadow_kernel_is_sigma_two() {
    assert_eq!(ShadowStyle::default().kernel(), Some((6, 2.0)));
}

#[test]
fn zero_or_invalid_blur_is_hard_shadow() {
    for blur_px in [0.0, -1.0, f32::NAN] {
        let s = ShadowStyle {
            blur_px,
            ..ShadowStyle::default()
        };
        assert_eq!(s.kernel(), None);
    }
}

#[test]
fn shadow_json_defaults_offsets() {
    let s: ShadowStyle =
        serde_json::from_str(r#"{ "color_rgba8": [0, 0, 0, 255], "blur_px": 1 }"#).unwrap();
    assert_eq!((s.offset_x, s.offset_y), (0.0, 0.0));
    assert_eq!(s.kernel(), Some((2, 0.5)));
}

#[test]
fn empty_plan_counts() {
    let plan = BadgePlan::new(Canvas::BADGE);
    assert_eq!(plan.clipped_image_count(), 0);
    assert_eq!(plan.text_count(), 0);
}
