use super::*;

#[test]
fn badge_canvas_fits_u16_surface() {
    assert_eq!(Canvas::BADGE.surface_dims().unwrap(), (800, 800));
    assert_eq!(Canvas::BADGE.rgba8_len(), 800 * 800 * 4);
}

#[test]
fn zero_or_huge_canvas_is_environment_error() {
    let zero = Canvas {
        width: 0,
        height: 10,
    };
    assert!(matches!(
        zero.surface_dims(),
        Err(BadgeError::Environment(_))
    ));

    let huge = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(matches!(
        huge.surface_dims(),
        Err(BadgeError::Environment(_))
    ));
}

#[test]
fn photo_slot_inset_containment() {
    let slot = PhotoSlot {
        cx: 600.0,
        cy: 330.0,
        r: 120.0,
    };
    assert!(slot.contains_inset(Point::new(600.0, 330.0), 0.0));
    assert!(slot.contains_inset(Point::new(719.0, 330.0), 0.0));
    assert!(!slot.contains_inset(Point::new(719.0, 330.0), 2.0));
    assert!(!slot.contains_inset(Point::new(600.0, 451.0), 0.0));
    assert_eq!(slot.diameter(), 240.0);
}
