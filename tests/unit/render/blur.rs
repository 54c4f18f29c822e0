use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn tight_blur_matches_full_blur() {
    let (w, h) = (40u32, 30u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    for (x, y) in [(12u32, 10u32), (13, 10), (20, 14), (1, 28)] {
        let i = ((y * w + x) * 4) as usize;
        src[i..i + 4].copy_from_slice(&[0, 0, 0, 204]);
    }

    let full = blur_rgba8_premul(&src, w, h, 6, 2.0).unwrap();
    let tight = blur_rgba8_premul_tight(&src, w, h, 6, 2.0).unwrap();
    assert_eq!(full, tight);
}

#[test]
fn tight_blur_of_transparent_buffer_is_noop() {
    let src = vec![0u8; 8 * 8 * 4];
    assert_eq!(blur_rgba8_premul_tight(&src, 8, 8, 6, 2.0).unwrap(), src);
}

#[test]
fn mismatched_length_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 12], 2, 2, 1, 1.0).is_err());
    assert!(blur_rgba8_premul_tight(&[0u8; 12], 2, 2, 1, 1.0).is_err());
}

#[test]
fn rows_and_columns_blur_alike() {
    let (w, h) = (9u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let i = ((3 * w + 4) * 4) as usize;
    src[i..i + 4].copy_from_slice(&[0, 0, 0, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.0).unwrap();
    let alpha = |x: u32, y: u32| i32::from(out[((y * w + x) * 4 + 3) as usize]);
    // Each pass rounds, so mirrored taps may differ by one.
    assert!((alpha(2, 3) - alpha(4, 1)).abs() <= 1);
    assert!((alpha(6, 3) - alpha(4, 5)).abs() <= 1);
    assert_eq!(alpha(3, 2), alpha(5, 4));
    assert!(alpha(2, 3) > 0);
    assert!(alpha(4, 3) > alpha(5, 3));
    assert_eq!(alpha(0, 0), 0);
}
