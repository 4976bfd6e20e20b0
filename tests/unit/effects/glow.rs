use super::*;

#[test]
fn kernel_sums_to_unity_in_q16() {
    for sigma in [0.3f32, 1.0, 3.0, 7.5] {
        let k = gaussian_kernel_q16(sigma).unwrap();
        assert_eq!(k.len() % 2, 1);
        assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
        let mid = k.len() / 2;
        assert!(k.iter().all(|&w| w <= k[mid]));
    }
    assert_eq!(gaussian_kernel_q16(0.0).unwrap(), vec![1 << 16]);
    assert!(gaussian_kernel_q16(f32::NAN).is_err());
}

#[test]
fn sigma_scales_with_output_width() {
    let g = RasterGeometry::default();
    assert_eq!(glow_sigma(&g, 640), 3.0);
    assert_eq!(glow_sigma(&g, 1280), 6.0);
    assert_eq!(glow_sigma(&g, 320), 1.5);
}

#[test]
fn tiny_sigma_is_identity() {
    let (w, h) = (4usize, 3usize);
    let src: Vec<i32> = (0..12).map(|i| i * 37).collect();
    let k = gaussian_kernel_q16(0.05).unwrap();
    let mut tmp = vec![0; w * h];
    let mut out = vec![0; w * h];
    blur_plane(&src, &mut tmp, &mut out, w, h, &k);
    assert_eq!(out, src);
}

#[test]
fn constant_plane_is_preserved() {
    let (w, h) = (9usize, 7usize);
    let src = vec![600i32; w * h];
    let k = gaussian_kernel_q16(3.0).unwrap();
    let mut tmp = vec![0; w * h];
    let mut out = vec![0; w * h];
    blur_plane(&src, &mut tmp, &mut out, w, h, &k);
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (11usize, 11usize);
    let mut src = vec![0i32; w * h];
    src[5 * w + 5] = 6000;
    let k = gaussian_kernel_q16(1.2).unwrap();
    let mut tmp = vec![0; w * h];
    let mut out = vec![0; w * h];
    blur_plane(&src, &mut tmp, &mut out, w, h, &k);

    assert!(out.iter().filter(|&&v| v != 0).count() > 1);
    assert!(out[5 * w + 5] < 6000);
    let total: i32 = out.iter().sum();
    assert!((total - 6000).abs() <= 40, "{total}");
}
