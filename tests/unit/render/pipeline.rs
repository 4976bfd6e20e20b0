use super::*;
use crate::foundation::core::Size;

fn layout(input: (u32, u32), output: (u32, u32), scanlines: u32) -> FrameLayout {
    FrameLayout::new(
        Size::new(input.0, input.1),
        Size::new(output.0, output.1),
        scanlines,
    )
    .unwrap()
}

fn pipeline(l: FrameLayout) -> CrtPipeline {
    CrtPipeline::new(l, RasterGeometry::default(), Some(2)).unwrap()
}

#[test]
fn source_planes_only_exist_when_rescanning() {
    let direct = pipeline(layout((2, 2), (8, 6), 2));
    assert!(direct.source.is_none());
    assert_eq!(direct.raster.height(), 12);
    assert_eq!(direct.raster.width(), 8);

    let rescanned = pipeline(layout((2, 2), (8, 6), 3));
    assert_eq!(rescanned.source.as_ref().map(|p| p.height()), Some(2));
    assert_eq!(rescanned.scanlines.height(), 3);
}

#[test]
fn rejects_zero_threads_and_bad_geometry() {
    let l = layout((2, 2), (4, 4), 2);
    assert!(CrtPipeline::new(l, RasterGeometry::default(), Some(0)).is_err());

    let mut g = RasterGeometry::default();
    g.cell_height = 0;
    assert!(CrtPipeline::new(l, g, None).is_err());
}

#[test]
fn rejects_mismatched_frames() {
    let mut p = pipeline(layout((2, 2), (4, 4), 2));
    let mut out = Frame::new(Size::new(4, 4));
    let err = p.process(&Frame::new(Size::new(3, 2)), &mut out).unwrap_err();
    assert!(err.to_string().contains("input frame is 3x2"));

    let mut wrong_out = Frame::new(Size::new(4, 5));
    let err = p
        .process(&Frame::new(Size::new(2, 2)), &mut wrong_out)
        .unwrap_err();
    assert!(err.to_string().contains("output frame is 4x5"));
}

#[test]
fn black_stays_black_on_both_linearize_paths() {
    for scanlines in [2, 5] {
        let mut p = pipeline(layout((2, 2), (8, 6), scanlines));
        let mut out = Frame::filled(Size::new(8, 6), 0x0012_3456);
        p.process(&Frame::new(Size::new(2, 2)), &mut out).unwrap();
        assert!(out.pixels().iter().all(|&px| px == 0), "scanlines={scanlines}");
    }
}

#[test]
fn white_reaches_full_brightness_on_both_linearize_paths() {
    for scanlines in [2, 5] {
        let mut p = pipeline(layout((2, 2), (8, 6), scanlines));
        let mut out = Frame::new(Size::new(8, 6));
        p.process(&Frame::filled(Size::new(2, 2), 0x00FF_FFFF), &mut out)
            .unwrap();
        assert!(
            out.pixels().iter().all(|&px| px == 0x00FF_FFFF),
            "scanlines={scanlines}"
        );
    }
}

#[test]
fn repeated_processing_is_deterministic() {
    let mut p = pipeline(layout((3, 2), (7, 5), 2));
    let pixels = vec![0x0010_2030, 0x0040_0000, 0, 0x0000_3000, 0, 0x0000_0020];
    let input = Frame::from_pixels(Size::new(3, 2), pixels).unwrap();
    let mut a = Frame::new(Size::new(7, 5));
    let mut b = Frame::new(Size::new(7, 5));
    p.process(&input, &mut a).unwrap();
    p.process(&input, &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn normalization_matches_mask_model() {
    let p = pipeline(layout((2, 2), (4, 4), 2));
    assert_eq!(p.normalization(), normalization_factor(p.geometry()));
    assert_eq!(p.layout().scanlines, 2);
}

#[test]
fn oversized_virtual_raster_is_a_validation_error() {
    // u32::MAX columns by u32::MAX * 6 virtual rows cannot be addressed.
    let l = layout((2, 2), (u32::MAX, 1), u32::MAX);
    assert!(matches!(
        CrtPipeline::new(l, RasterGeometry::default(), Some(1)),
        Err(CrtError::Validation(_))
    ));
}
