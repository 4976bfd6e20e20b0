use super::*;

#[test]
fn layout_rejects_zero_dimensions() {
    let ok = Size::new(4, 3);
    assert!(FrameLayout::new(Size::new(0, 3), ok, 3).is_err());
    assert!(FrameLayout::new(ok, Size::new(4, 0), 3).is_err());
    assert!(FrameLayout::new(ok, ok, 0).is_err());

    let layout = FrameLayout::new(ok, Size::new(8, 6), 3).unwrap();
    assert_eq!(layout.input_frame_bytes(), 48);
    assert_eq!(layout.output_frame_bytes(), 192);
}

#[test]
fn frame_bytes_roundtrip_native_endian() {
    let size = Size::new(2, 2);
    let src = Frame::from_pixels(size, vec![0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0x0012_3456])
        .unwrap();

    let mut bytes = Vec::new();
    src.store_ne_bytes(&mut bytes);
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[12..16], &0x0012_3456u32.to_ne_bytes());

    let mut dst = Frame::new(size);
    dst.load_ne_bytes(&bytes).unwrap();
    assert_eq!(dst, src);
    assert_eq!(dst.pixel(1, 1), 0x0012_3456);
}

#[test]
fn frame_rejects_wrong_lengths() {
    let size = Size::new(3, 1);
    assert!(Frame::from_pixels(size, vec![0; 2]).is_err());
    let mut f = Frame::new(size);
    assert!(f.load_ne_bytes(&[0u8; 11]).is_err());
}

#[test]
fn plane_channels_are_disjoint_slabs() {
    let mut p = Plane::new(3, 2).unwrap();
    assert_eq!(p.data().len(), 18);
    {
        let [r, g, b] = p.channels_mut();
        r.fill(1.0);
        g.fill(2.0);
        b.fill(3.0);
    }
    assert!(p.channel(0).iter().all(|&v| v == 1.0));
    assert!(p.channel(1).iter().all(|&v| v == 2.0));
    assert!(p.channel(2).iter().all(|&v| v == 3.0));
    p.channel_mut(1)[0] = 9.0;
    assert_eq!(p.data()[6], 9.0);
}

#[test]
fn copy_from_adopts_size_and_pixels() {
    let src = Frame::filled(Size::new(3, 2), 0x0000_00AA);
    let mut dst = Frame::new(Size::new(1, 1));
    dst.copy_from(&src);
    assert_eq!(dst, src);
}

#[test]
fn oversized_buffers_are_rejected_not_allocated() {
    assert!(matches!(Plane::new(usize::MAX, 2), Err(CrtError::Validation(_))));
    assert!(matches!(Plane::new(usize::MAX / 2, 1), Err(CrtError::Validation(_))));
    assert_eq!(Plane::new(0, 5).unwrap().data().len(), 0);

    let huge = Size::new(u32::MAX, u32::MAX);
    assert_eq!(huge.checked_area(), (u32::MAX as usize).checked_mul(u32::MAX as usize));
    let ok = Size::new(4, 3);
    assert!(matches!(
        FrameLayout::new(huge, ok, 1),
        Err(CrtError::Validation(_))
    ));
    assert!(matches!(
        FrameLayout::new(ok, huge, 1),
        Err(CrtError::Validation(_))
    ));
}
