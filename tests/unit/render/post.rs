use super::*;

fn post_for(size: Size, normalization: f32) -> PostProcessor {
    PostProcessor::new(&RasterGeometry::default(), size, normalization).unwrap()
}

fn uniform_plane(size: Size, rgb: [f32; 3]) -> Plane {
    let mut p = Plane::new(size.width as usize, size.height as usize).unwrap();
    for (c, slab) in p.channels_mut().into_iter().enumerate() {
        slab.fill(rgb[c]);
    }
    p
}

#[test]
fn black_and_white_extremes() {
    let size = Size::new(4, 3);
    let mut post = post_for(size, 1.0);
    let mut out = Frame::new(size);

    post.run(&mut uniform_plane(size, [0.0; 3]), &mut out);
    assert!(out.pixels().iter().all(|&p| p == 0));

    post.run(&mut uniform_plane(size, [1.0; 3]), &mut out);
    assert!(out.pixels().iter().all(|&p| p == 0x00FF_FFFF));
}

#[test]
fn normalization_and_glow_layers_add_up() {
    let size = Size::new(4, 3);
    // Narrow output: the glow kernel collapses to a single tap.
    let mut post = post_for(size, 2.0);
    assert_eq!(post.glow_taps(), 3);
    let mut out = Frame::new(size);

    post.run(&mut uniform_plane(size, [0.25, 0.0, 0.0]), &mut out);
    // (0.25 * 2)^2 = 0.25: sharp 63 + glow 150.
    assert!(out.pixels().iter().all(|&p| p == 0x00D5_0000), "{:06x}", out.pixel(0, 0));
}

#[test]
fn wide_output_glow_is_energy_preserving_on_flat_fields() {
    let size = Size::new(1280, 2);
    let mut post = post_for(size, 1.0);
    assert!(post.glow_taps() > 3);
    let mut out = Frame::new(size);

    post.run(&mut uniform_plane(size, [0.0, 0.5, 0.0]), &mut out);
    // sharp 63 + glow 150 on green, flat field stays flat.
    assert!(out.pixels().iter().all(|&p| p == 0x0000_D500));
}
