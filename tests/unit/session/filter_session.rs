use super::*;
use crate::foundation::core::Size;

fn layout() -> FrameLayout {
    FrameLayout::new(Size::new(4, 3), Size::new(9, 7), 3).unwrap()
}

fn session(cache_frames: usize) -> FilterSession {
    let opts = SessionOpts {
        threads: Some(2),
        cache_frames,
        ..SessionOpts::default()
    };
    FilterSession::new(layout(), opts).unwrap()
}

fn pattern(seed: u32) -> Frame {
    let pixels = (0..12u32)
        .map(|i| (i.wrapping_mul(0x0001_3579).wrapping_add(seed)) & 0x00FF_FFFF)
        .collect();
    Frame::from_pixels(Size::new(4, 3), pixels).unwrap()
}

#[test]
fn default_opts_cache_four_frames() {
    let opts = SessionOpts::default();
    assert_eq!(opts.cache_frames, 4);
    assert_eq!(opts.threads, None);
}

#[test]
fn repeated_frame_skips_pipeline() {
    let mut s = session(4);
    let input = pattern(1);
    let first = s.process_frame(&input).unwrap().clone();
    let second = s.process_frame(&input).unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(
        s.stats(),
        FilterStats {
            frames_total: 2,
            frames_rendered: 1,
            frames_reused: 1,
        }
    );
}

#[test]
fn disabled_cache_renders_every_frame_with_identical_output() {
    let mut cached = session(4);
    let mut uncached = session(0);
    let frames = [pattern(1), pattern(2), pattern(1), pattern(1), pattern(3), pattern(2)];

    for f in &frames {
        let a = cached.process_frame(f).unwrap().clone();
        let b = uncached.process_frame(f).unwrap().clone();
        assert_eq!(a, b);
    }
    assert_eq!(uncached.stats().frames_rendered, 6);
    assert_eq!(uncached.stats().frames_reused, 0);
    assert_eq!(cached.stats().frames_rendered, 3);
    assert_eq!(cached.stats().frames_reused, 3);
}

#[test]
fn evicted_frames_render_again() {
    let mut s = session(1);
    s.process_frame(&pattern(1)).unwrap();
    s.process_frame(&pattern(2)).unwrap();
    s.process_frame(&pattern(1)).unwrap();
    assert_eq!(s.stats().frames_rendered, 3);
}

#[test]
fn wrong_input_size_is_rejected_without_counting() {
    let mut s = session(4);
    let err = s.process_frame(&Frame::new(Size::new(3, 3))).unwrap_err();
    assert!(matches!(err, CrtError::Validation(_)));
    assert_eq!(s.stats(), FilterStats::default());
    assert_eq!(s.layout(), layout());
}
