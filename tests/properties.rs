use image::{Rgba, RgbaImage};
use patch_fill::feather::feather;
use patch_fill::selector::select_source;
use patch_fill::{Direction, FillParams, PatchEngine, RawRect, Rect, Region, SelectorConfig};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Auto),
        Just(Direction::Above),
        Just(Direction::Below),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn raw_rect() -> impl Strategy<Value = RawRect> {
    (-400i64..400, -400i64..400, -400i64..400, -400i64..400)
        .prop_map(|(x, y, w, h)| RawRect::new(x, y, w, h))
}

#[allow(clippy::cast_possible_truncation)]
fn seeded_image(w: u32, h: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = (x ^ seed)
            .wrapping_mul(2_654_435_761)
            .wrapping_add(y.wrapping_mul(2_246_822_519))
            .rotate_left(seed % 31);
        Rgba([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8])
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn normalize_is_idempotent(r in raw_rect(), w in 1u32..300, h in 1u32..300) {
        let once = r.normalize(w, h);
        prop_assert_eq!(once.normalize(w, h), once);
    }

    #[test]
    fn normalized_rects_fit_the_buffer(r in raw_rect(), w in 1u32..300, h in 1u32..300) {
        let n = r.normalize(w, h);
        prop_assert!(n.width >= 1 && n.height >= 1);
        prop_assert!(u64::from(n.x) + u64::from(n.width) <= u64::from(w));
        prop_assert!(u64::from(n.y) + u64::from(n.height) <= u64::from(h));
    }

    #[test]
    fn selected_source_is_in_bounds_and_same_size(
        r in raw_rect(),
        w in 1u32..300,
        h in 1u32..300,
        dir in direction(),
    ) {
        let target = r.normalize(w, h);
        let source = select_source(target, w, h, dir, &SelectorConfig::default());
        prop_assert!(source.fits_within(w, h));
        prop_assert_eq!((source.width, source.height), (target.width, target.height));
    }

    #[test]
    fn auto_avoids_overlap_in_roomy_buffers(
        tw in 1u32..60,
        th in 1u32..60,
        kx in 4u32..8,
        ky in 4u32..8,
    ) {
        let (w, h) = (tw * kx, th * ky);
        let target = Rect::new((w - tw) / 2, (h - th) / 2, tw, th);
        let source = select_source(target, w, h, Direction::Auto, &SelectorConfig::default());
        prop_assert_eq!(source.overlap_area(&target), 0);
    }

    #[test]
    fn output_keeps_input_dimensions(
        w in 8u32..48,
        h in 8u32..48,
        seed in any::<u32>(),
        rects in prop::collection::vec(raw_rect(), 0..4),
        passes in 1u8..=6,
        radius in 0u32..6,
        dir in direction(),
    ) {
        let img = seeded_image(w, h, seed);
        let regions: Vec<Region> = rects.into_iter().map(Region::from).collect();
        let params = FillParams::new(passes, radius, dir).unwrap();
        let out = PatchEngine::new().apply(&img, &regions, &params).unwrap();
        prop_assert_eq!(out.dimensions(), (w, h));
    }

    #[test]
    fn uniform_image_is_a_fixed_point(
        w in 8u32..48,
        h in 8u32..48,
        color in any::<[u8; 4]>(),
        rects in prop::collection::vec(raw_rect(), 1..4),
        passes in 1u8..=6,
        radius in 0u32..6,
        dir in direction(),
    ) {
        let img = RgbaImage::from_pixel(w, h, Rgba(color));
        let regions: Vec<Region> = rects.into_iter().map(Region::from).collect();
        let params = FillParams::new(passes, radius, dir).unwrap();
        let out = PatchEngine::new().apply(&img, &regions, &params).unwrap();
        prop_assert_eq!(out, img);
    }

    #[test]
    fn zero_radius_feather_changes_nothing(
        w in 1u32..40,
        h in 1u32..40,
        seed in any::<u32>(),
        r in raw_rect(),
        alpha in -1.0f32..2.0,
    ) {
        let img = seeded_image(w, h, seed);
        let mut out = img.clone();
        feather(&mut out, r.normalize(w, h), 0, alpha);
        prop_assert_eq!(out, img);
    }
}
