use super::*;

fn dim(w: u32, h: u32) -> Dimension {
    Dimension::new(w, h).unwrap()
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> CpuSurface {
    CpuSurface::from_image(RgbaImage::from_pixel(w, h, Rgba(px)))
}

#[test]
fn allocate_is_opaque_black_and_bounded() {
    let engine = CpuEngine::default();
    let s = engine.allocate(dim(3, 2)).unwrap();
    assert_eq!(s.pixels().dimensions(), (3, 2));
    assert!(s.pixels().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));

    let small = CpuEngine::new(CpuEngineOpts::default().with_max_dimension(8));
    assert!(matches!(
        small.allocate(dim(9, 1)),
        Err(RasterError::InvalidDimension {
            width: 9,
            height: 1
        })
    ));
}

#[test]
fn validate_rejects_empty_buffers() {
    let engine = CpuEngine::default();
    let empty = CpuSurface::from_image(RgbaImage::new(0, 0));
    assert!(matches!(
        engine.validate(&empty),
        Err(RasterError::InvalidArgument(_))
    ));
    assert!(engine.validate(&solid(1, 1, [0; 4])).is_ok());
}

#[test]
fn encode_then_decode_preserves_pixels() {
    let engine = CpuEngine::default();
    let s = solid(2, 2, [10, 20, 30, 255]);
    let mut buf = Vec::new();
    engine.encode_to_writer(&s, &mut buf).unwrap();
    assert_eq!(&buf[..4], &[0x89, b'P', b'N', b'G']);

    let back = engine.decode_bytes(&buf).unwrap();
    assert_eq!(back.pixels(), s.pixels());
}

#[test]
fn decode_garbage_is_canvas_error() {
    let engine = CpuEngine::default();
    assert!(matches!(
        engine.decode_bytes(b"not an image"),
        Err(RasterError::Canvas(_))
    ));
}

#[test]
fn duplicate_is_independent() {
    let engine = CpuEngine::default();
    let a = solid(2, 2, [1, 2, 3, 255]);
    let mut b = engine.duplicate(&a).unwrap();
    engine
        .fill_region(&mut b, &CpuPaint::Solid(Rgba([9, 9, 9, 255])), Coordinate::ORIGIN)
        .unwrap();
    assert_eq!(*a.pixels().get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    assert_eq!(*b.pixels().get_pixel(0, 0), Rgba([9, 9, 9, 255]));
}

#[test]
fn copy_region_same_size_copies_pixels() {
    let engine = CpuEngine::default();
    let src = solid(2, 2, [200, 0, 0, 255]);
    let mut dst = solid(4, 4, [0, 0, 0, 255]);
    let target = Region::new(Coordinate::new(2, 2), dim(2, 2));
    engine
        .copy_region(&src, Region::at_origin(dim(2, 2)), &mut dst, target)
        .unwrap();

    assert_eq!(*dst.pixels().get_pixel(3, 3), Rgba([200, 0, 0, 255]));
    assert_eq!(*dst.pixels().get_pixel(1, 1), Rgba([0, 0, 0, 255]));
}

#[test]
fn copy_region_stretches_to_destination() {
    let engine = CpuEngine::default();
    let src = solid(2, 2, [0, 128, 0, 255]);
    let mut dst = solid(6, 6, [0, 0, 0, 255]);
    engine
        .copy_region(
            &src,
            Region::at_origin(dim(2, 2)),
            &mut dst,
            Region::at_origin(dim(6, 6)),
        )
        .unwrap();
    assert!(dst.pixels().pixels().all(|p| *p == Rgba([0, 128, 0, 255])));
}

#[test]
fn copy_region_rejects_out_of_bounds() {
    let engine = CpuEngine::default();
    let src = solid(2, 2, [0; 4]);
    let mut dst = solid(2, 2, [0; 4]);
    let r = engine.copy_region(
        &src,
        Region::at_origin(dim(3, 3)),
        &mut dst,
        Region::at_origin(dim(2, 2)),
    );
    assert!(matches!(r, Err(RasterError::InvalidArgument(_))));
}

#[test]
fn copy_within_reads_from_snapshot() {
    let engine = CpuEngine::default();
    let mut img = RgbaImage::new(4, 1);
    for x in 0..4 {
        img.put_pixel(x, 0, Rgba([x as u8 * 10, 0, 0, 255]));
    }
    let mut s = CpuSurface::from_image(img);
    engine
        .copy_within(
            &mut s,
            Region::at_origin(dim(3, 1)),
            Region::new(Coordinate::new(1, 0), dim(3, 1)),
        )
        .unwrap();

    let reds: Vec<u8> = s.pixels().pixels().map(|p| p[0]).collect();
    assert_eq!(reds, vec![0, 0, 10, 20]);
}

#[test]
fn flood_fill_stops_at_region_boundary() {
    let engine = CpuEngine::default();
    let mut img = RgbaImage::from_pixel(5, 1, Rgba([0, 0, 0, 255]));
    img.put_pixel(2, 0, Rgba([255, 255, 255, 255]));
    let mut s = CpuSurface::from_image(img);

    engine
        .fill_region(&mut s, &CpuPaint::Solid(Rgba([0, 0, 255, 255])), Coordinate::ORIGIN)
        .unwrap();

    let blues: Vec<u8> = s.pixels().pixels().map(|p| p[2]).collect();
    assert_eq!(blues, vec![255, 255, 255, 0, 0]);
}

#[test]
fn fill_origin_outside_is_rejected() {
    let engine = CpuEngine::default();
    let mut s = solid(2, 2, [0; 4]);
    let r = engine.fill_region(
        &mut s,
        &CpuPaint::Solid(Rgba([1, 1, 1, 255])),
        Coordinate::new(2, 0),
    );
    assert!(matches!(r, Err(RasterError::InvalidArgument(_))));
}

#[test]
fn blending_flag_controls_translucent_fill() {
    let engine = CpuEngine::default();
    let paint = CpuPaint::Solid(Rgba([255, 255, 255, 0]));

    let mut blended = solid(1, 1, [10, 10, 10, 255]);
    engine
        .fill_region(&mut blended, &paint, Coordinate::ORIGIN)
        .unwrap();
    assert_eq!(*blended.pixels().get_pixel(0, 0), Rgba([10, 10, 10, 255]));

    let mut replaced = solid(1, 1, [10, 10, 10, 255]);
    engine
        .set_flag(&mut replaced, RasterFlag::AlphaBlending, false)
        .unwrap();
    engine
        .fill_region(&mut replaced, &paint, Coordinate::ORIGIN)
        .unwrap();
    assert_eq!(*replaced.pixels().get_pixel(0, 0), Rgba([255, 255, 255, 0]));
}

#[test]
fn tiled_paint_needs_registered_tile() {
    let engine = CpuEngine::default();
    let mut s = solid(4, 1, [0, 0, 0, 255]);
    assert!(matches!(
        engine.resolve_color(&s, &Color::Tiled),
        Err(RasterError::Canvas(_))
    ));

    let mut tile_img = RgbaImage::new(2, 1);
    tile_img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    tile_img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    engine
        .set_tile(&mut s, &CpuSurface::from_image(tile_img))
        .unwrap();

    let paint = engine.resolve_color(&s, &Color::Tiled).unwrap();
    engine
        .fill_region(&mut s, &paint, Coordinate::new(1, 0))
        .unwrap();
    let reds: Vec<u8> = s.pixels().pixels().map(|p| p[0]).collect();
    assert_eq!(reds, vec![0, 255, 0, 255]);
}

#[test]
fn styled_paint_cycles_colors() {
    let engine = CpuEngine::default();
    let mut s = solid(3, 1, [0, 0, 0, 255]);
    let styled = Color::Styled(vec![
        crate::color::RgbColor::rgb(1, 0, 0),
        crate::color::RgbColor::rgb(2, 0, 0),
    ]);
    let paint = engine.resolve_color(&s, &styled).unwrap();
    engine
        .fill_region(&mut s, &paint, Coordinate::ORIGIN)
        .unwrap();
    let reds: Vec<u8> = s.pixels().pixels().map(|p| p[0]).collect();
    assert_eq!(reds, vec![1, 2, 1]);

    assert!(matches!(
        engine.resolve_color(&s, &Color::Styled(vec![])),
        Err(RasterError::Config(_))
    ));
}

#[test]
fn identity_convolution_keeps_pixels() {
    let engine = CpuEngine::default();
    let mut img = RgbaImage::new(3, 3);
    for (x, y, p) in img.enumerate_pixels_mut() {
        *p = Rgba([(x * 40) as u8, (y * 40) as u8, 7, 200]);
    }
    let mut s = CpuSurface::from_image(img.clone());
    engine
        .apply_convolution(&mut s, &Kernel::IDENTITY, 1.0, 0.0)
        .unwrap();
    assert_eq!(s.pixels(), &img);
}

#[test]
fn convolution_replicates_edges_and_clamps() {
    let engine = CpuEngine::default();
    let mut s = solid(2, 2, [100, 100, 100, 255]);
    let all_ones = Kernel::new([[1.0; 3]; 3]).unwrap();

    engine
        .apply_convolution(&mut s, &all_ones, 9.0, 5.0)
        .unwrap();
    assert_eq!(*s.pixels().get_pixel(0, 0), Rgba([105, 105, 105, 255]));

    engine
        .apply_convolution(&mut s, &all_ones, 1.0, 0.0)
        .unwrap();
    assert_eq!(*s.pixels().get_pixel(1, 1), Rgba([255, 255, 255, 255]));
}

#[test]
fn convolution_rejects_zero_divisor() {
    let engine = CpuEngine::default();
    let mut s = solid(1, 1, [0; 4]);
    assert!(matches!(
        engine.apply_convolution(&mut s, &Kernel::IDENTITY, 0.0, 0.0),
        Err(RasterError::Canvas(_))
    ));
}

#[test]
fn flags_round_trip() {
    let engine = CpuEngine::default();
    let mut s = solid(1, 1, [0; 4]);
    assert!(engine.flag(&s, RasterFlag::AlphaBlending));
    assert!(!engine.flag(&s, RasterFlag::Interlace));
    engine.set_flag(&mut s, RasterFlag::Interlace, true).unwrap();
    assert!(s.is_interlaced());
}

#[test]
fn layer_composites_with_clipping() {
    let engine = CpuEngine::default();
    let mut s = solid(2, 2, [0, 0, 0, 255]);
    let layer = Layer::new(
        Coordinate::new(1, 1),
        Dimension::new(2, 2).unwrap(),
        [255u8, 0, 0, 255].repeat(4),
    )
    .unwrap();
    engine.composite_layer(&mut s, &layer).unwrap();
    assert_eq!(*s.pixels().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    assert_eq!(*s.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 255]));
}

#[test]
fn layer_half_alpha_blends_over() {
    let engine = CpuEngine::default();
    let mut s = solid(1, 1, [0, 0, 0, 255]);
    let layer = Layer::new(Coordinate::ORIGIN, dim(1, 1), vec![128, 128, 128, 128]).unwrap();
    engine.composite_layer(&mut s, &layer).unwrap();
    let p = *s.pixels().get_pixel(0, 0);
    assert_eq!(p[3], 255);
    assert!((i32::from(p[0]) - 128).abs() <= 1);
}

#[test]
fn layer_rejects_short_buffers() {
    assert!(Layer::new(Coordinate::ORIGIN, dim(2, 2), vec![0; 4]).is_err());
}

#[test]
fn layer_pixel_is_none_outside_bounds() {
    let layer = Layer::new(Coordinate::ORIGIN, dim(2, 1), vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(layer.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(layer.pixel(2, 0), None);
    assert_eq!(layer.pixel(0, 1), None);
}

#[test]
fn brushed_fill_stamps_brush_on_origin_only() {
    let engine = CpuEngine::default();
    let mut s = solid(5, 1, [0, 0, 0, 255]);
    assert!(matches!(
        engine.resolve_color(&s, &Color::Brushed),
        Err(RasterError::Canvas(_))
    ));

    engine
        .set_brush(&mut s, &solid(3, 1, [200, 0, 0, 255]))
        .unwrap();
    let paint = engine.resolve_color(&s, &Color::Brushed).unwrap();
    engine
        .fill_region(&mut s, &paint, Coordinate::new(2, 0))
        .unwrap();
    let reds: Vec<u8> = s.pixels().pixels().map(|p| p[0]).collect();
    assert_eq!(reds, vec![0, 200, 200, 200, 0]);
}

#[test]
fn stamp_brush_centres_and_clips() {
    let engine = CpuEngine::default();
    let mut s = solid(4, 4, [0, 0, 0, 255]);
    assert!(matches!(
        engine.stamp_brush(&mut s, &[Coordinate::ORIGIN]),
        Err(RasterError::Canvas(_))
    ));

    let mut brush = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
    brush.put_pixel(1, 1, Rgba([0, 255, 0, 255]));
    brush.put_pixel(2, 1, Rgba([0, 255, 0, 255]));
    engine
        .set_brush(&mut s, &CpuSurface::from_image(brush))
        .unwrap();
    engine
        .stamp_brush(&mut s, &[Coordinate::new(0, 0), Coordinate::new(3, 3)])
        .unwrap();

    assert_eq!(s.pixels().get_pixel(0, 0).0, [0, 255, 0, 255]);
    assert_eq!(s.pixels().get_pixel(1, 0).0, [0, 255, 0, 255]);
    assert_eq!(s.pixels().get_pixel(3, 3).0, [0, 255, 0, 255]);
    assert_eq!(s.pixels().get_pixel(2, 3).0, [0, 0, 0, 255]);
    assert_eq!(s.pixels().get_pixel(1, 1).0, [0, 0, 0, 255]);
}

#[test]
fn flood_fill_covers_large_uniform_surface() {
    let engine = CpuEngine::default();
    let mut s = solid(300, 200, [5, 5, 5, 255]);
    s.pixels.put_pixel(150, 100, Rgba([9, 9, 9, 255]));
    engine
        .fill_region(&mut s, &CpuPaint::Solid(Rgba([1, 2, 3, 255])), Coordinate::ORIGIN)
        .unwrap();
    assert_eq!(s.pixels().get_pixel(299, 199).0, [1, 2, 3, 255]);
    assert_eq!(s.pixels().get_pixel(150, 100).0, [9, 9, 9, 255]);
}
