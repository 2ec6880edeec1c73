use super::*;
use crate::color::Color;

fn dim(w: u32, h: u32) -> Dimension {
    Dimension::new(w, h).unwrap()
}

#[test]
fn resize_changes_size_and_keeps_content() {
    let mut c = Canvas::from_dimension(dim(10, 10)).unwrap();
    c.fill(&Color::rgb(30, 60, 90), None).unwrap();
    c.apply(&ResizeAction::new(dim(20, 5))).unwrap();

    assert!(c.is_bound());
    assert_eq!(c.dimension().unwrap(), dim(20, 5));
    assert_eq!(
        c.handle().unwrap().pixels().get_pixel(19, 4).0,
        [30, 60, 90, 255]
    );
}

#[test]
fn resize_to_same_size_is_stable() {
    let mut c = Canvas::from_dimension(dim(4, 4)).unwrap();
    c.fill(&Color::rgb(1, 2, 3), None).unwrap();
    let before = c.handle().unwrap().pixels().as_raw().clone();
    c.apply(&ResizeAction::new(dim(4, 4))).unwrap();
    assert_eq!(c.handle().unwrap().pixels().as_raw(), &before);
}

#[test]
fn resize_on_empty_canvas_fails() {
    let mut c = Canvas::new();
    assert!(matches!(
        c.apply(&ResizeAction::new(dim(2, 2))),
        Err(crate::foundation::error::RasterError::EmptyCanvas)
    ));
    assert!(!c.is_bound());
}

#[test]
fn set_dimension_updates_target() {
    let mut a = ResizeAction::new(dim(1, 1));
    a.set_dimension(dim(3, 7));
    assert_eq!(a.dimension(), dim(3, 7));
}

fn translucent(w: u32, h: u32) -> Canvas {
    let mut c = Canvas::from_dimension(dim(w, h)).unwrap();
    c.alpha_blending(false).unwrap();
    c.fill(&Color::Rgb(crate::color::RgbColor::rgba(200, 100, 50, 128)), None)
        .unwrap();
    c
}

#[test]
fn same_size_resize_keeps_translucent_pixels() {
    let mut c = translucent(4, 4);
    assert_eq!(c.handle().unwrap().pixels().get_pixel(2, 2).0, [200, 100, 50, 128]);

    c.apply(&ResizeAction::new(dim(4, 4))).unwrap();
    assert_eq!(c.handle().unwrap().pixels().get_pixel(2, 2).0, [200, 100, 50, 128]);
}

#[test]
fn upscale_keeps_alpha() {
    let mut c = translucent(4, 4);
    c.apply(&ResizeAction::new(dim(8, 8))).unwrap();
    assert_eq!(c.handle().unwrap().pixels().get_pixel(7, 7).0[3], 128);

    let mut clear = Canvas::from_dimension(dim(2, 2)).unwrap();
    clear.alpha_blending(false).unwrap();
    clear.fill(&Color::Transparent, None).unwrap();
    clear.alpha_blending(true).unwrap();
    clear.apply(&ResizeAction::new(dim(5, 5))).unwrap();
    assert_eq!(clear.handle().unwrap().pixels().get_pixel(4, 4).0[3], 0);
}

#[test]
fn resize_keeps_rendering_flags() {
    use crate::engine::RasterFlag;

    let mut c = translucent(3, 3);
    c.interlace(true).unwrap();
    c.apply(&ResizeAction::new(dim(6, 2))).unwrap();
    assert!(!c.flag(RasterFlag::AlphaBlending).unwrap());
    assert!(c.flag(RasterFlag::Interlace).unwrap());

    c.fill(&Color::Transparent, None).unwrap();
    assert_eq!(c.handle().unwrap().pixels().get_pixel(0, 0).0, [0, 0, 0, 0]);

    let mut plain = Canvas::from_dimension(dim(2, 2)).unwrap();
    plain.apply(&ResizeAction::new(dim(4, 4))).unwrap();
    assert!(plain.flag(RasterFlag::AlphaBlending).unwrap());
    assert!(!plain.flag(RasterFlag::Interlace).unwrap());
}
