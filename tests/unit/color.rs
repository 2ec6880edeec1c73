use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: RgbColor = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, RgbColor::rgb(255, 0, 0));

    let c: RgbColor = serde_json::from_value(json!("0000FF80")).unwrap();
    assert_eq!(c, RgbColor::rgba(0, 0, 255, 128));

    assert!(RgbColor::from_hex("#12345").is_err());
    assert!(RgbColor::from_hex("#zz0000").is_err());
}

#[test]
fn parses_object_and_array() {
    let c: RgbColor = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, RgbColor::rgb(1, 2, 3));

    let c: RgbColor = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, RgbColor::rgba(1, 2, 3, 4));

    assert!(serde_json::from_value::<RgbColor>(json!([1, 2])).is_err());
}

#[test]
fn premultiplies_channels() {
    assert_eq!(
        RgbColor::rgba(255, 128, 0, 128).to_premul_array(),
        [128, 64, 0, 128]
    );
    assert_eq!(RgbColor::WHITE.to_premul_array(), [255, 255, 255, 255]);
}

#[test]
fn colors_compare_by_value() {
    assert_eq!(Color::rgb(1, 2, 3), Color::Rgb(RgbColor::rgb(1, 2, 3)));
    assert_eq!(Color::Tiled, Color::Tiled);
    assert_ne!(Color::Transparent, Color::Tiled);
    assert_eq!(
        Color::Styled(vec![RgbColor::BLACK, RgbColor::WHITE]),
        Color::Styled(vec![RgbColor::BLACK, RgbColor::WHITE])
    );
}

#[test]
fn color_variants_deserialize_snake_case() {
    let c: Color = serde_json::from_value(json!({"rgb": "#00ff00"})).unwrap();
    assert_eq!(c, Color::rgb(0, 255, 0));

    let c: Color = serde_json::from_value(json!("transparent")).unwrap();
    assert_eq!(c, Color::Transparent);

    let c: Color = serde_json::from_value(json!({"styled": ["#000000", [255, 255, 255]]})).unwrap();
    assert_eq!(c, Color::Styled(vec![RgbColor::BLACK, RgbColor::WHITE]));
}

#[test]
fn brushed_colors_are_equal_by_value() {
    assert_eq!(Color::Brushed, Color::Brushed.clone());
    assert_ne!(Color::Brushed, Color::Tiled);
    assert_eq!(serde_json::to_value(Color::Brushed).unwrap(), json!("brushed"));
    let c: Color = serde_json::from_value(json!("brushed")).unwrap();
    assert_eq!(c, Color::Brushed);
}
