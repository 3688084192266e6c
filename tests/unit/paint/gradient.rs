use super::*;
use crate::composition::model::TwoZoneGradient;

const NAVY: Rgba8 = Rgba8::rgb(0x08, 0x37, 0x65);

fn alpha_at(img: &DecodedImage, x: u32, y: u32) -> u8 {
    img.rgba8_premul[((y * img.width + x) * 4 + 3) as usize]
}

fn center_config(height: f64) -> UnifiedGradient {
    UnifiedGradient {
        direction: GradientDirection::Center,
        height,
        ..UnifiedGradient::default()
    }
}

#[test]
fn normalizing_twice_equals_once() {
    let stops = vec![
        GradientStop::new(NAVY, 120.0, 70.0),
        GradientStop::new(Rgba8::rgb(1, 2, 3), 50.0, -5.0),
        GradientStop::new(Rgba8::rgb(4, 5, 6), 10.0, 70.0),
        GradientStop::new(Rgba8::rgb(7, 8, 9), 30.0, 140.0),
    ];
    let once = normalize_stops(&stops);
    assert_eq!(normalize_stops(&once), once);

    let positions: Vec<f64> = once.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0.0, 70.0, 100.0]);
    assert!(once.iter().all(|s| (0.0..=100.0).contains(&s.opacity)));
}

#[test]
fn later_duplicate_stop_wins() {
    let stops = vec![
        GradientStop::new(Rgba8::rgb(255, 0, 0), 100.0, 50.0),
        GradientStop::new(Rgba8::rgb(0, 0, 255), 100.0, 50.0),
    ];
    let once = normalize_stops(&stops);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].color, Rgba8::rgb(0, 0, 255));
}

#[test]
fn ramp_interpolates_and_pads() {
    let ramp = ColorRamp::from_stops(
        &[
            GradientStop::new(Rgba8::rgb(255, 255, 255), 100.0, 20.0),
            GradientStop::new(Rgba8::rgb(255, 255, 255), 0.0, 80.0),
        ],
        100.0,
    );
    assert_eq!(ramp.sample(0.0), [255, 255, 255, 255]);
    assert_eq!(ramp.sample(0.2), [255, 255, 255, 255]);
    assert_eq!(ramp.sample(0.5)[3], 128);
    assert_eq!(ramp.sample(1.0), [0, 0, 0, 0]);
}

#[test]
fn intensity_scales_every_stop() {
    let stops = [GradientStop::new(NAVY, 100.0, 0.0)];
    assert_eq!(ColorRamp::from_stops(&stops, 50.0).sample(0.0)[3], 128);
    assert!(ColorRamp::from_stops(&stops, 0.0).is_invisible());
}

#[test]
fn center_direction_leaves_middle_untouched() {
    let canvas = Canvas::POSTER;
    let cfg = center_config(300.0);
    let img = rasterize(
        &ColorRamp::from_stops(&cfg.stops, cfg.intensity),
        &unified_geometry(&cfg, canvas),
        canvas,
    );

    // Default stops: navy at 80% on the edge fading to 0.
    assert!((i32::from(alpha_at(&img, 540, 0)) - 204).abs() <= 1);
    assert!((i32::from(alpha_at(&img, 10, 1079)) - 204).abs() <= 1);
    assert!(alpha_at(&img, 540, 150) > 0);
    assert!(alpha_at(&img, 540, 930) > 0);

    let stride = (img.width * 4) as usize;
    let middle = &img.rgba8_premul[300 * stride..780 * stride];
    assert!(middle.iter().all(|&b| b == 0));
}

#[test]
fn center_bands_are_capped_at_half_the_canvas() {
    let canvas = Canvas::POSTER;
    let geo = unified_geometry(&center_config(5000.0), canvas);
    assert_eq!(geo.len(), 2);
    for g in geo {
        let GradientShape::Band { length, .. } = g.shape else {
            panic!("center uses bands");
        };
        assert_eq!(length, 540.0);
    }
}

#[test]
fn top_band_covers_only_its_height() {
    let canvas = Canvas::POSTER;
    let cfg = UnifiedGradient {
        direction: GradientDirection::Top,
        height: 100.0,
        stops: vec![GradientStop::new(NAVY, 100.0, 0.0), GradientStop::new(NAVY, 100.0, 100.0)],
        ..UnifiedGradient::default()
    };
    let img = rasterize(
        &ColorRamp::from_stops(&cfg.stops, 100.0),
        &unified_geometry(&cfg, canvas),
        canvas,
    );
    assert_eq!(alpha_at(&img, 0, 99), 255);
    assert_eq!(alpha_at(&img, 0, 100), 0);
    assert_eq!(alpha_at(&img, 0, 1079), 0);
}

#[test]
fn radial_is_centered_and_pads_outside() {
    let canvas = Canvas::POSTER;
    let cfg = UnifiedGradient {
        kind: GradientKind::Radial,
        height: 2000.0,
        stops: vec![
            GradientStop::new(NAVY, 100.0, 0.0),
            GradientStop::new(NAVY, 25.0, 100.0),
        ],
        ..UnifiedGradient::default()
    };
    let geo = unified_geometry(&cfg, canvas);
    assert_eq!(
        geo[0].shape,
        GradientShape::Radial {
            center: Point::new(540.0, 540.0),
            radius: 540.0
        }
    );
    let img = rasterize(&ColorRamp::from_stops(&cfg.stops, 100.0), &geo, canvas);
    assert!(alpha_at(&img, 540, 540) > 250);
    assert_eq!(alpha_at(&img, 0, 0), 64);
}

#[test]
fn two_zone_synthesizes_each_enabled_zone() {
    let canvas = Canvas::POSTER;
    let mut cfg = TwoZoneGradient::default();
    assert_eq!(synthesize(&GradientConfig::TwoZone(cfg.clone()), canvas).len(), 2);

    cfg.bottom.enabled = false;
    cfg.blend = BlendMode::Multiply;
    let layers = synthesize(&GradientConfig::TwoZone(cfg.clone()), canvas);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].blend, BlendMode::Multiply);
    assert!(alpha_at(&layers[0].raster, 540, 0) > 0);
    assert_eq!(alpha_at(&layers[0].raster, 540, 1079), 0);

    cfg.enabled = false;
    assert!(synthesize(&GradientConfig::TwoZone(cfg), canvas).is_empty());
}

#[test]
fn bottom_zone_puts_first_stop_on_the_bottom_edge() {
    let canvas = Canvas::POSTER;
    let zone = ZoneGradient {
        height: 200.0,
        ..ZoneGradient::default()
    };
    let g = zone_geometry(&zone, false, canvas);
    assert_eq!(g.rows, Some((880.0, 1080.0)));
    let img = rasterize(&ColorRamp::from_stops(&zone.stops, 100.0), &[g], canvas);
    assert!(alpha_at(&img, 0, 1079) > alpha_at(&img, 0, 900));
    assert_eq!(alpha_at(&img, 0, 879), 0);
}

#[test]
fn disabled_or_invisible_unified_gradient_yields_nothing() {
    let canvas = Canvas::POSTER;
    let off = UnifiedGradient {
        enabled: false,
        ..UnifiedGradient::default()
    };
    assert!(synthesize(&GradientConfig::Unified(off), canvas).is_empty());

    let faint = UnifiedGradient {
        intensity: 0.0,
        ..UnifiedGradient::default()
    };
    assert!(synthesize(&GradientConfig::Unified(faint), canvas).is_empty());
}

#[test]
fn vertical_fill_runs_between_template_colors() {
    let canvas = Canvas::POSTER;
    let img = vertical_fill(Rgba8::rgb(0, 0, 0), Rgba8::rgb(255, 255, 255), canvas);
    let px = |y: u32| {
        let i = ((y * img.width) * 4) as usize;
        [img.rgba8_premul[i], img.rgba8_premul[i + 3]]
    };
    assert_eq!(px(0), [0, 255]);
    assert_eq!(px(1079), [255, 255]);
    assert!(px(540)[0] > 100 && px(540)[0] < 160);
}
