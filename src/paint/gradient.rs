use std::sync::Arc;

use crate::{
    assets::decode::DecodedImage,
    composition::model::{
        BlendMode, GradientConfig, GradientDirection, GradientKind, GradientStop,
        UnifiedGradient, ZoneGradient,
    },
    foundation::core::{Canvas, Point, Rgba8, Vec2},
    foundation::math::lerp_f32,
};

/// One synthesized overlay: a canvas-sized premultiplied raster plus how it composites.
///
/// Pixels the gradient does not cover are fully transparent, so they leave what is below
/// untouched under every blend mode.
#[derive(Clone, Debug)]
pub struct GradientLayer {
    pub raster: Arc<DecodedImage>,
    pub blend: BlendMode,
}

/// Clamp positions and opacities to `[0, 100]`, sort ascending by position and collapse
/// duplicate positions so that the stop given last wins.
///
/// The result is a fixed point: normalizing it again returns it unchanged.
pub fn normalize_stops(stops: &[GradientStop]) -> Vec<GradientStop> {
    let mut out: Vec<GradientStop> = stops
        .iter()
        .map(|s| GradientStop {
            color: s.color,
            opacity: clamp_percent(s.opacity),
            position: clamp_percent(s.position),
        })
        .collect();
    // Stable: equal positions keep insertion order.
    out.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut deduped: Vec<GradientStop> = Vec::with_capacity(out.len());
    for stop in out {
        match deduped.last_mut() {
            Some(last) if last.position == stop.position => *last = stop,
            _ => deduped.push(stop),
        }
    }
    deduped
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Piecewise-linear color ramp over `[0, 1]`, interpolated in premultiplied space.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<(f32, [f32; 4])>,
}

impl ColorRamp {
    /// Build from user stops. `intensity` (percent) scales every stop's opacity.
    pub fn from_stops(stops: &[GradientStop], intensity: f64) -> Self {
        let strength = (clamp_percent(intensity) / 100.0) as f32;
        let stops = normalize_stops(stops)
            .into_iter()
            .map(|s| {
                let alpha = f32::from(s.color.a) / 255.0 * (s.opacity / 100.0) as f32 * strength;
                ((s.position / 100.0) as f32, premul_f32(s.color, alpha))
            })
            .collect();
        Self { stops }
    }

    /// Build from `(offset, color)` pairs already sorted by offset in `[0, 1]`.
    pub fn from_offsets(stops: &[(f32, Rgba8)]) -> Self {
        Self {
            stops: stops
                .iter()
                .map(|&(t, c)| (t.clamp(0.0, 1.0), premul_f32(c, f32::from(c.a) / 255.0)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether every stop is fully transparent.
    pub fn is_invisible(&self) -> bool {
        self.stops.iter().all(|(_, c)| c[3] <= 0.0)
    }

    /// Premultiplied RGBA8 at `t`, padding outside `[0, 1]` with the end colors.
    pub fn sample(&self, t: f32) -> [u8; 4] {
        let Some(&(first_t, first)) = self.stops.first() else {
            return [0, 0, 0, 0];
        };
        let c = if t <= first_t {
            first
        } else {
            match self.stops.windows(2).find(|w| t < w[1].0) {
                Some(w) => {
                    let (t0, c0) = w[0];
                    let (t1, c1) = w[1];
                    let f = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
                    std::array::from_fn(|i| lerp_f32(c0[i], c1[i], f))
                }
                None => self.stops[self.stops.len() - 1].1,
            }
        };
        c.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }
}

fn premul_f32(c: Rgba8, alpha: f32) -> [f32; 4] {
    let a = alpha.clamp(0.0, 1.0);
    [
        f32::from(c.r) / 255.0 * a,
        f32::from(c.g) / 255.0 * a,
        f32::from(c.b) / 255.0 * a,
        a,
    ]
}

/// Where a ramp is laid out on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientShape {
    /// Covers pixels whose projection onto `dir` from `origin` lies in `[0, length]`.
    Band { origin: Point, dir: Vec2, length: f64 },
    /// Covers every pixel; distance from `center` over `radius`, padded beyond it.
    Radial { center: Point, radius: f64 },
}

/// A shape optionally restricted to rows `[y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientGeometry {
    pub shape: GradientShape,
    pub rows: Option<(f64, f64)>,
}

impl GradientGeometry {
    fn ramp_t(&self, p: Point) -> Option<f32> {
        if let Some((y0, y1)) = self.rows
            && (p.y < y0 || p.y >= y1)
        {
            return None;
        }
        match self.shape {
            GradientShape::Band {
                origin,
                dir,
                length,
            } => {
                let t = (p - origin).dot(dir) / length;
                (0.0..=1.0).contains(&t).then_some(t as f32)
            }
            GradientShape::Radial { center, radius } => {
                Some(((p - center).hypot() / radius) as f32)
            }
        }
    }

    fn is_degenerate(&self) -> bool {
        match self.shape {
            GradientShape::Band { length, .. } => !(length > 0.0),
            GradientShape::Radial { radius, .. } => !(radius > 0.0),
        }
    }
}

/// Paint `ramp` through every geometry into one canvas-sized raster. Where geometries overlap
/// the first one listed wins.
pub fn rasterize(ramp: &ColorRamp, geometries: &[GradientGeometry], canvas: Canvas) -> DecodedImage {
    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let mut data = vec![0u8; canvas.byte_len()];
    let live: Vec<&GradientGeometry> = geometries.iter().filter(|g| !g.is_degenerate()).collect();

    if !ramp.is_empty() && !live.is_empty() {
        for (y, row) in data.chunks_exact_mut(w * 4).enumerate().take(h) {
            let py = y as f64 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let p = Point::new(x as f64 + 0.5, py);
                if let Some(t) = live.iter().find_map(|g| g.ramp_t(p)) {
                    px.copy_from_slice(&ramp.sample(t));
                }
            }
        }
    }

    DecodedImage {
        width: canvas.width,
        height: canvas.height,
        rgba8_premul: Arc::new(data),
    }
}

/// Unit axis pointing into the canvas from the top edge, rotated by `angle_deg` (clockwise).
fn down_axis(angle_deg: f64) -> Vec2 {
    let a = angle_deg.to_radians();
    Vec2::new(-a.sin(), a.cos())
}

/// Geometry of a unified gradient.
pub fn unified_geometry(cfg: &UnifiedGradient, canvas: Canvas) -> Vec<GradientGeometry> {
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    let height = cfg.height.max(0.0);

    if cfg.kind == GradientKind::Radial {
        return vec![GradientGeometry {
            shape: GradientShape::Radial {
                center: Point::new(w * 0.5, h * 0.5),
                radius: height.min(w.min(h) * 0.5),
            },
            rows: None,
        }];
    }

    let down = down_axis(cfg.angle_deg);
    let length = height.min(h);
    let band = |origin: Point, dir: Vec2, length: f64| GradientGeometry {
        shape: GradientShape::Band {
            origin,
            dir,
            length,
        },
        rows: None,
    };
    match cfg.direction {
        GradientDirection::Top => vec![band(Point::new(w * 0.5, 0.0), down, length)],
        GradientDirection::Bottom => vec![band(Point::new(w * 0.5, h), -down, length)],
        GradientDirection::Both => {
            let mid = Point::new(w * 0.5, h * 0.5);
            vec![band(mid - down * (length * 0.5), down, length)]
        }
        // Two edge bands with the middle left alone; the angle does not apply.
        GradientDirection::Center => {
            let edge = height.min(h * 0.5);
            vec![
                band(Point::new(w * 0.5, 0.0), Vec2::new(0.0, 1.0), edge),
                band(Point::new(w * 0.5, h), Vec2::new(0.0, -1.0), edge),
            ]
        }
    }
}

/// Geometry of one zone of a two-zone gradient, confined to the zone's rows.
pub fn zone_geometry(zone: &ZoneGradient, top: bool, canvas: Canvas) -> GradientGeometry {
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    let extent = zone.height.max(0.0).min(h);
    let rows = if top { (0.0, extent) } else { (h - extent, h) };
    let edge = Point::new(w * 0.5, if top { 0.0 } else { h });

    let shape = match zone.kind {
        GradientKind::Linear => {
            let down = down_axis(zone.angle_deg);
            GradientShape::Band {
                origin: edge,
                dir: if top { down } else { -down },
                length: extent,
            }
        }
        GradientKind::Radial => GradientShape::Radial {
            center: zone.center.map(|[x, y]| Point::new(x, y)).unwrap_or(edge),
            radius: extent.min(w.min(h) * 0.5),
        },
    };
    GradientGeometry {
        shape,
        rows: Some(rows),
    }
}

/// Synthesize every overlay layer `config` asks for, in paint order.
///
/// A unified config yields at most one layer; a two-zone config yields one per enabled zone
/// (top first). Layers that would be invisible are skipped.
#[tracing::instrument(level = "debug", skip_all)]
pub fn synthesize(config: &GradientConfig, canvas: Canvas) -> Vec<GradientLayer> {
    let mut out = Vec::new();
    match config {
        GradientConfig::Unified(u) => {
            if !u.enabled {
                return out;
            }
            let ramp = ColorRamp::from_stops(&u.stops, u.intensity);
            if !ramp.is_invisible() {
                out.push(GradientLayer {
                    raster: Arc::new(rasterize(&ramp, &unified_geometry(u, canvas), canvas)),
                    blend: u.blend,
                });
            }
        }
        GradientConfig::TwoZone(z) => {
            if !z.enabled {
                return out;
            }
            for (zone, top) in [(&z.top, true), (&z.bottom, false)] {
                if !zone.enabled {
                    continue;
                }
                let ramp = ColorRamp::from_stops(&zone.stops, z.intensity);
                if ramp.is_invisible() {
                    continue;
                }
                let geometry = zone_geometry(zone, top, canvas);
                out.push(GradientLayer {
                    raster: Arc::new(rasterize(&ramp, &[geometry], canvas)),
                    blend: z.blend,
                });
            }
        }
    }
    out
}

/// Opaque top-to-bottom two-color fill covering the whole canvas.
pub fn vertical_fill(top: Rgba8, bottom: Rgba8, canvas: Canvas) -> DecodedImage {
    let ramp = ColorRamp::from_offsets(&[(0.0, top), (1.0, bottom)]);
    let geometry = GradientGeometry {
        shape: GradientShape::Band {
            origin: Point::new(canvas.center_x(), 0.0),
            dir: Vec2::new(0.0, 1.0),
            length: canvas.height_f64(),
        },
        rows: None,
    };
    rasterize(&ramp, &[geometry], canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
