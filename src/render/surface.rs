//! Drawing surfaces
//!
//! The compositor only produces ordered draw commands. A `DrawSurface`
//! turns them into pixels; `RasterSurface` paints them with `vello_cpu`
//! for encoded output and tests.

use image::RgbaImage;
use vello_cpu::kurbo::{self, Shape};
use vello_cpu::peniko;
use vello_cpu::{Pixmap, RenderContext};

use super::compositor::{DrawOp, Frame};
use crate::animation::{PlacedEntity, Segment};
use crate::math::{Color, Point};

/// Offset of the gradient highlight toward the upper-left, as a fraction of radius
pub const HIGHLIGHT_OFFSET: f64 = 0.3;

/// Flattening tolerance for circle outlines, in pixels
const CIRCLE_TOLERANCE: f64 = 0.1;

/// Something that can paint composed frames
pub trait DrawSurface {
    fn clear(&mut self, background: Color);
    fn stroke_quadratic(&mut self, segment: &Segment);
    fn fill_radial(&mut self, entity: &PlacedEntity);
}

/// Replay a composed frame onto `surface` in draw order
pub fn paint<S: DrawSurface + ?Sized>(frame: &Frame, surface: &mut S) {
    for op in &frame.ops {
        match op {
            DrawOp::Stroke(segment) => surface.stroke_quadratic(segment),
            DrawOp::Fill(entity) => surface.fill_radial(entity),
        }
    }
}

fn to_paint(color: Color) -> peniko::Color {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    peniko::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

/// Premultiplied RGBA8 back to straight alpha
fn unpremultiply(px: &[u8]) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a16 = u16::from(a);
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

/// CPU rasterizer over a `vello_cpu` render context
pub struct RasterSurface {
    ctx: RenderContext,
}

impl RasterSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ctx: RenderContext::new(width, height),
        }
    }

    pub fn width(&self) -> u16 {
        self.ctx.width()
    }

    pub fn height(&self) -> u16 {
        self.ctx.height()
    }

    /// Flush pending draws and copy them out as straight-alpha RGBA
    pub fn to_image(&mut self) -> RgbaImage {
        let (width, height) = (self.width(), self.height());
        let mut pixmap = Pixmap::new(width, height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let bytes: Vec<u8> = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .flat_map(unpremultiply)
            .collect();
        RgbaImage::from_raw(u32::from(width), u32::from(height), bytes)
            .unwrap_or_else(|| RgbaImage::new(u32::from(width), u32::from(height)))
    }

    pub fn into_image(mut self) -> RgbaImage {
        self.to_image()
    }
}

impl DrawSurface for RasterSurface {
    fn clear(&mut self, background: Color) {
        self.ctx.reset();
        self.ctx.set_transform(kurbo::Affine::IDENTITY);
        self.ctx.set_paint(to_paint(background));
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.ctx.fill_rect(&kurbo::Rect::new(0.0, 0.0, w, h));
    }

    fn stroke_quadratic(&mut self, segment: &Segment) {
        if !(segment.width.is_finite() && segment.width > 0.0) {
            return;
        }
        let mut path = kurbo::BezPath::new();
        path.move_to(to_kurbo(segment.start));
        path.quad_to(to_kurbo(segment.control), to_kurbo(segment.end));

        self.ctx
            .set_stroke(kurbo::Stroke::new(segment.width).with_caps(kurbo::Cap::Round));
        self.ctx.set_paint(to_paint(segment.color));
        self.ctx.stroke_path(&path);
    }

    fn fill_radial(&mut self, entity: &PlacedEntity) {
        let radius = entity.radius;
        if !(radius.is_finite() && radius > 0.0) || entity.opacity <= 0.0 {
            return;
        }

        let c = entity.center;
        let focus = Point::new(c.x - radius * HIGHLIGHT_OFFSET, c.y - radius * HIGHLIGHT_OFFSET);
        // farthest rim point from the focus
        let spread = radius * (1.0 + HIGHLIGHT_OFFSET * std::f64::consts::SQRT_2);
        let gradient = peniko::Gradient::new_radial(to_kurbo(focus), spread as f32)
            .with_stops([to_paint(entity.highlight), to_paint(entity.color)]);

        let circle = kurbo::Circle::new(to_kurbo(c), radius);
        let mut path = kurbo::BezPath::new();
        path.extend(circle.path_elements(CIRCLE_TOLERANCE));

        let faded = entity.opacity < 1.0;
        if faded {
            self.ctx.push_opacity_layer(entity.opacity.clamp(0.0, 1.0) as f32);
        }
        self.ctx.set_paint(gradient);
        self.ctx.fill_path(&path);
        if faded {
            self.ctx.pop_layer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::EntityKind;

    /// Records calls instead of painting
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl DrawSurface for Recorder {
        fn clear(&mut self, _background: Color) {
            self.calls.push("clear");
        }
        fn stroke_quadratic(&mut self, _segment: &Segment) {
            self.calls.push("stroke");
        }
        fn fill_radial(&mut self, _entity: &PlacedEntity) {
            self.calls.push("fill");
        }
    }

    fn segment(start: Point, end: Point, width: f64) -> Segment {
        Segment {
            start,
            control: start.midpoint(&end),
            end,
            width,
            color: Color::rgb(200, 100, 50),
            local_t: 1.0,
            depth: 0,
        }
    }

    fn entity(x: f64, y: f64, radius: f64, opacity: f64) -> PlacedEntity {
        PlacedEntity {
            center: Point::new(x, y),
            radius,
            color: Color::rgb(20, 120, 20),
            highlight: Color::rgb(200, 250, 200),
            kind: EntityKind::Leaf,
            opacity,
            dist_from_root: 0.0,
        }
    }

    fn close_to(actual: [u8; 4], expected: [u8; 4]) -> bool {
        actual.iter().zip(expected).all(|(a, e)| a.abs_diff(e) <= 2)
    }

    fn black(surface: &mut RasterSurface) -> bool {
        surface.to_image().pixels().all(|p| close_to(p.0, [0, 0, 0, 255]))
    }

    #[test]
    fn test_paint_replays_in_order() {
        let frame = Frame {
            progress: 1.0,
            ops: vec![
                DrawOp::Fill(entity(0.0, 0.0, 1.0, 1.0)),
                DrawOp::Stroke(segment(Point::ZERO, Point::new(1.0, 0.0), 1.0)),
                DrawOp::Fill(entity(0.0, 0.0, 1.0, 1.0)),
            ],
        };
        let mut recorder = Recorder::default();
        paint(&frame, &mut recorder);
        assert_eq!(recorder.calls, vec!["fill", "stroke", "fill"]);
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut surface = RasterSurface::new(8, 4);
        surface.clear(Color::rgb(12, 14, 20));
        let image = surface.to_image();
        assert_eq!(image.dimensions(), (8, 4));
        assert!(image.pixels().all(|p| close_to(p.0, [12, 14, 20, 255])));
    }

    #[test]
    fn test_stroke_covers_its_path() {
        let mut surface = RasterSurface::new(40, 40);
        surface.clear(Color::rgb(0, 0, 0));
        surface.stroke_quadratic(&segment(Point::new(5.0, 20.0), Point::new(35.0, 20.0), 4.0));

        let image = surface.to_image();
        assert!(close_to(image.get_pixel(20, 20).0, [200, 100, 50, 255]));
        assert!(close_to(image.get_pixel(20, 5).0, [0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_width_stroke_draws_nothing() {
        let mut surface = RasterSurface::new(10, 10);
        surface.clear(Color::rgb(0, 0, 0));
        surface.stroke_quadratic(&segment(Point::ZERO, Point::new(9.0, 9.0), 0.0));
        assert!(black(&mut surface));
    }

    #[test]
    fn test_radial_fill_is_brighter_toward_highlight() {
        let mut surface = RasterSurface::new(40, 40);
        surface.clear(Color::rgb(0, 0, 0));
        surface.fill_radial(&entity(20.0, 20.0, 12.0, 1.0));

        let image = surface.to_image();
        let upper_left = image.get_pixel(16, 16).0;
        let lower_right = image.get_pixel(27, 27).0;
        assert!(upper_left[1] > lower_right[1]);
        // outside the circle
        assert!(close_to(image.get_pixel(1, 1).0, [0, 0, 0, 255]));
    }

    #[test]
    fn test_opacity_scales_fill() {
        let mut faint = RasterSurface::new(20, 20);
        faint.clear(Color::rgb(0, 0, 0));
        faint.fill_radial(&entity(10.0, 10.0, 6.0, 0.2));

        let mut solid = RasterSurface::new(20, 20);
        solid.clear(Color::rgb(0, 0, 0));
        solid.fill_radial(&entity(10.0, 10.0, 6.0, 1.0));

        assert!(faint.to_image().get_pixel(10, 10).0[1] < solid.to_image().get_pixel(10, 10).0[1]);
    }

    #[test]
    fn test_offscreen_geometry_is_clipped() {
        let mut surface = RasterSurface::new(10, 10);
        surface.clear(Color::rgb(0, 0, 0));
        surface.fill_radial(&entity(-50.0, -50.0, 5.0, 1.0));
        surface.stroke_quadratic(&segment(Point::new(100.0, 100.0), Point::new(120.0, 100.0), 3.0));
        assert!(black(&mut surface));
    }

    #[test]
    fn test_unpremultiply() {
        assert_eq!(unpremultiply(&[0, 0, 0, 0]), [0, 0, 0, 0]);
        assert_eq!(unpremultiply(&[100, 50, 0, 255]), [100, 50, 0, 255]);
        assert_eq!(unpremultiply(&[64, 32, 0, 128]), [128, 64, 0, 128]);
    }
}
