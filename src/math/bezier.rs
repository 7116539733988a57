use super::Point;

/// Quadratic Bezier curve with a single control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBezier {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadBezier {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self { start, control, end }
    }

    /// Evaluate curve at parameter t (0.0 to 1.0)
    pub fn evaluate(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let a = self.start.lerp(&self.control, t);
        let b = self.control.lerp(&self.end, t);
        a.lerp(&b, t)
    }

    /// The sub-curve covering [0, t], rebuilt with de Casteljau so it is
    /// itself a quadratic Bezier ending at evaluate(t)
    pub fn truncate(&self, t: f64) -> QuadBezier {
        let t = t.clamp(0.0, 1.0);
        let control = self.start.lerp(&self.control, t);
        let mid = self.control.lerp(&self.end, t);
        QuadBezier {
            start: self.start,
            control,
            end: control.lerp(&mid, t),
        }
    }

    /// Apply a uniform scale and translation
    pub fn transform(&self, scale: f64, offset: Point) -> QuadBezier {
        QuadBezier {
            start: self.start.scale(scale) + offset,
            control: self.control.scale(scale) + offset,
            end: self.end.scale(scale) + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc() -> QuadBezier {
        QuadBezier::new(Point::new(0.0, 0.0), Point::new(5.0, 10.0), Point::new(10.0, 0.0))
    }

    #[test]
    fn test_curve_endpoints() {
        let curve = arc();
        assert_eq!(curve.evaluate(0.0), curve.start);
        assert_eq!(curve.evaluate(1.0), curve.end);
    }

    #[test]
    fn test_truncate_full_is_identity() {
        let curve = arc();
        assert_eq!(curve.truncate(1.0), curve);
    }

    #[test]
    fn test_truncate_zero_collapses_to_start() {
        let curve = arc();
        let cut = curve.truncate(0.0);
        assert_eq!(cut.start, curve.start);
        assert_eq!(cut.control, curve.start);
        assert_eq!(cut.end, curve.start);
    }

    #[test]
    fn test_truncated_curve_follows_original() {
        let curve = arc();
        let t = 0.4;
        let cut = curve.truncate(t);

        assert!(cut.end.distance(&curve.evaluate(t)) < 1e-9);
        // Points on the sub-curve map onto the original at scaled parameters
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let on_cut = cut.evaluate(u);
            let on_curve = curve.evaluate(u * t);
            assert!(on_cut.distance(&on_curve) < 1e-9, "mismatch at u={}", u);
        }
    }

    #[test]
    fn test_transform() {
        let curve = arc().transform(2.0, Point::new(1.0, 1.0));
        assert_eq!(curve.end, Point::new(21.0, 1.0));
        assert_eq!(curve.control, Point::new(11.0, 21.0));
    }
}
