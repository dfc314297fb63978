//! Per-particle motion: the curved path, the fade envelope and the
//! grow-then-shrink pulse, all as functions of the animation fraction.

use crate::geometry::Point;

pub const SCALE_KEYFRAMES: [f64; 3] = [0.4, 1.0, 0.4];
pub const ROTATION_START: f64 = 0.0;
pub const ROTATION_END: f64 = -45.0;

/// Second-order Bézier curve from `start` to `end`, bent towards `control`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadraticBezier {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    pub fn evaluate(&self, fraction: f64) -> Point {
        let f = fraction.clamp(0.0, 1.0);
        let left = 1.0 - f;
        let (a, b, c) = (left * left, 2.0 * left * f, f * f);

        Point::new(
            a * self.start.x + b * self.control.x + c * self.end.x,
            a * self.start.y + b * self.control.y + c * self.end.y,
        )
    }
}

/// Triangular fade: 0 at both ends, fully opaque half way.
pub fn opacity_envelope(fraction: f64) -> f64 {
    let f = fraction.clamp(0.0, 1.0);
    if f > 0.5 { 2.0 * (1.0 - f) } else { 2.0 * f }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Piecewise-linear interpolation over evenly spaced keyframes.
pub fn keyframes(values: &[f64], fraction: f64) -> f64 {
    match values {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = values.len() - 1;
            let position = fraction.clamp(0.0, 1.0) * segments as f64;
            let index = (position.floor() as usize).min(segments - 1);
            lerp(values[index], values[index + 1], position - index as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTransform {
    pub position: Point,
    pub scale: f64,
    /// Degrees, negative is counter-clockwise.
    pub rotation: f64,
    pub opacity: f64,
}

impl ParticleTransform {
    pub fn at(path: &QuadraticBezier, fraction: f64) -> Self {
        Self {
            position: path.evaluate(fraction),
            scale: keyframes(&SCALE_KEYFRAMES, fraction),
            rotation: lerp(ROTATION_START, ROTATION_END, fraction.clamp(0.0, 1.0)),
            opacity: opacity_envelope(fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> QuadraticBezier {
        QuadraticBezier::new(
            Point::new(255.0, 195.0),
            Point::new(60.0, 150.0),
            Point::new(210.0, 60.0),
        )
    }

    #[test]
    fn test_bezier_hits_endpoints_exactly() {
        let curves = [
            curve(),
            QuadraticBezier::new(
                Point::new(-3.5, 7.25),
                Point::new(1e6, -1e6),
                Point::new(0.1, 0.2),
            ),
        ];
        for c in curves {
            assert_eq!(c.evaluate(0.0), c.start);
            assert_eq!(c.evaluate(1.0), c.end);
        }
    }

    #[test]
    fn test_bezier_midpoint_weights() {
        let c = curve();
        let mid = c.evaluate(0.5);
        let expected = Point::new(
            0.25 * c.start.x + 0.5 * c.control.x + 0.25 * c.end.x,
            0.25 * c.start.y + 0.5 * c.control.y + 0.25 * c.end.y,
        );
        assert!(mid.distance(expected) < 1e-9);
        assert!(mid.distance(Point::new(146.25, 138.75)) < 1e-9);
    }

    #[test]
    fn test_bezier_is_continuous() {
        let c = curve();
        let steps = 1000;
        for i in 0..steps {
            let a = c.evaluate(i as f64 / steps as f64);
            let b = c.evaluate((i + 1) as f64 / steps as f64);
            assert!(a.distance(b) < 1.0, "jump at step {i}");
        }
    }

    #[test]
    fn test_opacity_envelope() {
        assert_eq!(opacity_envelope(0.0), 0.0);
        assert_eq!(opacity_envelope(0.5), 1.0);
        assert_eq!(opacity_envelope(1.0), 0.0);
        assert_eq!(opacity_envelope(0.25), 0.5);

        for i in 0..=100 {
            let f = i as f64 / 200.0;
            assert!((opacity_envelope(0.5 - f) - opacity_envelope(0.5 + f)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scale_pulse() {
        assert!((keyframes(&SCALE_KEYFRAMES, 0.0) - 0.4).abs() < 1e-12);
        assert!((keyframes(&SCALE_KEYFRAMES, 0.25) - 0.7).abs() < 1e-12);
        assert_eq!(keyframes(&SCALE_KEYFRAMES, 0.5), 1.0);
        assert!((keyframes(&SCALE_KEYFRAMES, 1.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_transform_at_half_way() {
        let t = ParticleTransform::at(&curve(), 0.5);
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotation, -22.5);
    }
}
