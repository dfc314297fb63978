use crate::motion::QuadraticBezier;

// Fractions of the square widget side.
pub const DISK_RATIO: f64 = 0.3;
pub const DISK_ORIGIN: (f64, f64) = (0.70, 0.35);
pub const PATH_START: (f64, f64) = (0.85, 0.65);
pub const PATH_CONTROL: (f64, f64) = (0.20, 0.50);
pub const PATH_END: (f64, f64) = (0.70, 0.20);
pub const ICON_DIVISOR: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn fraction_of(side: f64, (fx, fy): (f64, f64)) -> Self {
        Self::new(fx * side, fy * side)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn square(origin: Point, side: f64) -> Self {
        Self::new(origin, side, side)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }
}

/// Layout of the disk and the particle path for a square widget of side
/// `size` pixels.
///
/// The disk hugs the right edge, vertically centred; the path starts just
/// below-right of the disk and bows out to the left before ending above it.
/// Computed once; a resized widget needs a fresh controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskGeometry {
    pub size: u32,
    pub disk: Rect,
    pub path: QuadraticBezier,
    pub icon_size: u32,
}

impl DiskGeometry {
    pub fn compute(size: u32) -> Self {
        let side = f64::from(size);
        // whole pixels, like a layout param would be
        let disk_side = (u64::from(size) * 3 / 10) as f64;

        Self {
            size,
            disk: Rect::square(Point::fraction_of(side, DISK_ORIGIN), disk_side),
            path: QuadraticBezier::new(
                Point::fraction_of(side, PATH_START),
                Point::fraction_of(side, PATH_CONTROL),
                Point::fraction_of(side, PATH_END),
            ),
            icon_size: size / ICON_DIVISOR,
        }
    }
}
