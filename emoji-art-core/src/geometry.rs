//! Coordinate spaces and the conversions between them.
//!
//! Two spaces are in play:
//!
//! ```text
//! document space              view space
//!        +y                    (0,0) ──────► +x
//!         ▲                      │
//!         │                      │    (cx,cy) = viewport center
//!  ───────┼──────► +x            ▼
//!         │(0,0)                +y
//! ```
//!
//! Document space is an integer grid centered on the document with y pointing
//! up. View space is `f64` pixels with the origin at the top-left corner and y
//! pointing down. The document origin is drawn at the viewport center.

use std::ops::{Add, AddAssign, Mul, Neg};

use serde::{Deserialize, Serialize};

/// Smallest zoom magnitude accepted when mapping view points back to the
/// document. Smaller values are clamped to this.
pub const MIN_ZOOM: f64 = 1e-3;

/// Integer position in document space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, increasing to the right.
    pub x: i32,
    /// Vertical coordinate, increasing upward.
    pub y: i32,
}

impl Position {
    /// The document origin. The background is placed here.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<Vector> for Position {
    type Output = Self;

    fn add(self, rhs: Vector) -> Self {
        Self {
            x: self.x.wrapping_add(rhs.dx),
            y: self.y.wrapping_add(rhs.dy),
        }
    }
}

impl AddAssign<Vector> for Position {
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

/// Integer displacement in document units.
///
/// Addition wraps on overflow, so moving by `a` then `b` always lands where
/// moving by `a + b` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal displacement.
    pub dx: i32,
    /// Vertical displacement (positive is up).
    pub dy: i32,
}

impl Vector {
    /// No displacement.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Create a displacement.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            dx: self.dx.wrapping_add(rhs.dx),
            dy: self.dy.wrapping_add(rhs.dy),
        }
    }
}

/// A point in view space (pixels, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add<Offset> for Point {
    type Output = Self;

    fn add(self, rhs: Offset) -> Self {
        Self {
            x: self.x + rhs.width,
            y: self.y + rhs.height,
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The point at the middle of a `(0,0)`-anchored area of this size.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A 2D translation in view space, as reported by drag gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal translation (positive is right).
    pub width: f64,
    /// Vertical translation (positive is down).
    pub height: f64,
}

impl Offset {
    /// No translation.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create an offset.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Self) {
        self.width += rhs.width;
        self.height += rhs.height;
    }
}

impl Mul<f64> for Offset {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            width: -self.width,
            height: -self.height,
        }
    }
}

/// Axis-aligned rectangle. `origin` is the corner with the smallest
/// coordinates on both axes, whichever space the rectangle lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner.
    pub origin: Point,
    /// Extent from the origin.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its minimum corner and size.
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` whose center is `center`.
    #[must_use]
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self {
            origin: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        }
    }

    /// Smallest rectangle containing every point. `None` for no points.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::from_corners(min, max))
    }

    fn from_corners(min: Point, max: Point) -> Self {
        Self {
            origin: min,
            size: Size::new(max.x - min.x, max.y - min.y),
        }
    }

    /// Largest x coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Largest y coordinate.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min = Point::new(self.origin.x.min(other.origin.x), self.origin.y.min(other.origin.y));
        let max = Point::new(self.max_x().max(other.max_x()), self.max_y().max(other.max_y()));
        Self::from_corners(min, max)
    }

    /// Whether the point lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x && p.x <= self.max_x() && p.y >= self.origin.y && p.y <= self.max_y()
    }

    /// Whether either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.size.is_positive()
    }

    /// Mirror across the x axis, turning a y-up rectangle into a y-down one
    /// (and back).
    #[must_use]
    pub fn flipped_y(&self) -> Self {
        Self {
            origin: Point::new(self.origin.x, -self.max_y()),
            size: self.size,
        }
    }
}

/// Map a document position to view space.
///
/// `view = (center.x + x, center.y - y)`. Zoom and pan are applied on top of
/// this by the renderer, see [`crate::Viewport::project`].
#[must_use]
pub fn to_view(position: Position, viewport_center: Point) -> Point {
    Point::new(
        viewport_center.x + grid_to_f64(position.x),
        viewport_center.y - grid_to_f64(position.y),
    )
}

/// Map a view point back to the document, undoing pan and zoom.
///
/// Components are rounded half away from zero. A zoom closer to zero than
/// [`MIN_ZOOM`] is clamped to it.
#[must_use]
pub fn to_document(view_point: Point, viewport_center: Point, pan: Offset, zoom: f64) -> Position {
    let zoom = clamp_zoom(zoom);
    Position::new(
        round_to_grid((view_point.x - viewport_center.x - pan.width) / zoom),
        round_to_grid((viewport_center.y - view_point.y + pan.height) / zoom),
    )
}

/// Midpoint of a rectangle.
#[must_use]
pub fn center_of(rect: &Rect) -> Point {
    rect.center()
}

/// Rectangle of the given size centered at a point.
#[must_use]
pub fn rect_centered_at(center: Point, size: Size) -> Rect {
    Rect::centered_at(center, size)
}

pub(crate) fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() || zoom.abs() < MIN_ZOOM {
        MIN_ZOOM
    } else {
        zoom
    }
}

/// Round to the nearest document unit, saturating at the `i32` range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn round_to_grid(value: f64) -> i32 {
    // `as` saturates for out-of-range floats and maps NaN to 0
    value.round() as i32
}

pub(crate) fn grid_to_f64(value: i32) -> f64 {
    f64::from(value)
}
