//! Page-space geometry primitives and rotation math
//!
//! All coordinates are page-local: unscaled, unrotated, x increasing to the
//! right and y increasing downward. Angles are in degrees and positive angles
//! rotate clockwise on screen.
//!
//! None of these functions fail. Degenerate input (empty vertex lists,
//! zero-sized rectangles, non-finite angles) yields a degenerate but finite
//! rectangle.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Stroke padding multiplier applied by [`line_rect_with_endings`].
pub const LINE_BOUNDS_SAFETY_FACTOR: f64 = 1.2;

/// Smallest footprint of a decorative line ending, in page units.
pub const MIN_LINE_ENDING_SIZE: f64 = 6.0;

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Offset by a delta
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Multiply both components by a factor
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// True if both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in page units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height, `None` when either side is degenerate
    pub fn aspect_ratio(&self) -> Option<f64> {
        let ratio = self.width / self.height;
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }
}

/// Axis-aligned rectangle in page space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Position,
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle spanning the given extents
    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x, min_y, (max_x - min_x).max(0.0), (max_y - min_y).max(0.0))
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Corners in clockwise order starting at the top-left
    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(self.min_x(), self.min_y()),
            Position::new(self.max_x(), self.min_y()),
            Position::new(self.max_x(), self.max_y()),
            Position::new(self.min_x(), self.max_y()),
        ]
    }

    /// Copy of this rectangle moved by a delta
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            origin: self.origin.translate(dx, dy),
            size: self.size,
        }
    }

    /// Copy of this rectangle with its origin replaced
    pub fn with_origin(&self, origin: Position) -> Self {
        Self { origin, size: self.size }
    }

    /// True if `other` lies inside this rectangle, allowing `tolerance` of overshoot
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.min_x() >= self.min_x() - tolerance
            && other.min_y() >= self.min_y() - tolerance
            && other.max_x() <= self.max_x() + tolerance
            && other.max_y() <= self.max_y() + tolerance
    }
}

/// Sine and cosine of an angle in degrees.
///
/// Quarter turns are exact so that axis-aligned rotations never introduce
/// `6e-17` noise into otherwise integral coordinates.
pub fn sin_cos_degrees(angle_degrees: f64) -> (f64, f64) {
    if !angle_degrees.is_finite() {
        return (0.0, 1.0);
    }
    let normalized = angle_degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

/// Rotate `point` clockwise about `center`
pub fn rotate_point_around_center(point: Position, center: Position, angle_degrees: f64) -> Position {
    let (sin, cos) = sin_cos_degrees(angle_degrees);
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Position::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Rotate every vertex clockwise about `center`
pub fn rotate_vertices(vertices: &[Position], center: Position, angle_degrees: f64) -> Vec<Position> {
    vertices
        .iter()
        .map(|v| rotate_point_around_center(*v, center, angle_degrees))
        .collect()
}

/// Bounding box of `rect` after rotating it about its own center
pub fn calculate_rotated_rect_aabb(rect: Rect, angle_degrees: f64) -> Rect {
    let (sin, cos) = sin_cos_degrees(angle_degrees);
    if sin == 0.0 && cos == 1.0 {
        return rect;
    }
    let center = rect.center();
    let corners = rect
        .corners()
        .map(|corner| rotate_point_around_center(corner, center, angle_degrees));
    calculate_aabb_from_vertices(&corners, 0.0)
}

/// Bounding box of a point set, grown by `padding` on every side.
///
/// An empty point set yields a zero-sized rectangle at the origin.
pub fn calculate_aabb_from_vertices(vertices: &[Position], padding: f64) -> Rect {
    let Some(first) = vertices.first() else {
        return Rect::default();
    };
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for v in vertices.iter().skip(1) {
        min_x = min_x.min(v.x);
        max_x = max_x.max(v.x);
        min_y = min_y.min(v.y);
        max_y = max_y.max(v.y);
    }
    expand_rect(Rect::from_bounds(min_x, min_y, max_x, max_y), padding)
}

/// Grow a rectangle uniformly. Negative or non-finite padding is ignored.
pub fn expand_rect(rect: Rect, padding: f64) -> Rect {
    if !padding.is_finite() || padding <= 0.0 {
        return rect;
    }
    Rect::new(
        rect.origin.x - padding,
        rect.origin.y - padding,
        rect.size.width + padding * 2.0,
        rect.size.height + padding * 2.0,
    )
}

/// Decorative marker drawn at a line or polyline end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    None,
    Square,
    Circle,
    Diamond,
    OpenArrow,
    ClosedArrow,
    Butt,
    ROpenArrow,
    RClosedArrow,
    Slash,
}

impl LineEnding {
    /// Outline of the marker in a frame whose origin is the line end and whose
    /// +x axis points out of the line.
    pub fn footprint(self, size: f64) -> Vec<Position> {
        let half = size / 2.0;
        match self {
            LineEnding::None => Vec::new(),
            LineEnding::OpenArrow | LineEnding::ClosedArrow => vec![
                Position::ORIGIN,
                Position::new(-size, half),
                Position::new(-size, -half),
            ],
            LineEnding::ROpenArrow | LineEnding::RClosedArrow => vec![
                Position::ORIGIN,
                Position::new(size, half),
                Position::new(size, -half),
            ],
            LineEnding::Circle | LineEnding::Square => vec![
                Position::new(-half, -half),
                Position::new(half, -half),
                Position::new(half, half),
                Position::new(-half, half),
            ],
            LineEnding::Diamond => vec![
                Position::new(half, 0.0),
                Position::new(0.0, half),
                Position::new(-half, 0.0),
                Position::new(0.0, -half),
            ],
            LineEnding::Butt => vec![Position::new(0.0, half), Position::new(0.0, -half)],
            LineEnding::Slash => {
                // 30 degrees off the perpendicular
                let (sin, cos) = sin_cos_degrees(30.0);
                vec![
                    Position::new(half * sin, -half * cos),
                    Position::new(-half * sin, half * cos),
                ]
            }
        }
    }
}

/// Markers at the first and last vertex of an open path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineEndings {
    pub start: LineEnding,
    pub end: LineEnding,
}

impl LineEndings {
    pub fn new(start: LineEnding, end: LineEnding) -> Self {
        Self { start, end }
    }
}

/// Size of a line-ending marker for a given stroke width
pub fn line_ending_size(stroke_width: f64) -> f64 {
    (stroke_width * 3.0).max(MIN_LINE_ENDING_SIZE)
}

/// Tight bounding rectangle of an open path including its end markers.
///
/// Each marker is rotated to the direction of its end segment. The result is
/// padded by half the stroke width times [`LINE_BOUNDS_SAFETY_FACTOR`]. With
/// fewer than two vertices the result is a square of side `2 * stroke_width`
/// centered on the single point (or the origin).
pub fn line_rect_with_endings(vertices: &[Position], stroke_width: f64, endings: Option<&LineEndings>) -> Rect {
    let stroke = if stroke_width.is_finite() { stroke_width.max(0.0) } else { 0.0 };

    if vertices.len() < 2 {
        let point = vertices.first().copied().unwrap_or(Position::ORIGIN);
        return Rect::new(point.x - stroke, point.y - stroke, stroke * 2.0, stroke * 2.0);
    }

    let mut points = vertices.to_vec();
    if let Some(endings) = endings {
        let last = vertices.len() - 1;
        let size = line_ending_size(stroke);
        push_ending_points(&mut points, endings.start, vertices[0], vertices[1], size);
        push_ending_points(&mut points, endings.end, vertices[last], vertices[last - 1], size);
    }

    calculate_aabb_from_vertices(&points, stroke / 2.0 * LINE_BOUNDS_SAFETY_FACTOR)
}

fn push_ending_points(out: &mut Vec<Position>, ending: LineEnding, tip: Position, previous: Position, size: f64) {
    if ending == LineEnding::None {
        return;
    }
    let dx = tip.x - previous.x;
    let dy = tip.y - previous.y;
    let angle = if dx == 0.0 && dy == 0.0 { 0.0 } else { dy.atan2(dx).to_degrees() };
    for local in ending.footprint(size) {
        out.push(rotate_point_around_center(tip + local, tip, angle));
    }
}
