//! Resize geometry
//!
//! Pure functions that turn a start rectangle, a local-space pointer delta and
//! a resize handle into a new rectangle. The pipeline runs once per pointer
//! move:
//!
//! 1. derive the anchor from the handle
//! 2. apply the delta to the free sides
//! 3. enforce the aspect ratio
//! 4. clamp to the page (unrotated only)
//! 5. clamp width/height to the min/max constraints
//! 6. re-anchor so the fixed corner or edge does not drift
//! 7. compensate the visual anchor of a rotated annotation
//!
//! [`compute_resized_rect`] wraps the pipeline and, for rotated annotations,
//! bisects the delta until the rotated bounding box fits the page.

use serde::{Deserialize, Serialize};

use crate::config::{Constraints, DragResizeConfig};
use crate::geometry::{calculate_rotated_rect_aabb, rotate_point_around_center, Position, Rect, Size};
use crate::snapping::normalize_angle;

/// Iterations of the rotated-bounds bisection
pub const BISECTION_ITERATIONS: usize = 20;

/// Overshoot tolerated when testing a rotated box against the page
pub const BOUNDS_TOLERANCE: f64 = 1e-6;

/// Resize handle, named by compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
        ResizeHandle::Nw,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::Se | ResizeHandle::Sw | ResizeHandle::Nw)
    }
}

/// Horizontal part of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorX {
    Left,
    Right,
    Center,
}

/// Vertical part of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Top,
    Bottom,
    Center,
}

/// The point of the rectangle that stays fixed during a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: AnchorX,
    pub y: AnchorY,
}

/// Anchor opposite to the dragged handle
pub fn get_anchor(handle: ResizeHandle) -> Anchor {
    let x = match handle {
        ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se => AnchorX::Left,
        ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw => AnchorX::Right,
        ResizeHandle::N | ResizeHandle::S => AnchorX::Center,
    };
    let y = match handle {
        ResizeHandle::Se | ResizeHandle::S | ResizeHandle::Sw => AnchorY::Top,
        ResizeHandle::Ne | ResizeHandle::N | ResizeHandle::Nw => AnchorY::Bottom,
        ResizeHandle::E | ResizeHandle::W => AnchorY::Center,
    };
    Anchor { x, y }
}

/// Page position of `anchor` on `rect`
pub fn get_anchor_point(rect: &Rect, anchor: Anchor) -> Position {
    let x = match anchor.x {
        AnchorX::Left => rect.min_x(),
        AnchorX::Right => rect.max_x(),
        AnchorX::Center => rect.origin.x + rect.size.width / 2.0,
    };
    let y = match anchor.y {
        AnchorY::Top => rect.min_y(),
        AnchorY::Bottom => rect.max_y(),
        AnchorY::Center => rect.origin.y + rect.size.height / 2.0,
    };
    Position::new(x, y)
}

/// Rectangle of the given size placed so that `anchor` lands on `point`
pub fn reanchor(size: Size, anchor: Anchor, point: Position) -> Rect {
    let x = match anchor.x {
        AnchorX::Left => point.x,
        AnchorX::Right => point.x - size.width,
        AnchorX::Center => point.x - size.width / 2.0,
    };
    let y = match anchor.y {
        AnchorY::Top => point.y,
        AnchorY::Bottom => point.y - size.height,
        AnchorY::Center => point.y - size.height / 2.0,
    };
    Rect { origin: Position::new(x, y), size }
}

/// Move the unanchored sides of `start` by `delta`
pub fn apply_resize_delta(start: &Rect, delta: Position, anchor: Anchor) -> Rect {
    let mut rect = *start;
    match anchor.x {
        AnchorX::Left => rect.size.width += delta.x,
        AnchorX::Right => {
            rect.origin.x += delta.x;
            rect.size.width -= delta.x;
        }
        AnchorX::Center => {}
    }
    match anchor.y {
        AnchorY::Top => rect.size.height += delta.y,
        AnchorY::Bottom => {
            rect.origin.y += delta.y;
            rect.size.height -= delta.y;
        }
        AnchorY::Center => {}
    }
    rect
}

/// Restore the start rectangle's aspect ratio.
///
/// Edge handles derive the locked axis from the free one. Corner handles let
/// the axis that changed more drive the other. The anchor is reasserted
/// afterwards. Degenerate start rectangles are returned unchanged.
pub fn enforce_aspect_ratio(rect: &Rect, start: &Rect, anchor: Anchor) -> Rect {
    let Some(ratio) = start.size.aspect_ratio() else {
        return *rect;
    };
    let mut size = rect.size;
    match (anchor.x, anchor.y) {
        (AnchorX::Center, AnchorY::Center) => return *rect,
        (_, AnchorY::Center) => size.height = size.width / ratio,
        (AnchorX::Center, _) => size.width = size.height * ratio,
        _ => {
            let width_change = (size.width - start.size.width).abs();
            let height_change = (size.height - start.size.height).abs();
            if width_change >= height_change {
                size.height = size.width / ratio;
            } else {
                size.width = size.height * ratio;
            }
        }
    }
    reanchor(size, anchor, get_anchor_point(start, anchor))
}

/// Shrink `rect` so it fits the page given the anchor it grows from.
///
/// With a locked aspect ratio both sides shrink by one factor.
pub fn clamp_to_bounds(rect: &Rect, start: &Rect, anchor: Anchor, bounds: Size, maintain_aspect_ratio: bool) -> Rect {
    let point = get_anchor_point(start, anchor);
    let max_width = match anchor.x {
        AnchorX::Left => bounds.width - point.x,
        AnchorX::Right => point.x,
        AnchorX::Center => 2.0 * point.x.min(bounds.width - point.x),
    }
    .max(0.0);
    let max_height = match anchor.y {
        AnchorY::Top => bounds.height - point.y,
        AnchorY::Bottom => point.y,
        AnchorY::Center => 2.0 * point.y.min(bounds.height - point.y),
    }
    .max(0.0);

    let mut size = rect.size;
    if maintain_aspect_ratio {
        if size.width > max_width || size.height > max_height {
            let factor = ratio_or_inf(max_width, size.width)
                .min(ratio_or_inf(max_height, size.height))
                .min(1.0);
            size.width *= factor;
            size.height *= factor;
        }
    } else {
        size.width = size.width.min(max_width);
        size.height = size.height.min(max_height);
    }
    reanchor(size, anchor, point)
}

/// Clamp the size to the min/max constraints and, optionally, the position to
/// the page. A locked aspect ratio is kept by scaling both sides together.
pub fn apply_constraints(rect: &Rect, constraints: &Constraints, maintain_aspect_ratio: bool, clamp_position: bool) -> Rect {
    let (min_w, min_h) = (constraints.min_width(), constraints.min_height());
    let (max_w, max_h) = (constraints.max_width(), constraints.max_height());
    let mut size = rect.size;

    if maintain_aspect_ratio && size.width > 0.0 && size.height > 0.0 {
        if size.width < min_w || size.height < min_h {
            let factor = (min_w / size.width).max(min_h / size.height);
            size.width *= factor;
            size.height *= factor;
        }
        if size.width > max_w || size.height > max_h {
            let factor = (max_w / size.width).min(max_h / size.height);
            size.width *= factor;
            size.height *= factor;
        }
    } else {
        size.width = clamp_range(size.width, min_w, max_w);
        size.height = clamp_range(size.height, min_h, max_h);
    }

    let sized = Rect { origin: rect.origin, size };
    if clamp_position {
        clamp_position_to_bounds(&sized, constraints)
    } else {
        sized
    }
}

/// Move `rect` inside the page without changing its size
pub fn clamp_position_to_bounds(rect: &Rect, constraints: &Constraints) -> Rect {
    let Some(bounds) = constraints.bounding_box else {
        return *rect;
    };
    Rect {
        origin: Position::new(
            clamp_range(rect.origin.x, 0.0, bounds.width - rect.size.width),
            clamp_range(rect.origin.y, 0.0, bounds.height - rect.size.height),
        ),
        size: rect.size,
    }
}

/// Translate `resized` so that the anchor's rotated position matches the
/// rotated position it had on `start`. Each rectangle rotates about its own center.
pub fn compensate_rotated_anchor(start: &Rect, resized: &Rect, anchor: Anchor, rotation: f64) -> Rect {
    let before = rotate_point_around_center(get_anchor_point(start, anchor), start.center(), rotation);
    let after = rotate_point_around_center(get_anchor_point(resized, anchor), resized.center(), rotation);
    resized.translate(before.x - after.x, before.y - after.y)
}

/// True if `rect`, rotated about its center, stays inside `[0, bounds]`
pub fn is_rect_within_rotated_bounds(rect: &Rect, rotation: f64, bounds: Size) -> bool {
    let aabb = calculate_rotated_rect_aabb(*rect, rotation);
    Rect::new(0.0, 0.0, bounds.width, bounds.height).contains_rect(&aabb, BOUNDS_TOLERANCE)
}

/// Run pipeline steps 1-7 for one delta
pub fn resize_rect(start: &Rect, delta: Position, handle: ResizeHandle, config: &DragResizeConfig) -> Rect {
    let anchor = get_anchor(handle);
    let rotation = normalize_angle(config.annotation_rotation);
    let rotated = rotation != 0.0;
    let maintain = config.maintain_aspect_ratio;
    let constraints = &config.constraints;

    let mut rect = apply_resize_delta(start, delta, anchor);
    if maintain {
        rect = enforce_aspect_ratio(&rect, start, anchor);
        // Dragged past the anchor: collapse to the smallest size at the start ratio
        if rect.size.width <= 0.0 || rect.size.height <= 0.0 {
            if let Some(ratio) = start.size.aspect_ratio() {
                rect.size = min_size_at_ratio(ratio, constraints);
            }
        }
    }
    if !rotated {
        if let Some(bounds) = constraints.bounding_box {
            rect = clamp_to_bounds(&rect, start, anchor, bounds, maintain);
        }
    }

    let sized = apply_constraints(&rect, constraints, maintain, false);
    let anchored = reanchor(sized.size, anchor, get_anchor_point(start, anchor));

    if rotated {
        compensate_rotated_anchor(start, &anchored, anchor, rotation)
    } else {
        clamp_position_to_bounds(&anchored, constraints)
    }
}

/// Resize `start` by `delta`, keeping a rotated annotation's visual bounding
/// box inside the page.
///
/// If the full delta fits, its pipeline result is returned as is. Otherwise
/// the largest fraction of the delta that fits is found by bisection; at
/// worst the result is the zero-delta rectangle.
pub fn compute_resized_rect(start: &Rect, delta: Position, handle: ResizeHandle, config: &DragResizeConfig) -> Rect {
    let target = resize_rect(start, delta, handle, config);
    let rotation = normalize_angle(config.annotation_rotation);
    let Some(bounds) = config.constraints.bounding_box else {
        return target;
    };
    if rotation == 0.0 || is_rect_within_rotated_bounds(&target, rotation, bounds) {
        return target;
    }

    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    let mut best = resize_rect(start, Position::ORIGIN, handle, config);
    if !is_rect_within_rotated_bounds(&best, rotation, bounds) {
        log::trace!("resize start already exceeds rotated bounds; holding start geometry");
        return best;
    }
    for _ in 0..BISECTION_ITERATIONS {
        let t = (low + high) / 2.0;
        let candidate = resize_rect(start, delta.scale(t), handle, config);
        if is_rect_within_rotated_bounds(&candidate, rotation, bounds) {
            low = t;
            best = candidate;
        } else {
            high = t;
        }
    }
    best
}

/// Smallest size with `width / height == ratio` meeting both minimums
fn min_size_at_ratio(ratio: f64, constraints: &Constraints) -> Size {
    let height = (constraints.min_width() / ratio).max(constraints.min_height());
    Size::new(height * ratio, height)
}

fn ratio_or_inf(limit: f64, value: f64) -> f64 {
    if value > 0.0 {
        limit / value
    } else {
        f64::INFINITY
    }
}

/// Clamp without panicking when the range is empty; `min` wins then
pub(crate) fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        min
    } else {
        value.max(min).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-6;

    fn assert_point_eq(a: Position, b: Position) {
        assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_anchor_for_corners_and_edges() {
        assert_eq!(get_anchor(ResizeHandle::Se), Anchor { x: AnchorX::Left, y: AnchorY::Top });
        assert_eq!(get_anchor(ResizeHandle::Nw), Anchor { x: AnchorX::Right, y: AnchorY::Bottom });
        assert_eq!(get_anchor(ResizeHandle::N), Anchor { x: AnchorX::Center, y: AnchorY::Bottom });
        assert_eq!(get_anchor(ResizeHandle::W), Anchor { x: AnchorX::Right, y: AnchorY::Center });
    }

    #[test]
    fn test_apply_delta_moves_only_free_sides() {
        let start = Rect::new(10.0, 10.0, 100.0, 50.0);
        let rect = apply_resize_delta(&start, Position::new(5.0, 7.0), get_anchor(ResizeHandle::Nw));
        assert_eq!(rect, Rect::new(15.0, 17.0, 95.0, 43.0));
        let edge = apply_resize_delta(&start, Position::new(5.0, 7.0), get_anchor(ResizeHandle::E));
        assert_eq!(edge, Rect::new(10.0, 10.0, 105.0, 50.0));
    }

    #[test]
    fn test_aspect_locked_corner_resize() {
        let config = DragResizeConfig::new(Rect::new(0.0, 0.0, 100.0, 50.0)).with_aspect_ratio_locked(true);
        let rect = compute_resized_rect(&config.element, Position::new(40.0, 0.0), ResizeHandle::Se, &config);
        assert!((rect.size.width - 140.0).abs() < EPS);
        assert!((rect.size.height - 70.0).abs() < EPS);
        assert_point_eq(rect.origin, Position::ORIGIN);
    }

    #[test]
    fn test_aspect_locked_edge_recenters() {
        let start = Rect::new(0.0, 0.0, 100.0, 50.0);
        let config = DragResizeConfig::new(start).with_aspect_ratio_locked(true);
        let rect = resize_rect(&start, Position::new(20.0, 0.0), ResizeHandle::E, &config);
        assert!((rect.size.height - 60.0).abs() < EPS);
        assert!((rect.center().y - 25.0).abs() < EPS);
    }

    #[test]
    fn test_bounds_clamp_unrotated() {
        let start = Rect::new(50.0, 50.0, 40.0, 40.0);
        let config = DragResizeConfig::new(start).with_bounding_box(100.0, 100.0);
        let rect = compute_resized_rect(&start, Position::new(500.0, 500.0), ResizeHandle::Se, &config);
        assert_eq!(rect, Rect::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_bounds_clamp_keeps_aspect() {
        let start = Rect::new(0.0, 0.0, 40.0, 20.0);
        let config = DragResizeConfig::new(start)
            .with_bounding_box(100.0, 30.0)
            .with_aspect_ratio_locked(true);
        let rect = compute_resized_rect(&start, Position::new(60.0, 0.0), ResizeHandle::Se, &config);
        assert!((rect.size.height - 30.0).abs() < EPS);
        assert!((rect.size.width - 60.0).abs() < EPS);
    }

    #[test]
    fn test_min_size_holds_anchor() {
        let start = Rect::new(10.0, 10.0, 20.0, 20.0);
        let config = DragResizeConfig::new(start)
            .with_constraints(Constraints::default().with_min_size(5.0, 5.0));
        let rect = resize_rect(&start, Position::new(50.0, 50.0), ResizeHandle::Nw, &config);
        assert_eq!(rect, Rect::new(25.0, 25.0, 5.0, 5.0));
    }

    #[test]
    fn test_max_size_with_aspect() {
        let start = Rect::new(0.0, 0.0, 20.0, 10.0);
        let config = DragResizeConfig::new(start)
            .with_aspect_ratio_locked(true)
            .with_constraints(Constraints::default().with_max_size(30.0, 100.0));
        let rect = resize_rect(&start, Position::new(80.0, 0.0), ResizeHandle::Se, &config);
        assert!((rect.size.width - 30.0).abs() < EPS);
        assert!((rect.size.height - 15.0).abs() < EPS);
    }

    #[test]
    fn test_locked_resize_past_anchor_keeps_ratio() {
        let start = Rect::new(0.0, 0.0, 100.0, 50.0);
        let config = DragResizeConfig::new(start).with_aspect_ratio_locked(true);
        let rect = compute_resized_rect(&start, Position::new(-150.0, 0.0), ResizeHandle::Se, &config);
        assert_eq!(rect, Rect::new(0.0, 0.0, 2.0, 1.0));

        let config = config.with_constraints(Constraints::default().with_min_size(10.0, 10.0));
        let rect = compute_resized_rect(&start, Position::new(-150.0, -80.0), ResizeHandle::Se, &config);
        assert_eq!(rect, Rect::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_degenerate_start_never_nan() {
        let start = Rect::new(5.0, 5.0, 0.0, 0.0);
        let config = DragResizeConfig::new(start)
            .with_aspect_ratio_locked(true)
            .with_bounding_box(100.0, 100.0);
        for handle in ResizeHandle::ALL {
            let rect = compute_resized_rect(&start, Position::new(3.0, -2.0), handle, &config);
            assert!(rect.origin.is_finite() && rect.size.width.is_finite() && rect.size.height.is_finite());
        }
    }

    #[test]
    fn test_anchor_invariance_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let start = Rect::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(5.0..200.0),
                rng.gen_range(5.0..200.0),
            );
            let delta = Position::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
            for locked in [false, true] {
                let config = DragResizeConfig::new(start).with_aspect_ratio_locked(locked);
                for handle in ResizeHandle::ALL {
                    let anchor = get_anchor(handle);
                    let rect = compute_resized_rect(&start, delta, handle, &config);
                    assert_point_eq(get_anchor_point(&start, anchor), get_anchor_point(&rect, anchor));
                }
            }
        }
    }

    #[test]
    fn test_rotated_visual_anchor_stays_fixed() {
        let start = Rect::new(100.0, 100.0, 80.0, 40.0);
        let config = DragResizeConfig::new(start).with_annotation_rotation(30.0, None);
        for handle in ResizeHandle::ALL {
            let anchor = get_anchor(handle);
            let rect = compute_resized_rect(&start, Position::new(25.0, 15.0), handle, &config);
            let before = rotate_point_around_center(get_anchor_point(&start, anchor), start.center(), 30.0);
            let after = rotate_point_around_center(get_anchor_point(&rect, anchor), rect.center(), 30.0);
            assert_point_eq(before, after);
        }
    }

    #[test]
    fn test_rotated_fitting_delta_is_unclamped() {
        let start = Rect::new(80.0, 80.0, 40.0, 20.0);
        let config = DragResizeConfig::new(start)
            .with_annotation_rotation(45.0, None)
            .with_bounding_box(400.0, 400.0);
        let delta = Position::new(10.0, 5.0);
        let rect = compute_resized_rect(&start, delta, ResizeHandle::Se, &config);
        assert_eq!(rect, resize_rect(&start, delta, ResizeHandle::Se, &config));
    }

    #[test]
    fn test_rotated_bisection_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let bounds = Size::new(300.0, 300.0);
            let start = Rect::new(
                rng.gen_range(60.0..140.0),
                rng.gen_range(60.0..140.0),
                rng.gen_range(10.0..60.0),
                rng.gen_range(10.0..60.0),
            );
            let rotation = rng.gen_range(1.0..359.0);
            let config = DragResizeConfig::new(start)
                .with_annotation_rotation(rotation, None)
                .with_bounding_box(bounds.width, bounds.height)
                .with_aspect_ratio_locked(rng.gen_bool(0.5));
            if !is_rect_within_rotated_bounds(&start, rotation, bounds) {
                continue;
            }
            let delta = Position::new(rng.gen_range(-800.0..800.0), rng.gen_range(-800.0..800.0));
            for handle in ResizeHandle::ALL {
                let rect = compute_resized_rect(&start, delta, handle, &config);
                assert!(
                    is_rect_within_rotated_bounds(&rect, rotation, bounds),
                    "{handle:?} {rect:?} escaped at {rotation} deg"
                );
            }
        }
    }

    #[test]
    fn test_clamp_range_empty_range() {
        assert_eq!(clamp_range(5.0, 10.0, 2.0), 10.0);
        assert_eq!(clamp_range(5.0, 0.0, 2.0), 2.0);
    }
}
