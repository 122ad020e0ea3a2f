//! Freehand ink patches

use crate::annotation::{AnnotationObject, AnnotationPatch, InkStroke};
use crate::geometry::{calculate_aabb_from_vertices, Position, Rect};
use crate::manipulation::TransformType;

use super::base::{
    base_geometry_patch, base_move_changes, base_resize_changes, base_resize_scaling, base_rotate_changes,
    move_delta, resolve_rects, rotation_orbit,
};
use super::TransformContext;

/// Smallest stroke width a resize can scale down to
const MIN_INK_STROKE_WIDTH: f64 = 1.0;

/// Patch function for [`AnnotationKind::Ink`](crate::annotation::AnnotationKind::Ink)
pub fn patch_ink(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    let fallback = || context.changes.clone();
    let Some(strokes) = original.ink_list.as_ref() else {
        return base_geometry_patch(original, context).unwrap_or_else(fallback);
    };

    match context.kind {
        TransformType::Move => {
            let (Some(mut patch), Some(delta)) = (base_move_changes(original, context), move_delta(original, context))
            else {
                return fallback();
            };
            patch.ink_list = Some(map_points(strokes, |p| p + delta));
            patch
        }
        TransformType::Resize => {
            let Some(scaling) = base_resize_scaling(original, context) else {
                return fallback();
            };
            let stroke_width = scaled_stroke_width(original.stroke_width, scaling.scale_x.min(scaling.scale_y));
            let from = inset_rect(scaling.old_rect, original.stroke_width / 2.0);
            let to = inset_rect(scaling.new_rect, stroke_width / 2.0);

            let mut patch = base_resize_changes(original, &scaling);
            patch.stroke_width = Some(stroke_width);
            patch.ink_list = Some(map_points(strokes, |p| map_between(p, &from, &to)));
            patch
        }
        TransformType::Rotate => {
            let Some(mut patch) = base_rotate_changes(original, context) else {
                return fallback();
            };
            if let Some(orbit) = rotation_orbit(original, context) {
                patch.ink_list = Some(map_points(strokes, |p| p + orbit));
            }
            patch
        }
        TransformType::PropertyUpdate => {
            let Some(stroke_width) = context.changes.stroke_width else {
                return fallback();
            };
            let points: Vec<Position> = strokes.iter().flat_map(|s| s.points.iter().copied()).collect();
            if points.is_empty() {
                return fallback();
            }
            let own = calculate_aabb_from_vertices(&points, stroke_width / 2.0);
            let (rect, unrotated_rect) = resolve_rects(original, own);
            context.changes.clone().merge(AnnotationPatch {
                rect: Some(rect),
                unrotated_rect,
                ..Default::default()
            })
        }
        TransformType::VertexEdit => fallback(),
    }
}

/// Stroke width scaled by `factor`, rounded to whole units
pub fn scaled_stroke_width(stroke_width: f64, factor: f64) -> f64 {
    (stroke_width * factor).round().max(MIN_INK_STROKE_WIDTH)
}

/// Shrink a rectangle by `inset` on each side, never past its center
fn inset_rect(rect: Rect, inset: f64) -> Rect {
    let dx = inset.max(0.0).min(rect.size.width / 2.0);
    let dy = inset.max(0.0).min(rect.size.height / 2.0);
    Rect::new(
        rect.origin.x + dx,
        rect.origin.y + dy,
        rect.size.width - dx * 2.0,
        rect.size.height - dy * 2.0,
    )
}

/// Affine map taking `from` onto `to`. A collapsed axis maps with factor 1.
fn map_between(point: Position, from: &Rect, to: &Rect) -> Position {
    let factor = |to_len: f64, from_len: f64| if from_len > 0.0 { to_len / from_len } else { 1.0 };
    Position::new(
        to.origin.x + (point.x - from.origin.x) * factor(to.size.width, from.size.width),
        to.origin.y + (point.y - from.origin.y) * factor(to.size.height, from.size.height),
    )
}

fn map_points(strokes: &[InkStroke], f: impl Fn(Position) -> Position) -> Vec<InkStroke> {
    strokes
        .iter()
        .map(|stroke| InkStroke::new(stroke.points.iter().map(|p| f(*p)).collect()))
        .collect()
}
