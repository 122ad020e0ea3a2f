//! Shared patch helpers
//!
//! Move, resize and rotate all follow the same rules for `rect`,
//! `unrotated_rect` and `rotation`; per-kind patch functions build on these and
//! only add their own fields.

use crate::annotation::{AnnotationObject, AnnotationPatch};
use crate::geometry::{calculate_rotated_rect_aabb, rotate_point_around_center, LineEndings, Position, Rect, Size};
use crate::manipulation::TransformType;

use super::TransformContext;

/// Smallest width or height a resize patch may produce
pub const MIN_PATCH_SIZE: f64 = 10.0;

/// Pivot distance below which a rotation is treated as in-place
const ORBIT_EPSILON: f64 = 1e-9;

/// Visual rectangle and own-frame rectangle for a new own-frame geometry.
///
/// Rotated annotations keep `new_own` as `unrotated_rect` and get its rotated
/// bounding box as `rect`; unrotated ones just take `new_own` as `rect`.
pub fn resolve_rects(original: &AnnotationObject, new_own: Rect) -> (Rect, Option<Rect>) {
    if original.is_rotated() {
        let rect = calculate_rotated_rect_aabb(new_own, original.rotation_degrees());
        (rect, Some(new_own))
    } else {
        (new_own, None)
    }
}

fn rect_patch(original: &AnnotationObject, new_own: Rect) -> AnnotationPatch {
    let (rect, unrotated_rect) = resolve_rects(original, new_own);
    AnnotationPatch {
        rect: Some(rect),
        unrotated_rect,
        ..Default::default()
    }
}

/// Translation carried by a move context
pub fn move_delta(original: &AnnotationObject, context: &TransformContext) -> Option<Position> {
    let target = context.changes.rect?;
    Some(target.origin - original.own_rect().origin)
}

/// Translate `rect` and `unrotated_rect` by the move delta
pub fn base_move_changes(original: &AnnotationObject, context: &TransformContext) -> Option<AnnotationPatch> {
    let delta = move_delta(original, context)?;
    let mut patch = AnnotationPatch {
        rect: Some(original.rect.translate(delta.x, delta.y)),
        ..Default::default()
    };
    if let Some(unrotated) = original.unrotated_rect {
        patch.unrotated_rect = Some(unrotated.translate(delta.x, delta.y));
    }
    Some(patch)
}

/// Old and new own-frame rectangles of a resize with the per-axis factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeScaling {
    pub old_rect: Rect,
    pub new_rect: Rect,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ResizeScaling {
    /// Map an own-frame point from the old rectangle into the new one
    pub fn map_point(&self, point: Position) -> Position {
        Position::new(
            self.new_rect.origin.x + (point.x - self.old_rect.origin.x) * self.scale_x,
            self.new_rect.origin.y + (point.y - self.old_rect.origin.y) * self.scale_y,
        )
    }
}

fn axis_scale(new: f64, old: f64) -> f64 {
    if old.abs() > f64::EPSILON {
        new / old
    } else {
        1.0
    }
}

/// Scale factors between the current own rectangle and the resized one.
///
/// Width and height are held at [`MIN_PATCH_SIZE`] or more. When the context
/// asks for a locked aspect ratio the larger factor wins on both axes.
pub fn base_resize_scaling(original: &AnnotationObject, context: &TransformContext) -> Option<ResizeScaling> {
    let old_rect = original.own_rect();
    let target = context.changes.rect?;

    let mut size = Size::new(
        target.size.width.abs().max(MIN_PATCH_SIZE),
        target.size.height.abs().max(MIN_PATCH_SIZE),
    );
    let mut scale_x = axis_scale(size.width, old_rect.size.width);
    let mut scale_y = axis_scale(size.height, old_rect.size.height);

    if context.metadata.maintain_aspect_ratio == Some(true) && old_rect.size.aspect_ratio().is_some() {
        let uniform = scale_x.max(scale_y);
        scale_x = uniform;
        scale_y = uniform;
        size = Size::new(old_rect.size.width * uniform, old_rect.size.height * uniform);
    }

    Some(ResizeScaling {
        old_rect,
        new_rect: Rect { origin: target.origin, size },
        scale_x,
        scale_y,
    })
}

/// `rect`/`unrotated_rect` for a resize
pub fn base_resize_changes(original: &AnnotationObject, scaling: &ResizeScaling) -> AnnotationPatch {
    rect_patch(original, scaling.new_rect)
}

/// Translation of a point at `center` when rotated by `delta_degrees` about `pivot`
pub fn rotate_orbit_delta(center: Position, pivot: Position, delta_degrees: f64) -> Position {
    rotate_point_around_center(center, pivot, delta_degrees) - center
}

/// Orbit translation when the context rotates about a pivot other than the
/// annotation's own center
pub fn rotation_orbit(original: &AnnotationObject, context: &TransformContext) -> Option<Position> {
    let pivot = context.metadata.rotation_center?;
    let delta = context.metadata.rotation_delta?;
    let center = original.own_rect().center();
    if center.distance_to(&pivot) <= ORBIT_EPSILON {
        return None;
    }
    Some(rotate_orbit_delta(center, pivot, delta))
}

/// Consistent `rect`, `unrotated_rect` and `rotation` for a rotate context.
///
/// Returns `None` when the context carries no rotation angle.
pub fn base_rotate_changes(original: &AnnotationObject, context: &TransformContext) -> Option<AnnotationPatch> {
    let angle = context.metadata.rotation_angle.or(context.changes.rotation)?;
    let mut own = original.own_rect();
    if let Some(orbit) = rotation_orbit(original, context) {
        own = own.translate(orbit.x, orbit.y);
    }
    Some(AnnotationPatch {
        rect: Some(calculate_rotated_rect_aabb(own, angle)),
        unrotated_rect: Some(own),
        rotation: Some(angle),
        ..Default::default()
    })
}

/// Move/resize/rotate patch touching only the rectangle fields.
///
/// Other transform types, and contexts missing the data they need, yield
/// `None`.
pub fn base_geometry_patch(original: &AnnotationObject, context: &TransformContext) -> Option<AnnotationPatch> {
    match context.kind {
        TransformType::Move => base_move_changes(original, context),
        TransformType::Resize => {
            base_resize_scaling(original, context).map(|scaling| base_resize_changes(original, &scaling))
        }
        TransformType::Rotate => base_rotate_changes(original, context),
        TransformType::VertexEdit | TransformType::PropertyUpdate => None,
    }
}

/// Translation that keeps untouched vertices visually fixed when the tight
/// rectangle of a rotated shape changes from `old_own` to `new_tight`
pub fn compensate_rotated_vertex_edit(old_own: Rect, new_tight: Rect, rotation: f64) -> Position {
    let new_center = new_tight.center();
    rotate_point_around_center(new_center, old_own.center(), rotation) - new_center
}

/// Resolved geometry after a vertex set changed
#[derive(Debug, Clone, PartialEq)]
pub struct VertexEditRects {
    pub vertices: Vec<Position>,
    pub rect: Rect,
    pub unrotated_rect: Option<Rect>,
}

/// Refit `rect`/`unrotated_rect` around a new vertex set whose tight bounds
/// are `tight`, compensating rotated shapes so they do not jump
pub fn resolve_vertex_edit_rects(original: &AnnotationObject, vertices: Vec<Position>, tight: Rect) -> VertexEditRects {
    if !original.is_rotated() {
        return VertexEditRects {
            vertices,
            rect: tight,
            unrotated_rect: None,
        };
    }
    let rotation = original.rotation_degrees();
    let shift = compensate_rotated_vertex_edit(original.own_rect(), tight, rotation);
    let own = tight.translate(shift.x, shift.y);
    VertexEditRects {
        vertices: vertices.into_iter().map(|v| v + shift).collect(),
        rect: calculate_rotated_rect_aabb(own, rotation),
        unrotated_rect: Some(own),
    }
}

/// How a vertex-bearing kind stores its points and measures its tight bounds
pub(crate) struct VertexShape {
    pub read: fn(&AnnotationObject) -> Option<Vec<Position>>,
    pub store: fn(&mut AnnotationPatch, Vec<Position>),
    pub tight_rect: fn(&[Position], f64, Option<&LineEndings>) -> Rect,
}

/// Patch function body shared by lines, polylines and polygons
pub(crate) fn patch_vertex_shape(
    shape: &VertexShape,
    original: &AnnotationObject,
    context: &TransformContext,
) -> AnnotationPatch {
    let fallback = || context.changes.clone();
    let Some(vertices) = (shape.read)(original) else {
        return base_geometry_patch(original, context).unwrap_or_else(fallback);
    };

    match context.kind {
        TransformType::Move => {
            let (Some(mut patch), Some(delta)) = (base_move_changes(original, context), move_delta(original, context))
            else {
                return fallback();
            };
            (shape.store)(&mut patch, vertices.into_iter().map(|v| v + delta).collect());
            patch
        }
        TransformType::Resize => {
            let Some(scaling) = base_resize_scaling(original, context) else {
                return fallback();
            };
            let mut patch = base_resize_changes(original, &scaling);
            (shape.store)(&mut patch, vertices.into_iter().map(|v| scaling.map_point(v)).collect());
            patch
        }
        TransformType::Rotate => {
            let Some(mut patch) = base_rotate_changes(original, context) else {
                return fallback();
            };
            if let Some(orbit) = rotation_orbit(original, context) {
                (shape.store)(&mut patch, vertices.into_iter().map(|v| v + orbit).collect());
            }
            patch
        }
        TransformType::VertexEdit => {
            let Some(edited) = context.changes.vertices.clone() else {
                return fallback();
            };
            let tight = (shape.tight_rect)(&edited, original.stroke_width, original.line_endings.as_ref());
            refit_patch(shape, original, edited, tight)
        }
        TransformType::PropertyUpdate => {
            let stroke_width = context.changes.stroke_width.unwrap_or(original.stroke_width);
            let endings = context.changes.line_endings.or(original.line_endings);
            let tight = (shape.tight_rect)(&vertices, stroke_width, endings.as_ref());
            let refit = refit_patch(shape, original, vertices, tight);
            context.changes.clone().merge(refit)
        }
    }
}

fn refit_patch(
    shape: &VertexShape,
    original: &AnnotationObject,
    vertices: Vec<Position>,
    tight: Rect,
) -> AnnotationPatch {
    let resolved = resolve_vertex_edit_rects(original, vertices, tight);
    let mut patch = AnnotationPatch {
        rect: Some(resolved.rect),
        unrotated_rect: resolved.unrotated_rect,
        ..Default::default()
    };
    (shape.store)(&mut patch, resolved.vertices);
    patch
}
