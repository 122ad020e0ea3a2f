//! Open multi-segment path patches

use crate::annotation::{AnnotationObject, AnnotationPatch};
use crate::geometry::{line_rect_with_endings, Position};

use super::base::{patch_vertex_shape, VertexShape};
use super::TransformContext;

const POLYLINE: VertexShape = VertexShape {
    read: read_vertices,
    store: store_vertices,
    tight_rect: line_rect_with_endings,
};

pub(super) fn read_vertices(annotation: &AnnotationObject) -> Option<Vec<Position>> {
    annotation.vertices.clone()
}

pub(super) fn store_vertices(patch: &mut AnnotationPatch, vertices: Vec<Position>) {
    patch.vertices = Some(vertices);
}

/// Patch function for [`AnnotationKind::Polyline`](crate::annotation::AnnotationKind::Polyline)
pub fn patch_polyline(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    patch_vertex_shape(&POLYLINE, original, context)
}
