//! Straight line patches

use crate::annotation::{AnnotationObject, AnnotationPatch, LinePoints};
use crate::geometry::{line_rect_with_endings, Position};

use super::base::{patch_vertex_shape, VertexShape};
use super::TransformContext;

const LINE: VertexShape = VertexShape {
    read: read_endpoints,
    store: store_endpoints,
    tight_rect: line_rect_with_endings,
};

fn read_endpoints(annotation: &AnnotationObject) -> Option<Vec<Position>> {
    annotation.line_points.map(|p| vec![p.start, p.end])
}

fn store_endpoints(patch: &mut AnnotationPatch, vertices: Vec<Position>) {
    if let &[start, end] = vertices.as_slice() {
        patch.line_points = Some(LinePoints::new(start, end));
    }
}

/// Patch function for [`AnnotationKind::Line`](crate::annotation::AnnotationKind::Line)
pub fn patch_line(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    patch_vertex_shape(&LINE, original, context)
}
