//! Closed polygon patches

use crate::annotation::{AnnotationObject, AnnotationPatch};
use crate::geometry::{calculate_aabb_from_vertices, LineEndings, Position, Rect};

use super::base::{patch_vertex_shape, VertexShape};
use super::polyline::{read_vertices, store_vertices};
use super::TransformContext;

const POLYGON: VertexShape = VertexShape {
    read: read_vertices,
    store: store_vertices,
    tight_rect: polygon_rect,
};

/// Vertex bounds padded by half the stroke. Polygons have no end markers.
fn polygon_rect(vertices: &[Position], stroke_width: f64, _endings: Option<&LineEndings>) -> Rect {
    calculate_aabb_from_vertices(vertices, stroke_width / 2.0)
}

/// Patch function for [`AnnotationKind::Polygon`](crate::annotation::AnnotationKind::Polygon)
pub fn patch_polygon(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    patch_vertex_shape(&POLYGON, original, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::manipulation::{TransformMetadata, TransformType};

    fn triangle() -> AnnotationObject {
        AnnotationObject::new(AnnotationKind::Polygon, 0, Rect::new(-1.0, -1.0, 42.0, 32.0))
            .with_stroke_width(2.0)
            .with_vertices(vec![Position::new(0.0, 0.0), Position::new(40.0, 0.0), Position::new(20.0, 30.0)])
    }

    #[test]
    fn test_vertex_edit_tight_rect() {
        let annotation = triangle();
        let edited = vec![Position::new(0.0, 0.0), Position::new(40.0, 0.0), Position::new(20.0, 50.0)];
        let context = TransformContext {
            kind: TransformType::VertexEdit,
            changes: AnnotationPatch {
                vertices: Some(edited),
                ..Default::default()
            },
            metadata: TransformMetadata {
                vertex_index: Some(2),
                ..Default::default()
            },
        };
        let patch = patch_polygon(&annotation, &context);
        assert_eq!(patch.rect, Some(Rect::new(-1.0, -1.0, 42.0, 52.0)));
        assert_eq!(patch.unrotated_rect, None);
    }

    #[test]
    fn test_stroke_change_refits_rect() {
        let annotation = triangle();
        let context = TransformContext::property_update(AnnotationPatch {
            stroke_width: Some(6.0),
            ..Default::default()
        });
        let patch = patch_polygon(&annotation, &context);
        assert_eq!(patch.stroke_width, Some(6.0));
        assert_eq!(patch.rect, Some(Rect::new(-3.0, -3.0, 46.0, 36.0)));
    }

    #[test]
    fn test_group_rotation_orbits_vertices() {
        let annotation = triangle();
        let context = TransformContext {
            kind: TransformType::Rotate,
            changes: AnnotationPatch::default(),
            metadata: TransformMetadata {
                rotation_angle: Some(180.0),
                rotation_center: Some(Position::new(100.0, 0.0)),
                rotation_delta: Some(180.0),
                ..Default::default()
            },
        };
        let patch = patch_polygon(&annotation, &context);
        let center = annotation.own_rect().center();
        let shift = Position::new(200.0 - 2.0 * center.x, -2.0 * center.y);
        assert_eq!(patch.vertices.unwrap()[0], Position::new(0.0, 0.0) + shift);
        assert_eq!(patch.rotation, Some(180.0));
    }
}
