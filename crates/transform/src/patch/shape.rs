//! Circle and square patches
//!
//! These kinds carry no point data, so a patch only has to keep `rect`,
//! `unrotated_rect` and `rotation` consistent with each other.

use crate::annotation::{AnnotationObject, AnnotationPatch};
use crate::manipulation::TransformType;

use super::base::base_geometry_patch;
use super::TransformContext;

/// Patch function for circles and squares
pub fn patch_shape(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    let Some(mut patch) = base_geometry_patch(original, context) else {
        return context.changes.clone();
    };
    if matches!(context.kind, TransformType::Move | TransformType::Resize) && original.is_rotated() {
        patch.rotation = Some(original.rotation_degrees());
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::geometry::{calculate_rotated_rect_aabb, Rect};

    fn resize_to(rect: Rect) -> TransformContext {
        TransformContext {
            kind: TransformType::Resize,
            changes: AnnotationPatch {
                rect: Some(rect),
                ..Default::default()
            },
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_unrotated_resize_sets_rect_only() {
        let annotation = AnnotationObject::new(AnnotationKind::Circle, 0, Rect::new(0.0, 0.0, 40.0, 40.0));
        let patch = patch_shape(&annotation, &resize_to(Rect::new(0.0, 0.0, 60.0, 30.0)));
        assert_eq!(patch.rect, Some(Rect::new(0.0, 0.0, 60.0, 30.0)));
        assert_eq!(patch.unrotated_rect, None);
        assert_eq!(patch.rotation, None);
    }

    #[test]
    fn test_rotated_resize_keeps_triple_consistent() {
        let annotation =
            AnnotationObject::new(AnnotationKind::Square, 0, Rect::new(0.0, 0.0, 40.0, 20.0)).with_rotation(30.0);
        let target = Rect::new(0.0, 0.0, 80.0, 20.0);
        let patch = patch_shape(&annotation, &resize_to(target));
        assert_eq!(patch.unrotated_rect, Some(target));
        assert_eq!(patch.rect, Some(calculate_rotated_rect_aabb(target, 30.0)));
        assert_eq!(patch.rotation, Some(30.0));
    }

    #[test]
    fn test_property_update_passes_through() {
        let annotation = AnnotationObject::new(AnnotationKind::Square, 0, Rect::new(0.0, 0.0, 40.0, 20.0));
        let context = TransformContext::property_update(AnnotationPatch {
            stroke_width: Some(3.0),
            ..Default::default()
        });
        assert_eq!(patch_shape(&annotation, &context), context.changes);
    }
}
