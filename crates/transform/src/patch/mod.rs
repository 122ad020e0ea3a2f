//! Annotation patches
//!
//! Gesture output is generic: a rectangle, a vertex list or an angle. The
//! [`PatchRegistry`] turns it into an [`AnnotationPatch`] for a specific
//! annotation by dispatching on [`AnnotationKind`]. Kinds without a registered
//! function get the context's changes back unchanged.

pub mod base;
pub mod ink;
pub mod line;
pub mod polygon;
pub mod polyline;
pub mod shape;
pub mod stamp;

use std::collections::HashMap;

use crate::annotation::{AnnotationKind, AnnotationObject, AnnotationPatch};
use crate::manipulation::{TransformChanges, TransformData, TransformMetadata, TransformType};

pub use base::MIN_PATCH_SIZE;

/// Input to a patch function
#[derive(Debug, Clone, PartialEq)]
pub struct TransformContext {
    pub kind: TransformType,
    /// Proposed field values
    pub changes: AnnotationPatch,
    pub metadata: TransformMetadata,
}

impl TransformContext {
    /// Context for a non-geometric edit such as a stroke width or line-ending
    /// change
    pub fn property_update(changes: AnnotationPatch) -> Self {
        Self {
            kind: TransformType::PropertyUpdate,
            changes,
            metadata: TransformMetadata::default(),
        }
    }
}

impl From<TransformChanges> for AnnotationPatch {
    fn from(changes: TransformChanges) -> Self {
        AnnotationPatch {
            rect: changes.rect,
            rotation: changes.rotation,
            vertices: changes.vertices,
            ..Default::default()
        }
    }
}

impl From<TransformData> for TransformContext {
    fn from(data: TransformData) -> Self {
        Self {
            kind: data.kind,
            changes: data.changes.into(),
            metadata: data.metadata,
        }
    }
}

/// Signature shared by all per-kind patch functions
pub type PatchFn = fn(&AnnotationObject, &TransformContext) -> AnnotationPatch;

/// Mapping from annotation kind to patch function
#[derive(Debug, Clone)]
pub struct PatchRegistry {
    patches: HashMap<AnnotationKind, PatchFn>,
}

impl PatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            patches: HashMap::new(),
        }
    }

    /// Register `patch` for `kind`, returning the function it replaced
    pub fn register(&mut self, kind: AnnotationKind, patch: PatchFn) -> Option<PatchFn> {
        self.patches.insert(kind, patch)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, kind: AnnotationKind, patch: PatchFn) -> Self {
        self.register(kind, patch);
        self
    }

    pub fn get(&self, kind: AnnotationKind) -> Option<PatchFn> {
        self.patches.get(&kind).copied()
    }

    pub fn contains(&self, kind: AnnotationKind) -> bool {
        self.patches.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Build the patch for `annotation`
    pub fn transform(&self, annotation: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
        match self.patches.get(&annotation.kind) {
            Some(patch) => patch(annotation, context),
            None => {
                log::debug!(
                    "no patch function for {:?}, passing {:?} changes through",
                    annotation.kind,
                    context.kind
                );
                context.changes.clone()
            }
        }
    }
}

impl Default for PatchRegistry {
    /// Registry with every built-in patch function
    fn default() -> Self {
        Self::new()
            .with(AnnotationKind::Circle, shape::patch_shape)
            .with(AnnotationKind::Square, shape::patch_shape)
            .with(AnnotationKind::Line, line::patch_line)
            .with(AnnotationKind::Polyline, polyline::patch_polyline)
            .with(AnnotationKind::Polygon, polygon::patch_polygon)
            .with(AnnotationKind::Ink, ink::patch_ink)
            .with(AnnotationKind::Stamp, stamp::patch_stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn noop(_: &AnnotationObject, _: &TransformContext) -> AnnotationPatch {
        AnnotationPatch::default()
    }

    fn move_to(rect: Rect) -> TransformContext {
        TransformContext::from(TransformData {
            kind: TransformType::Move,
            changes: TransformChanges {
                rect: Some(rect),
                ..Default::default()
            },
            metadata: TransformMetadata::default(),
        })
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(PatchRegistry::new().is_empty());
        let registry = PatchRegistry::default();
        assert_eq!(registry.len(), 7);
        assert!(registry.contains(AnnotationKind::Ink));
        assert!(!registry.contains(AnnotationKind::FreeText));
    }

    #[test]
    fn test_unregistered_kind_returns_changes() {
        let registry = PatchRegistry::default();
        let annotation = AnnotationObject::new(AnnotationKind::Highlight, 0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let context = move_to(Rect::new(3.0, 4.0, 10.0, 10.0));
        assert_eq!(registry.transform(&annotation, &context), context.changes);
    }

    #[test]
    fn test_register_custom_kind() {
        let mut registry = PatchRegistry::new();
        assert!(registry.register(AnnotationKind::Custom(7), noop).is_none());
        assert!(registry.register(AnnotationKind::Custom(7), noop).is_some());
        let annotation = AnnotationObject::new(AnnotationKind::Custom(7), 0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let patch = registry.transform(&annotation, &move_to(Rect::new(1.0, 1.0, 10.0, 10.0)));
        assert!(patch.is_empty());
    }

    #[test]
    fn test_context_from_transform_data() {
        let context = move_to(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(context.kind, TransformType::Move);
        assert_eq!(context.changes.rect, Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(context.changes.unrotated_rect, None);
    }
}
