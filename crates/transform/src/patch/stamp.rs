//! Stamp patches

use crate::annotation::{AnnotationObject, AnnotationPatch};

use super::base::base_geometry_patch;
use super::TransformContext;

/// Patch function for stamps. Only the shared rectangle rules apply.
pub fn patch_stamp(original: &AnnotationObject, context: &TransformContext) -> AnnotationPatch {
    base_geometry_patch(original, context).unwrap_or_else(|| context.changes.clone())
}
