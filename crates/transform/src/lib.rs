//! PDF Editor Annotation Transform Engine
//!
//! Geometry and gesture handling for moving, resizing, vertex editing and
//! rotating annotations. The engine is synchronous and free of I/O: the host
//! feeds pointer positions to a [`DragResizeController`], passes each emitted
//! [`TransformData`] through a [`PatchRegistry`] together with the annotation,
//! and applies the resulting [`AnnotationPatch`] to its own store.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`geometry`] | points, rects, rotation and bounding boxes |
//! | [`annotation`] | annotation record and sparse patches |
//! | [`config`] | per-gesture configuration and validation |
//! | [`snapping`] | rotation snapping and angle arithmetic |
//! | [`resize`] | resize pipeline and rotated bounds fitting |
//! | [`manipulation`] | gesture state machine and coordinate spaces |
//! | [`behavior`] | per-annotation interaction policy |
//! | [`patch`] | per-kind patch functions and their registry |

pub mod annotation;
pub mod behavior;
pub mod config;
pub mod geometry;
pub mod manipulation;
pub mod patch;
pub mod resize;
pub mod snapping;

pub use annotation::{AnnotationId, AnnotationKind, AnnotationObject, AnnotationPatch, InkStroke, LinePoints};
pub use behavior::{BehaviorFlag, InteractionPolicy, ResolvedPolicy};
pub use config::{ConfigError, ConfigResult, Constraints, DragResizeConfig, PageRotation};
pub use geometry::{
    calculate_aabb_from_vertices, calculate_rotated_rect_aabb, expand_rect, line_rect_with_endings,
    rotate_point_around_center, rotate_vertices, LineEnding, LineEndings, Position, Rect, Size,
};
pub use manipulation::{
    local_to_page, page_to_local, screen_to_page, DragResizeController, EventState, InteractionEvent,
    InteractionState, TransformChanges, TransformData, TransformMetadata, TransformType,
};
pub use patch::{PatchFn, PatchRegistry, TransformContext};
pub use resize::{compute_resized_rect, get_anchor, get_anchor_point, Anchor, AnchorX, AnchorY, ResizeHandle};
pub use snapping::{normalize_angle, shortest_arc, snap_rotation, RotationSnap, RotationSnapConfig};
