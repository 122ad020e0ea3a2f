//! Annotation record and partial updates
//!
//! The transform engine reads an [`AnnotationObject`] and produces an
//! [`AnnotationPatch`]. Storing, persisting and re-rendering the record is the
//! caller's job.
//!
//! `rect` is always the visual axis-aligned box. Once an annotation carries a
//! rotation, `unrotated_rect` holds its own-frame rectangle and `rect` must
//! equal that rectangle's rotated bounding box.

use serde::{Deserialize, Serialize};

use crate::geometry::{calculate_rotated_rect_aabb, LineEndings, Position, Rect};

/// Unique identifier for an annotation
pub type AnnotationId = uuid::Uuid;

/// Default stroke width in page units
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Shape family of an annotation, used to pick a patch function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Circle,
    Square,
    Line,
    Polyline,
    Polygon,
    Ink,
    Stamp,
    FreeText,
    Highlight,
    /// Host-defined shape kinds
    Custom(u16),
}

/// Endpoints of a line annotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoints {
    pub start: Position,
    pub end: Position,
}

impl LinePoints {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One continuous pen stroke of an ink annotation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InkStroke {
    pub points: Vec<Position>,
}

impl InkStroke {
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

/// Geometry-bearing fields of an annotation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationObject {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    /// Page index (0-based)
    #[serde(default)]
    pub page_index: u32,
    /// Visual bounding box in page space
    pub rect: Rect,
    /// Own-frame rectangle, present once the annotation has been rotated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrotated_rect: Option<Rect>,
    /// Clockwise rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Polygon and polyline vertices in the own frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_points: Option<LinePoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ink_list: Option<Vec<InkStroke>>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_endings: Option<LineEndings>,
}

impl AnnotationObject {
    /// Create an unrotated annotation with a generated ID
    pub fn new(kind: AnnotationKind, page_index: u32, rect: Rect) -> Self {
        Self::with_id(AnnotationId::new_v4(), kind, page_index, rect)
    }

    /// Create an unrotated annotation with a specific ID (for deserialization)
    pub fn with_id(id: AnnotationId, kind: AnnotationKind, page_index: u32, rect: Rect) -> Self {
        Self {
            id,
            kind,
            page_index,
            rect,
            unrotated_rect: None,
            rotation: None,
            vertices: None,
            line_points: None,
            ink_list: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
            line_endings: None,
        }
    }

    /// Rotate the current own-frame rectangle, keeping `rect` in sync
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        let own = self.own_rect();
        self.unrotated_rect = Some(own);
        self.rotation = Some(rotation);
        self.rect = calculate_rotated_rect_aabb(own, rotation);
        self
    }

    pub fn with_vertices(mut self, vertices: Vec<Position>) -> Self {
        self.vertices = Some(vertices);
        self
    }

    pub fn with_line_points(mut self, start: Position, end: Position) -> Self {
        self.line_points = Some(LinePoints::new(start, end));
        self
    }

    pub fn with_ink_list(mut self, ink_list: Vec<InkStroke>) -> Self {
        self.ink_list = Some(ink_list);
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_line_endings(mut self, line_endings: LineEndings) -> Self {
        self.line_endings = Some(line_endings);
        self
    }

    /// Effective rotation in degrees. Without an `unrotated_rect` the
    /// annotation is treated as unrotated whatever `rotation` says.
    pub fn rotation_degrees(&self) -> f64 {
        match (self.unrotated_rect, self.rotation) {
            (Some(_), Some(rotation)) if rotation.is_finite() => rotation,
            _ => 0.0,
        }
    }

    /// Whether a non-zero rotation is in effect
    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees().rem_euclid(360.0) != 0.0
    }

    /// The rectangle in the annotation's own frame
    pub fn own_rect(&self) -> Rect {
        self.unrotated_rect.unwrap_or(self.rect)
    }

    /// Editable vertices: line endpoints for lines, the vertex list for
    /// polygons and polylines, nothing otherwise.
    pub fn editable_vertices(&self) -> Vec<Position> {
        match self.kind {
            AnnotationKind::Line => self
                .line_points
                .map(|p| vec![p.start, p.end])
                .unwrap_or_default(),
            AnnotationKind::Polygon | AnnotationKind::Polyline => self.vertices.clone().unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Sparse update for an annotation. Only present fields are applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrotated_rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_points: Option<LinePoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ink_list: Option<Vec<InkStroke>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_endings: Option<LineEndings>,
}

impl AnnotationPatch {
    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of this patch; fields set in `other` win
    pub fn merge(mut self, other: AnnotationPatch) -> Self {
        if other.rect.is_some() {
            self.rect = other.rect;
        }
        if other.unrotated_rect.is_some() {
            self.unrotated_rect = other.unrotated_rect;
        }
        if other.rotation.is_some() {
            self.rotation = other.rotation;
        }
        if other.vertices.is_some() {
            self.vertices = other.vertices;
        }
        if other.line_points.is_some() {
            self.line_points = other.line_points;
        }
        if other.ink_list.is_some() {
            self.ink_list = other.ink_list;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.line_endings.is_some() {
            self.line_endings = other.line_endings;
        }
        self
    }

    /// Write every present field into `annotation`
    pub fn apply_to(&self, annotation: &mut AnnotationObject) {
        if let Some(rect) = self.rect {
            annotation.rect = rect;
        }
        if let Some(unrotated) = self.unrotated_rect {
            annotation.unrotated_rect = Some(unrotated);
        }
        if let Some(rotation) = self.rotation {
            annotation.rotation = Some(rotation);
        }
        if let Some(ref vertices) = self.vertices {
            annotation.vertices = Some(vertices.clone());
        }
        if let Some(points) = self.line_points {
            annotation.line_points = Some(points);
        }
        if let Some(ref ink_list) = self.ink_list {
            annotation.ink_list = Some(ink_list.clone());
        }
        if let Some(stroke_width) = self.stroke_width {
            annotation.stroke_width = stroke_width;
        }
        if let Some(endings) = self.line_endings {
            annotation.line_endings = Some(endings);
        }
    }
}
