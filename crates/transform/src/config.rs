//! Gesture configuration
//!
//! A [`DragResizeConfig`] describes everything one interaction needs to know
//! about the annotation being manipulated and the viewport it is shown in:
//! current geometry, scale, page rotation, annotation rotation, and size and
//! bounds constraints. Configuration can be built programmatically with the
//! `with_*` methods, derived from an annotation record, or loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationObject;
use crate::geometry::{Position, Rect, Size};
use crate::snapping::RotationSnapConfig;

/// Minimum width and height a resize may produce when no constraint is set
pub const DEFAULT_MIN_SIZE: f64 = 1.0;

/// Error types for configuration loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

/// Rotation of the displayed page in quarter turns (clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PageRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl PageRotation {
    /// Build from any number of quarter turns, wrapping modulo 4
    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            1 => PageRotation::Deg90,
            2 => PageRotation::Deg180,
            3 => PageRotation::Deg270,
            _ => PageRotation::Deg0,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            PageRotation::Deg0 => 0,
            PageRotation::Deg90 => 1,
            PageRotation::Deg180 => 2,
            PageRotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> f64 {
        f64::from(self.quarter_turns()) * 90.0
    }
}

impl From<PageRotation> for u8 {
    fn from(rotation: PageRotation) -> u8 {
        rotation.quarter_turns()
    }
}

impl TryFrom<u8> for PageRotation {
    type Error = ConfigError;

    fn try_from(turns: u8) -> Result<Self, Self::Error> {
        if turns > 3 {
            return Err(invalid("page_rotation", format!("{turns} is not a quarter turn in 0..=3")));
        }
        Ok(Self::from_quarter_turns(i32::from(turns)))
    }
}

/// Size limits and page bounds for a gesture
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Page size; geometry is kept inside `[0, width] x [0, height]`
    pub bounding_box: Option<Size>,
}

impl Constraints {
    pub fn min_width(&self) -> f64 {
        self.min_width.unwrap_or(DEFAULT_MIN_SIZE)
    }

    pub fn min_height(&self) -> f64 {
        self.min_height.unwrap_or(DEFAULT_MIN_SIZE)
    }

    pub fn max_width(&self) -> f64 {
        self.max_width.unwrap_or(f64::INFINITY)
    }

    pub fn max_height(&self) -> f64 {
        self.max_height.unwrap_or(f64::INFINITY)
    }

    /// Sets the page bounds.
    pub fn with_bounding_box(mut self, width: f64, height: f64) -> Self {
        self.bounding_box = Some(Size::new(width, height));
        self
    }

    /// Sets the minimum size.
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    /// Sets the maximum size.
    pub fn with_max_size(mut self, width: f64, height: f64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        let limits = [
            ("constraints.min_width", self.min_width),
            ("constraints.min_height", self.min_height),
            ("constraints.max_width", self.max_width),
            ("constraints.max_height", self.max_height),
        ];
        for (field, value) in limits {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid(field, format!("{v} must be a finite non-negative number")));
                }
            }
        }
        if self.min_width() > self.max_width() {
            return Err(invalid("constraints.min_width", "exceeds max_width"));
        }
        if self.min_height() > self.max_height() {
            return Err(invalid("constraints.min_height", "exceeds max_height"));
        }
        if let Some(bounds) = self.bounding_box {
            if !(bounds.width.is_finite() && bounds.width > 0.0 && bounds.height.is_finite() && bounds.height > 0.0) {
                return Err(invalid("constraints.bounding_box", "page size must be positive"));
            }
        }
        Ok(())
    }
}

/// Per-gesture configuration of the interaction controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragResizeConfig {
    /// Annotation rectangle in its own (unrotated) frame
    pub element: Rect,

    /// Pivot for rotation; defaults to the center of `element`
    pub rotation_center: Option<Position>,

    /// Visual bounding box of the rotated element, used to clamp drags
    pub rotation_element: Option<Rect>,

    /// Editable vertices in the own frame
    pub vertices: Vec<Position>,

    pub constraints: Constraints,

    pub maintain_aspect_ratio: bool,

    pub page_rotation: PageRotation,

    /// Clockwise annotation rotation in degrees
    pub annotation_rotation: f64,

    /// Screen pixels per page unit
    pub scale: f64,

    pub rotation_snap: RotationSnapConfig,
}

impl Default for DragResizeConfig {
    fn default() -> Self {
        Self {
            element: Rect::default(),
            rotation_center: None,
            rotation_element: None,
            vertices: Vec::new(),
            constraints: Constraints::default(),
            maintain_aspect_ratio: false,
            page_rotation: PageRotation::Deg0,
            annotation_rotation: 0.0,
            scale: 1.0,
            rotation_snap: RotationSnapConfig::default(),
        }
    }
}

impl DragResizeConfig {
    /// Creates a configuration for the given element with default settings.
    pub fn new(element: Rect) -> Self {
        Self {
            element,
            ..Self::default()
        }
    }

    /// Derives a gesture configuration from an annotation record.
    ///
    /// The element is the own-frame rectangle; the visual `rect` becomes the
    /// rotation element when the annotation is rotated.
    pub fn for_annotation(
        annotation: &AnnotationObject,
        page_size: Size,
        scale: f64,
        page_rotation: PageRotation,
    ) -> Self {
        let rotated = annotation.is_rotated();
        Self {
            element: annotation.own_rect(),
            rotation_element: rotated.then_some(annotation.rect),
            vertices: annotation.editable_vertices(),
            constraints: Constraints::default().with_bounding_box(page_size.width, page_size.height),
            page_rotation,
            annotation_rotation: annotation.rotation_degrees(),
            scale,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or any value is out of range.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the element rectangle.
    pub fn with_element(mut self, element: Rect) -> Self {
        self.element = element;
        self
    }

    /// Sets the editable vertices.
    pub fn with_vertices(mut self, vertices: Vec<Position>) -> Self {
        self.vertices = vertices;
        self
    }

    /// Sets the constraints.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the page bounds.
    pub fn with_bounding_box(mut self, width: f64, height: f64) -> Self {
        self.constraints = self.constraints.with_bounding_box(width, height);
        self
    }

    /// Locks or unlocks the aspect ratio.
    pub fn with_aspect_ratio_locked(mut self, locked: bool) -> Self {
        self.maintain_aspect_ratio = locked;
        self
    }

    /// Sets the page rotation.
    pub fn with_page_rotation(mut self, rotation: PageRotation) -> Self {
        self.page_rotation = rotation;
        self
    }

    /// Sets the annotation rotation and, optionally, its visual bounding box.
    pub fn with_annotation_rotation(mut self, degrees: f64, rotation_element: Option<Rect>) -> Self {
        self.annotation_rotation = degrees;
        self.rotation_element = rotation_element;
        self
    }

    /// Sets the rotation pivot.
    pub fn with_rotation_center(mut self, center: Position) -> Self {
        self.rotation_center = Some(center);
        self
    }

    /// Sets the screen-to-page scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the rotation snapping behavior.
    pub fn with_rotation_snap(mut self, snap: RotationSnapConfig) -> Self {
        self.rotation_snap = snap;
        self
    }

    /// Pivot used for rotation and rotated clamping
    pub fn pivot(&self) -> Position {
        self.rotation_center.unwrap_or_else(|| self.element.center())
    }

    /// Scale with non-positive or non-finite values replaced by 1
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let element = &self.element;
        if !(element.origin.is_finite() && element.size.width.is_finite() && element.size.height.is_finite()) {
            return Err(invalid("element", "coordinates must be finite"));
        }
        if element.size.width < 0.0 || element.size.height < 0.0 {
            return Err(invalid("element", "size must be non-negative"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid("scale", format!("{} must be positive", self.scale)));
        }
        if !self.annotation_rotation.is_finite() {
            return Err(invalid("annotation_rotation", "must be finite"));
        }
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return Err(invalid("vertices", "coordinates must be finite"));
        }
        if !(self.rotation_snap.threshold.is_finite() && self.rotation_snap.threshold >= 0.0) {
            return Err(invalid("rotation_snap.threshold", "must be a finite non-negative number"));
        }
        if self.rotation_snap.angles.iter().any(|a| !a.is_finite()) {
            return Err(invalid("rotation_snap.angles", "angles must be finite"));
        }
        self.constraints.validate()
    }
}
