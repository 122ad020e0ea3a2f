//! Per-kind interaction policy
//!
//! Hosts decide whether an annotation may be dragged, resized or rotated
//! before starting a gesture. Each flag is either fixed or computed from the
//! annotation, and the whole policy is resolved once when an interaction
//! starts.

use std::fmt;

use crate::annotation::AnnotationObject;
use crate::config::DragResizeConfig;

/// A yes/no capability that may depend on the annotation
#[derive(Clone, Copy)]
pub enum BehaviorFlag {
    Static(bool),
    Computed(fn(&AnnotationObject) -> bool),
}

impl BehaviorFlag {
    pub fn resolve(&self, annotation: &AnnotationObject) -> bool {
        match self {
            BehaviorFlag::Static(value) => *value,
            BehaviorFlag::Computed(f) => f(annotation),
        }
    }
}

impl Default for BehaviorFlag {
    fn default() -> Self {
        BehaviorFlag::Static(true)
    }
}

impl From<bool> for BehaviorFlag {
    fn from(value: bool) -> Self {
        BehaviorFlag::Static(value)
    }
}

impl fmt::Debug for BehaviorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorFlag::Static(value) => write!(f, "Static({value})"),
            BehaviorFlag::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Which gestures a kind of annotation allows
#[derive(Debug, Clone, Copy)]
pub struct InteractionPolicy {
    pub draggable: BehaviorFlag,
    pub resizable: BehaviorFlag,
    pub rotatable: BehaviorFlag,
    pub lock_aspect_ratio: BehaviorFlag,
}

impl Default for InteractionPolicy {
    fn default() -> Self {
        Self {
            draggable: BehaviorFlag::Static(true),
            resizable: BehaviorFlag::Static(true),
            rotatable: BehaviorFlag::Static(true),
            lock_aspect_ratio: BehaviorFlag::Static(false),
        }
    }
}

impl InteractionPolicy {
    /// Policy that allows nothing
    pub fn locked() -> Self {
        Self {
            draggable: BehaviorFlag::Static(false),
            resizable: BehaviorFlag::Static(false),
            rotatable: BehaviorFlag::Static(false),
            lock_aspect_ratio: BehaviorFlag::Static(false),
        }
    }

    pub fn with_draggable(mut self, flag: impl Into<BehaviorFlag>) -> Self {
        self.draggable = flag.into();
        self
    }

    pub fn with_resizable(mut self, flag: impl Into<BehaviorFlag>) -> Self {
        self.resizable = flag.into();
        self
    }

    pub fn with_rotatable(mut self, flag: impl Into<BehaviorFlag>) -> Self {
        self.rotatable = flag.into();
        self
    }

    pub fn with_lock_aspect_ratio(mut self, flag: impl Into<BehaviorFlag>) -> Self {
        self.lock_aspect_ratio = flag.into();
        self
    }

    /// Evaluate every flag against `annotation`
    pub fn resolve(&self, annotation: &AnnotationObject) -> ResolvedPolicy {
        ResolvedPolicy {
            draggable: self.draggable.resolve(annotation),
            resizable: self.resizable.resolve(annotation),
            rotatable: self.rotatable.resolve(annotation),
            lock_aspect_ratio: self.lock_aspect_ratio.resolve(annotation),
        }
    }
}

/// Policy flags evaluated for one annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub draggable: bool,
    pub resizable: bool,
    pub rotatable: bool,
    pub lock_aspect_ratio: bool,
}

impl ResolvedPolicy {
    /// Carry the aspect-ratio lock into a gesture configuration
    pub fn apply(&self, config: DragResizeConfig) -> DragResizeConfig {
        config.with_aspect_ratio_locked(self.lock_aspect_ratio)
    }
}
