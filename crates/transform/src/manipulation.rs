//! Annotation manipulation gestures
//!
//! [`DragResizeController`] turns a sequence of pointer positions into
//! [`InteractionEvent`]s describing how an annotation moves, resizes, has a
//! vertex edited, or rotates. One controller owns one gesture at a time:
//!
//! ```text
//! idle -> dragging | resizing | vertex-editing | rotating -> idle
//! ```
//!
//! Every `start_*` call emits a `Start` event mirroring the current geometry,
//! every pointer move emits a `Move` event, and `end`/`cancel` emit a final
//! `End` event (the last geometry, or the start geometry on cancel) and
//! return the controller to idle. Nothing here blocks or fails; given the same
//! configuration and pointer sequence the emitted events are identical.

use serde::{Deserialize, Serialize};

use crate::config::{DragResizeConfig, PageRotation};
use crate::geometry::{calculate_rotated_rect_aabb, rotate_point_around_center, sin_cos_degrees, Position, Rect, Size};
use crate::resize::{clamp_range, compute_resized_rect, ResizeHandle};
use crate::snapping::{normalize_angle, shortest_arc, snap_rotation};

/// Distance from the element edge to the rotation handle, in screen pixels
pub const ROTATION_HANDLE_OFFSET_PX: f64 = 30.0;

/// Pointer distance from the rotation center below which the angle is held
pub const ROTATION_DEAD_ZONE_PX: f64 = 10.0;

/// Which gesture, if any, is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionState {
    Idle,
    Dragging,
    Resizing,
    VertexEditing,
    Rotating,
}

/// Kind of geometric change carried by a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformType {
    Move,
    Resize,
    VertexEdit,
    Rotate,
    PropertyUpdate,
}

/// Generic geometry produced by a gesture
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformChanges {
    /// New own-frame rectangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Details of the gesture that produced a transform
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<ResizeHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintain_aspect_ratio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_center: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_snapped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapped_angle: Option<f64>,
}

/// One geometric result of a gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    #[serde(rename = "type")]
    pub kind: TransformType,
    pub changes: TransformChanges,
    #[serde(default)]
    pub metadata: TransformMetadata,
}

/// Phase of a gesture an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    Start,
    Move,
    End,
}

/// Event emitted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub state: EventState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_data: Option<TransformData>,
}

impl InteractionEvent {
    fn new(state: EventState, data: TransformData) -> Self {
        Self {
            state,
            transform_data: Some(data),
        }
    }
}

/// Undo page rotation and zoom: screen pixels to page units
pub fn screen_to_page(delta: Position, page_rotation: PageRotation, scale: f64) -> Position {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let (dx, dy) = (delta.x / scale, delta.y / scale);
    match page_rotation {
        PageRotation::Deg0 => Position::new(dx, dy),
        PageRotation::Deg90 => Position::new(dy, -dx),
        PageRotation::Deg180 => Position::new(-dx, -dy),
        PageRotation::Deg270 => Position::new(-dy, dx),
    }
}

/// Project a page-space delta into the frame of an annotation rotated by
/// `annotation_rotation` degrees
pub fn page_to_local(delta: Position, annotation_rotation: f64) -> Position {
    rotate_point_around_center(delta, Position::ORIGIN, -annotation_rotation)
}

/// Inverse of [`page_to_local`]
pub fn local_to_page(delta: Position, annotation_rotation: f64) -> Position {
    rotate_point_around_center(delta, Position::ORIGIN, annotation_rotation)
}

/// Keep a dragged rectangle inside the page.
///
/// For rotated annotations the visual bounding box is clamped instead, using
/// the configured rotation element when present and the rotated bounding box
/// of `start` otherwise.
pub fn clamp_drag_to_bounds(moved: &Rect, start: &Rect, config: &DragResizeConfig, bounds: Size) -> Rect {
    let rotation = normalize_angle(config.annotation_rotation);
    let (offset, visual) = if rotation == 0.0 {
        (Position::ORIGIN, moved.size)
    } else {
        let aabb = config
            .rotation_element
            .unwrap_or_else(|| calculate_rotated_rect_aabb(*start, rotation));
        (aabb.origin - start.origin, aabb.size)
    };
    let x = clamp_range(moved.origin.x, -offset.x, bounds.width - visual.width - offset.x);
    let y = clamp_range(moved.origin.y, -offset.y, bounds.height - visual.height - offset.y);
    moved.with_origin(Position::new(x, y))
}

#[derive(Debug, Clone)]
struct DragSnapshot {
    pointer: Position,
    element: Rect,
}

#[derive(Debug, Clone)]
struct ResizeSnapshot {
    pointer: Position,
    element: Rect,
    handle: ResizeHandle,
}

#[derive(Debug, Clone)]
struct VertexSnapshot {
    pointer: Position,
    vertices: Vec<Position>,
    index: usize,
}

#[derive(Debug, Clone)]
struct RotationSnapshot {
    /// Page-space pivot
    pivot: Position,
    /// Screen-space position of the pivot
    screen_center: Position,
    initial_rotation: f64,
}

#[derive(Debug, Clone, Copy)]
struct LiveRotation {
    angle: f64,
    delta: f64,
    snapped_angle: Option<f64>,
}

impl LiveRotation {
    fn at(angle: f64) -> Self {
        Self {
            angle: normalize_angle(angle),
            delta: 0.0,
            snapped_angle: None,
        }
    }
}

/// Active gesture: an immutable snapshot taken at start plus the live result
#[derive(Debug, Clone)]
enum Gesture {
    Drag { snapshot: DragSnapshot, current: Rect },
    Resize { snapshot: ResizeSnapshot, current: Rect },
    VertexEdit { snapshot: VertexSnapshot, current: Vec<Position> },
    Rotate { snapshot: RotationSnapshot, live: LiveRotation },
}

impl Gesture {
    fn state(&self) -> InteractionState {
        match self {
            Gesture::Drag { .. } => InteractionState::Dragging,
            Gesture::Resize { .. } => InteractionState::Resizing,
            Gesture::VertexEdit { .. } => InteractionState::VertexEditing,
            Gesture::Rotate { .. } => InteractionState::Rotating,
        }
    }

    /// Transform describing the live geometry
    fn current_data(&self, config: &DragResizeConfig) -> TransformData {
        match self {
            Gesture::Drag { current, .. } => move_data(*current),
            Gesture::Resize { snapshot, current } => resize_data(*current, snapshot.handle, config),
            Gesture::VertexEdit { snapshot, current } => vertex_data(current.clone(), snapshot.index),
            Gesture::Rotate { snapshot, live } => rotate_data(snapshot, live),
        }
    }

    /// Transform describing the geometry captured at start
    fn start_data(&self, config: &DragResizeConfig) -> TransformData {
        match self {
            Gesture::Drag { snapshot, .. } => move_data(snapshot.element),
            Gesture::Resize { snapshot, .. } => resize_data(snapshot.element, snapshot.handle, config),
            Gesture::VertexEdit { snapshot, .. } => vertex_data(snapshot.vertices.clone(), snapshot.index),
            Gesture::Rotate { snapshot, .. } => rotate_data(snapshot, &LiveRotation::at(snapshot.initial_rotation)),
        }
    }
}

fn move_data(rect: Rect) -> TransformData {
    TransformData {
        kind: TransformType::Move,
        changes: TransformChanges {
            rect: Some(rect),
            ..Default::default()
        },
        metadata: TransformMetadata::default(),
    }
}

fn resize_data(rect: Rect, handle: ResizeHandle, config: &DragResizeConfig) -> TransformData {
    TransformData {
        kind: TransformType::Resize,
        changes: TransformChanges {
            rect: Some(rect),
            ..Default::default()
        },
        metadata: TransformMetadata {
            handle: Some(handle),
            maintain_aspect_ratio: Some(config.maintain_aspect_ratio),
            ..Default::default()
        },
    }
}

fn vertex_data(vertices: Vec<Position>, index: usize) -> TransformData {
    TransformData {
        kind: TransformType::VertexEdit,
        changes: TransformChanges {
            vertices: Some(vertices),
            ..Default::default()
        },
        metadata: TransformMetadata {
            vertex_index: Some(index),
            ..Default::default()
        },
    }
}

fn rotate_data(snapshot: &RotationSnapshot, live: &LiveRotation) -> TransformData {
    TransformData {
        kind: TransformType::Rotate,
        changes: TransformChanges {
            rotation: Some(live.angle),
            ..Default::default()
        },
        metadata: TransformMetadata {
            rotation_angle: Some(live.angle),
            rotation_center: Some(snapshot.pivot),
            rotation_delta: Some(live.delta),
            is_snapped: Some(live.snapped_angle.is_some()),
            snapped_angle: live.snapped_angle,
            ..Default::default()
        },
    }
}

/// Gesture state machine for one annotation.
///
/// Construct one per interaction from a [`DragResizeConfig`]; the config may
/// only be replaced while idle.
#[derive(Debug, Clone)]
pub struct DragResizeController {
    config: DragResizeConfig,
    gesture: Option<Gesture>,
}

impl DragResizeController {
    /// Create an idle controller
    pub fn new(config: DragResizeConfig) -> Self {
        Self { config, gesture: None }
    }

    pub fn config(&self) -> &DragResizeConfig {
        &self.config
    }

    /// Replace the configuration between gestures.
    ///
    /// Returns `false`, leaving the configuration untouched, while a gesture
    /// is active.
    pub fn update_config(&mut self, config: DragResizeConfig) -> bool {
        if let Some(gesture) = &self.gesture {
            log::warn!("config update ignored during {:?} gesture", gesture.state());
            return false;
        }
        self.config = config;
        true
    }

    pub fn state(&self) -> InteractionState {
        self.gesture.as_ref().map_or(InteractionState::Idle, Gesture::state)
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Begin moving the whole element
    pub fn start_drag(&mut self, x: f64, y: f64) -> Option<InteractionEvent> {
        if !self.can_start(InteractionState::Dragging) {
            return None;
        }
        let element = self.config.element;
        self.begin(Gesture::Drag {
            snapshot: DragSnapshot {
                pointer: Position::new(x, y),
                element,
            },
            current: element,
        })
    }

    /// Begin resizing from `handle`
    pub fn start_resize(&mut self, x: f64, y: f64, handle: ResizeHandle) -> Option<InteractionEvent> {
        if !self.can_start(InteractionState::Resizing) {
            return None;
        }
        let element = self.config.element;
        self.begin(Gesture::Resize {
            snapshot: ResizeSnapshot {
                pointer: Position::new(x, y),
                element,
                handle,
            },
            current: element,
        })
    }

    /// Begin dragging vertex `vertex_index`. Out-of-range indices are ignored.
    pub fn start_vertex_edit(&mut self, x: f64, y: f64, vertex_index: usize) -> Option<InteractionEvent> {
        if !self.can_start(InteractionState::VertexEditing) {
            return None;
        }
        if vertex_index >= self.config.vertices.len() {
            log::warn!(
                "vertex edit ignored: index {vertex_index} out of range for {} vertices",
                self.config.vertices.len()
            );
            return None;
        }
        let vertices = self.config.vertices.clone();
        self.begin(Gesture::VertexEdit {
            snapshot: VertexSnapshot {
                pointer: Position::new(x, y),
                vertices: vertices.clone(),
                index: vertex_index,
            },
            current: vertices,
        })
    }

    /// Begin rotating. The pointer is assumed to be on the rotation handle,
    /// `orbit_radius_px` screen pixels from the pivot; the default radius puts
    /// the handle [`ROTATION_HANDLE_OFFSET_PX`] above the top edge of the
    /// rotation element, or of the element when none is set.
    pub fn start_rotation(
        &mut self,
        x: f64,
        y: f64,
        initial_rotation: f64,
        orbit_radius_px: Option<f64>,
    ) -> Option<InteractionEvent> {
        if !self.can_start(InteractionState::Rotating) {
            return None;
        }
        let radius = orbit_radius_px
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or_else(|| {
                let orbit = self.config.rotation_element.unwrap_or(self.config.element);
                orbit.size.height / 2.0 * self.config.effective_scale() + ROTATION_HANDLE_OFFSET_PX
            });
        let handle_angle = initial_rotation + self.config.page_rotation.degrees();
        let (sin, cos) = sin_cos_degrees(handle_angle);
        let snapshot = RotationSnapshot {
            pivot: self.config.pivot(),
            screen_center: Position::new(x - radius * sin, y + radius * cos),
            initial_rotation,
        };
        self.begin(Gesture::Rotate {
            snapshot,
            live: LiveRotation::at(initial_rotation),
        })
    }

    /// Feed a pointer position. `buttons == Some(0)` means the pointer was
    /// released without an `end` call, which ends the gesture.
    pub fn pointer_move(&mut self, x: f64, y: f64, buttons: Option<u16>) -> Option<InteractionEvent> {
        if self.gesture.is_none() {
            return None;
        }
        if buttons == Some(0) {
            log::debug!("pointer released without end; ending gesture");
            return self.end();
        }

        let pointer = Position::new(x, y);
        let config = &self.config;
        let gesture = self.gesture.as_mut()?;
        match gesture {
            Gesture::Drag { snapshot, current } => *current = drag_rect(config, snapshot, pointer),
            Gesture::Resize { snapshot, current } => *current = resize_rect(config, snapshot, pointer),
            Gesture::VertexEdit { snapshot, current } => *current = vertex_positions(config, snapshot, pointer),
            Gesture::Rotate { snapshot, live } => *live = next_rotation(config, snapshot, *live, pointer),
        }
        let data = gesture.current_data(config);
        log::trace!("{:?} move to ({x}, {y})", gesture.state());
        Some(InteractionEvent::new(EventState::Move, data))
    }

    /// Finish the gesture, emitting the last computed geometry
    pub fn end(&mut self) -> Option<InteractionEvent> {
        let gesture = self.gesture.take()?;
        log::debug!("{:?} gesture ended", gesture.state());
        Some(InteractionEvent::new(EventState::End, gesture.current_data(&self.config)))
    }

    /// Abort the gesture, emitting the start geometry
    pub fn cancel(&mut self) -> Option<InteractionEvent> {
        let gesture = self.gesture.take()?;
        log::debug!("{:?} gesture cancelled", gesture.state());
        Some(InteractionEvent::new(EventState::End, gesture.start_data(&self.config)))
    }

    fn can_start(&self, requested: InteractionState) -> bool {
        match &self.gesture {
            Some(active) => {
                log::warn!("{requested:?} ignored: {:?} gesture already active", active.state());
                false
            }
            None => true,
        }
    }

    fn begin(&mut self, gesture: Gesture) -> Option<InteractionEvent> {
        log::debug!("{:?} gesture started", gesture.state());
        let data = gesture.current_data(&self.config);
        self.gesture = Some(gesture);
        Some(InteractionEvent::new(EventState::Start, data))
    }
}

fn page_delta(config: &DragResizeConfig, start: Position, pointer: Position) -> Position {
    screen_to_page(pointer - start, config.page_rotation, config.effective_scale())
}

fn drag_rect(config: &DragResizeConfig, snapshot: &DragSnapshot, pointer: Position) -> Rect {
    let delta = page_delta(config, snapshot.pointer, pointer);
    let moved = snapshot.element.translate(delta.x, delta.y);
    match config.constraints.bounding_box {
        Some(bounds) => clamp_drag_to_bounds(&moved, &snapshot.element, config, bounds),
        None => moved,
    }
}

fn resize_rect(config: &DragResizeConfig, snapshot: &ResizeSnapshot, pointer: Position) -> Rect {
    let delta = page_to_local(page_delta(config, snapshot.pointer, pointer), config.annotation_rotation);
    compute_resized_rect(&snapshot.element, delta, snapshot.handle, config)
}

fn vertex_positions(config: &DragResizeConfig, snapshot: &VertexSnapshot, pointer: Position) -> Vec<Position> {
    let delta = page_to_local(page_delta(config, snapshot.pointer, pointer), config.annotation_rotation);
    let mut vertices = snapshot.vertices.clone();
    if let Some(vertex) = vertices.get_mut(snapshot.index) {
        *vertex = clamp_vertex(config, *vertex + delta);
    }
    vertices
}

/// Clamp an own-frame vertex so its visual position stays on the page
fn clamp_vertex(config: &DragResizeConfig, vertex: Position) -> Position {
    let Some(bounds) = config.constraints.bounding_box else {
        return vertex;
    };
    let clamp = |p: Position| {
        Position::new(
            clamp_range(p.x, 0.0, bounds.width),
            clamp_range(p.y, 0.0, bounds.height),
        )
    };
    let rotation = normalize_angle(config.annotation_rotation);
    if rotation == 0.0 {
        return clamp(vertex);
    }
    // Vertices rotate with their own shape, not about a group pivot
    let pivot = config.element.center();
    let visual = rotate_point_around_center(vertex, pivot, rotation);
    let clamped = clamp(visual);
    if clamped == visual {
        vertex
    } else {
        rotate_point_around_center(clamped, pivot, -rotation)
    }
}

fn next_rotation(
    config: &DragResizeConfig,
    snapshot: &RotationSnapshot,
    live: LiveRotation,
    pointer: Position,
) -> LiveRotation {
    let offset = pointer - snapshot.screen_center;
    if offset.x.hypot(offset.y) < ROTATION_DEAD_ZONE_PX {
        return live;
    }
    // 0 degrees points up, angles grow clockwise
    let screen_angle = offset.x.atan2(-offset.y).to_degrees();
    let snap = snap_rotation(screen_angle - config.page_rotation.degrees(), &config.rotation_snap);
    LiveRotation {
        angle: snap.angle,
        delta: live.delta + shortest_arc(live.angle, snap.angle),
        snapped_angle: snap.snapped_angle,
    }
}
