use pdf_editor_transform::{
    calculate_rotated_rect_aabb, get_anchor, get_anchor_point, AnnotationKind, AnnotationObject, DragResizeConfig,
    DragResizeController, EventState, InkStroke, InteractionEvent, PageRotation, PatchRegistry, Position, Rect,
    ResizeHandle, Size, TransformContext, TransformData, TransformType,
};

const EPS: f64 = 1e-9;

fn data(event: Option<InteractionEvent>) -> TransformData {
    event
        .and_then(|e| e.transform_data)
        .expect("event should carry transform data")
}

fn pointer_at(center: Position, radius: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.to_radians().sin_cos();
    (center.x + radius * sin, center.y - radius * cos)
}

#[test]
fn aspect_locked_corner_resize() {
    let start = Rect::new(0.0, 0.0, 100.0, 50.0);
    let mut controller = DragResizeController::new(DragResizeConfig::new(start).with_aspect_ratio_locked(true));

    controller.start_resize(100.0, 50.0, ResizeHandle::Se);
    controller.pointer_move(140.0, 50.0, None);
    let end = data(controller.end());

    let rect = end.changes.rect.unwrap();
    assert!((rect.size.width - 140.0).abs() < EPS);
    assert!((rect.size.height - 70.0).abs() < EPS);
    assert_eq!(rect.origin, Position::ORIGIN);
    let anchor = get_anchor(ResizeHandle::Se);
    assert_eq!(get_anchor_point(&start, anchor), get_anchor_point(&rect, anchor));
}

#[test]
fn rotated_drag_stays_on_page() {
    let side = 20.0 / 2f64.sqrt();
    let element = Rect::new(100.0 - side / 2.0, 100.0 - side / 2.0, side, side);
    let config = DragResizeConfig::new(element)
        .with_annotation_rotation(45.0, Some(Rect::new(90.0, 90.0, 20.0, 20.0)))
        .with_bounding_box(200.0, 200.0);
    let mut controller = DragResizeController::new(config);

    controller.start_drag(0.0, 0.0);
    let moved = data(controller.pointer_move(200.0, 0.0, None));
    assert_eq!(moved.kind, TransformType::Move);

    let visual = calculate_rotated_rect_aabb(moved.changes.rect.unwrap(), 45.0);
    assert!(visual.min_x() >= -1e-6 && visual.min_y() >= -1e-6);
    assert!(visual.max_x() <= 200.0 + 1e-6 && visual.max_y() <= 200.0 + 1e-6);
    assert!((visual.max_x() - 200.0).abs() < 1e-6);
    assert!((visual.min_y() - 90.0).abs() < 1e-6);
}

#[test]
fn rotation_snaps_to_quarter_turn() {
    let mut controller = DragResizeController::new(DragResizeConfig::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
    let center = Position::new(50.0, 50.0);
    // Default orbit: half the height plus the handle offset
    let (x, y) = pointer_at(center, 80.0, 0.0);
    controller.start_rotation(x, y, 0.0, None);

    let (x, y) = pointer_at(center, 80.0, 92.0);
    let moved = data(controller.pointer_move(x, y, None));
    assert_eq!(moved.metadata.rotation_angle, Some(90.0));
    assert_eq!(moved.metadata.is_snapped, Some(true));
    assert_eq!(moved.changes.rotation, Some(90.0));
}

#[test]
fn ink_resize_scales_stroke_and_points() {
    let corners = vec![
        Position::new(5.0, 5.0),
        Position::new(95.0, 5.0),
        Position::new(95.0, 95.0),
        Position::new(5.0, 95.0),
    ];
    let ink = AnnotationObject::new(AnnotationKind::Ink, 0, Rect::new(0.0, 0.0, 100.0, 100.0))
        .with_stroke_width(10.0)
        .with_ink_list(vec![InkStroke::new(corners)]);

    let config = DragResizeConfig::for_annotation(&ink, Size::new(612.0, 792.0), 1.0, PageRotation::Deg0);
    let mut controller = DragResizeController::new(config);
    controller.start_resize(100.0, 100.0, ResizeHandle::Se);
    controller.pointer_move(50.0, 50.0, None);
    let end = data(controller.end());

    let patch = PatchRegistry::default().transform(&ink, &TransformContext::from(end));
    assert_eq!(patch.rect, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
    assert_eq!(patch.stroke_width, Some(5.0));
    assert_eq!(
        patch.ink_list.unwrap()[0].points,
        vec![
            Position::new(2.5, 2.5),
            Position::new(47.5, 2.5),
            Position::new(47.5, 47.5),
            Position::new(2.5, 47.5),
        ]
    );
}

#[test]
fn zero_move_is_identity() {
    let start = Rect::new(12.5, 40.0, 33.0, 21.0);
    let mut controller = DragResizeController::new(
        DragResizeConfig::new(start)
            .with_page_rotation(PageRotation::Deg270)
            .with_scale(1.75)
            .with_bounding_box(300.0, 300.0),
    );
    controller.start_drag(80.0, 80.0);
    let moved = data(controller.pointer_move(80.0, 80.0, None));
    assert_eq!(moved.changes.rect, Some(start));
}

#[test]
fn unregistered_kind_falls_back_to_changes() {
    let registry = PatchRegistry::default();
    let note = AnnotationObject::new(AnnotationKind::FreeText, 2, Rect::new(10.0, 10.0, 80.0, 30.0));
    let mut controller = DragResizeController::new(DragResizeConfig::new(note.rect));
    controller.start_drag(0.0, 0.0);
    let context = TransformContext::from(data(controller.pointer_move(5.0, 5.0, None)));

    assert_eq!(registry.transform(&note, &context), context.changes);
}

#[test]
fn rotated_polygon_vertex_edit_round_trip() {
    let vertices = vec![Position::new(100.0, 100.0), Position::new(160.0, 100.0), Position::new(130.0, 150.0)];
    let mut polygon = AnnotationObject::new(AnnotationKind::Polygon, 0, Rect::new(99.0, 99.0, 62.0, 52.0))
        .with_stroke_width(2.0)
        .with_vertices(vertices)
        .with_rotation(30.0);

    let config = DragResizeConfig::for_annotation(&polygon, Size::new(400.0, 400.0), 2.0, PageRotation::Deg0);
    let mut controller = DragResizeController::new(config);
    let start = controller.start_vertex_edit(0.0, 0.0, 2).expect("vertex 2 exists");
    assert_eq!(start.state, EventState::Start);
    controller.pointer_move(20.0, 40.0, None);
    let end = data(controller.end());

    let patch = PatchRegistry::default().transform(&polygon, &TransformContext::from(end));
    let fixed_before = pdf_editor_transform::rotate_point_around_center(
        Position::new(100.0, 100.0),
        polygon.own_rect().center(),
        30.0,
    );
    patch.apply_to(&mut polygon);

    let own = polygon.unrotated_rect.expect("rotated polygon keeps its own rect");
    assert_eq!(polygon.rect, calculate_rotated_rect_aabb(own, 30.0));
    let fixed_after = pdf_editor_transform::rotate_point_around_center(
        polygon.vertices.as_ref().unwrap()[0],
        own.center(),
        30.0,
    );
    assert!(fixed_before.distance_to(&fixed_after) < 1e-6);
}
