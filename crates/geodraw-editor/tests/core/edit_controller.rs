use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use geodraw_core::{
    BoundsShape, CircleShape, Error, GeoPoint, Geometry, GeometryError, HandleRef, LineShape,
    PlanarProjection, Point2D, PointShape, ShapeId, ShapeKind,
};
use geodraw_editor::{
    EditController, EditEvent, HeadlessMap, ShapeEditor, ShapeModel, ShapePersistence, ShapeStore,
};
use geodraw_settings::EditSettings;

const LINE: ShapeId = ShapeId(1);
const RECT: ShapeId = ShapeId(2);
const MARKER: ShapeId = ShapeId(3);
const CIRCLE: ShapeId = ShapeId(4);

/// Records every call and rejects the shapes in `fail`
#[derive(Default)]
struct RecordingBackend {
    calls: Vec<(&'static str, ShapeId)>,
    fail: HashSet<ShapeId>,
}

impl RecordingBackend {
    fn failing(ids: &[ShapeId]) -> Self {
        Self {
            calls: Vec::new(),
            fail: ids.iter().copied().collect(),
        }
    }

    fn record(&mut self, call: &'static str, shape: &ShapeModel) -> Result<(), String> {
        self.calls.push((call, shape.id()));
        if self.fail.contains(&shape.id()) {
            Err("backend offline".to_string())
        } else {
            Ok(())
        }
    }
}

impl ShapePersistence for RecordingBackend {
    fn create(&mut self, shape: &ShapeModel) -> Result<(), String> {
        self.record("create", shape)
    }

    fn update(&mut self, shape: &ShapeModel) -> Result<(), String> {
        self.record("update", shape)
    }

    fn delete(&mut self, shape: &ShapeModel) -> Result<(), String> {
        self.record("delete", shape)
    }
}

fn line_geometry() -> Geometry {
    Geometry::Line(LineShape::polyline(vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 10.0),
        GeoPoint::new(10.0, 10.0),
    ]))
}

fn setup() -> (EditController, HeadlessMap<PlanarProjection>) {
    let mut store = ShapeStore::new();
    store.add(line_geometry());
    store.add(Geometry::Bounds(BoundsShape::new(
        GeoPoint::new(20.0, 20.0),
        GeoPoint::new(30.0, 30.0),
    )));
    store.add(Geometry::Point(PointShape::new(GeoPoint::new(-5.0, -5.0))));
    store.add(Geometry::Circle(CircleShape::new(GeoPoint::new(40.0, 40.0), 5.0)));

    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let mut controller = EditController::new(store, &EditSettings::default());
    controller.enable(&mut map).unwrap();
    (controller, map)
}

fn vertex_handle(controller: &EditController, index: usize) -> HandleRef {
    match controller.editor(LINE) {
        Some(ShapeEditor::Vertex(editor)) => editor.handles()[index].visual,
        other => panic!("expected a vertex editor, got {:?}", other),
    }
}

fn marker_handle(controller: &EditController) -> HandleRef {
    match controller.editor(MARKER) {
        Some(ShapeEditor::Point(editor)) => editor.handle(),
        other => panic!("expected a point editor, got {:?}", other),
    }
}

/// Move handle and resize handles of a rectangle or circle
fn simple_handles(controller: &EditController, id: ShapeId) -> (HandleRef, Vec<HandleRef>) {
    match controller.editor(id) {
        Some(ShapeEditor::Simple(editor)) => {
            (editor.move_handle(), editor.resize_handles().to_vec())
        }
        other => panic!("expected a shape editor, got {:?}", other),
    }
}

fn drag_through(
    controller: &mut EditController,
    map: &mut HeadlessMap<PlanarProjection>,
    handle: HandleRef,
    path: &[GeoPoint],
) {
    controller.on_handle_drag_start(handle, map).unwrap();
    for to in path {
        controller.on_handle_drag(handle, *to, map).unwrap();
    }
    controller.on_handle_drag_end(handle, map).unwrap();
}

fn geometry(controller: &EditController, id: ShapeId) -> Geometry {
    controller.store().get(id).unwrap().borrow().snapshot()
}

fn drag(
    controller: &mut EditController,
    map: &mut HeadlessMap<PlanarProjection>,
    handle: HandleRef,
    to: GeoPoint,
) {
    controller.on_handle_drag_start(handle, map).unwrap();
    controller.on_handle_drag(handle, to, map).unwrap();
    controller.on_handle_drag_end(handle, map).unwrap();
}

#[test]
fn test_enable_attaches_every_shape() {
    let (controller, map) = setup();

    assert!(controller.is_enabled());
    // 3 vertices + 2 ghosts, 4 corners + center, 1 marker, center + rim
    assert_eq!(map.handle_count(), 13);
    for id in [LINE, RECT, MARKER, CIRCLE] {
        assert!(controller.editor(id).is_some());
        assert!(controller.backup(id).is_some());
    }
    assert!(controller.edited_shapes().is_empty());
}

#[test]
fn test_disable_keeps_backups() {
    let (mut controller, mut map) = setup();
    controller.disable(&mut map);

    assert!(!controller.is_enabled());
    assert_eq!(map.handle_count(), 0);
    assert!(controller.editor(LINE).is_none());
    assert_eq!(controller.backup(LINE), Some(&line_geometry()));
}

#[test]
fn test_drag_events_are_published() {
    let (mut controller, mut map) = setup();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    controller
        .events_mut()
        .subscribe(move |event: &EditEvent| sink.borrow_mut().push(event.clone()));

    let handle = marker_handle(&controller);
    drag(&mut controller, &mut map, handle, GeoPoint::new(1.0, 1.0));

    assert_eq!(
        *events.borrow(),
        vec![EditEvent::EditStart(MARKER), EditEvent::Edited(MARKER)]
    );
    assert_eq!(controller.edited_shapes(), vec![MARKER]);
}

#[test]
fn test_first_backup_wins() {
    let (mut controller, mut map) = setup();
    let handle = vertex_handle(&controller, 1);

    drag(&mut controller, &mut map, handle, GeoPoint::new(3.0, 10.0));
    drag(&mut controller, &mut map, handle, GeoPoint::new(6.0, 12.0));

    assert_eq!(controller.backup(LINE), Some(&line_geometry()));
    assert_eq!(
        controller
            .store()
            .get(LINE)
            .unwrap()
            .borrow()
            .vertices()
            .unwrap()[1],
        GeoPoint::new(6.0, 12.0)
    );
}

#[test]
fn test_cancel_restores_pre_edit_geometry() {
    let (mut controller, mut map) = setup();
    let rect_before = geometry(&controller, RECT);

    let handle = vertex_handle(&controller, 1);
    drag(&mut controller, &mut map, handle, GeoPoint::new(3.0, 10.0));
    let ghost = match controller.editor(LINE) {
        Some(ShapeEditor::Vertex(editor)) => editor.ghost_handles()[0],
        _ => unreachable!(),
    };
    controller.on_handle_click(ghost, &mut map).unwrap();
    let handle = vertex_handle(&controller, 0);
    controller.on_handle_click(handle, &mut map).unwrap();
    let marker = marker_handle(&controller);
    drag(&mut controller, &mut map, marker, GeoPoint::new(9.0, 9.0));
    assert_ne!(geometry(&controller, LINE), line_geometry());

    let reverted = controller.cancel(&mut map).unwrap();

    assert_eq!(reverted, vec![LINE, RECT, MARKER, CIRCLE]);
    assert_eq!(geometry(&controller, LINE), line_geometry());
    assert_eq!(geometry(&controller, RECT), rect_before);
    assert_eq!(
        geometry(&controller, MARKER),
        Geometry::Point(PointShape::new(GeoPoint::new(-5.0, -5.0)))
    );
    assert!(controller.edited_shapes().is_empty());
    assert!(controller.backup(LINE).is_none());

    // Editors were rebuilt around the restored geometry
    assert_eq!(map.handle_count(), 13);
    let first = vertex_handle(&controller, 0);
    assert_eq!(map.handle(first).unwrap().position, GeoPoint::new(0.0, 0.0));
}

#[test]
fn test_cancel_restores_rectangle_and_circle() {
    let (mut controller, mut map) = setup();
    let rect_before = geometry(&controller, RECT);
    let circle_before = geometry(&controller, CIRCLE);

    let (rect_move, rect_corners) = simple_handles(&controller, RECT);
    drag_through(
        &mut controller,
        &mut map,
        rect_corners[0],
        &[
            GeoPoint::new(32.0, 18.0),
            GeoPoint::new(24.0, 4.0),
            GeoPoint::new(15.0, -5.0),
        ],
    );
    drag_through(
        &mut controller,
        &mut map,
        rect_move,
        &[GeoPoint::new(30.0, 30.0), GeoPoint::new(40.0, 40.0)],
    );
    let (_, rim) = simple_handles(&controller, CIRCLE);
    drag_through(
        &mut controller,
        &mut map,
        rim[0],
        &[
            GeoPoint::new(44.0, 44.0),
            GeoPoint::new(48.0, 60.0),
            GeoPoint::new(50.0, 70.0),
        ],
    );
    assert_ne!(geometry(&controller, RECT), rect_before);
    assert_ne!(geometry(&controller, CIRCLE), circle_before);
    assert_eq!(controller.edited_shapes(), vec![RECT, CIRCLE]);

    let reverted = controller.cancel(&mut map).unwrap();

    assert_eq!(reverted, vec![LINE, RECT, MARKER, CIRCLE]);
    assert_eq!(geometry(&controller, RECT), rect_before);
    assert_eq!(geometry(&controller, CIRCLE), circle_before);
    assert!(controller.edited_shapes().is_empty());

    let (rect_move, rect_corners) = simple_handles(&controller, RECT);
    assert_eq!(
        map.handle(rect_move).unwrap().position,
        GeoPoint::new(25.0, 25.0)
    );
    let corners: Vec<GeoPoint> = rect_corners
        .iter()
        .map(|h| map.handle(*h).unwrap().position)
        .collect();
    assert_eq!(
        corners,
        BoundsShape::new(GeoPoint::new(20.0, 20.0), GeoPoint::new(30.0, 30.0))
            .corners()
            .to_vec()
    );

    let (circle_move, rim) = simple_handles(&controller, CIRCLE);
    assert_eq!(rim.len(), 1);
    assert_eq!(
        map.handle(circle_move).unwrap().position,
        GeoPoint::new(40.0, 40.0)
    );
    let offset = 5.0 * std::f64::consts::FRAC_PI_4.cos();
    let rim = map.handle(rim[0]).unwrap().position;
    assert!((rim.lat - (40.0 + offset)).abs() < 1e-9);
    assert!((rim.lng - (40.0 + offset)).abs() < 1e-9);
}

#[test]
fn test_every_mutation_requests_redraw() {
    let (mut controller, mut map) = setup();
    map.take_redraws();

    let handle = vertex_handle(&controller, 1);
    drag(&mut controller, &mut map, handle, GeoPoint::new(3.0, 10.0));
    assert!(map.take_redraws().contains(&LINE));

    let ghost = match controller.editor(LINE) {
        Some(ShapeEditor::Vertex(editor)) => editor.ghost_handles()[0],
        _ => unreachable!(),
    };
    controller.on_handle_click(ghost, &mut map).unwrap();
    assert!(map.take_redraws().contains(&LINE));

    let handle = vertex_handle(&controller, 0);
    controller.on_handle_click(handle, &mut map).unwrap();
    assert!(map.take_redraws().contains(&LINE));

    controller
        .translate_shape(LINE, Point2D::new(1.0, 1.0), &mut map)
        .unwrap();
    assert!(map.take_redraws().contains(&LINE));

    let (rect_move, _) = simple_handles(&controller, RECT);
    drag(&mut controller, &mut map, rect_move, GeoPoint::new(26.0, 26.0));
    assert!(map.take_redraws().contains(&RECT));

    let (_, rim) = simple_handles(&controller, CIRCLE);
    drag(&mut controller, &mut map, rim[0], GeoPoint::new(48.0, 48.0));
    assert!(map.take_redraws().contains(&CIRCLE));

    let marker = marker_handle(&controller);
    drag(&mut controller, &mut map, marker, GeoPoint::new(1.0, 1.0));
    assert!(map.take_redraws().contains(&MARKER));

    controller.cancel(&mut map).unwrap();
    let redraws = map.take_redraws();
    for id in [LINE, RECT, MARKER, CIRCLE] {
        assert!(redraws.contains(&id));
    }
}

#[test]
fn test_save_persists_only_edited_shapes() {
    let (mut controller, mut map) = setup();
    let mut backend = RecordingBackend::default();

    let report = controller.save(&mut backend);
    assert!(report.is_success());
    assert!(backend.calls.is_empty());

    let marker = marker_handle(&controller);
    drag(&mut controller, &mut map, marker, GeoPoint::new(2.0, 2.0));
    let report = controller.save(&mut backend);

    assert_eq!(report.saved, vec![MARKER]);
    assert_eq!(backend.calls, vec![("update", MARKER)]);
    assert!(controller.edited_shapes().is_empty());
    assert!(controller.backup(MARKER).is_none());
}

#[test]
fn test_failed_shape_does_not_affect_the_rest_of_the_batch() {
    let (mut controller, mut map) = setup();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    controller
        .events_mut()
        .subscribe(move |event: &EditEvent| sink.borrow_mut().push(event.clone()));

    let handle = vertex_handle(&controller, 2);
    drag(&mut controller, &mut map, handle, GeoPoint::new(12.0, 12.0));
    let marker = marker_handle(&controller);
    drag(&mut controller, &mut map, marker, GeoPoint::new(2.0, 2.0));

    let mut backend = RecordingBackend::failing(&[MARKER]);
    let report = controller.save(&mut backend);

    assert!(!report.is_success());
    assert_eq!(report.saved, vec![LINE]);
    assert_eq!(
        report.failed,
        vec![Error::PersistenceFailure {
            id: MARKER,
            reason: "backend offline".to_string()
        }]
    );
    assert!(events.borrow().contains(&EditEvent::PersistenceFailed {
        id: MARKER,
        reason: "backend offline".to_string()
    }));
    assert!(events.borrow().contains(&EditEvent::Saved(vec![LINE])));

    // The saved shape is committed, the failed one can still be reverted
    assert!(controller.backup(LINE).is_none());
    assert!(controller.backup(MARKER).is_some());
    assert_eq!(controller.edited_shapes(), vec![MARKER]);

    let reverted = controller.cancel(&mut map).unwrap();
    assert_eq!(reverted, vec![MARKER]);
    assert_eq!(
        controller
            .store()
            .get(LINE)
            .unwrap()
            .borrow()
            .vertices()
            .unwrap()[2],
        GeoPoint::new(12.0, 12.0)
    );
    assert_eq!(
        controller.store().get(MARKER).unwrap().borrow().position().unwrap(),
        GeoPoint::new(-5.0, -5.0)
    );
}

#[test]
fn test_drawn_shape_is_created_on_save() {
    let (mut controller, mut map) = setup();
    let id = controller
        .add_shape(
            Geometry::Point(PointShape::new(GeoPoint::new(1.0, 1.0))),
            &mut map,
        )
        .unwrap();

    assert_eq!(id, ShapeId(5));
    assert!(controller.editor(id).is_some());
    assert!(controller.backup(id).is_none());
    assert_eq!(controller.edited_shapes(), vec![id]);

    let mut backend = RecordingBackend::default();
    let report = controller.save(&mut backend);
    assert_eq!(report.saved, vec![id]);
    assert_eq!(backend.calls, vec![("create", id)]);

    // Once saved it is an ordinary shape
    let handle = match controller.editor(id) {
        Some(ShapeEditor::Point(editor)) => editor.handle(),
        _ => unreachable!(),
    };
    drag(&mut controller, &mut map, handle, GeoPoint::new(2.0, 2.0));
    controller.save(&mut backend);
    assert_eq!(backend.calls.last(), Some(&("update", id)));
}

#[test]
fn test_cancel_discards_drawn_shapes() {
    let (mut controller, mut map) = setup();
    let id = controller.add_shape(line_geometry(), &mut map).unwrap();
    assert_eq!(controller.store().len(), 5);

    let reverted = controller.cancel(&mut map).unwrap();
    assert!(reverted.contains(&id));
    assert!(!controller.store().contains(id));
    assert!(controller.editor(id).is_none());
    assert_eq!(map.handle_count(), 13);
}

#[test]
fn test_removed_shape_deleted_on_save() {
    let (mut controller, mut map) = setup();
    controller.remove_shape(RECT, &mut map).unwrap();

    assert!(!controller.store().contains(RECT));
    assert!(controller.editor(RECT).is_none());
    assert_eq!(controller.pending_deletions(), vec![RECT]);
    assert_eq!(map.handles_of(Some(RECT)), Vec::<HandleRef>::new());

    let mut backend = RecordingBackend::default();
    let report = controller.save(&mut backend);
    assert_eq!(report.deleted, vec![RECT]);
    assert_eq!(backend.calls, vec![("delete", RECT)]);
    assert!(controller.pending_deletions().is_empty());
}

#[test]
fn test_failed_delete_stays_pending_and_cancel_restores() {
    let (mut controller, mut map) = setup();
    controller.remove_shape(RECT, &mut map).unwrap();

    let mut backend = RecordingBackend::failing(&[RECT]);
    let report = controller.save(&mut backend);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(controller.pending_deletions(), vec![RECT]);

    let reverted = controller.cancel(&mut map).unwrap();
    assert!(reverted.contains(&RECT));
    assert!(controller.store().contains(RECT));
    assert!(controller.editor(RECT).is_some());
    assert!(controller.pending_deletions().is_empty());
}

#[test]
fn test_cancel_restores_draw_order() {
    let (mut controller, mut map) = setup();
    controller.remove_shape(RECT, &mut map).unwrap();
    controller.remove_shape(LINE, &mut map).unwrap();
    controller
        .add_shape(
            Geometry::Point(PointShape::new(GeoPoint::new(0.0, 0.0))),
            &mut map,
        )
        .unwrap();
    assert_eq!(controller.store().ids(), &[MARKER, CIRCLE, ShapeId(5)]);

    controller.cancel(&mut map).unwrap();
    assert_eq!(controller.store().ids(), &[LINE, RECT, MARKER, CIRCLE]);
}

#[test]
fn test_failed_delete_keeps_draw_position() {
    let (mut controller, mut map) = setup();
    controller.remove_shape(MARKER, &mut map).unwrap();
    let mut backend = RecordingBackend::failing(&[MARKER]);
    controller.save(&mut backend);

    controller.cancel(&mut map).unwrap();
    assert_eq!(controller.store().ids(), &[LINE, RECT, MARKER, CIRCLE]);
}

#[test]
fn test_removing_drawn_shape_skips_persistence() {
    let (mut controller, mut map) = setup();
    let id = controller
        .add_shape(
            Geometry::Point(PointShape::new(GeoPoint::new(0.0, 0.0))),
            &mut map,
        )
        .unwrap();
    controller.remove_shape(id, &mut map).unwrap();
    assert!(controller.pending_deletions().is_empty());

    let mut backend = RecordingBackend::default();
    controller.save(&mut backend);
    assert!(backend.calls.is_empty());
}

#[test]
fn test_translate_line_shape() {
    let (mut controller, mut map) = setup();
    let events = controller
        .translate_shape(LINE, Point2D::new(1.0, 0.0), &mut map)
        .unwrap();

    assert_eq!(events, vec![EditEvent::Edited(LINE)]);
    assert_eq!(
        geometry(&controller, LINE),
        Geometry::Line(LineShape::polyline(vec![
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 11.0),
            GeoPoint::new(10.0, 11.0),
        ]))
    );
    assert_eq!(controller.backup(LINE), Some(&line_geometry()));
}

#[test]
fn test_translate_rejects_other_kinds() {
    let (mut controller, mut map) = setup();
    let err = controller
        .translate_shape(MARKER, Point2D::new(1.0, 0.0), &mut map)
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidShapeGeometry(GeometryError::KindMismatch {
            expected: ShapeKind::Polyline,
            actual: ShapeKind::Marker,
        })
    );
}

#[test]
fn test_unknown_ids_and_handles() {
    let (mut controller, mut map) = setup();
    assert_eq!(
        controller.remove_shape(ShapeId(99), &mut map),
        Err(Error::UnknownShape(ShapeId(99)))
    );
    assert_eq!(
        controller.on_handle_drag_start(HandleRef(999), &mut map),
        Err(Error::UnknownHandle(HandleRef(999)))
    );
}
