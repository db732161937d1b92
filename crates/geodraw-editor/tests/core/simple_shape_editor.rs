use geodraw_core::{
    shared, BoundsShape, CircleShape, GeoPoint, Geometry, PlanarProjection, PointShape, Projection,
    Shared, ShapeId, SphericalMercator,
};
use geodraw_editor::{EditEvent, HeadlessMap, PointEditor, ShapeModel, SimpleShapeEditor};

fn rectangle() -> Shared<ShapeModel> {
    shared(ShapeModel::new(
        ShapeId(7),
        Geometry::Bounds(BoundsShape::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 20.0),
        )),
    ))
}

fn circle(center: GeoPoint, radius: f64) -> Shared<ShapeModel> {
    shared(ShapeModel::new(
        ShapeId(8),
        Geometry::Circle(CircleShape::new(center, radius)),
    ))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_rectangle_handles_at_corners_and_center() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let editor = SimpleShapeEditor::attach(rectangle(), &mut map).unwrap();

    assert_eq!(map.handle_count(), 5);
    assert_eq!(
        map.handle(editor.move_handle()).unwrap().position,
        GeoPoint::new(5.0, 10.0)
    );
    let corners: Vec<GeoPoint> = editor
        .resize_handles()
        .iter()
        .map(|h| map.handle(*h).unwrap().position)
        .collect();
    assert_eq!(
        corners,
        vec![
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(0.0, 20.0),
            GeoPoint::new(0.0, 0.0),
        ]
    );
}

#[test]
fn test_corner_drag_anchors_opposite_corner() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = rectangle();
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let corners = editor.resize_handles().to_vec();
    let north_west = corners[0];

    let events = editor.on_drag_start(north_west, &mut map).unwrap();
    assert_eq!(events, vec![EditEvent::EditStart(ShapeId(7))]);
    assert_eq!(map.handle(north_west).unwrap().opacity, 1.0);
    for other in &corners[1..] {
        assert_eq!(map.handle(*other).unwrap().opacity, 0.0);
    }

    editor
        .on_drag(north_west, GeoPoint::new(12.0, -2.0), &mut map)
        .unwrap();
    let bounds = shape.borrow().bounds().unwrap();
    assert_eq!(bounds.north(), 12.0);
    assert_eq!(bounds.west(), -2.0);
    assert_eq!(bounds.south(), 0.0);
    assert_eq!(bounds.east(), 20.0);
    assert_eq!(
        map.handle(editor.move_handle()).unwrap().position,
        GeoPoint::new(6.0, 9.0)
    );
    assert!(!shape.borrow().is_edited());

    let events = editor.on_drag_end(north_west, &mut map).unwrap();
    assert_eq!(events, vec![EditEvent::Edited(ShapeId(7))]);
    assert!(shape.borrow().is_edited());
    for corner in &corners {
        assert_eq!(map.handle(*corner).unwrap().opacity, 1.0);
    }
    assert_eq!(
        map.handle(corners[2]).unwrap().position,
        GeoPoint::new(0.0, 20.0)
    );
}

#[test]
fn test_corner_dragged_past_anchor_flips_bounds() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = rectangle();
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let north_west = editor.resize_handles()[0];

    editor.on_drag_start(north_west, &mut map).unwrap();
    editor
        .on_drag(north_west, GeoPoint::new(-5.0, 30.0), &mut map)
        .unwrap();
    editor.on_drag_end(north_west, &mut map).unwrap();

    let bounds = shape.borrow().bounds().unwrap();
    assert_eq!(bounds.south_west(), GeoPoint::new(-5.0, 20.0));
    assert_eq!(bounds.north_east(), GeoPoint::new(0.0, 30.0));
}

#[test]
fn test_rectangle_move_preserves_size() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = rectangle();
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let handle = editor.move_handle();

    editor.on_drag_start(handle, &mut map).unwrap();
    editor
        .on_drag(handle, GeoPoint::new(7.0, 12.0), &mut map)
        .unwrap();
    editor.on_drag_end(handle, &mut map).unwrap();

    let bounds = shape.borrow().bounds().unwrap();
    assert_eq!(bounds.south_west(), GeoPoint::new(2.0, 2.0));
    assert_eq!(bounds.north_east(), GeoPoint::new(12.0, 22.0));
    assert_eq!(
        map.handle(editor.resize_handles()[0]).unwrap().position,
        GeoPoint::new(12.0, 2.0)
    );
}

#[test]
fn test_mercator_move_keeps_projected_size() {
    let mut map = HeadlessMap::new(SphericalMercator, 4.0);
    let shape = shared(ShapeModel::new(
        ShapeId(3),
        Geometry::Bounds(BoundsShape::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
        )),
    ));
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let size = |bounds: BoundsShape, map: &HeadlessMap<SphericalMercator>| {
        let sw = map.project(bounds.south_west(), 4.0);
        let ne = map.project(bounds.north_east(), 4.0);
        (ne.x - sw.x, sw.y - ne.y)
    };
    let before = size(shape.borrow().bounds().unwrap(), &map);

    let handle = editor.move_handle();
    editor
        .on_drag(handle, GeoPoint::new(60.0, 30.0), &mut map)
        .unwrap();

    let after = size(shape.borrow().bounds().unwrap(), &map);
    assert!((before.0 - after.0).abs() < 1e-6);
    assert!((before.1 - after.1).abs() < 1e-6);
    let center = shape.borrow().bounds().unwrap().center();
    assert!((center.lng - 30.0).abs() < 1e-6);
}

#[test]
fn test_circle_resize_handle_at_45_degrees() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let editor =
        SimpleShapeEditor::attach(circle(GeoPoint::new(0.0, 0.0), 10.0), &mut map).unwrap();

    assert_eq!(editor.resize_handles().len(), 1);
    let rim = map.handle(editor.resize_handles()[0]).unwrap().position;
    let offset = 10.0 * std::f64::consts::FRAC_PI_4.cos();
    assert!(close(rim.lat, offset));
    assert!(close(rim.lng, offset));
}

#[test]
fn test_circle_resize_sets_radius_to_distance() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = circle(GeoPoint::new(0.0, 0.0), 10.0);
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let rim = editor.resize_handles()[0];

    editor.on_drag_start(rim, &mut map).unwrap();
    editor.on_drag(rim, GeoPoint::new(0.0, 20.0), &mut map).unwrap();
    assert_eq!(shape.borrow().radius().unwrap(), 20.0);
    assert_eq!(
        map.handle(editor.move_handle()).unwrap().position,
        GeoPoint::new(0.0, 0.0)
    );

    editor.on_drag_end(rim, &mut map).unwrap();
    let position = map.handle(rim).unwrap().position;
    let offset = 20.0 * std::f64::consts::FRAC_PI_4.cos();
    assert!(close(position.lat, offset));
    assert!(close(position.lng, offset));
    assert!(shape.borrow().is_edited());
}

#[test]
fn test_circle_move_keeps_radius() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = circle(GeoPoint::new(0.0, 0.0), 10.0);
    let mut editor = SimpleShapeEditor::attach(shape.clone(), &mut map).unwrap();
    let handle = editor.move_handle();

    editor.on_drag(handle, GeoPoint::new(5.0, 5.0), &mut map).unwrap();
    assert_eq!(shape.borrow().center().unwrap(), GeoPoint::new(5.0, 5.0));
    assert_eq!(shape.borrow().radius().unwrap(), 10.0);

    let rim = map.handle(editor.resize_handles()[0]).unwrap().position;
    let offset = 10.0 * std::f64::consts::FRAC_PI_4.cos();
    assert!(close(rim.lat, 5.0 + offset));
    assert!(close(rim.lng, 5.0 + offset));
}

#[test]
fn test_mercator_circle_rim_handle_is_one_radius_out() {
    let mut map = HeadlessMap::new(SphericalMercator, 12.0);
    let center = GeoPoint::new(45.0, 7.0);
    let editor = SimpleShapeEditor::attach(circle(center, 500.0), &mut map).unwrap();

    let rim = map.handle(editor.resize_handles()[0]).unwrap().position;
    let distance = map.distance_meters(center, rim);
    assert!((distance - 500.0).abs() < 5.0, "rim at {} m", distance);
    assert!(rim.lat > center.lat && rim.lng > center.lng);
}

#[test]
fn test_detach_removes_handles() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let editor = SimpleShapeEditor::attach(rectangle(), &mut map).unwrap();
    editor.detach(&mut map);
    assert_eq!(map.handle_count(), 0);
}

#[test]
fn test_point_editor_drag() {
    let mut map = HeadlessMap::new(PlanarProjection, 0.0);
    let shape = shared(ShapeModel::new(
        ShapeId(9),
        Geometry::Point(PointShape::new(GeoPoint::new(1.0, 1.0))),
    ));
    let mut editor = PointEditor::attach(shape.clone(), &mut map).unwrap();
    let handle = editor.handle();

    assert_eq!(
        editor.on_drag_start(handle).unwrap(),
        vec![EditEvent::EditStart(ShapeId(9))]
    );
    editor.on_drag(handle, GeoPoint::new(2.0, 3.0), &mut map).unwrap();
    assert_eq!(
        editor.on_drag_end(handle).unwrap(),
        vec![EditEvent::Edited(ShapeId(9))]
    );
    assert_eq!(shape.borrow().position().unwrap(), GeoPoint::new(2.0, 3.0));
    assert_eq!(map.handle(handle).unwrap().position, GeoPoint::new(2.0, 3.0));
    assert!(shape.borrow().is_edited());
}
