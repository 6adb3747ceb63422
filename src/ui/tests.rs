//! Integration-style tests driving the interaction state machine headless.
//!
//! These exercise the same handler methods the egui layer calls, using plain
//! pointer coordinates, so gesture semantics are covered without spinning up
//! a UI context.

use super::state::{Gesture, SketchApp, Tool};
use crate::connection;
use crate::constants::{DEFAULT_SHAPE_WIDTH, NEAR_THRESHOLD};
use crate::samples::{build_sample, SampleKind};
use crate::types::{Element, ElementId, ElementKind};
use eframe::egui::{pos2, vec2, PointerButton, Pos2};

fn drag(app: &mut SketchApp, from: Pos2, to: Pos2) {
    app.pointer_pressed(from, PointerButton::Primary, false);
    app.pointer_moved(to);
    app.pointer_released(Some(to));
}

/// Adds a 100x60 task shape whose top-left is at (x, y).
fn add_shape(app: &mut SketchApp, x: f32, y: f32) -> ElementId {
    app.sketch
        .add(Element::shape(ElementKind::Task, x, y, 100.0, 60.0))
}

fn arrow_count(app: &SketchApp) -> usize {
    app.sketch.elements().iter().filter(|e| e.is_arrow()).count()
}

#[test]
fn drawing_a_rectangle_creates_normalized_element() {
    let mut app = SketchApp::default();
    app.tool = Tool::Rectangle;

    drag(&mut app, pos2(100.0, 100.0), pos2(250.0, 180.0));

    assert_eq!(app.sketch.len(), 1);
    let element = &app.sketch.elements()[0];
    assert_eq!(element.kind, ElementKind::Rectangle);
    assert_eq!((element.x, element.y), (100.0, 100.0));
    assert_eq!((element.width, element.height), (150.0, 80.0));
    assert_eq!(element.label.as_deref(), Some("Rectangle"));

    // Finishing a draw re-selects the select tool
    assert_eq!(app.tool, Tool::Select);
    assert!(app.file.has_unsaved_changes);
}

#[test]
fn tiny_drags_create_nothing() {
    let mut app = SketchApp::default();
    app.tool = Tool::Task;
    drag(&mut app, pos2(100.0, 100.0), pos2(108.0, 106.0));
    assert!(app.sketch.is_empty());

    // The threshold is exclusive: exactly 10 units is still too small
    app.tool = Tool::Task;
    drag(&mut app, pos2(100.0, 100.0), pos2(110.0, 110.0));
    assert!(app.sketch.is_empty());
    assert_eq!(app.tool, Tool::Select);
    assert!(!app.file.has_unsaved_changes);
}

#[test]
fn zero_extent_axis_falls_back_to_default_size() {
    let mut app = SketchApp::default();
    app.tool = Tool::Circle;

    // Purely vertical drag: width 0 becomes the default width
    drag(&mut app, pos2(100.0, 100.0), pos2(100.0, 150.0));

    assert_eq!(app.sketch.len(), 1);
    let element = &app.sketch.elements()[0];
    assert_eq!(element.width, DEFAULT_SHAPE_WIDTH);
    assert_eq!(element.height, 50.0);
}

#[test]
fn drawing_backwards_normalizes_top_left() {
    let mut app = SketchApp::default();
    app.tool = Tool::Diamond;

    drag(&mut app, pos2(250.0, 180.0), pos2(100.0, 100.0));

    let element = &app.sketch.elements()[0];
    assert_eq!((element.x, element.y), (100.0, 100.0));
    assert_eq!((element.width, element.height), (150.0, 80.0));
}

#[test]
fn arrow_tool_connects_two_near_shapes() {
    let mut app = SketchApp::default();
    // Centers at (100, 100) and (400, 100)
    let a = add_shape(&mut app, 50.0, 70.0);
    let b = add_shape(&mut app, 350.0, 70.0);

    app.tool = Tool::Arrow;
    // Start and end a little off-center but within the snap threshold
    drag(&mut app, pos2(95.0, 108.0), pos2(405.0, 94.0));

    assert_eq!(arrow_count(&app), 1);
    let arrow = app.sketch.elements().last().unwrap();
    assert_eq!(arrow.start_element_id, Some(a));
    assert_eq!(arrow.end_element_id, Some(b));

    // The arrow tool stays active for drawing several connectors in a row
    assert_eq!(app.tool, Tool::Arrow);
    assert!(app.interaction.near_element.is_none());
}

#[test]
fn arrow_requires_two_distinct_resolved_shapes() {
    let mut app = SketchApp::default();
    add_shape(&mut app, 50.0, 70.0);

    // Start and end over the same shape
    app.tool = Tool::Arrow;
    drag(&mut app, pos2(95.0, 95.0), pos2(105.0, 105.0));
    assert_eq!(arrow_count(&app), 0);

    // End point resolves to nothing
    app.tool = Tool::Arrow;
    drag(&mut app, pos2(100.0, 100.0), pos2(800.0, 800.0));
    assert_eq!(arrow_count(&app), 0);

    // Start point beyond the snap threshold resolves to nothing
    app.tool = Tool::Arrow;
    let off = pos2(100.0 + NEAR_THRESHOLD, 100.0);
    drag(&mut app, off, pos2(100.0, 100.0));
    assert_eq!(arrow_count(&app), 0);
}

#[test]
fn duplicate_and_reverse_arrows_are_rejected() {
    let mut app = SketchApp::default();
    add_shape(&mut app, 50.0, 70.0);
    add_shape(&mut app, 350.0, 70.0);

    app.tool = Tool::Arrow;
    drag(&mut app, pos2(100.0, 100.0), pos2(400.0, 100.0));
    assert_eq!(arrow_count(&app), 1);

    drag(&mut app, pos2(100.0, 100.0), pos2(400.0, 100.0));
    assert_eq!(arrow_count(&app), 1, "duplicate arrow must be discarded");

    drag(&mut app, pos2(400.0, 100.0), pos2(100.0, 100.0));
    assert_eq!(arrow_count(&app), 1, "reverse arrow must be discarded");
}

#[test]
fn clicking_selects_and_empty_click_clears() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 50.0, 70.0);

    app.pointer_pressed(pos2(60.0, 80.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(60.0, 80.0)));
    assert_eq!(app.interaction.selected_element, Some(id));

    app.pointer_pressed(pos2(500.0, 500.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(500.0, 500.0)));
    assert_eq!(app.interaction.selected_element, None);
}

#[test]
fn click_selection_prefers_earlier_overlapping_element() {
    let mut app = SketchApp::default();
    let below = add_shape(&mut app, 50.0, 50.0);
    let _above = add_shape(&mut app, 100.0, 80.0);

    // The overlap region selects the earlier element in collection order
    app.pointer_pressed(pos2(120.0, 95.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(120.0, 95.0)));
    assert_eq!(app.interaction.selected_element, Some(below));
}

#[test]
fn pressing_selected_shape_starts_drag() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 100.0, 100.0);

    // First press selects
    app.pointer_pressed(pos2(120.0, 120.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(120.0, 120.0)));

    // Second press on the selected shape drags it
    app.pointer_pressed(pos2(120.0, 120.0), PointerButton::Primary, false);
    assert!(matches!(
        app.interaction.gesture,
        Gesture::DraggingElement { .. }
    ));
    app.pointer_moved(pos2(150.0, 110.0));
    app.pointer_released(Some(pos2(150.0, 110.0)));

    let element = app.sketch.get(id).unwrap();
    assert_eq!((element.x, element.y), (130.0, 90.0));
    assert!(app.undo_history.can_undo());

    app.perform_undo();
    let element = app.sketch.get(id).unwrap();
    assert_eq!((element.x, element.y), (100.0, 100.0));
}

#[test]
fn drag_delta_is_screen_space_even_when_zoomed() {
    let mut app = SketchApp::default();
    app.canvas.viewport.scale = 2.0;
    let id = add_shape(&mut app, 100.0, 100.0);

    // Canvas point (105, 105) sits at screen (210, 210)
    app.pointer_pressed(pos2(210.0, 210.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(210.0, 210.0)));
    assert_eq!(app.interaction.selected_element, Some(id));

    app.pointer_pressed(pos2(210.0, 210.0), PointerButton::Primary, false);
    app.pointer_moved(pos2(230.0, 210.0));
    app.pointer_released(Some(pos2(230.0, 210.0)));

    // 20 screen pixels move the element 20 canvas units regardless of zoom
    let element = app.sketch.get(id).unwrap();
    assert_eq!(element.x, 120.0);
}

#[test]
fn drag_clamps_position_to_non_negative() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 5.0, 5.0);

    app.pointer_pressed(pos2(10.0, 10.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(10.0, 10.0)));
    app.pointer_pressed(pos2(10.0, 10.0), PointerButton::Primary, false);
    app.pointer_moved(pos2(-200.0, -200.0));
    app.pointer_released(Some(pos2(-200.0, -200.0)));

    let element = app.sketch.get(id).unwrap();
    assert_eq!((element.x, element.y), (0.0, 0.0));
}

#[test]
fn undragged_press_records_no_history() {
    let mut app = SketchApp::default();
    add_shape(&mut app, 100.0, 100.0);

    app.pointer_pressed(pos2(120.0, 120.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(120.0, 120.0)));
    app.pointer_pressed(pos2(120.0, 120.0), PointerButton::Primary, false);
    app.pointer_released(Some(pos2(120.0, 120.0)));

    assert!(!app.undo_history.can_undo());
}

#[test]
fn modifier_click_pans_instead_of_selecting() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 100.0, 100.0);

    app.pointer_pressed(pos2(120.0, 120.0), PointerButton::Primary, true);
    assert!(matches!(app.interaction.gesture, Gesture::Panning));
    app.pointer_moved(pos2(150.0, 100.0));
    assert_eq!(app.canvas.viewport.offset, vec2(30.0, -20.0));

    app.pointer_released(Some(pos2(150.0, 100.0)));
    assert!(matches!(app.interaction.gesture, Gesture::Idle));
    assert!(!app.canvas.viewport.is_panning());

    // Panning selected nothing and moved nothing
    assert_eq!(app.interaction.selected_element, None);
    let element = app.sketch.get(id).unwrap();
    assert_eq!((element.x, element.y), (100.0, 100.0));
}

#[test]
fn middle_button_pans_and_blocks_other_gestures() {
    let mut app = SketchApp::default();
    app.tool = Tool::Rectangle;

    app.pointer_pressed(pos2(50.0, 50.0), PointerButton::Middle, false);
    assert!(matches!(app.interaction.gesture, Gesture::Panning));

    // A second press while panning is ignored: one gesture at a time
    app.pointer_pressed(pos2(60.0, 60.0), PointerButton::Primary, false);
    assert!(matches!(app.interaction.gesture, Gesture::Panning));

    app.pointer_released(Some(pos2(90.0, 90.0)));
    assert!(app.sketch.is_empty());
}

#[test]
fn double_click_edits_label_and_enter_commits() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 100.0, 100.0);

    app.double_clicked(pos2(120.0, 120.0));
    assert_eq!(app.interaction.editing_text, Some(id));
    assert_eq!(app.interaction.temp_text, "Task");

    app.interaction.temp_text = "Approve request".to_string();
    app.commit_text_edit();

    assert_eq!(app.interaction.editing_text, None);
    assert_eq!(
        app.sketch.get(id).unwrap().label.as_deref(),
        Some("Approve request")
    );
    assert!(app.file.has_unsaved_changes);

    // Escape discards the staged buffer without touching the label
    app.double_clicked(pos2(120.0, 120.0));
    app.interaction.temp_text = "discarded".to_string();
    app.cancel_text_edit();
    assert_eq!(
        app.sketch.get(id).unwrap().label.as_deref(),
        Some("Approve request")
    );
}

#[test]
fn double_click_on_arrow_does_not_edit() {
    let mut app = SketchApp::default();
    let a = add_shape(&mut app, 0.0, 0.0);
    let b = add_shape(&mut app, 300.0, 0.0);
    app.sketch.add(Element::arrow(a, b));

    // Probe a point on no shape; the arrow's zero-size box lives at the origin
    app.double_clicked(pos2(0.0, 0.0));
    // (0,0) is inside shape `a`, so editing starts there instead of the arrow
    assert_eq!(app.interaction.editing_text, Some(a));
    app.cancel_text_edit();

    // Remove the shapes so only the arrow remains, then double-click it
    app.sketch.remove(a);
    app.sketch.remove(b);
    app.double_clicked(pos2(0.0, 0.0));
    assert_eq!(app.interaction.editing_text, None);
}

#[test]
fn starting_text_edit_preserves_selection() {
    let mut app = SketchApp::default();
    let a = add_shape(&mut app, 0.0, 0.0);
    let b = add_shape(&mut app, 300.0, 0.0);

    app.interaction.selected_element = Some(b);
    app.double_clicked(pos2(20.0, 20.0));

    assert_eq!(app.interaction.editing_text, Some(a));
    assert_eq!(app.interaction.selected_element, Some(b));
}

#[test]
fn committing_unchanged_text_records_no_history() {
    let mut app = SketchApp::default();
    add_shape(&mut app, 100.0, 100.0);

    app.double_clicked(pos2(120.0, 120.0));
    app.commit_text_edit();
    assert!(!app.undo_history.can_undo());
}

#[test]
fn deleting_a_shape_leaves_its_arrow_dangling() {
    let mut app = SketchApp::default();
    let a = add_shape(&mut app, 50.0, 70.0);
    let b = add_shape(&mut app, 350.0, 70.0);
    let arrow_id = app.sketch.add(Element::arrow(a, b));

    app.interaction.selected_element = Some(a);
    app.delete_selected();

    assert!(app.sketch.get(a).is_none());
    // The arrow survives; a defensive renderer skips it via `endpoints`
    let arrow = app.sketch.get(arrow_id).expect("arrow must remain");
    assert!(connection::endpoints(arrow, &app.sketch).is_none());

    // Undo restores the shape and the arrow resolves again
    app.perform_undo();
    let arrow = app.sketch.get(arrow_id).unwrap();
    assert!(connection::endpoints(arrow, &app.sketch).is_some());
}

#[test]
fn undo_and_redo_replay_created_elements() {
    let mut app = SketchApp::default();
    app.tool = Tool::Start;
    drag(&mut app, pos2(100.0, 100.0), pos2(200.0, 160.0));
    assert_eq!(app.sketch.len(), 1);

    app.perform_undo();
    assert!(app.sketch.is_empty());

    app.perform_redo();
    assert_eq!(app.sketch.len(), 1);
    assert_eq!(app.sketch.elements()[0].kind, ElementKind::Start);
}

#[test]
fn release_without_position_uses_last_tracked_point() {
    let mut app = SketchApp::default();
    app.tool = Tool::Rectangle;

    // The pointer leaves the window before release; the gesture still
    // finalizes from the last known position
    app.pointer_pressed(pos2(100.0, 100.0), PointerButton::Primary, false);
    app.pointer_moved(pos2(250.0, 180.0));
    app.pointer_released(None);

    assert_eq!(app.sketch.len(), 1);
    let element = &app.sketch.elements()[0];
    assert_eq!((element.width, element.height), (150.0, 80.0));
}

#[test]
fn insert_image_selects_and_returns_to_select_tool() {
    let mut app = SketchApp::default();
    app.tool = Tool::Arrow;

    app.insert_image_at("image-1".to_string(), pos2(60.0, 40.0));

    assert_eq!(app.sketch.len(), 1);
    let element = &app.sketch.elements()[0];
    assert_eq!(element.kind, ElementKind::Image);
    assert_eq!(element.image_ref.as_deref(), Some("image-1"));
    assert_eq!(app.interaction.selected_element, Some(element.id));
    assert_eq!(app.tool, Tool::Select);
}

#[test]
fn install_sketch_resets_session_state() {
    let mut app = SketchApp::default();
    let id = add_shape(&mut app, 0.0, 0.0);
    app.interaction.selected_element = Some(id);
    app.undo_history.push_snapshot(app.sketch.clone());
    app.file.has_unsaved_changes = true;

    let loaded = build_sample(SampleKind::OrderProcess);
    let expected = loaded.clone();
    app.install_sketch(loaded, Some("samples/order.json".to_string()));

    assert_eq!(app.sketch, expected);
    assert_eq!(app.interaction.selected_element, None);
    assert!(!app.undo_history.can_undo());
    assert!(!app.file.has_unsaved_changes);
    assert_eq!(app.file.current_path.as_deref(), Some("samples/order.json"));
    assert_eq!(app.tool, Tool::Select);
}
