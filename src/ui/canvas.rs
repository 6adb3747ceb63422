//! Canvas interaction: the pointer/keyboard state machine.
//!
//! All handlers take positions in canvas-local screen coordinates (relative
//! to the canvas rect) and convert through the viewport as needed. One
//! gesture is active at a time; degenerate pointer sequences never panic and
//! at worst produce no state change. The handlers are plain methods so the
//! whole state machine is exercised headless by `ui::tests`.

use super::state::{Gesture, SketchApp, Tool};
use crate::connection;
use crate::constants::{MIN_DRAW_SIZE, NEAR_THRESHOLD};
use crate::geometry;
use crate::types::{Element, Sketch};
use eframe::egui;

impl SketchApp {
    /// Converts a canvas-local screen position to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        self.canvas.viewport.screen_to_canvas(screen_pos)
    }

    /// Converts a canvas position to canvas-local screen coordinates.
    pub fn canvas_to_screen(&self, canvas_pos: egui::Pos2) -> egui::Pos2 {
        self.canvas.viewport.canvas_to_screen(canvas_pos)
    }

    /// Records the pre-mutation document state for undo.
    fn snapshot_for_undo(&mut self) {
        self.undo_history.push_snapshot(self.sketch.clone());
    }

    fn mark_dirty(&mut self) {
        self.file.has_unsaved_changes = true;
    }

    /// Handles a pointer press on the canvas.
    ///
    /// Middle button, or primary with the command modifier, starts a pan.
    /// Otherwise the active tool decides: `Select` updates the selection (and
    /// starts a drag when pressing an already-selected shape), `Arrow` begins
    /// an arrow draw with snap feedback, and shape tools begin a shape draw.
    /// Presses while a gesture is already active are ignored.
    ///
    /// # Arguments
    ///
    /// * `screen_pos` - Press position in canvas-local screen coordinates
    /// * `button` - Which pointer button went down
    /// * `command_held` - Whether the platform command/ctrl modifier was held
    pub fn pointer_pressed(
        &mut self,
        screen_pos: egui::Pos2,
        button: egui::PointerButton,
        command_held: bool,
    ) {
        // A press outside the text editor acts as blur: commit the staged text
        if self.interaction.editing_text.is_some() {
            self.commit_text_edit();
        }

        if !matches!(self.interaction.gesture, Gesture::Idle) {
            return;
        }

        let wants_pan = button == egui::PointerButton::Middle
            || (button == egui::PointerButton::Primary && command_held);
        if wants_pan {
            self.canvas.viewport.start_pan(screen_pos);
            self.interaction.gesture = Gesture::Panning;
            return;
        }

        if button != egui::PointerButton::Primary {
            return;
        }

        let canvas_pos = self.screen_to_canvas(screen_pos);
        match self.tool {
            Tool::Select => {
                match geometry::find_clicked_element(canvas_pos, self.sketch.elements()) {
                    Some(element) => {
                        let id = element.id;
                        let element_start = egui::pos2(element.x, element.y);
                        let already_selected = self.interaction.selected_element == Some(id);
                        if already_selected && !element.is_arrow() {
                            self.interaction.gesture = Gesture::DraggingElement {
                                id,
                                pointer_start: screen_pos,
                                element_start,
                                baseline: self.sketch.clone(),
                            };
                        } else {
                            self.interaction.selected_element = Some(id);
                        }
                    }
                    None => self.interaction.selected_element = None,
                }
            }
            Tool::Arrow => {
                self.interaction.near_element =
                    geometry::find_near_element(canvas_pos, self.sketch.elements(), NEAR_THRESHOLD)
                        .map(|e| e.id);
                self.interaction.gesture = Gesture::DrawingArrow {
                    start: canvas_pos,
                    current: canvas_pos,
                };
            }
            _ => {
                self.interaction.gesture = Gesture::DrawingShape {
                    start: canvas_pos,
                    current: canvas_pos,
                };
            }
        }
    }

    /// Handles pointer movement while a gesture may be active.
    ///
    /// Updates the live position of draw gestures (re-resolving arrow snap
    /// feedback), applies drag deltas to the dragged element, and feeds pans.
    /// Movement with no active gesture does nothing.
    pub fn pointer_moved(&mut self, screen_pos: egui::Pos2) {
        let canvas_pos = self.screen_to_canvas(screen_pos);
        match &mut self.interaction.gesture {
            Gesture::Idle => {}
            Gesture::Panning => self.canvas.viewport.update_pan(screen_pos),
            Gesture::DrawingShape { current, .. } => *current = canvas_pos,
            Gesture::DrawingArrow { current, .. } => {
                *current = canvas_pos;
                self.interaction.near_element =
                    geometry::find_near_element(canvas_pos, self.sketch.elements(), NEAR_THRESHOLD)
                        .map(|e| e.id);
            }
            Gesture::DraggingElement {
                id,
                pointer_start,
                element_start,
                ..
            } => {
                // Cumulative screen-space delta applied to the start-of-drag
                // position; deliberately not divided by the zoom scale
                let id = *id;
                let target = *element_start + (screen_pos - *pointer_start);
                self.sketch.update_position(id, target.x, target.y);
            }
        }
    }

    /// Handles pointer release, finalizing the active gesture.
    ///
    /// `screen_pos` is `None` when the release happened with no known pointer
    /// position (e.g. outside the window); draw gestures then finalize from
    /// their last tracked position instead of being lost.
    pub fn pointer_released(&mut self, screen_pos: Option<egui::Pos2>) {
        let gesture = std::mem::take(&mut self.interaction.gesture);
        match gesture {
            Gesture::Idle => {}
            Gesture::Panning => self.canvas.viewport.end_pan(),
            Gesture::DrawingShape { start, current } => {
                let end = screen_pos
                    .map(|p| self.screen_to_canvas(p))
                    .unwrap_or(current);
                self.finish_shape_draw(start, end);
            }
            Gesture::DrawingArrow { start, current } => {
                let end = screen_pos
                    .map(|p| self.screen_to_canvas(p))
                    .unwrap_or(current);
                self.finish_arrow_draw(start, end);
                self.interaction.near_element = None;
            }
            Gesture::DraggingElement {
                id,
                element_start,
                baseline,
                ..
            } => {
                let moved = self
                    .sketch
                    .get(id)
                    .is_some_and(|e| egui::pos2(e.x, e.y) != element_start);
                if moved {
                    self.undo_history.push_snapshot(baseline);
                    self.mark_dirty();
                }
            }
        }
    }

    /// Finalizes a shape draw gesture.
    ///
    /// The drawn box must exceed the minimum size on at least one axis;
    /// anything smaller is interaction noise and is discarded. The created
    /// shape is normalized to a top-left origin regardless of drag direction.
    /// Either way the select tool becomes active again.
    fn finish_shape_draw(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let width = (end.x - start.x).abs();
        let height = (end.y - start.y).abs();

        if width > MIN_DRAW_SIZE || height > MIN_DRAW_SIZE {
            if let Some(kind) = self.tool.shape_kind() {
                self.snapshot_for_undo();
                self.sketch.add(Element::shape(
                    kind,
                    start.x.min(end.x),
                    start.y.min(end.y),
                    width,
                    height,
                ));
                self.mark_dirty();
            }
        }

        self.tool = Tool::Select;
    }

    /// Finalizes an arrow draw gesture.
    ///
    /// Both endpoints must resolve to distinct shapes and the connection must
    /// pass validation (no duplicates, no immediate reverse loop); otherwise
    /// the gesture is silently discarded. The arrow tool stays active so
    /// several connectors can be drawn in a row.
    fn finish_arrow_draw(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let start_id =
            geometry::find_near_element(start, self.sketch.elements(), NEAR_THRESHOLD).map(|e| e.id);
        let end_id =
            geometry::find_near_element(end, self.sketch.elements(), NEAR_THRESHOLD).map(|e| e.id);

        if let (Some(start_id), Some(end_id)) = (start_id, end_id) {
            if connection::validate(start_id, end_id, self.sketch.elements()) {
                self.snapshot_for_undo();
                self.sketch.add(Element::arrow(start_id, end_id));
                self.mark_dirty();
            }
        }
    }

    /// Handles a double-click: starts a text edit on a non-arrow element.
    ///
    /// The current label is staged into the edit buffer; the selection is
    /// left untouched.
    pub fn double_clicked(&mut self, screen_pos: egui::Pos2) {
        let canvas_pos = self.screen_to_canvas(screen_pos);
        if let Some(element) = geometry::find_clicked_element(canvas_pos, self.sketch.elements()) {
            if !element.is_arrow() {
                self.interaction.temp_text = element.label.clone().unwrap_or_default();
                self.interaction.editing_text = Some(element.id);
                self.interaction.focus_requested_for_edit = false;
            }
        }
    }

    /// Commits the staged text buffer as the edited element's label.
    ///
    /// A commit with no active edit, or one whose text equals the current
    /// label, changes nothing.
    pub fn commit_text_edit(&mut self) {
        let Some(id) = self.interaction.editing_text.take() else {
            return;
        };
        let text = std::mem::take(&mut self.interaction.temp_text);
        self.interaction.focus_requested_for_edit = false;

        let changed = self
            .sketch
            .get(id)
            .is_some_and(|e| e.label.as_deref().unwrap_or_default() != text);
        if changed {
            self.snapshot_for_undo();
            if self.sketch.set_label(id, text) {
                self.mark_dirty();
            }
        }
    }

    /// Discards the staged text buffer without mutating the element.
    pub fn cancel_text_edit(&mut self) {
        self.interaction.editing_text = None;
        self.interaction.temp_text.clear();
        self.interaction.focus_requested_for_edit = false;
    }

    /// Deletes the selected element.
    ///
    /// Arrows referencing a deleted shape are left in place with dangling
    /// ids; rendering skips them (see `connection::endpoints`).
    pub fn delete_selected(&mut self) {
        let Some(id) = self.interaction.selected_element.take() else {
            return;
        };
        if self.sketch.get(id).is_some() {
            self.snapshot_for_undo();
            self.sketch.remove(id);
            if self.interaction.editing_text == Some(id) {
                self.cancel_text_edit();
            }
            self.mark_dirty();
        }
    }

    /// Inserts an image placeholder element at the given canvas position and
    /// selects it, switching back to the select tool.
    pub fn insert_image_at(&mut self, image_ref: String, canvas_pos: egui::Pos2) {
        self.snapshot_for_undo();
        let id = self.sketch.add(Element::image(
            image_ref,
            canvas_pos.x.max(0.0),
            canvas_pos.y.max(0.0),
        ));
        self.interaction.selected_element = Some(id);
        self.tool = Tool::Select;
        self.mark_dirty();
    }

    /// Applies a wheel-zoom step anchored at the cursor.
    pub fn wheel_zoom(&mut self, scroll_delta: f32, anchor: egui::Pos2) {
        self.canvas.viewport.wheel_zoom(scroll_delta, anchor);
    }

    /// Restores the previous document snapshot, if any.
    pub fn perform_undo(&mut self) {
        if let Some(snapshot) = self.undo_history.undo(self.sketch.clone()) {
            self.sketch = snapshot;
            self.after_history_restore();
        }
    }

    /// Re-applies the most recently undone snapshot, if any.
    pub fn perform_redo(&mut self) {
        if let Some(snapshot) = self.undo_history.redo(self.sketch.clone()) {
            self.sketch = snapshot;
            self.after_history_restore();
        }
    }

    /// Clears interaction state that may reference elements not present in a
    /// freshly restored snapshot.
    fn after_history_restore(&mut self) {
        self.interaction.gesture = Gesture::Idle;
        self.interaction.selected_element = None;
        self.interaction.near_element = None;
        self.cancel_text_edit();
        self.mark_dirty();
    }

    /// Installs a loaded document, replacing all session state tied to the
    /// previous one.
    pub fn install_sketch(&mut self, sketch: Sketch, path: Option<String>) {
        self.sketch.replace_all(sketch.into_elements());
        self.file.current_path = path;
        self.file.has_unsaved_changes = false;
        self.undo_history.clear();
        self.interaction = Default::default();
        self.tool = Tool::Select;
    }
}
