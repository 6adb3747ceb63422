//! Canvas rendering and per-frame input translation.
//!
//! Draw order is grid, then arrows, then shapes, then gesture previews, so
//! arrows always sit beneath the shapes they connect. Arrows whose endpoint
//! elements no longer exist are skipped rather than drawn or crashed on.

use super::state::{Gesture, SketchApp, Tool};
use crate::connection::{self, ArrowCurve};
use crate::constants::{GRID_SIZE, MIN_DRAW_SIZE, NEAR_THRESHOLD};
use crate::geometry;
use crate::types::{Element, ElementKind};
use eframe::egui;
use eframe::epaint::{CubicBezierShape, StrokeKind};

/// Accent used for selected elements.
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(249, 115, 22);
/// Accent used for connection snap feedback and endpoint markers.
const SNAP_COLOR: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
/// Accent used for in-progress draw previews.
const PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

/// Parses a `#RRGGBB` hex color, falling back to the default element blue.
pub(crate) fn parse_color(hex: &str) -> egui::Color32 {
    let digits = hex.trim_start_matches('#');
    if digits.len() == 6 {
        if let Ok(rgb) = u32::from_str_radix(digits, 16) {
            return egui::Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
        }
    }
    egui::Color32::from_rgb(0x3B, 0x82, 0xF6)
}

impl SketchApp {
    /// Screen rectangle of an element, offset by the canvas origin.
    pub(crate) fn element_screen_rect(&self, origin: egui::Vec2, element: &Element) -> egui::Rect {
        let min = self.canvas_to_screen(egui::pos2(element.x, element.y)) + origin;
        egui::Rect::from_min_size(
            min,
            egui::vec2(element.width, element.height) * self.canvas.viewport.scale,
        )
    }

    fn to_screen(&self, origin: egui::Vec2, canvas_pos: egui::Pos2) -> egui::Pos2 {
        self.canvas_to_screen(canvas_pos) + origin
    }

    /// Renders the canvas area and feeds pointer input to the state machine.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        let origin = canvas_rect.min.to_vec2();
        self.canvas_size = Some(canvas_rect.size());

        let background = if self.dark_mode {
            egui::Color32::from_gray(24)
        } else {
            egui::Color32::from_gray(245)
        };
        painter.rect_filled(canvas_rect, 0.0, background);

        self.handle_canvas_input(ui, &response, origin);

        if self.canvas.show_grid {
            self.draw_grid(&painter, canvas_rect, origin);
        }

        // Arrows render as a layer beneath shapes
        for element in self.sketch.elements() {
            if element.is_arrow() {
                self.draw_arrow_element(&painter, origin, element);
            }
        }
        for element in self.sketch.elements() {
            if !element.is_arrow() {
                self.draw_shape_element(&painter, origin, element);
            }
        }

        self.draw_gesture_preview(&painter, origin);

        if self.sketch.is_empty() && matches!(self.interaction.gesture, Gesture::Idle) {
            self.draw_empty_hint(&painter, canvas_rect);
        }

        self.draw_text_edit_overlay(ui, origin);
    }

    /// Translates egui input into state machine events.
    ///
    /// Gestures only start on presses over the canvas; moves and releases are
    /// processed regardless so drags that leave the canvas still finalize
    /// from the last known position.
    fn handle_canvas_input(&mut self, ui: &egui::Ui, response: &egui::Response, origin: egui::Vec2) {
        // Wheel zoom anchored at the hover position, only over the canvas
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 {
            if let Some(hover) = ui.input(|i| i.pointer.hover_pos()) {
                if response.rect.contains(hover) {
                    self.wheel_zoom(scroll_delta, hover - origin);
                }
            }
        }

        let (primary_pressed, middle_pressed, any_released, latest_pos, command) = ui.input(|i| {
            (
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_pressed(egui::PointerButton::Middle),
                i.pointer.any_released(),
                i.pointer.latest_pos(),
                i.modifiers.command,
            )
        });
        let local_pos = latest_pos.map(|p| p - origin);

        if response.double_clicked() {
            if let Some(pos) = local_pos {
                self.double_clicked(pos);
            }
            return;
        }

        if (primary_pressed || middle_pressed) && response.hovered() {
            if let Some(pos) = local_pos {
                // Clicks inside the active text editor belong to the editor,
                // not the canvas
                let inside_editor = self
                    .interaction
                    .editing_text
                    .and_then(|id| self.sketch.get(id))
                    .map(|e| self.element_screen_rect(egui::Vec2::ZERO, e).contains(pos))
                    .unwrap_or(false);
                if !inside_editor {
                    let button = if middle_pressed {
                        egui::PointerButton::Middle
                    } else {
                        egui::PointerButton::Primary
                    };
                    self.pointer_pressed(pos, button, command);
                }
            }
        }

        if let Some(pos) = local_pos {
            self.pointer_moved(pos);
        }
        if any_released {
            self.pointer_released(local_pos);
        }
    }

    /// Draws the background grid, skipping it when zoomed out so far that the
    /// lines would smear together.
    fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect, origin: egui::Vec2) {
        let scale = self.canvas.viewport.scale;
        if GRID_SIZE * scale < 2.0 {
            return;
        }

        let grid_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 28);
        let stroke = egui::Stroke::new(1.0, grid_color);

        let top_left = self.screen_to_canvas(canvas_rect.min - origin);
        let bottom_right = self.screen_to_canvas(canvas_rect.max - origin);

        let mut x = (top_left.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= bottom_right.x {
            let screen_x = self.to_screen(origin, egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += GRID_SIZE;
        }

        let mut y = (top_left.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= bottom_right.y {
            let screen_y = self.to_screen(origin, egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                stroke,
            );
            y += GRID_SIZE;
        }
    }

    /// Draws one arrow: resolved attachment points, straight or cubic stroke,
    /// head, and endpoint markers. Dangling arrows are skipped entirely.
    fn draw_arrow_element(&self, painter: &egui::Painter, origin: egui::Vec2, element: &Element) {
        let Some((start_el, end_el)) = connection::endpoints(element, &self.sketch) else {
            return;
        };

        let points = connection::resolve(start_el, end_el);
        let path = connection::build_path(points.start, points.end);
        let selected = self.interaction.selected_element == Some(element.id);
        let color = if selected {
            SELECTION_COLOR
        } else {
            parse_color(&element.color)
        };
        let stroke = egui::Stroke::new(2.0, color);

        match path.curve {
            ArrowCurve::Line { from, to } => {
                let shaft_end = connection::shorten_for_head(from, to);
                painter.line_segment(
                    [self.to_screen(origin, from), self.to_screen(origin, shaft_end)],
                    stroke,
                );
            }
            ArrowCurve::Cubic {
                from,
                control1,
                control2,
                to,
            } => {
                let bezier = [from, control1, control2, to].map(|p| self.to_screen(origin, p));
                painter.add(CubicBezierShape::from_points_stroke(
                    bezier,
                    false,
                    egui::Color32::TRANSPARENT,
                    stroke,
                ));
            }
        }

        if let Some(head) = connection::arrow_head(points.start, points.end) {
            painter.add(egui::Shape::convex_polygon(
                vec![
                    self.to_screen(origin, head.tip),
                    self.to_screen(origin, head.left_wing),
                    self.to_screen(origin, head.right_wing),
                ],
                color,
                egui::Stroke::NONE,
            ));
        }

        // Markers showing where the connector attaches
        painter.circle_filled(self.to_screen(origin, points.start), 3.0, SNAP_COLOR);
        painter.circle_filled(self.to_screen(origin, points.end), 3.0, SNAP_COLOR);
    }

    /// Draws one shape element with kind-specific styling, selection ring,
    /// snap highlight, and centered label.
    fn draw_shape_element(&self, painter: &egui::Painter, origin: egui::Vec2, element: &Element) {
        let rect = self.element_screen_rect(origin, element);
        let scale = self.canvas.viewport.scale;
        let color = parse_color(&element.color);
        let fill = color.gamma_multiply(0.2);
        let stroke = egui::Stroke::new(2.0, color);

        match element.kind {
            ElementKind::Rectangle | ElementKind::Task => {
                painter.rect_filled(rect, 6.0, fill);
                painter.rect_stroke(rect, 6.0, stroke, StrokeKind::Inside);
            }
            ElementKind::Start | ElementKind::End => {
                // Stadium: corner radius of half the height
                let radius = rect.height() / 2.0;
                painter.rect_filled(rect, radius, fill);
                painter.rect_stroke(rect, radius, stroke, StrokeKind::Inside);
            }
            ElementKind::Circle => {
                painter.add(eframe::epaint::EllipseShape {
                    center: rect.center(),
                    radius: rect.size() / 2.0,
                    fill,
                    stroke,
                });
            }
            ElementKind::Diamond | ElementKind::Decision => {
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        rect.center_top(),
                        rect.right_center(),
                        rect.center_bottom(),
                        rect.left_center(),
                    ],
                    fill,
                    stroke,
                ));
            }
            ElementKind::Subprocess => {
                painter.rect_filled(rect, 4.0, fill);
                painter.rect_stroke(rect, 4.0, stroke, StrokeKind::Inside);
                // Double side bars mark the collapsed subprocess
                let inset = 6.0 * scale;
                for x in [rect.min.x + inset, rect.max.x - inset] {
                    painter.line_segment(
                        [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                        egui::Stroke::new(1.5, color),
                    );
                }
            }
            ElementKind::Document => {
                painter.rect_filled(rect, 4.0, fill);
                painter.rect_stroke(rect, 4.0, stroke, StrokeKind::Inside);
                // Dog-ear in the top-right corner
                let fold = (10.0 * scale).min(rect.width() / 3.0);
                painter.line_segment(
                    [
                        egui::pos2(rect.max.x - fold, rect.min.y),
                        egui::pos2(rect.max.x, rect.min.y + fold),
                    ],
                    egui::Stroke::new(1.5, color),
                );
            }
            ElementKind::Annotation => {
                // Open bracket along the left edge, no fill
                let reach = (8.0 * scale).min(rect.width() / 2.0);
                let bracket = egui::Stroke::new(1.5, color);
                painter.line_segment([rect.left_top(), rect.left_bottom()], bracket);
                painter.line_segment(
                    [rect.left_top(), rect.left_top() + egui::vec2(reach, 0.0)],
                    bracket,
                );
                painter.line_segment(
                    [rect.left_bottom(), rect.left_bottom() + egui::vec2(reach, 0.0)],
                    bracket,
                );
            }
            ElementKind::Text => {
                // Label only; no frame
            }
            ElementKind::Image => {
                painter.rect_filled(rect, 2.0, fill.gamma_multiply(0.5));
                painter.rect_stroke(rect, 2.0, stroke, StrokeKind::Inside);
                painter.line_segment([rect.left_top(), rect.right_bottom()], egui::Stroke::new(1.0, color));
                painter.line_segment([rect.right_top(), rect.left_bottom()], egui::Stroke::new(1.0, color));
                if let Some(image_ref) = element.image_ref.as_deref() {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        image_ref,
                        egui::FontId::proportional((11.0 * scale).clamp(8.0, 24.0)),
                        color,
                    );
                }
            }
            ElementKind::Arrow => {}
        }

        if self.interaction.selected_element == Some(element.id) {
            painter.rect_stroke(
                rect.expand(3.0),
                6.0,
                egui::Stroke::new(2.0, SELECTION_COLOR),
                StrokeKind::Outside,
            );
        }
        if self.tool == Tool::Arrow && self.interaction.near_element == Some(element.id) {
            painter.rect_stroke(
                rect.expand(5.0),
                6.0,
                egui::Stroke::new(2.0, SNAP_COLOR),
                StrokeKind::Outside,
            );
        }

        self.draw_element_label(painter, element, rect);
    }

    /// Draws an element's label centered in its rect, wrapped to fit.
    fn draw_element_label(&self, painter: &egui::Painter, element: &Element, rect: egui::Rect) {
        // The text-edit overlay replaces the label while editing
        if self.interaction.editing_text == Some(element.id) {
            return;
        }
        let Some(label) = element.label.as_deref() else {
            return;
        };
        if label.is_empty() {
            return;
        }

        let scale = self.canvas.viewport.scale;
        let font = egui::FontId::proportional((13.0 * scale).clamp(8.0, 32.0));
        let text_color = if self.dark_mode {
            egui::Color32::from_gray(230)
        } else {
            egui::Color32::from_gray(30)
        };

        let wrap_width = (rect.width() - 8.0 * scale).max(8.0);
        let galley = painter.layout(label.to_string(), font, text_color, wrap_width);
        let pos = rect.center() - galley.size() / 2.0;
        painter.galley(pos, galley, text_color);
    }

    /// Draws the live preview for an in-progress draw gesture.
    fn draw_gesture_preview(&self, painter: &egui::Painter, origin: egui::Vec2) {
        match &self.interaction.gesture {
            Gesture::DrawingShape { start, current } => {
                let width = (current.x - start.x).abs();
                let height = (current.y - start.y).abs();
                if width < MIN_DRAW_SIZE && height < MIN_DRAW_SIZE {
                    return;
                }

                let min = egui::pos2(start.x.min(current.x), start.y.min(current.y));
                let rect = egui::Rect::from_min_size(
                    self.to_screen(origin, min),
                    egui::vec2(width, height) * self.canvas.viewport.scale,
                );
                let stroke = egui::Stroke::new(1.5, PREVIEW_COLOR);
                for [a, b] in [
                    [rect.left_top(), rect.right_top()],
                    [rect.right_top(), rect.right_bottom()],
                    [rect.right_bottom(), rect.left_bottom()],
                    [rect.left_bottom(), rect.left_top()],
                ] {
                    painter.extend(egui::Shape::dashed_line(&[a, b], stroke, 6.0, 4.0));
                }
            }
            Gesture::DrawingArrow { start, current } => {
                // Snap the preview to shape centers when close enough
                let elements = self.sketch.elements();
                let start_snap = geometry::find_near_element(*start, elements, NEAR_THRESHOLD);
                let end_snap = geometry::find_near_element(*current, elements, NEAR_THRESHOLD);
                let start_point = start_snap.map(geometry::center).unwrap_or(*start);
                let end_point = end_snap.map(geometry::center).unwrap_or(*current);

                let stroke = egui::Stroke::new(2.0, PREVIEW_COLOR);
                let shaft_end = connection::shorten_for_head(start_point, end_point);
                painter.line_segment(
                    [
                        self.to_screen(origin, start_point),
                        self.to_screen(origin, shaft_end),
                    ],
                    stroke,
                );
                if let Some(head) = connection::arrow_head(start_point, end_point) {
                    painter.add(egui::Shape::convex_polygon(
                        vec![
                            self.to_screen(origin, head.tip),
                            self.to_screen(origin, head.left_wing),
                            self.to_screen(origin, head.right_wing),
                        ],
                        PREVIEW_COLOR,
                        egui::Stroke::NONE,
                    ));
                }

                // Green markers confirm which shapes the arrow would attach to
                if start_snap.is_some() {
                    painter.circle_filled(self.to_screen(origin, start_point), 5.0, SNAP_COLOR);
                }
                if end_snap.is_some() {
                    painter.circle_filled(self.to_screen(origin, end_point), 5.0, SNAP_COLOR);
                }
            }
            _ => {}
        }
    }

    fn draw_empty_hint(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let text_color = if self.dark_mode {
            egui::Color32::from_gray(120)
        } else {
            egui::Color32::from_gray(140)
        };
        painter.text(
            canvas_rect.center(),
            egui::Align2::CENTER_CENTER,
            "Pick a shape tool and drag on the canvas to get started",
            egui::FontId::proportional(15.0),
            text_color,
        );
    }

    /// Places a single-line text editor over the element being renamed.
    fn draw_text_edit_overlay(&mut self, ui: &mut egui::Ui, origin: egui::Vec2) {
        let Some(id) = self.interaction.editing_text else {
            return;
        };
        let Some(rect) = self
            .sketch
            .get(id)
            .map(|e| self.element_screen_rect(origin, e))
        else {
            // The edited element vanished (undo, delete); drop the edit
            self.cancel_text_edit();
            return;
        };
        let edit_rect = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(rect.width().max(80.0), 22.0),
        );

        let response = ui.put(
            edit_rect,
            egui::TextEdit::singleline(&mut self.interaction.temp_text)
                .horizontal_align(egui::Align::Center),
        );

        if !self.interaction.focus_requested_for_edit {
            response.request_focus();
            self.interaction.focus_requested_for_edit = true;
        }

        if response.lost_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.cancel_text_edit();
            } else {
                // Enter and blur both commit
                self.commit_text_edit();
            }
        }
    }
}
