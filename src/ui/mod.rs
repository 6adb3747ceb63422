//! User interface components and application shell for the sketch editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main SketchApp
//! - `canvas` - The pointer/keyboard interaction state machine
//! - `rendering` - Drawing grid, arrows, shapes, previews, and overlays
//! - `file_ops` - Async save/load through file dialogs
//! - `undo` - Snapshot-based undo/redo history

mod canvas;
mod file_ops;
mod rendering;
mod state;
mod undo;

#[cfg(test)]
mod tests;

pub use state::SketchApp;

use self::rendering::parse_color;
use self::state::Tool;
use crate::samples::{all_samples, build_sample, SampleKind};
use crate::types::ElementKind;
use eframe::egui;

impl eframe::App for SketchApp {
    /// Persist display preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.handle_undo_redo_keys(ctx);
        self.handle_delete_key(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(230.0)
            .show(ctx, |ui| {
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl SketchApp {
    /// Handles Ctrl/Cmd+Z and Ctrl/Cmd+Y / Ctrl/Cmd+Shift+Z.
    ///
    /// Disabled while a text edit is active so the shortcuts don't fight the
    /// text field.
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        if self.interaction.editing_text.is_some() {
            return;
        }

        let (undo, redo) = ctx.input(|i| {
            let z = i.key_pressed(egui::Key::Z);
            let y = i.key_pressed(egui::Key::Y);
            (
                i.modifiers.command && !i.modifiers.shift && z,
                i.modifiers.command && (y || (i.modifiers.shift && z)),
            )
        });

        if undo {
            self.perform_undo();
        } else if redo {
            self.perform_redo();
        }
    }

    /// Handles Delete/Backspace for removing the selected element.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if self.interaction.editing_text.is_some() {
            return;
        }

        let delete = ctx.input(|i| {
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
        });
        if delete {
            self.delete_selected();
        }
    }

    fn load_sample(&mut self, kind: SampleKind) {
        self.install_sketch(build_sample(kind), None);
        self.canvas.viewport.reset();
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            // File operations
            if ui.button("New").clicked() {
                self.new_sketch();
            }
            if ui.button("Open").clicked() {
                self.load_sketch();
            }
            if ui.button("Save").clicked() {
                self.save_sketch();
            }
            if ui.button("Save As").clicked() {
                self.save_sketch_as();
            }
            if self.file.has_unsaved_changes {
                ui.weak("● unsaved");
            }

            ui.separator();

            ui.add_enabled_ui(self.undo_history.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.undo_history.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });

            ui.separator();

            // Tool palette
            for &tool in Tool::ALL {
                if ui
                    .selectable_label(self.tool == tool, tool.label())
                    .clicked()
                {
                    self.tool = tool;
                }
            }
            if ui.button("Image").clicked() {
                self.insert_image_placeholder();
            }

            ui.separator();

            // Zoom controls
            if ui.button("−").clicked() {
                self.canvas.viewport.zoom_out();
            }
            ui.label(format!("{:.0}%", self.canvas.viewport.scale * 100.0));
            if ui.button("+").clicked() {
                self.canvas.viewport.zoom_in();
            }
            if ui.button("Fit").clicked() {
                if let Some(size) = self.canvas_size {
                    self.canvas
                        .viewport
                        .zoom_to_fit(self.sketch.elements(), size);
                }
            }
            if ui.button("100%").clicked() {
                self.canvas.viewport.reset();
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid, "Grid");
            ui.checkbox(&mut self.dark_mode, "Dark");

            ui.separator();

            ui.menu_button("Samples", |ui| {
                for info in all_samples() {
                    if ui.button(info.name).clicked() {
                        self.load_sample(info.kind);
                    }
                }
            });
        });
    }

    /// Inserts an image placeholder at the center of the visible canvas.
    ///
    /// Without known canvas bounds (before the first frame) this is a no-op.
    fn insert_image_placeholder(&mut self) {
        let Some(size) = self.canvas_size else {
            return;
        };
        self.image_counter += 1;
        let center = self.screen_to_canvas((size / 2.0).to_pos2());
        let image_ref = format!("image-{}", self.image_counter);
        self.insert_image_at(image_ref, center);
    }

    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.separator();

        let selected = self
            .interaction
            .selected_element
            .and_then(|id| self.sketch.get(id))
            .cloned();

        let Some(element) = selected else {
            ui.weak("Select an element to inspect it.");
            return;
        };

        ui.label(format!("Kind: {}", kind_name(element.kind)));

        if element.is_arrow() {
            let describe = |id: Option<crate::types::ElementId>| {
                id.and_then(|id| self.sketch.get(id))
                    .map(|e| {
                        e.label
                            .clone()
                            .unwrap_or_else(|| kind_name(e.kind).to_string())
                    })
                    .unwrap_or_else(|| "(missing)".to_string())
            };
            ui.label(format!(
                "Connects: {} → {}",
                describe(element.start_element_id),
                describe(element.end_element_id)
            ));
        } else {
            ui.label(format!("Position: ({:.0}, {:.0})", element.x, element.y));
            ui.label(format!(
                "Size: {:.0} × {:.0}",
                element.width, element.height
            ));
            if let Some(label) = &element.label {
                ui.label(format!("Label: {label}"));
            }
            if let Some(image_ref) = &element.image_ref {
                ui.label(format!("Image: {image_ref}"));
            }
            ui.weak("Double-click the shape to edit its label.");
        }

        ui.horizontal(|ui| {
            ui.label("Color:");
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, parse_color(&element.color));
            ui.monospace(element.color.as_str());
        });

        ui.separator();

        if ui.button("Delete").clicked() {
            self.delete_selected();
        }
        if ui.button("Deselect").clicked() {
            self.interaction.selected_element = None;
        }
    }
}

fn kind_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Rectangle => "Rectangle",
        ElementKind::Circle => "Circle",
        ElementKind::Diamond => "Diamond",
        ElementKind::Text => "Text",
        ElementKind::Image => "Image",
        ElementKind::Start => "Start",
        ElementKind::End => "End",
        ElementKind::Task => "Task",
        ElementKind::Decision => "Decision",
        ElementKind::Subprocess => "Subprocess",
        ElementKind::Document => "Document",
        ElementKind::Annotation => "Annotation",
        ElementKind::Arrow => "Arrow",
    }
}
