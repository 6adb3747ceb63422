//! File operations for saving and loading sketches.
//!
//! Dialogs run asynchronously (on the tokio runtime natively, as spawned
//! futures on wasm) and report back over the app's mpsc channel, which is
//! drained once per frame. The persisted format is the plain element list
//! from `Sketch::to_json`, i.e. the collaborator contract.

use super::state::{FileOperationResult, PendingLoadOperation, PendingSaveOperation, SketchApp};
use crate::types::Sketch;
use eframe::egui;

#[cfg(not(target_arch = "wasm32"))]
fn spawn_io<F>(future: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future);
}

#[cfg(target_arch = "wasm32")]
fn spawn_io<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

impl SketchApp {
    /// Processes completed file operations and dispatches pending ones.
    ///
    /// Called once per frame. Failures are logged and never interrupt the
    /// frame; a failed load leaves the current document untouched.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.file.file_operation_receiver.try_recv() {
            match result {
                FileOperationResult::SaveCompleted(path) => {
                    log::info!("sketch saved to {path}");
                    self.file.current_path = Some(path);
                    self.file.has_unsaved_changes = false;
                }
                FileOperationResult::LoadCompleted(path, content) => {
                    match Sketch::from_json(&content) {
                        Ok(sketch) => {
                            log::info!("sketch loaded from {path}");
                            self.install_sketch(sketch, Some(path));
                        }
                        Err(err) => log::error!("failed to parse {path}: {err}"),
                    }
                }
                FileOperationResult::OperationFailed(err) => {
                    log::warn!("file operation failed: {err}");
                }
            }
        }

        if let Some(save_op) = self.file.pending_save_operation.take() {
            let json = match self.sketch.to_json() {
                Ok(json) => json,
                Err(err) => {
                    log::error!("failed to serialize sketch: {err}");
                    return;
                }
            };

            match save_op {
                PendingSaveOperation::Save => match self.file.current_path.clone() {
                    Some(path) => self.dispatch_save_to(path, json, ctx.clone()),
                    None => self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs),
                },
                PendingSaveOperation::SaveAs => self.dispatch_save_as(json, ctx.clone()),
            }
        }

        if let Some(PendingLoadOperation::Load) = self.file.pending_load_operation.take() {
            let sender = self.file.file_operation_sender.clone();
            let ctx = ctx.clone();
            spawn_io(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    #[cfg(not(target_arch = "wasm32"))]
                    let path = handle.path().display().to_string();
                    #[cfg(target_arch = "wasm32")]
                    let path = handle.file_name();

                    let result = match String::from_utf8(handle.read().await) {
                        Ok(content) => FileOperationResult::LoadCompleted(path, content),
                        Err(_) => {
                            FileOperationResult::OperationFailed(format!("{path} is not valid UTF-8"))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    /// Writes the serialized sketch to an already-known path.
    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch_save_to(&self, path: String, json: String, ctx: egui::Context) {
        let sender = self.file.file_operation_sender.clone();
        spawn_io(async move {
            let result = match std::fs::write(&path, json) {
                Ok(()) => FileOperationResult::SaveCompleted(path),
                Err(err) => {
                    FileOperationResult::OperationFailed(format!("failed to save {path}: {err}"))
                }
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Saving to a remembered path needs a real filesystem; browsers get a
    /// logged failure instead of a crash.
    #[cfg(target_arch = "wasm32")]
    fn dispatch_save_to(&self, _path: String, _json: String, ctx: egui::Context) {
        let _ = self
            .file
            .file_operation_sender
            .send(FileOperationResult::OperationFailed(
                "saving is not supported in the browser build".to_string(),
            ));
        ctx.request_repaint();
    }

    /// Opens a save dialog and writes the serialized sketch to the chosen path.
    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch_save_as(&self, json: String, ctx: egui::Context) {
        let sender = self.file.file_operation_sender.clone();
        spawn_io(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name("sketch.json")
                .save_file()
                .await
            {
                let path = handle.path().display().to_string();
                let result = match std::fs::write(handle.path(), json) {
                    Ok(()) => FileOperationResult::SaveCompleted(path),
                    Err(err) => {
                        FileOperationResult::OperationFailed(format!("failed to save {path}: {err}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn dispatch_save_as(&self, _json: String, ctx: egui::Context) {
        let _ = self
            .file
            .file_operation_sender
            .send(FileOperationResult::OperationFailed(
                "saving is not supported in the browser build".to_string(),
            ));
        ctx.request_repaint();
    }

    /// Saves to the current file path, or falls back to "Save As".
    pub fn save_sketch(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_save_operation = Some(PendingSaveOperation::Save);
        } else {
            self.save_sketch_as();
        }
    }

    /// Opens a file dialog to save the sketch under a new name.
    pub fn save_sketch_as(&mut self) {
        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
    }

    /// Opens a file dialog to load a sketch from disk.
    pub fn load_sketch(&mut self) {
        self.file.pending_load_operation = Some(PendingLoadOperation::Load);
    }

    /// Starts a new empty sketch, resetting document-scoped state and the
    /// viewport.
    pub fn new_sketch(&mut self) {
        self.install_sketch(Sketch::new(), None);
        self.canvas.viewport.reset();
    }
}
