//! # SketchFlow
//!
//! A canvas editor for flowcharts and process diagrams: drag out shapes,
//! connect them with boundary-snapping arrows, edit labels in place, and
//! save the element list as JSON.
//!
//! ## Features
//! - Draw-to-create shapes (generic and semantic process kinds)
//! - Arrows that attach to facing shape edges and re-route as shapes move
//! - Click selection, drag repositioning, and double-click label editing
//! - Anchored wheel zoom, click-drag panning, and zoom-to-fit
//! - Snapshot-based undo/redo
//! - JSON save/load of the element list
//!
//! The geometry and interaction core lives in the public `types`,
//! `geometry`, `connection`, and `viewport` modules and has no UI
//! dependency beyond egui's math types, so collaborators (persistence,
//! alternative renderers) can consume it directly.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod connection;
pub mod constants;
pub mod geometry;
pub mod samples;
pub mod types;
pub mod viewport;

mod ui;

pub use ui::SketchApp;

/// Runs the sketch editor with default settings.
///
/// Initializes the egui application window and starts the main event loop.
/// A tokio runtime is entered first so the file-dialog futures spawned from
/// the UI have an executor.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use sketchflow::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start tokio runtime");
    let _guard = runtime.enter();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "SketchFlow",
        options,
        Box::new(|cc| Ok(Box::new(SketchApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use crate::types::{Element, ElementKind, Sketch};

    #[test]
    fn sketch_default_is_empty() {
        let sketch = Sketch::default();
        assert!(sketch.is_empty());
        assert_eq!(sketch.elements().len(), 0);
    }

    #[test]
    fn element_kinds_round_trip_through_json() {
        let element = Element::shape(ElementKind::Decision, 10.0, 20.0, 120.0, 90.0);
        let json = serde_json::to_string(&element).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }
}
