//! Application state management structures.
//!
//! This module contains the state structures tracking the editor's current
//! UI state: the active tool, the viewport, the interaction gesture, file
//! operations, and the main `SketchApp` that ties them together.

use super::undo::UndoHistory;
use crate::types::{ElementId, ElementKind, Sketch};
use crate::viewport::Viewport;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Tools selectable from the toolbar.
///
/// `Select` manipulates existing elements, `Arrow` draws connectors, and the
/// remaining tools each draw one shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Click-select, drag to move
    Select,
    /// Draw a connector between two shapes
    Arrow,
    /// Draw a rectangle
    Rectangle,
    /// Draw a circle
    Circle,
    /// Draw a diamond
    Diamond,
    /// Place a text block
    Text,
    /// Draw a start terminator
    Start,
    /// Draw an end terminator
    End,
    /// Draw a task step
    Task,
    /// Draw a decision
    Decision,
    /// Draw a subprocess
    Subprocess,
    /// Draw a document shape
    Document,
    /// Draw an annotation
    Annotation,
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Select
    }
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: &'static [Tool] = &[
        Tool::Select,
        Tool::Arrow,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Diamond,
        Tool::Text,
        Tool::Start,
        Tool::End,
        Tool::Task,
        Tool::Decision,
        Tool::Subprocess,
        Tool::Document,
        Tool::Annotation,
    ];

    /// The shape kind this tool draws, or `None` for `Select` and `Arrow`.
    pub fn shape_kind(self) -> Option<ElementKind> {
        match self {
            Tool::Select | Tool::Arrow => None,
            Tool::Rectangle => Some(ElementKind::Rectangle),
            Tool::Circle => Some(ElementKind::Circle),
            Tool::Diamond => Some(ElementKind::Diamond),
            Tool::Text => Some(ElementKind::Text),
            Tool::Start => Some(ElementKind::Start),
            Tool::End => Some(ElementKind::End),
            Tool::Task => Some(ElementKind::Task),
            Tool::Decision => Some(ElementKind::Decision),
            Tool::Subprocess => Some(ElementKind::Subprocess),
            Tool::Document => Some(ElementKind::Document),
            Tool::Annotation => Some(ElementKind::Annotation),
        }
    }

    /// Toolbar button label.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Arrow => "Arrow",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Diamond => "Diamond",
            Tool::Text => "Text",
            Tool::Start => "Start",
            Tool::End => "End",
            Tool::Task => "Task",
            Tool::Decision => "Decision",
            Tool::Subprocess => "Subprocess",
            Tool::Document => "Document",
            Tool::Annotation => "Annotation",
        }
    }
}

/// The single active pointer gesture.
///
/// The state machine holds exactly one of these at a time; drawing, dragging,
/// and panning are mutually exclusive by construction. Text editing is
/// tracked separately on [`InteractionState`] since it is keyboard-driven and
/// coexists with selection.
#[derive(Debug, Clone)]
pub enum Gesture {
    /// No pointer gesture in progress
    Idle,
    /// A shape tool is being dragged out
    DrawingShape {
        /// Gesture start in canvas coordinates
        start: egui::Pos2,
        /// Latest pointer position in canvas coordinates
        current: egui::Pos2,
    },
    /// The arrow tool is being dragged between shapes
    DrawingArrow {
        /// Gesture start in canvas coordinates
        start: egui::Pos2,
        /// Latest pointer position in canvas coordinates
        current: egui::Pos2,
    },
    /// A selected element is being moved
    DraggingElement {
        /// The element being dragged
        id: ElementId,
        /// Pointer position at drag start, in screen coordinates
        pointer_start: egui::Pos2,
        /// The element's top-left at drag start
        element_start: egui::Pos2,
        /// Pre-drag document state, pushed to undo history if the drag moves
        baseline: Sketch,
    },
    /// The canvas is being panned
    Panning,
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

/// Canvas display state persisted across sessions.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Zoom/pan transform for the open document
    pub viewport: Viewport,
    /// Whether the background grid is drawn
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            show_grid: true,
        }
    }
}

/// Session-local state for user interaction with the canvas.
#[derive(Default)]
pub struct InteractionState {
    /// The one active pointer gesture
    pub gesture: Gesture,
    /// Currently selected element, if any
    pub selected_element: Option<ElementId>,
    /// Element whose label is being edited, if any; independent of selection
    pub editing_text: Option<ElementId>,
    /// Staging buffer for the label being edited
    pub temp_text: String,
    /// Whether focus was already requested for the current text edit
    pub focus_requested_for_edit: bool,
    /// Shape the arrow tool would currently snap to, for live feedback
    pub near_element: Option<ElementId>,
}

/// Represents a pending save operation type.
#[derive(Debug)]
pub enum PendingSaveOperation {
    /// Save with a new file path (show file picker)
    SaveAs,
    /// Save to the existing file path
    Save,
}

/// Represents a pending load operation type.
#[derive(Debug)]
pub enum PendingLoadOperation {
    /// Load from a file (show file picker)
    Load,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Save completed successfully with the given path
    SaveCompleted(String),
    /// Load completed successfully with path and content
    LoadCompleted(String, String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// State for file operations and unsaved-changes tracking.
pub struct FileState {
    /// Current file path for save/load operations
    pub current_path: Option<String>,
    /// Whether the document has mutations not yet written to disk
    pub has_unsaved_changes: bool,
    /// Save operation waiting to be dispatched
    pub pending_save_operation: Option<PendingSaveOperation>,
    /// Load operation waiting to be dispatched
    pub pending_load_operation: Option<PendingLoadOperation>,
    /// Channel for receiving file operation results from async contexts
    pub file_operation_sender: Sender<FileOperationResult>,
    /// Receiving end polled once per frame
    pub file_operation_receiver: Receiver<FileOperationResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_save_operation: None,
            pending_load_operation: None,
            file_operation_sender: sender,
            file_operation_receiver: receiver,
        }
    }
}

/// The main application: the open document plus all editor state.
///
/// Implements `eframe::App`. Only display preferences (viewport scale, grid,
/// theme) persist across restarts; document content lives in explicit files.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct SketchApp {
    /// The document being edited
    #[serde(skip)]
    pub sketch: Sketch,
    /// The active toolbar tool
    #[serde(skip)]
    pub tool: Tool,
    /// Canvas display state
    pub canvas: CanvasState,
    /// Pointer/selection/text-edit state
    #[serde(skip)]
    pub interaction: InteractionState,
    /// File operation state
    #[serde(skip)]
    pub file: FileState,
    /// Undo/redo history for the open document
    #[serde(skip)]
    pub undo_history: UndoHistory,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Size of the canvas area as of the last frame, for zoom-to-fit and
    /// centered inserts; `None` before the first frame
    #[serde(skip)]
    pub canvas_size: Option<egui::Vec2>,
    /// Counter salt for generated image placeholder names
    #[serde(skip)]
    pub image_counter: u32,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self {
            sketch: Sketch::new(),
            tool: Tool::Select,
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            file: FileState::default(),
            undo_history: UndoHistory::new(),
            dark_mode: true,
            canvas_size: None,
            image_counter: 0,
        }
    }
}

impl SketchApp {
    /// Restores persisted display preferences from eframe storage, if present.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(json) = storage.get_string("app_state") {
                match Self::from_json(&json) {
                    Ok(app) => return app,
                    Err(err) => log::warn!("discarding stored app state: {err}"),
                }
            }
        }
        Self::default()
    }

    /// Serializes the persistable app state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes app state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
