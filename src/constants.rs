//! Shared application-wide constants.
//! Centralizes tweakable values used across geometry, interaction, and rendering.

// Element defaults
/// Fallback shape width in canvas units when a draw gesture has zero horizontal extent.
pub const DEFAULT_SHAPE_WIDTH: f32 = 100.0;
/// Fallback shape height in canvas units when a draw gesture has zero vertical extent.
pub const DEFAULT_SHAPE_HEIGHT: f32 = 60.0;
/// Width of a freshly inserted image element.
pub const DEFAULT_IMAGE_WIDTH: f32 = 150.0;
/// Height of a freshly inserted image element.
pub const DEFAULT_IMAGE_HEIGHT: f32 = 100.0;
/// Default fill color for newly created elements.
pub const DEFAULT_ELEMENT_COLOR: &str = "#3B82F6";

// Canvas interactions
/// Minimum drag extent (canvas units, per axis) before a draw gesture produces a shape.
pub const MIN_DRAW_SIZE: f32 = 10.0;
/// Distance from a shape's center within which the arrow tool snaps to it.
pub const NEAR_THRESHOLD: f32 = 30.0;

// Arrow path geometry
/// Below this per-axis delta the path builder emits a straight segment instead of a curve.
pub const STRAIGHT_PATH_THRESHOLD: f32 = 20.0;
/// Fraction of the smaller axis delta used as the cubic control point offset.
pub const CURVE_CONTROL_FACTOR: f32 = 0.5;
/// Length of the triangular arrowhead along the shaft.
pub const ARROWHEAD_LENGTH: f32 = 12.0;
/// Half-width of the arrowhead base.
pub const ARROWHEAD_HALF_WIDTH: f32 = 6.0;

// Viewport
/// Smallest permitted zoom scale.
pub const MIN_SCALE: f32 = 0.1;
/// Largest permitted zoom scale.
pub const MAX_SCALE: f32 = 3.0;
/// Zoom increment for wheel and toolbar zoom steps.
pub const SCALE_STEP: f32 = 0.1;
/// Padding in screen pixels kept around content by zoom-to-fit.
pub const ZOOM_FIT_PADDING: f32 = 50.0;

// Grid/drawing
/// Grid cell size in canvas units.
pub const GRID_SIZE: f32 = 24.0;

// Undo/redo
/// Maximum number of undo history snapshots to retain.
pub const MAX_UNDO_HISTORY: usize = 100;
