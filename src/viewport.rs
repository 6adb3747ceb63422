//! Viewport transform between screen and canvas coordinates.
//!
//! The viewport is a scale plus translation. All pointer input is mapped
//! through it before reaching the interaction layer, and all rendering maps
//! back through it. Wheel zoom is anchor-preserving: the canvas point under
//! the cursor stays under the cursor across a zoom step.

use crate::constants::{MAX_SCALE, MIN_SCALE, SCALE_STEP, ZOOM_FIT_PADDING};
use crate::types::Element;
use egui::{vec2, Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Screen position and offset captured when a pan gesture starts.
#[derive(Debug, Clone, Copy)]
struct PanAnchor {
    pointer: Pos2,
    offset: Vec2,
}

/// Zoom/pan state for one open document.
///
/// The zoom scale survives restarts through eframe persistence; the pan
/// offset and any in-flight pan gesture are session-local.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Current pan offset in screen pixels
    #[serde(skip)]
    pub offset: Vec2,
    /// Current zoom scale (1.0 = 100%), clamped to `[MIN_SCALE, MAX_SCALE]`
    pub scale: f32,
    #[serde(skip)]
    pan_anchor: Option<PanAnchor>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            pan_anchor: None,
        }
    }
}

impl Viewport {
    /// Converts a screen position to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        (screen - self.offset) / self.scale
    }

    /// Converts a canvas position to screen coordinates.
    pub fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        canvas * self.scale + self.offset
    }

    /// Increments the zoom scale by one step, clamped to the maximum.
    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + SCALE_STEP).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Decrements the zoom scale by one step, clamped to the minimum.
    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - SCALE_STEP).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Applies one wheel-zoom step anchored at the cursor.
    ///
    /// A positive `scroll_delta` zooms in. The offset is re-solved so that the
    /// canvas point under `anchor` maps to the same screen position before and
    /// after the scale change. A wheel event at the scale limit changes
    /// nothing, including the offset.
    ///
    /// # Arguments
    ///
    /// * `scroll_delta` - Signed scroll amount from the wheel event
    /// * `anchor` - Cursor position in screen coordinates
    pub fn wheel_zoom(&mut self, scroll_delta: f32, anchor: Pos2) {
        if scroll_delta == 0.0 {
            return;
        }

        let step = if scroll_delta > 0.0 { SCALE_STEP } else { -SCALE_STEP };
        let new_scale = (self.scale + step).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }

        // Keep the canvas point under the cursor fixed across the rescale
        let ratio = new_scale / self.scale;
        self.offset = anchor.to_vec2() - (anchor.to_vec2() - self.offset) * ratio;
        self.scale = new_scale;
    }

    /// Begins a pan gesture at the given screen position.
    pub fn start_pan(&mut self, pointer: Pos2) {
        self.pan_anchor = Some(PanAnchor {
            pointer,
            offset: self.offset,
        });
    }

    /// Updates an active pan with the current pointer position.
    ///
    /// The offset tracks the total drag delta from the pan start; calling this
    /// without an active pan is a no-op.
    pub fn update_pan(&mut self, pointer: Pos2) {
        if let Some(anchor) = self.pan_anchor {
            self.offset = anchor.offset + (pointer - anchor.pointer);
        }
    }

    /// Ends the active pan gesture, if any.
    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Returns `true` while a pan gesture is active.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Resets to the identity transform (no pan, 100% zoom).
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Fits all non-arrow elements into the given viewport size and centers
    /// them.
    ///
    /// The fitted scale never exceeds 1.0 (fit never zooms in past 100%) and
    /// never drops below the minimum scale. An empty element list resets the
    /// viewport instead.
    ///
    /// # Arguments
    ///
    /// * `elements` - The element collection to bound
    /// * `viewport_size` - Available screen area in pixels
    pub fn zoom_to_fit(&mut self, elements: &[Element], viewport_size: Vec2) {
        let shapes: Vec<&Element> = elements.iter().filter(|e| !e.is_arrow()).collect();
        if shapes.is_empty() {
            self.reset();
            return;
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for element in shapes {
            min_x = min_x.min(element.x);
            min_y = min_y.min(element.y);
            max_x = max_x.max(element.x + element.width);
            max_y = max_y.max(element.y + element.height);
        }

        let content_width = max_x - min_x;
        let content_height = max_y - min_y;

        let scale_x = (viewport_size.x - ZOOM_FIT_PADDING * 2.0) / content_width;
        let scale_y = (viewport_size.y - ZOOM_FIT_PADDING * 2.0) / content_height;
        let scale = scale_x.min(scale_y).min(1.0).max(MIN_SCALE);

        let centered_x = (viewport_size.x - content_width * scale) / 2.0;
        let centered_y = (viewport_size.y - content_height * scale) / 2.0;

        self.offset = vec2(centered_x - min_x * scale, centered_y - min_y * scale);
        self.scale = scale;
    }
}
