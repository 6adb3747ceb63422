//! Core data types for the canvas editor.
//!
//! This module defines the single element record used for everything drawn on
//! the canvas (shapes and arrows) and the `Sketch` store that owns the ordered
//! element collection. The serialized form of an element is the contract any
//! persistence collaborator must round-trip losslessly.

use crate::constants::{
    DEFAULT_ELEMENT_COLOR, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_SHAPE_HEIGHT,
    DEFAULT_SHAPE_WIDTH,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas elements.
pub type ElementId = Uuid;

/// The closed set of element variants that can appear on the canvas.
///
/// Generic shapes and semantic process shapes share the same geometry fields;
/// `Arrow` is the one non-shape variant and is positioned purely by the two
/// element ids it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Plain rectangle
    Rectangle,
    /// Ellipse drawn inside its bounding box
    Circle,
    /// Diamond (rhombus) drawn inside its bounding box
    Diamond,
    /// Free-standing text block
    Text,
    /// Embedded image placeholder, positioned like a shape
    Image,
    /// Process start terminator
    Start,
    /// Process end terminator
    End,
    /// Process task step
    Task,
    /// Decision branch
    Decision,
    /// Collapsed subprocess
    Subprocess,
    /// Document artifact
    Document,
    /// Side annotation
    Annotation,
    /// Connector between two referenced elements
    Arrow,
}

impl ElementKind {
    /// Returns the default display label for a freshly created element of this kind.
    ///
    /// Arrows and images carry no label by default.
    pub fn default_label(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Circle => "Circle",
            ElementKind::Diamond => "Diamond",
            ElementKind::Text => "Text",
            ElementKind::Image => "",
            ElementKind::Start => "Start",
            ElementKind::End => "End",
            ElementKind::Task => "Task",
            ElementKind::Decision => "Decision",
            ElementKind::Subprocess => "Subprocess",
            ElementKind::Document => "Document",
            ElementKind::Annotation => "Annotation",
            ElementKind::Arrow => "",
        }
    }

    /// Returns `true` for the `Arrow` variant.
    pub fn is_arrow(self) -> bool {
        matches!(self, ElementKind::Arrow)
    }
}

/// A single drawable element: either a shape with geometry or an arrow
/// referencing two other elements by id.
///
/// The serialized form uses camelCase field names and lowercase kind tags:
/// `{ id, kind, x, y, width, height, label?, color, startElementId?,
/// endElementId?, imageRef? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier; never reused within a document session
    pub id: ElementId,
    /// Which variant this element is
    pub kind: ElementKind,
    /// Top-left x in canvas (unscaled, unpanned) coordinates; meaningless for arrows
    pub x: f32,
    /// Top-left y in canvas coordinates; meaningless for arrows
    pub y: f32,
    /// Width in canvas units; meaningless for arrows
    pub width: f32,
    /// Height in canvas units; meaningless for arrows
    pub height: f32,
    /// Optional display text, mutated only through the text-edit flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Display color as a hex string
    pub color: String,
    /// For arrows, the id of the element the arrow starts at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_element_id: Option<ElementId>,
    /// For arrows, the id of the element the arrow ends at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_element_id: Option<ElementId>,
    /// For images, an opaque reference to the image resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Element {
    /// Creates a new shape element with a fresh id and kind-derived defaults.
    ///
    /// A zero extent on either axis falls back to the default shape size, so
    /// degenerate draw gestures still produce a visible element.
    ///
    /// # Arguments
    ///
    /// * `kind` - The shape variant (not `Arrow`; arrows use [`Element::arrow`])
    /// * `x`, `y` - Top-left corner in canvas coordinates
    /// * `width`, `height` - Drawn extent; `0.0` selects the default size
    pub fn shape(kind: ElementKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        let label = kind.default_label();
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width: if width == 0.0 { DEFAULT_SHAPE_WIDTH } else { width },
            height: if height == 0.0 { DEFAULT_SHAPE_HEIGHT } else { height },
            label: (!label.is_empty()).then(|| label.to_string()),
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            start_element_id: None,
            end_element_id: None,
            image_ref: None,
        }
    }

    /// Creates a new arrow element connecting two existing elements by id.
    ///
    /// The referenced coordinates are recomputed from the endpoints on every
    /// render, so the arrow itself carries no geometry.
    pub fn arrow(start_element_id: ElementId, end_element_id: ElementId) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Arrow,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            label: None,
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            start_element_id: Some(start_element_id),
            end_element_id: Some(end_element_id),
            image_ref: None,
        }
    }

    /// Creates a new image element at the given position with the default image size.
    ///
    /// # Arguments
    ///
    /// * `image_ref` - Opaque reference to the image resource (a URL or asset key)
    /// * `x`, `y` - Top-left corner in canvas coordinates
    pub fn image(image_ref: String, x: f32, y: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Image,
            x,
            y,
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
            label: None,
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            start_element_id: None,
            end_element_id: None,
            image_ref: Some(image_ref),
        }
    }

    /// Returns `true` if this element is an arrow.
    pub fn is_arrow(&self) -> bool {
        self.kind.is_arrow()
    }
}

/// The in-memory element store for one open document.
///
/// Elements are kept in insertion order, which doubles as z-order: later
/// elements draw on top of earlier ones (arrows are layered separately by the
/// renderer). Serializes transparently as the plain element list, matching the
/// collaborator contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sketch {
    elements: Vec<Element>,
}

impl Sketch {
    /// Creates a new empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the element list to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a sketch from a JSON element list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Looks up an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Number of elements in the sketch.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the sketch holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends an element to the collection.
    ///
    /// Id uniqueness is the creator's responsibility; the constructors on
    /// [`Element`] generate collision-free v4 ids.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Moves an element to a new top-left position, clamped to non-negative
    /// coordinates on both axes. The canvas is unbounded above.
    ///
    /// # Returns
    ///
    /// `true` if the element exists and its position was updated.
    pub fn update_position(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.x = x.max(0.0);
                element.y = y.max(0.0);
                true
            }
            None => false,
        }
    }

    /// Sets an element's display label.
    ///
    /// Arrows carry no label; attempting to label one (or a missing id) is a
    /// no-op.
    ///
    /// # Returns
    ///
    /// `true` if the label was applied.
    pub fn set_label(&mut self, id: ElementId, label: String) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) if !element.is_arrow() => {
                element.label = Some(label);
                true
            }
            _ => false,
        }
    }

    /// Removes an element by id.
    ///
    /// Arrows referencing the removed element are NOT cascade-deleted; they
    /// remain in the collection with a dangling endpoint id, and consumers of
    /// the element list skip them (see `connection::endpoints`).
    ///
    /// # Returns
    ///
    /// `true` if an element was removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        self.elements.len() != before
    }

    /// Replaces the entire element collection with a loaded snapshot.
    ///
    /// Existing state is discarded, never merged.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Consumes the sketch, yielding its element list.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}
