//! Connection point resolution and arrow path construction.
//!
//! Given two shapes, [`resolve`] picks the pair of boundary attachment points
//! that face each other based on which axis dominates the center-to-center
//! delta. [`build_path`] turns an attachment pair into either a straight
//! segment or a cubic curve, and the arrowhead helpers supply the triangular
//! head and the shortened shaft that keeps the stroke from overlapping it.
//!
//! None of these functions panic on degenerate geometry; identical points
//! produce a zero-length path and no arrowhead.

use crate::constants::{
    ARROWHEAD_LENGTH, CURVE_CONTROL_FACTOR, STRAIGHT_PATH_THRESHOLD,
};
use crate::geometry::{center, distance};
use crate::types::{Element, ElementId, Sketch};
use egui::{pos2, Pos2};

/// The resolved pair of boundary attachment points for one arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoints {
    /// Attachment point on the start shape's boundary
    pub start: Pos2,
    /// Attachment point on the end shape's boundary
    pub end: Pos2,
}

/// Determines the optimal pair of attachment points between two shapes.
///
/// The center-to-center delta decides the layout: when `|dx| > |dy|` the
/// connection is horizontal and attaches at the vertical mid-height of each
/// shape's facing left/right edge; otherwise (ties included) it is vertical
/// and attaches at the horizontal mid-width of the facing top/bottom edges.
/// This yields boundary-to-boundary connectors without any obstacle-aware
/// routing.
pub fn resolve(start_shape: &Element, end_shape: &Element) -> ConnectionPoints {
    let start_center = center(start_shape);
    let end_center = center(end_shape);

    let dx = end_center.x - start_center.x;
    let dy = end_center.y - start_center.y;

    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            // Left to right
            ConnectionPoints {
                start: pos2(start_shape.x + start_shape.width, start_center.y),
                end: pos2(end_shape.x, end_center.y),
            }
        } else {
            // Right to left
            ConnectionPoints {
                start: pos2(start_shape.x, start_center.y),
                end: pos2(end_shape.x + end_shape.width, end_center.y),
            }
        }
    } else if dy > 0.0 {
        // Top to bottom
        ConnectionPoints {
            start: pos2(start_center.x, start_shape.y + start_shape.height),
            end: pos2(end_center.x, end_shape.y),
        }
    } else {
        // Bottom to top
        ConnectionPoints {
            start: pos2(start_center.x, start_shape.y),
            end: pos2(end_center.x, end_shape.y + end_shape.height),
        }
    }
}

/// The geometric form of an arrow's stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowCurve {
    /// A single straight segment
    Line {
        /// Segment start
        from: Pos2,
        /// Segment end
        to: Pos2,
    },
    /// A cubic curve with two control points
    Cubic {
        /// Curve start
        from: Pos2,
        /// First control point, offset from the start along the dominant axis
        control1: Pos2,
        /// Second control point, offset from the end along the dominant axis
        control2: Pos2,
        /// Curve end
        to: Pos2,
    },
}

/// An arrow stroke together with its straight chord length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPath {
    /// The stroke to draw
    pub curve: ArrowCurve,
    /// Straight-line distance between the endpoints (also reported for curves)
    pub length: f32,
}

/// Builds the visual path between two attachment points.
///
/// Near-axis-aligned pairs (either delta under 20 units) get a straight
/// segment. Everything else gets a cubic curve whose control points are offset
/// from each endpoint along the dominant axis by half the smaller delta,
/// producing a smooth bend instead of a diagonal.
///
/// Identical endpoints are valid and produce a zero-length straight path.
pub fn build_path(start: Pos2, end: Pos2) -> ArrowPath {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();

    if dx.abs() < STRAIGHT_PATH_THRESHOLD || dy.abs() < STRAIGHT_PATH_THRESHOLD {
        return ArrowPath {
            curve: ArrowCurve::Line { from: start, to: end },
            length,
        };
    }

    let control_offset = dx.abs().min(dy.abs()) * CURVE_CONTROL_FACTOR;

    let (control1, control2) = if dx.abs() > dy.abs() {
        // Horizontal bend: push both control points toward the other endpoint on x
        (
            pos2(start.x + control_offset.copysign(dx), start.y),
            pos2(end.x - control_offset.copysign(dx), end.y),
        )
    } else {
        // Vertical bend
        (
            pos2(start.x, start.y + control_offset.copysign(dy)),
            pos2(end.x, end.y - control_offset.copysign(dy)),
        )
    };

    ArrowPath {
        curve: ArrowCurve::Cubic {
            from: start,
            control1,
            control2,
            to: end,
        },
        length,
    }
}

/// The three corners of a triangular arrowhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Apex of the head, at the arrow's end point
    pub tip: Pos2,
    /// Base corner on one side of the shaft
    pub left_wing: Pos2,
    /// Base corner on the other side of the shaft
    pub right_wing: Pos2,
}

/// Computes the arrowhead triangle for an arrow ending at `end`.
///
/// The head is oriented along the straight start-to-end angle; for curved
/// paths this is an approximation of the true tangent, not a defect. Returns
/// `None` for zero-length arrows, which render without a head.
pub fn arrow_head(start: Pos2, end: Pos2) -> Option<ArrowHead> {
    if start == end {
        return None;
    }

    let angle = (end.y - start.y).atan2(end.x - start.x);
    let spread = std::f32::consts::FRAC_PI_6;

    let wing = |theta: f32| {
        pos2(
            end.x - theta.cos() * ARROWHEAD_LENGTH,
            end.y - theta.sin() * ARROWHEAD_LENGTH,
        )
    };

    Some(ArrowHead {
        tip: end,
        left_wing: wing(angle - spread),
        right_wing: wing(angle + spread),
    })
}

/// Pulls the shaft's end point back by the arrowhead length so the stroke
/// stops at the base of the head.
///
/// Shafts shorter than the head collapse to the start point rather than
/// extending backwards.
pub fn shorten_for_head(start: Pos2, end: Pos2) -> Pos2 {
    let length = distance(start, end);
    if length == 0.0 {
        return end;
    }

    let adjusted = (length - ARROWHEAD_LENGTH).max(0.0);
    let direction = (end - start) / length;
    start + direction * adjusted
}

/// Checks whether a new arrow from `start_id` to `end_id` is permitted.
///
/// Self-connections, duplicates of an existing arrow, and immediate reverse
/// connections (which would form a two-element loop) are rejected.
pub fn validate(start_id: ElementId, end_id: ElementId, elements: &[Element]) -> bool {
    if start_id == end_id {
        return false;
    }

    let connects = |element: &Element, from: ElementId, to: ElementId| {
        element.is_arrow()
            && element.start_element_id == Some(from)
            && element.end_element_id == Some(to)
    };

    if elements.iter().any(|e| connects(e, start_id, end_id)) {
        return false;
    }

    !elements.iter().any(|e| connects(e, end_id, start_id))
}

/// Resolves an arrow's endpoint elements from the sketch.
///
/// Returns `None` when the element is not an arrow or when either referenced
/// element no longer exists (the store does not cascade deletes, so dangling
/// arrows are expected); callers skip such arrows instead of failing.
pub fn endpoints<'a>(arrow: &Element, sketch: &'a Sketch) -> Option<(&'a Element, &'a Element)> {
    if !arrow.is_arrow() {
        return None;
    }
    let start = sketch.get(arrow.start_element_id?)?;
    let end = sketch.get(arrow.end_element_id?)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    fn shape(x: f32, y: f32) -> Element {
        Element::shape(ElementKind::Task, x, y, 100.0, 60.0)
    }

    #[test]
    fn resolve_horizontal_attaches_facing_edges() {
        // Centers at (100, 100) and (400, 100)
        let a = shape(50.0, 70.0);
        let b = shape(350.0, 70.0);

        let points = resolve(&a, &b);
        assert_eq!(points.start, pos2(150.0, 100.0)); // a's right edge, mid-height
        assert_eq!(points.end, pos2(350.0, 100.0)); // b's left edge, mid-height
    }

    #[test]
    fn resolve_is_symmetric_under_swap() {
        let a = shape(50.0, 70.0);
        let b = shape(350.0, 170.0);

        let forward = resolve(&a, &b);
        let backward = resolve(&b, &a);

        // Each shape keeps its attachment point regardless of call order
        assert_eq!(forward.start, backward.end);
        assert_eq!(forward.end, backward.start);
    }

    #[test]
    fn resolve_vertical_attaches_top_and_bottom() {
        // Centers at (100, 100) and (100, 400): straight down
        let a = shape(50.0, 70.0);
        let b = shape(50.0, 370.0);

        let points = resolve(&a, &b);
        assert_eq!(points.start, pos2(100.0, 130.0)); // a's bottom edge
        assert_eq!(points.end, pos2(100.0, 370.0)); // b's top edge

        // And upward when the end sits above the start
        let points = resolve(&b, &a);
        assert_eq!(points.start, pos2(100.0, 370.0));
        assert_eq!(points.end, pos2(100.0, 130.0));
    }

    #[test]
    fn resolve_tie_breaks_vertical() {
        // Equal |dx| and |dy| must take the vertical branch
        let a = shape(0.0, 0.0);
        let b = shape(200.0, 200.0);

        let points = resolve(&a, &b);
        assert_eq!(points.start, pos2(50.0, 60.0)); // a's bottom mid
        assert_eq!(points.end, pos2(250.0, 200.0)); // b's top mid
    }

    #[test]
    fn build_path_near_axis_is_straight() {
        let path = build_path(pos2(0.0, 0.0), pos2(15.0, 100.0));
        assert_eq!(
            path.curve,
            ArrowCurve::Line {
                from: pos2(0.0, 0.0),
                to: pos2(15.0, 100.0)
            }
        );
        assert!((path.length - (15.0_f32 * 15.0 + 100.0 * 100.0).sqrt()).abs() < 1e-4);

        // Small vertical delta also stays straight
        let path = build_path(pos2(0.0, 0.0), pos2(100.0, 19.9));
        assert!(matches!(path.curve, ArrowCurve::Line { .. }));
    }

    #[test]
    fn build_path_horizontal_curve_offsets_on_x() {
        let path = build_path(pos2(0.0, 0.0), pos2(100.0, 40.0));
        // offset = min(100, 40) * 0.5 = 20, applied horizontally toward the peer
        assert_eq!(
            path.curve,
            ArrowCurve::Cubic {
                from: pos2(0.0, 0.0),
                control1: pos2(20.0, 0.0),
                control2: pos2(80.0, 40.0),
                to: pos2(100.0, 40.0),
            }
        );
    }

    #[test]
    fn build_path_vertical_curve_offsets_on_y() {
        // Upward connection: the offsets follow dy's sign
        let path = build_path(pos2(0.0, 0.0), pos2(40.0, -100.0));
        assert_eq!(
            path.curve,
            ArrowCurve::Cubic {
                from: pos2(0.0, 0.0),
                control1: pos2(0.0, -20.0),
                control2: pos2(40.0, -80.0),
                to: pos2(40.0, -100.0),
            }
        );
    }

    #[test]
    fn build_path_identical_points_is_zero_length() {
        let p = pos2(42.0, 42.0);
        let path = build_path(p, p);
        assert_eq!(path.length, 0.0);
        assert_eq!(path.curve, ArrowCurve::Line { from: p, to: p });
    }

    #[test]
    fn arrow_head_points_along_the_shaft() {
        let head = arrow_head(pos2(0.0, 0.0), pos2(100.0, 0.0)).unwrap();
        assert_eq!(head.tip, pos2(100.0, 0.0));

        // Wings sit one head-length back at +/-30 degrees: half-width 6
        let expected_x = 100.0 - ARROWHEAD_LENGTH * (std::f32::consts::FRAC_PI_6).cos();
        assert!((head.left_wing.x - expected_x).abs() < 1e-4);
        assert!((head.left_wing.y - 6.0).abs() < 1e-4);
        assert!((head.right_wing.y + 6.0).abs() < 1e-4);
    }

    #[test]
    fn arrow_head_skips_zero_length_arrows() {
        assert!(arrow_head(pos2(5.0, 5.0), pos2(5.0, 5.0)).is_none());
    }

    #[test]
    fn shorten_for_head_pulls_back_by_head_length() {
        let end = shorten_for_head(pos2(0.0, 0.0), pos2(100.0, 0.0));
        assert_eq!(end, pos2(100.0 - ARROWHEAD_LENGTH, 0.0));

        // A shaft shorter than the head collapses to the start
        let end = shorten_for_head(pos2(0.0, 0.0), pos2(5.0, 0.0));
        assert_eq!(end, pos2(0.0, 0.0));

        // Zero-length input stays put instead of dividing by zero
        let end = shorten_for_head(pos2(3.0, 3.0), pos2(3.0, 3.0));
        assert_eq!(end, pos2(3.0, 3.0));
    }

    #[test]
    fn validate_rejects_self_duplicate_and_reverse() {
        let a = shape(0.0, 0.0);
        let b = shape(300.0, 0.0);
        let c = shape(600.0, 0.0);
        let existing = Element::arrow(a.id, b.id);
        let elements = vec![a.clone(), b.clone(), c.clone(), existing];

        assert!(!validate(a.id, a.id, &elements));
        assert!(!validate(a.id, b.id, &elements)); // duplicate
        assert!(!validate(b.id, a.id, &elements)); // immediate loop
        assert!(validate(b.id, c.id, &elements));
        assert!(validate(a.id, c.id, &elements));
    }

    #[test]
    fn endpoints_skips_dangling_arrows() {
        let mut sketch = Sketch::new();
        let a = sketch.add(shape(0.0, 0.0));
        let b = sketch.add(shape(300.0, 0.0));
        let arrow_id = sketch.add(Element::arrow(a, b));

        let arrow = sketch.get(arrow_id).unwrap().clone();
        assert!(endpoints(&arrow, &sketch).is_some());

        // Deleting a referenced shape leaves the arrow unresolvable, not a panic
        sketch.remove(a);
        let arrow = sketch.get(arrow_id).unwrap().clone();
        assert!(endpoints(&arrow, &sketch).is_none());
    }

    #[test]
    fn endpoints_rejects_non_arrows() {
        let mut sketch = Sketch::new();
        let id = sketch.add(shape(0.0, 0.0));
        let element = sketch.get(id).unwrap().clone();
        assert!(endpoints(&element, &sketch).is_none());
    }
}
