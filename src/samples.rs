//! Built-in sample documents that can be quickly loaded from the UI.
//!
//! A few curated diagrams covering the shape palette, to help new users see
//! what the tools produce without drawing everything by hand.

use crate::types::{Element, ElementKind, Sketch};

/// Kinds of built-in samples available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Start -> task -> decision with two labeled branches
    OrderProcess,
    /// Subprocess, document, and annotation shapes around a review loop
    DocumentReview,
}

/// Metadata for a single sample.
pub struct SampleInfo {
    /// Stable identifier for the sample
    pub kind: SampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::OrderProcess,
            name: "Order Process",
        },
        SampleInfo {
            kind: SampleKind::DocumentReview,
            name: "Document Review",
        },
    ];
    SAMPLES
}

/// Builds a sketch for the given sample kind.
pub fn build_sample(kind: SampleKind) -> Sketch {
    match kind {
        SampleKind::OrderProcess => build_order_process(),
        SampleKind::DocumentReview => build_document_review(),
    }
}

fn labeled(kind: ElementKind, label: &str, x: f32, y: f32, width: f32, height: f32) -> Element {
    let mut element = Element::shape(kind, x, y, width, height);
    element.label = Some(label.to_string());
    element
}

fn build_order_process() -> Sketch {
    let mut sketch = Sketch::new();

    let start = sketch.add(labeled(ElementKind::Start, "Order received", 80.0, 60.0, 120.0, 50.0));
    let check = sketch.add(labeled(ElementKind::Task, "Check stock", 80.0, 200.0, 120.0, 60.0));
    let decide = sketch.add(labeled(
        ElementKind::Decision,
        "In stock?",
        80.0,
        350.0,
        120.0,
        90.0,
    ));
    let ship = sketch.add(labeled(ElementKind::Task, "Ship order", 320.0, 365.0, 120.0, 60.0));
    let backorder = sketch.add(labeled(
        ElementKind::Task,
        "Back-order",
        80.0,
        520.0,
        120.0,
        60.0,
    ));
    let done = sketch.add(labeled(ElementKind::End, "Done", 560.0, 370.0, 100.0, 50.0));

    sketch.add(Element::arrow(start, check));
    sketch.add(Element::arrow(check, decide));
    sketch.add(Element::arrow(decide, ship));
    sketch.add(Element::arrow(decide, backorder));
    sketch.add(Element::arrow(ship, done));

    sketch
}

fn build_document_review() -> Sketch {
    let mut sketch = Sketch::new();

    let draft = sketch.add(labeled(
        ElementKind::Document,
        "Draft proposal",
        100.0,
        80.0,
        130.0,
        70.0,
    ));
    let review = sketch.add(labeled(
        ElementKind::Subprocess,
        "Review round",
        340.0,
        80.0,
        150.0,
        70.0,
    ));
    let approve = sketch.add(labeled(
        ElementKind::Decision,
        "Approved?",
        350.0,
        260.0,
        130.0,
        90.0,
    ));
    let publish = sketch.add(labeled(
        ElementKind::Task,
        "Publish",
        620.0,
        275.0,
        110.0,
        60.0,
    ));
    let note = sketch.add(labeled(
        ElementKind::Annotation,
        "Two reviewers minimum",
        580.0,
        70.0,
        170.0,
        50.0,
    ));

    sketch.add(Element::arrow(draft, review));
    sketch.add(Element::arrow(review, approve));
    sketch.add(Element::arrow(approve, publish));
    // Rejected drafts loop back for another pass
    sketch.add(Element::arrow(approve, draft));
    sketch.add(Element::arrow(note, review));

    sketch
}
