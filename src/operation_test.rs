use super::*;
use serde_json::json;

// =============================================================================
// coerce_f64
// =============================================================================

#[test]
fn coerce_passes_numbers_through() {
    assert!((coerce_f64(&json!(12.5)) - 12.5).abs() < f64::EPSILON);
    assert!((coerce_f64(&json!(-3)) + 3.0).abs() < f64::EPSILON);
}

#[test]
fn coerce_parses_numeric_strings() {
    assert!((coerce_f64(&json!(" 42 ")) - 42.0).abs() < f64::EPSILON);
    assert!((coerce_f64(&json!("1e2")) - 100.0).abs() < f64::EPSILON);
}

#[test]
fn coerce_empty_null_and_bools() {
    assert!(coerce_f64(&json!("")).abs() < f64::EPSILON);
    assert!(coerce_f64(&json!(null)).abs() < f64::EPSILON);
    assert!(coerce_f64(&json!(false)).abs() < f64::EPSILON);
    assert!((coerce_f64(&json!(true)) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn coerce_garbage_becomes_nan() {
    assert!(coerce_f64(&json!("abc")).is_nan());
    assert!(coerce_f64(&json!([1, 2])).is_nan());
    assert!(coerce_f64(&json!({"x": 1})).is_nan());
}

// =============================================================================
// Point / StrokeStyle decoding
// =============================================================================

#[test]
fn point_decodes_strings_and_missing_fields() {
    let p: Point = serde_json::from_value(json!({"x": "10", "y": 20})).unwrap();
    assert!((p.x - 10.0).abs() < f64::EPSILON);
    assert!((p.y - 20.0).abs() < f64::EPSILON);

    let p: Point = serde_json::from_value(json!({"x": 1})).unwrap();
    assert!(p.y.is_nan());
}

#[test]
fn nan_point_serializes_as_null() {
    let p = Point { x: f64::NAN, y: 2.0 };
    let v = serde_json::to_value(p).unwrap();
    assert_eq!(v, json!({"x": null, "y": 2.0}));
}

#[test]
fn stroke_style_defaults() {
    let style: StrokeStyle = serde_json::from_value(json!({})).unwrap();
    assert_eq!(style, StrokeStyle::default());
    assert_eq!(style.color, DEFAULT_COLOR);
    assert!((style.width - DEFAULT_STROKE_WIDTH).abs() < f64::EPSILON);
    assert_eq!(style.tool, DEFAULT_TOOL);
}

#[test]
fn stroke_style_coerces_width() {
    let style: StrokeStyle =
        serde_json::from_value(json!({"color": "#ff0000", "width": "8", "tool": "marker"})).unwrap();
    assert_eq!(style.color, "#ff0000");
    assert!((style.width - 8.0).abs() < f64::EPSILON);
    assert_eq!(style.tool, "marker");
}

// =============================================================================
// Drafts
// =============================================================================

#[test]
fn shape_draft_accepts_both_kind_keys() {
    let a: ShapeDraft = serde_json::from_value(json!({"shapeKind": "rect", "x": 1, "y": 2, "w": 3, "h": 4})).unwrap();
    let b: ShapeDraft = serde_json::from_value(json!({"shape": "rect", "x": 1, "y": 2, "w": 3, "h": 4})).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.shape_kind, ShapeKind::Rect);
}

#[test]
fn shape_draft_rejects_unknown_shape() {
    let result: Result<ShapeDraft, _> = serde_json::from_value(json!({"shapeKind": "hexagon"}));
    assert!(result.is_err());
}

#[test]
fn shape_draft_into_operation() {
    let draft: ShapeDraft = serde_json::from_value(
        json!({"shapeKind": "star", "x": 5, "y": 6, "w": 70, "h": 80, "color": "#123456", "width": 3}),
    )
    .unwrap();
    let op = draft.into_operation();
    assert_eq!(op.kind(), "shape");
    assert_eq!(op.color, "#123456");
    assert!((op.stroke_width - 3.0).abs() < f64::EPSILON);
    let Drawable::Shape(body) = op.body else {
        panic!("expected shape body");
    };
    assert_eq!(body.shape_kind, ShapeKind::Star);
    assert!((body.w - 70.0).abs() < f64::EPSILON);
}

#[test]
fn sticky_draft_defaults() {
    let draft: StickyDraft = serde_json::from_value(json!({"x": 10, "y": 20})).unwrap();
    let op = draft.into_operation();
    assert_eq!(op.kind(), "sticky");
    assert_eq!(op.color, DEFAULT_STICKY_COLOR);
    let Drawable::Sticky(body) = op.body else {
        panic!("expected sticky body");
    };
    assert_eq!(body.text, DEFAULT_STICKY_TEXT);
    assert!((body.w - DEFAULT_STICKY_WIDTH).abs() < f64::EPSILON);
    assert!((body.h - DEFAULT_STICKY_HEIGHT).abs() < f64::EPSILON);
}

// =============================================================================
// Operation wire shape
// =============================================================================

#[test]
fn stroke_operation_wire_shape() {
    let style = StrokeStyle { color: "#00cec9".into(), width: 6.0, tool: "pencil".into() };
    let op = Operation::stroke(style, vec![Point { x: 1.0, y: 2.0 }]);
    let v = serde_json::to_value(&op).unwrap();

    assert_eq!(v["kind"], "stroke");
    assert_eq!(v["color"], "#00cec9");
    assert_eq!(v["strokeWidth"], 6.0);
    assert_eq!(v["tool"], "pencil");
    assert_eq!(v["points"], json!([{"x": 1.0, "y": 2.0}]));
    assert_eq!(v["id"], json!(op.id.to_string()));
}

#[test]
fn shape_operation_wire_shape_uses_camel_case() {
    let draft: ShapeDraft = serde_json::from_value(json!({"shape": "ellipse", "x": 0, "y": 0, "w": 1, "h": 1})).unwrap();
    let v = serde_json::to_value(draft.into_operation()).unwrap();
    assert_eq!(v["kind"], "shape");
    assert_eq!(v["shapeKind"], "ellipse");
}

#[test]
fn operation_wire_round_trip_keeps_id_and_content() {
    let draft: StickyDraft = serde_json::from_value(json!({"x": 1, "y": 2, "text": "hi"})).unwrap();
    let op = draft.into_operation();
    let json = serde_json::to_string(&op).unwrap();
    let restored: Operation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, op);
}

#[test]
fn generated_ids_are_unique_and_creation_ordered() {
    let ids: Vec<OperationId> = (0..64).map(|_| OperationId::generate()).collect();
    for pair in ids.windows(2) {
        assert_ne!(pair[0], pair[1]);
        assert!(pair[0].to_string() < pair[1].to_string());
    }
}
