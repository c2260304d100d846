//! Operations — the committed drawables that make up the board history.
//!
//! DESIGN
//! ======
//! An `Operation` is a closed tagged union over `stroke | shape | sticky`.
//! The common rendering attributes (`color`, `strokeWidth`) sit on the
//! operation itself and the kind-specific payload is flattened next to them
//! under a `kind` discriminant, so the wire shape stays a single flat object.
//!
//! Operations are immutable once committed. Undo removes one, redo
//! re-appends the very same value (same id, same content).
//!
//! COERCION
//! ========
//! Client coordinates are coerced the way a browser's unary `+` would:
//! numbers pass through, numeric strings are parsed, `null`/`false`/`""`
//! become 0, `true` becomes 1, and anything else becomes NaN. NaN is kept
//! as-is; geometry sanity is the renderer's problem.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;
pub const DEFAULT_TOOL: &str = "pen";

pub const DEFAULT_STICKY_WIDTH: f64 = 160.0;
pub const DEFAULT_STICKY_HEIGHT: f64 = 120.0;
pub const DEFAULT_STICKY_TEXT: &str = "Note";
pub const DEFAULT_STICKY_COLOR: &str = "#fffa9e";

// =============================================================================
// IDS
// =============================================================================

/// Server-assigned operation identifier.
///
/// Backed by a UUIDv7 (millisecond timestamp + random bits). It identifies an
/// operation; it is not the ordering authority. Order is the position in the
/// committed log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Triangle,
    Cube,
    Star,
    Arrow,
    Speech,
}

/// Drawing style announced on `stroke:begin` and carried by the live buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_stroke_width", deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(default = "default_tool")]
    pub tool: String,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { color: default_color(), width: DEFAULT_STROKE_WIDTH, tool: default_tool() }
    }
}

// =============================================================================
// OPERATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: OperationId,
    pub color: String,
    pub stroke_width: f64,
    #[serde(flatten)]
    pub body: Drawable,
}

/// Kind-specific payload. Adding a drawable means adding a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Drawable {
    Stroke(StrokeBody),
    Shape(ShapeBody),
    Sticky(StickyBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeBody {
    pub tool: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBody {
    pub shape_kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyBody {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub text: String,
}

impl Operation {
    /// Build a stroke operation from a finished live buffer.
    #[must_use]
    pub fn stroke(style: StrokeStyle, points: Vec<Point>) -> Self {
        Self {
            id: OperationId::generate(),
            color: style.color,
            stroke_width: style.width,
            body: Drawable::Stroke(StrokeBody { tool: style.tool, points }),
        }
    }

    /// Wire name of this operation's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.body {
            Drawable::Stroke(_) => "stroke",
            Drawable::Shape(_) => "shape",
            Drawable::Sticky(_) => "sticky",
        }
    }
}

// =============================================================================
// CLIENT DRAFTS
// =============================================================================

/// Payload of `shape:add`. Accepts `shapeKind` or the older `shape` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDraft {
    #[serde(alias = "shape")]
    pub shape_kind: ShapeKind,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub w: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub h: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_stroke_width", deserialize_with = "lenient_f64")]
    pub width: f64,
}

impl ShapeDraft {
    #[must_use]
    pub fn into_operation(self) -> Operation {
        Operation {
            id: OperationId::generate(),
            color: self.color,
            stroke_width: self.width,
            body: Drawable::Shape(ShapeBody {
                shape_kind: self.shape_kind,
                x: self.x,
                y: self.y,
                w: self.w,
                h: self.h,
            }),
        }
    }
}

/// Payload of `sticky:add`. `color` is the note's background.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StickyDraft {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default = "default_sticky_width", deserialize_with = "lenient_f64")]
    pub w: f64,
    #[serde(default = "default_sticky_height", deserialize_with = "lenient_f64")]
    pub h: f64,
    #[serde(default = "default_sticky_text")]
    pub text: String,
    #[serde(default = "default_sticky_color")]
    pub color: String,
}

impl StickyDraft {
    #[must_use]
    pub fn into_operation(self) -> Operation {
        Operation {
            id: OperationId::generate(),
            color: self.color,
            stroke_width: DEFAULT_STROKE_WIDTH,
            body: Drawable::Sticky(StickyBody { x: self.x, y: self.y, w: self.w, h: self.h, text: self.text }),
        }
    }
}

// =============================================================================
// COERCION
// =============================================================================

/// Coerce an arbitrary JSON value to a number, browser style.
#[must_use]
pub fn coerce_f64(value: &serde_json::Value) -> f64 {
    use serde_json::Value;

    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

fn nan() -> f64 {
    f64::NAN
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_tool() -> String {
    DEFAULT_TOOL.into()
}

fn default_sticky_width() -> f64 {
    DEFAULT_STICKY_WIDTH
}

fn default_sticky_height() -> f64 {
    DEFAULT_STICKY_HEIGHT
}

fn default_sticky_text() -> String {
    DEFAULT_STICKY_TEXT.into()
}

fn default_sticky_color() -> String {
    DEFAULT_STICKY_COLOR.into()
}

#[cfg(test)]
#[path = "operation_test.rs"]
mod tests;
