//! Static classification of every drawing-surface operation
use crate::{ObjectKind, Value};

/// What a classified operation does to the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Changes persistent drawing state, no geometry; emitted immediately
    State,
    /// Paints using current state without path involvement; emitted immediately
    Draw,
    /// Appends to the current path without drawing; held in the path buffer
    PathBuild,
    /// Paints using the accumulated path; flushes the buffer, then draws
    PathDraw,
    /// Returns a deferred object handle; emits nothing by itself
    Create,
    /// Recognized but has no persistent effect; never emitted
    Inert,
    /// Capability the virtual surface does not provide; invoking it is fatal
    Unsupported,
}

/// Descriptor of one drawing-surface operation
pub struct OpInfo {
    pub name: &'static str,
    pub kind: OpKind,
    /// Suppression predicate over the call arguments, checked before anything else
    pub ignore: Option<fn(&[Value]) -> bool>,
    /// Deferred-object factory, present exactly on `Create` operations
    pub factory: Option<ObjectKind>,
}

const fn op(name: &'static str, kind: OpKind) -> OpInfo {
    OpInfo {
        name,
        kind,
        ignore: None,
        factory: None,
    }
}

const fn factory(name: &'static str, kind: ObjectKind) -> OpInfo {
    OpInfo {
        name,
        kind: OpKind::Create,
        ignore: None,
        factory: Some(kind),
    }
}

// A zero-delta translate produces no visual change
fn translate_ignored(args: &[Value]) -> bool {
    matches!(args, [Value::Num(x), Value::Num(y)] if *x == 0.0 && *y == 0.0)
}

// A unit-factor or non-numeric scale produces no usable change
fn scale_ignored(args: &[Value]) -> bool {
    match args {
        [Value::Num(x), Value::Num(y)] => {
            !(x.is_finite() && y.is_finite()) || (*x == 1.0 && *y == 1.0)
        }
        _ => true,
    }
}

static OPS: &[OpInfo] = &[
    // path construction
    op("beginPath", OpKind::PathBuild),
    op("closePath", OpKind::PathBuild),
    op("moveTo", OpKind::PathBuild),
    op("lineTo", OpKind::PathBuild),
    op("bezierCurveTo", OpKind::PathBuild),
    op("quadraticCurveTo", OpKind::PathBuild),
    op("arc", OpKind::PathBuild),
    op("arcTo", OpKind::PathBuild),
    op("ellipse", OpKind::PathBuild),
    op("rect", OpKind::PathBuild),
    op("roundRect", OpKind::PathBuild),
    // path consuming draws
    op("fill", OpKind::PathDraw),
    op("stroke", OpKind::PathDraw),
    op("clip", OpKind::PathDraw),
    // immediate draws
    op("fillRect", OpKind::Draw),
    op("strokeRect", OpKind::Draw),
    op("clearRect", OpKind::Draw),
    op("fillText", OpKind::Draw),
    op("strokeText", OpKind::Draw),
    op("putImageData", OpKind::Draw),
    // state mutation
    op("save", OpKind::State),
    op("restore", OpKind::State),
    op("rotate", OpKind::State),
    op("transform", OpKind::State),
    op("setTransform", OpKind::State),
    op("resetTransform", OpKind::State),
    op("setLineDash", OpKind::State),
    op("reset", OpKind::State),
    OpInfo {
        name: "translate",
        kind: OpKind::State,
        ignore: Some(translate_ignored),
        factory: None,
    },
    OpInfo {
        name: "scale",
        kind: OpKind::State,
        ignore: Some(scale_ignored),
        factory: None,
    },
    // object creation
    factory("createLinearGradient", ObjectKind::LinearGradient),
    factory("createRadialGradient", ObjectKind::RadialGradient),
    factory("createConicGradient", ObjectKind::ConicGradient),
    factory("createPattern", ObjectKind::Pattern),
    factory("createImageData", ObjectKind::ImageData),
    // no persistent effect
    op("drawFocusIfNeeded", OpKind::Inert),
    // unsupported capabilities
    op("getImageData", OpKind::Unsupported),
    op("drawImage", OpKind::Unsupported),
    op("measureText", OpKind::Unsupported),
    op("getTransform", OpKind::Unsupported),
    op("getLineDash", OpKind::Unsupported),
    op("getContextAttributes", OpKind::Unsupported),
    op("isPointInPath", OpKind::Unsupported),
    op("isPointInStroke", OpKind::Unsupported),
];

/// Look up the descriptor for an operation name.
///
/// Absence is not an error: renderers probe optional capabilities, and an
/// unmapped name is treated as an inert no-op by the surface.
pub fn classify(name: &str) -> Option<&'static OpInfo> {
    OPS.iter().find(|op| op.name == name)
}

/// The full operation table, in classification order
pub fn operations() -> &'static [OpInfo] {
    OPS
}
