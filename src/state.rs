//! Drawing state table: the fixed set of canvas style and text properties
use crate::Value;

// Fixed property set of the 2D context state. Bulk copies move exactly this
// set, never surface-internal bookkeeping.
static PROPERTIES: [&str; 26] = [
    "direction",
    "fillStyle",
    "filter",
    "font",
    "fontKerning",
    "fontStretch",
    "fontVariantCaps",
    "globalAlpha",
    "globalCompositeOperation",
    "imageSmoothingEnabled",
    "imageSmoothingQuality",
    "letterSpacing",
    "lineCap",
    "lineDashOffset",
    "lineJoin",
    "lineWidth",
    "miterLimit",
    "shadowBlur",
    "shadowColor",
    "shadowOffsetX",
    "shadowOffsetY",
    "strokeStyle",
    "textAlign",
    "textBaseline",
    "textRendering",
    "wordSpacing",
];

fn default_for(name: &str) -> Value {
    match name {
        "direction" => Value::from("ltr"),
        "fillStyle" => Value::from("#000000"),
        "filter" => Value::from("none"),
        "font" => Value::from("10px sans-serif"),
        "fontKerning" => Value::from("auto"),
        "fontStretch" => Value::from("normal"),
        "fontVariantCaps" => Value::from("normal"),
        "globalAlpha" => Value::Num(1.0),
        "globalCompositeOperation" => Value::from("source-over"),
        "imageSmoothingEnabled" => Value::Bool(true),
        "imageSmoothingQuality" => Value::from("low"),
        "letterSpacing" => Value::from("0px"),
        "lineCap" => Value::from("butt"),
        "lineDashOffset" => Value::Num(0.0),
        "lineJoin" => Value::from("miter"),
        "lineWidth" => Value::Num(1.0),
        "miterLimit" => Value::Num(10.0),
        "shadowBlur" => Value::Num(0.0),
        "shadowColor" => Value::from("rgba(0, 0, 0, 0)"),
        "shadowOffsetX" => Value::Num(0.0),
        "shadowOffsetY" => Value::Num(0.0),
        "strokeStyle" => Value::from("#000000"),
        "textAlign" => Value::from("start"),
        "textBaseline" => Value::from("alphabetic"),
        "textRendering" => Value::from("auto"),
        "wordSpacing" => Value::from("0px"),
        _ => unreachable!("not a state property: {}", name),
    }
}

/// Current values of the fixed property set, seeded from the defaults
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    values: Vec<Value>,
}

impl DrawState {
    pub fn new() -> Self {
        Self {
            values: PROPERTIES.iter().map(|name| default_for(name)).collect(),
        }
    }

    /// Names of the fixed property set, in table order
    pub fn properties() -> &'static [&'static str] {
        &PROPERTIES
    }

    /// Canonical (static) name for a state property, if `name` is one
    pub fn canonical(name: &str) -> Option<&'static str> {
        PROPERTIES.iter().find(|prop| **prop == name).copied()
    }

    /// Membership test distinguishing style/text properties from operations
    pub fn is_state_property(name: &str) -> bool {
        Self::canonical(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = PROPERTIES.iter().position(|prop| *prop == name)?;
        Some(&self.values[index])
    }

    /// Store a property value, reporting whether `name` is a state property
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match PROPERTIES.iter().position(|prop| *prop == name) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }

    /// Copy exactly the fixed property set from `other`
    pub fn copy_from(&mut self, other: &DrawState) {
        for index in 0..PROPERTIES.len() {
            self.values[index] = other.values[index].clone();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        PROPERTIES.iter().copied().zip(self.values.iter())
    }
}

impl Default for DrawState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DrawState::new();
        assert_eq!(state.iter().count(), PROPERTIES.len());
        assert_eq!(state.get("lineWidth"), Some(&Value::Num(1.0)));
        assert_eq!(state.get("fillStyle"), Some(&Value::from("#000000")));
        assert_eq!(state.get("globalAlpha"), Some(&Value::Num(1.0)));
        assert_eq!(state.get("textAlign"), Some(&Value::from("start")));
        assert_eq!(state.get("imageSmoothingEnabled"), Some(&Value::Bool(true)));
        assert_eq!(state.get("shadowColor"), Some(&Value::from("rgba(0, 0, 0, 0)")));
        // every property seeds to its own default
        for (name, value) in state.iter() {
            assert_eq!(*value, default_for(name));
        }
    }

    #[test]
    fn test_membership() {
        assert!(DrawState::is_state_property("lineWidth"));
        assert!(DrawState::is_state_property("wordSpacing"));
        assert!(!DrawState::is_state_property("moveTo"));
        assert!(!DrawState::is_state_property("canvas"));
        assert_eq!(DrawState::canonical("font"), Some("font"));
        assert_eq!(DrawState::canonical("unknown"), None);
    }

    #[test]
    fn test_set_and_copy() {
        let mut src = DrawState::new();
        assert!(src.set("lineWidth", Value::Num(4.0)));
        assert!(src.set("fillStyle", Value::from("#ff0000")));
        assert!(!src.set("notAProperty", Value::Null));

        let mut dst = DrawState::new();
        dst.copy_from(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.get("lineWidth"), Some(&Value::Num(4.0)));
        // the copy introduced and dropped nothing
        assert_eq!(dst.iter().count(), PROPERTIES.len());
    }
}
