//! Runtime value model and canonical source-literal encoding
use std::fmt;

pub type Scalar = f64;
pub const PI: Scalar = std::f64::consts::PI;

/// Handle referring to a deferred object owned by a drawing surface.
///
/// Handles are only ever minted by the surface that owns the object table,
/// so an `ObjectId` held by a caller always refers to a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Value that can cross the drawing-surface boundary.
///
/// This is a closed set by construction: everything a renderer can pass to
/// the surface is representable here, and everything except a non-finite
/// number has a canonical literal form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Num(Scalar),
    Str(String),
    List(Vec<Value>),
    /// Ordered key/value pairs, encoded as an object literal
    Map(Vec<(String, Value)>),
    /// Reference to a deferred object, encoded as its variable name
    Object(ObjectId),
}

impl Value {
    /// Encode value into its canonical literal form.
    ///
    /// Object handles cannot be resolved without a surface, see
    /// [`Value::encode_with`].
    pub fn encode(&self) -> Result<String, EncodeError> {
        self.encode_with(&[])
    }

    /// Encode value, resolving object handles against `names`, the variable
    /// names assigned by the owning surface, indexed by object id.
    pub fn encode_with(&self, names: &[Option<String>]) -> Result<String, EncodeError> {
        let mut out = String::new();
        self.write_into(names, &mut out)?;
        Ok(out)
    }

    fn write_into(&self, names: &[Option<String>], out: &mut String) -> Result<(), EncodeError> {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Num(value) => write_scalar(*value, out)?,
            Value::Str(value) => write_quoted(value, out),
            Value::List(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index != 0 {
                        out.push(',');
                    }
                    item.write_into(names, out)?;
                }
                out.push(']');
            }
            Value::Map(pairs) => {
                out.push('{');
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index != 0 {
                        out.push(',');
                    }
                    write_quoted(key, out);
                    out.push(':');
                    value.write_into(names, out)?;
                }
                out.push('}');
            }
            Value::Object(id) => match names.get(id.index()) {
                Some(Some(var)) => out.push_str(var),
                _ => return Err(EncodeError::UnboundObject),
            },
        }
        Ok(())
    }

    /// Verify that the value has a canonical literal form.
    ///
    /// Object handles pass: their form is the variable name assigned at
    /// materialization time.
    pub fn check(&self) -> Result<(), EncodeError> {
        match self {
            Value::Num(value) if !value.is_finite() => Err(EncodeError::NonFinite(*value)),
            Value::List(items) => Value::check_all(items),
            Value::Map(pairs) => pairs.iter().try_for_each(|(_, value)| value.check()),
            _ => Ok(()),
        }
    }

    /// Verify a whole argument list at once
    pub fn check_all(values: &[Value]) -> Result<(), EncodeError> {
        values.iter().try_for_each(Value::check)
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Num(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

// Shortest round-trip decimal, integral values without a fractional part.
// Replayed source must parse back to the exact same number.
fn write_scalar(value: Scalar, out: &mut String) -> Result<(), EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFinite(value));
    }
    out.push_str(&value.to_string());
    Ok(())
}

fn write_quoted(value: &str, out: &mut String) {
    out.push('"');
    for chr in value.chars() {
        match chr {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            chr if (chr as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", chr as u32));
            }
            chr => out.push(chr),
        }
    }
    out.push('"');
}

/// Error while encoding a value into its literal form
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Number with no canonical literal form (NaN or an infinity)
    NonFinite(Scalar),
    /// Deferred object referenced before its constructor was emitted
    UnboundObject,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodeError::{:?}", self)
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() -> Result<(), EncodeError> {
        assert_eq!(Value::Num(2.0).encode()?, "2");
        assert_eq!(Value::Num(0.5).encode()?, "0.5");
        assert_eq!(Value::Num(-13.25).encode()?, "-13.25");
        assert_eq!(Value::Num(0.0).encode()?, "0");
        assert_eq!(
            Value::Num(2.0 * std::f64::consts::PI).encode()?,
            "6.283185307179586"
        );
        Ok(())
    }

    #[test]
    fn test_non_finite() {
        assert!(matches!(
            Value::Num(Scalar::NAN).encode(),
            Err(EncodeError::NonFinite(_))
        ));
        assert!(matches!(
            Value::Num(Scalar::INFINITY).check(),
            Err(EncodeError::NonFinite(_))
        ));
        assert!(
            Value::List(vec![Value::Num(1.0), Value::Num(Scalar::NAN)])
                .check()
                .is_err()
        );
    }

    #[test]
    fn test_strings() -> Result<(), EncodeError> {
        assert_eq!(Value::from("#000000").encode()?, "\"#000000\"");
        assert_eq!(Value::from("a\"b\\c").encode()?, "\"a\\\"b\\\\c\"");
        assert_eq!(Value::from("line\nbreak").encode()?, "\"line\\nbreak\"");
        assert_eq!(Value::from("\u{1}").encode()?, "\"\\u0001\"");
        Ok(())
    }

    #[test]
    fn test_compound() -> Result<(), EncodeError> {
        assert_eq!(Value::Null.encode()?, "null");
        assert_eq!(Value::Bool(false).encode()?, "false");
        let list = Value::List(vec![Value::Num(4.0), Value::Num(2.0)]);
        assert_eq!(list.encode()?, "[4,2]");
        let map = Value::Map(vec![
            ("a".to_string(), Value::Num(1.0)),
            ("b".to_string(), Value::from("x")),
        ]);
        assert_eq!(map.encode()?, "{\"a\":1,\"b\":\"x\"}");
        Ok(())
    }

    #[test]
    fn test_object_handles() -> Result<(), EncodeError> {
        let handle = Value::Object(ObjectId::new(0));
        assert_eq!(handle.encode_with(&[Some("g0".to_string())])?, "g0");
        assert_eq!(handle.encode(), Err(EncodeError::UnboundObject));
        assert_eq!(
            handle.encode_with(&[None]),
            Err(EncodeError::UnboundObject)
        );
        Ok(())
    }
}
