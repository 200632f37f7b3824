//! Deferred objects: gradients, patterns and pixel buffers whose
//! construction code is withheld until first real use
use crate::Value;

/// Kind of a deferred object, decided by the factory operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    LinearGradient,
    RadialGradient,
    ConicGradient,
    Pattern,
    ImageData,
}

impl ObjectKind {
    /// Variable-name prefix used when the object is materialized
    pub fn prefix(self) -> &'static str {
        use ObjectKind::*;
        match self {
            LinearGradient | RadialGradient | ConicGradient => "g",
            Pattern => "p",
            ImageData => "d",
        }
    }

    /// Mutator vocabulary of this object kind.
    ///
    /// Pixel buffers expose nothing beyond construction; unknown names are
    /// tolerated by the surface the same way unclassified operations are.
    pub fn mutator(self, name: &str) -> Option<&'static str> {
        use ObjectKind::*;
        match self {
            LinearGradient | RadialGradient | ConicGradient if name == "addColorStop" => {
                Some("addColorStop")
            }
            Pattern if name == "setTransform" => Some("setTransform"),
            _ => None,
        }
    }
}

/// Recorded but not yet emitted object creation.
///
/// Constructor arguments are captured unvalidated; an object that is never
/// bound to a state property produces no instructions and no errors. The
/// assigned variable name doubles as the created flag.
#[derive(Debug, Clone)]
pub(crate) struct DeferredObject {
    pub(crate) kind: ObjectKind,
    pub(crate) factory: &'static str,
    pub(crate) args: Vec<Value>,
    pub(crate) pending: Vec<(&'static str, Vec<Value>)>,
    pub(crate) var: Option<String>,
}

impl DeferredObject {
    pub(crate) fn new(kind: ObjectKind, factory: &'static str, args: Vec<Value>) -> Self {
        Self {
            kind,
            factory,
            args,
            pending: Vec::new(),
            var: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutators() {
        assert_eq!(
            ObjectKind::LinearGradient.mutator("addColorStop"),
            Some("addColorStop")
        );
        assert_eq!(
            ObjectKind::ConicGradient.mutator("addColorStop"),
            Some("addColorStop")
        );
        assert_eq!(ObjectKind::LinearGradient.mutator("setTransform"), None);
        assert_eq!(
            ObjectKind::Pattern.mutator("setTransform"),
            Some("setTransform")
        );
        assert_eq!(ObjectKind::Pattern.mutator("addColorStop"), None);
        assert_eq!(ObjectKind::ImageData.mutator("addColorStop"), None);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(ObjectKind::LinearGradient.prefix(), "g");
        assert_eq!(ObjectKind::RadialGradient.prefix(), "g");
        assert_eq!(ObjectKind::Pattern.prefix(), "p");
        assert_eq!(ObjectKind::ImageData.prefix(), "d");
    }

    #[test]
    fn test_new_object_is_unbound() {
        let object = DeferredObject::new(
            ObjectKind::Pattern,
            "createPattern",
            vec![Value::from("tile"), Value::from("repeat")],
        );
        assert!(object.var.is_none());
        assert!(object.pending.is_empty());
        assert_eq!(object.factory, "createPattern");
    }
}
