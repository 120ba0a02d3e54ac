use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for object IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for canvas objects.
///
/// The persisted form is a plain string (`"3"`, `"rect_12"`, a UUID...);
/// internally it is a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Spur);

impl ObjectId {
    /// Intern a string as an ObjectId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ObjectId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate an ID with a type prefix (e.g. `rect_1`, `group_2`).
    ///
    /// The counter is process-wide, so two calls never return the same ID.
    /// It does not know about IDs loaded from a document; use
    /// [`Canvas::fresh_id`](crate::model::Canvas::fresh_id) when the result
    /// must be unique within a canvas.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        ObjectId::intern(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ObjectId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ObjectId::intern("hero_image");
        let b = ObjectId::intern("hero_image");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_image");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = ObjectId::with_prefix("rect");
        let b = ObjectId::with_prefix("rect");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("rect_"));
    }

    #[test]
    fn display_is_plain_debug_is_tagged() {
        let id = ObjectId::intern("42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "@42");
    }

    #[test]
    fn serializes_as_string() {
        let id = ObjectId::intern("frame_a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"frame_a\"");
        let back: ObjectId = serde_json::from_str("\"frame_a\"").unwrap();
        assert_eq!(back, id);
    }
}
