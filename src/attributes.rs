//! Dynamic attribute storage shared by nodes and edges.
//!
//! This is the "5%" of the system that everything else sits on: an
//! insertion-ordered `str -> literal` map, distinct from the immutable
//! typed-attribute payload a node class may stamp at construction time
//! (see [`crate::literal::LeafValue`] for that side of the contract).

use indexmap::IndexMap;

/// A dynamic attribute value. Mirrors the small closed set of literal kinds
/// the specification allows on dynamic attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}
impl From<u64> for AttrValue {
    fn from(v: u64) -> Self {
        AttrValue::Uint(v)
    }
}
impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}
impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}
impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}
impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

/// An ordered `key -> literal` dictionary attached to every node and edge.
///
/// Insertion order is preserved so that [`DynamicAttributes::visit`] is
/// deterministic, which in turn keeps serialization round-trips stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicAttributes {
    entries: IndexMap<String, AttrValue>,
}

impl DynamicAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value and returning it.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.entries.shift_remove(key)
    }

    /// Visits every entry in insertion order. `dynamic` is always `true` for
    /// this map; it is threaded through so a caller that also visits typed
    /// attributes can tell the two apart with one callback signature.
    pub fn visit(&self, mut f: impl FnMut(&str, &AttrValue, bool)) {
        for (k, v) in &self.entries {
            f(k, v, true);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_existing_value() {
        let mut attrs = DynamicAttributes::new();
        attrs.put("name", "resistor");
        let old = attrs.put("name", "capacitor");
        assert_eq!(old, Some(AttrValue::String("resistor".into())));
        assert_eq!(attrs.get("name"), Some(&AttrValue::String("capacitor".into())));
    }

    #[test]
    fn visit_is_insertion_ordered() {
        let mut attrs = DynamicAttributes::new();
        attrs.put("b", 2i64);
        attrs.put("a", 1i64);
        let mut seen = Vec::new();
        attrs.visit(|k, _, _| seen.push(k.to_string()));
        assert_eq!(seen, vec!["b".to_string(), "a".to_string()]);
    }
}
