//! Discrete set containers: `Strings`, `Counts`, `Booleans`, `AbstractEnums`.
//!
//! Each is a deduplicated, deterministically sorted `Vec` with the shared
//! "setic" contract from the specification (intersect, union, symmetric
//! difference, equality, subset/superset, and the three-valued
//! `uncertainty_equals`). [`BooleanSet`] doubles as the result type for
//! every `uncertainty_equals` and [`crate::numeric_set`] comparison in the
//! crate, since `{false}`, `{true}`, and `{false,true}` are exactly its
//! three possible values.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

macro_rules! setic_set {
    ($name:ident, $elem:ty) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
        pub struct $name {
            values: Vec<$elem>,
        }

        impl $name {
            pub fn new(values: impl IntoIterator<Item = $elem>) -> Self {
                let mut values: Vec<$elem> = values.into_iter().collect();
                values.sort();
                values.dedup();
                Self { values }
            }

            pub fn empty() -> Self {
                Self { values: Vec::new() }
            }

            pub fn values(&self) -> &[$elem] {
                &self.values
            }

            pub fn is_empty(&self) -> bool {
                self.values.is_empty()
            }

            pub fn is_singleton(&self) -> bool {
                self.values.len() == 1
            }

            pub fn get_single(&self) -> GraphResult<&$elem> {
                if self.values.len() == 1 {
                    Ok(&self.values[0])
                } else {
                    Err(GraphError::NotSingleton)
                }
            }

            pub fn any(&self) -> GraphResult<&$elem> {
                self.values
                    .first()
                    .ok_or_else(|| GraphError::InvalidArgument("set is empty".to_string()))
            }

            pub fn contains(&self, v: &$elem) -> bool {
                self.values.binary_search(v).is_ok()
            }

            pub fn setic_is_subset_of(&self, other: &Self) -> bool {
                self.values.iter().all(|v| other.contains(v))
            }

            pub fn setic_is_superset_of(&self, other: &Self) -> bool {
                other.setic_is_subset_of(self)
            }

            pub fn setic_equals(&self, other: &Self) -> bool {
                self.values == other.values
            }

            pub fn intersect(&self, other: &Self) -> Self {
                Self::new(self.values.iter().filter(|v| other.contains(v)).cloned())
            }

            pub fn union(&self, other: &Self) -> Self {
                Self::new(self.values.iter().chain(other.values.iter()).cloned())
            }

            pub fn symmetric_difference(&self, other: &Self) -> Self {
                let union = self.union(other);
                let intersection = self.intersect(other);
                Self::new(union.values.into_iter().filter(|v| !intersection.contains(v)))
            }

            pub fn uncertainty_equals(&self, other: &Self) -> BooleanSet {
                if self.is_singleton() && other.is_singleton() && self.setic_equals(other) {
                    BooleanSet::new([true])
                } else if self.intersect(other).is_empty() {
                    BooleanSet::new([false])
                } else {
                    BooleanSet::new([false, true])
                }
            }
        }
    };
}

setic_set!(StringSet, String);
setic_set!(CountSet, i64);
setic_set!(BooleanSet, bool);

/// A single member of an [`EnumSet`]: the enum's type name plus the chosen
/// member value, matching [`crate::literal::LeafValue::EnumValue`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

setic_set!(EnumSet, EnumMember);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_dedup_and_sort_lexicographically() {
        let s = StringSet::new(["b".to_string(), "a".to_string(), "a".to_string()]);
        assert_eq!(s.values(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn booleans_sort_false_before_true() {
        let s = BooleanSet::new([true, false, true]);
        assert_eq!(s.values(), [false, true]);
    }

    #[test]
    fn intersect_union_symmetric_difference_invariants() {
        let a = CountSet::new([1, 2, 3]);
        let b = CountSet::new([2, 3, 4]);
        let i = a.intersect(&b);
        let u = a.union(&b);
        let sd = a.symmetric_difference(&b);
        assert!(i.setic_is_subset_of(&a));
        assert!(i.setic_is_subset_of(&b));
        assert!(u.setic_is_superset_of(&a));
        assert!(u.setic_is_superset_of(&b));
        assert_eq!(sd, u.symmetric_difference(&i));
        assert_eq!(sd.values(), [1, 4]);
    }

    #[test]
    fn setic_equals_iff_mutual_subset() {
        let a = StringSet::new(["x".to_string(), "y".to_string()]);
        let b = StringSet::new(["y".to_string(), "x".to_string()]);
        assert!(a.setic_equals(&b));
        assert!(a.setic_is_subset_of(&b) && b.setic_is_subset_of(&a));
    }

    #[test]
    fn uncertainty_equals_three_valued() {
        let t = BooleanSet::new([true]);
        let both = BooleanSet::new([false, true]);
        assert_eq!(t.uncertainty_equals(&both).values(), [false, true]);
        let f = BooleanSet::new([false]);
        assert_eq!(t.uncertainty_equals(&f).values(), [false]);
        assert_eq!(t.uncertainty_equals(&t).values(), [true]);
    }

    #[test]
    fn get_single_fails_on_non_singleton() {
        let s = CountSet::new([1, 2]);
        assert_eq!(s.get_single(), Err(GraphError::NotSingleton));
    }
}
