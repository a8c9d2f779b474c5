//! Generative tests for the universal ("for every set", "for every
//! `Numbers`") invariants the specification's testable-properties section
//! states informally: subset-of-self, the setic triangle between
//! intersect/union/symmetric-difference, and serialize/deserialize
//! round-trips.

use proptest::prelude::*;
use rand::seq::SliceRandom;

use paramgraph::numeric_set::{Interval, NumericSet};
use paramgraph::sets::CountSet;
use paramgraph::units::known::{AMPERE, OHM, VOLT};
use paramgraph::{numbers::Numbers, serial};

/// Insertion order must never leak into a `setic_set!` container's identity:
/// shuffling the input values before construction always yields a
/// setic-equal set.
#[test]
fn count_set_construction_is_insertion_order_independent() {
    let mut rng = rand::rng();
    let mut values: Vec<i64> = (0..50).collect();
    let canonical = CountSet::new(values.clone());
    for _ in 0..20 {
        values.shuffle(&mut rng);
        let shuffled = CountSet::new(values.clone());
        assert!(shuffled.setic_equals(&canonical));
    }
}

/// A finite `(min, max)` pair with `min <= max`, bounded so corner products
/// in `mul`/`div` stay finite.
fn finite_interval_pair() -> impl Strategy<Value = (f64, f64)> {
    (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

fn numeric_set_strategy() -> impl Strategy<Value = NumericSet> {
    prop::collection::vec(finite_interval_pair(), 1..6)
        .prop_map(|pairs| NumericSet::setup_from_values(pairs).expect("finite bounds never produce NaN/invalid intervals"))
}

proptest! {
    /// Every `NumericSet` is a subset of (and setic-equal to) itself, and
    /// its intervals stay sorted and non-overlapping after normalization.
    #[test]
    fn numeric_set_is_subset_and_equal_to_itself(s in numeric_set_strategy()) {
        prop_assert!(s.is_subset_of(&s));
        prop_assert!(s.setic_equals(&s));
        for pair in s.intervals().windows(2) {
            prop_assert!(pair[0].max < pair[1].min, "merged intervals must not touch or overlap");
        }
    }

    /// `intersect`/`union` form the usual subset lattice, and symmetric
    /// difference is `union \ intersect` no matter which operand order the
    /// caller supplies.
    #[test]
    fn numeric_set_setic_triangle(a in numeric_set_strategy(), b in numeric_set_strategy()) {
        let i = a.intersect(&b);
        let u = a.union(&b);
        let sd = a.symmetric_difference(&b);

        prop_assert!(i.is_subset_of(&a));
        prop_assert!(i.is_subset_of(&b));
        prop_assert!(u.is_superset_of(&a));
        prop_assert!(u.is_superset_of(&b));
        prop_assert_eq!(sd.clone(), b.symmetric_difference(&a));
        prop_assert_eq!(sd, u.symmetric_difference(&i));
    }

    /// A single closed interval always contains both of its own endpoints
    /// and their midpoint.
    #[test]
    fn interval_contains_its_own_bounds((min, max) in finite_interval_pair()) {
        let iv = Interval::new(min, max).unwrap();
        prop_assert!(iv.contains(min));
        prop_assert!(iv.contains(max));
        prop_assert!(iv.contains((min + max) / 2.0));
    }

    /// `NumericSet` -> `SerializedLiteral` -> JSON -> back round-trips to a
    /// setic-equal value, regardless of how many disjoint intervals it has.
    #[test]
    fn numeric_set_json_round_trip(s in numeric_set_strategy()) {
        let wire = serial::SerializedLiteral::from(&s);
        let json = serial::to_json(&wire);
        let back_wire = serial::from_json(&json).unwrap();
        let back = NumericSet::try_from(&back_wire).unwrap();
        prop_assert!(s.setic_equals(&back));
    }

    /// `CountSet` union is commutative and idempotent, and every value
    /// drawn into it is reachable via `contains`.
    #[test]
    fn count_set_union_commutative_and_idempotent(a in prop::collection::vec(-500i64..500, 0..10), b in prop::collection::vec(-500i64..500, 0..10)) {
        let sa = CountSet::new(a.clone());
        let sb = CountSet::new(b.clone());
        let u1 = sa.union(&sb);
        let u2 = sb.union(&sa);
        prop_assert!(u1.setic_equals(&u2));
        prop_assert!(u1.setic_equals(&u1.union(&u1)));
        for v in &a {
            prop_assert!(u1.contains(v));
        }
    }

    /// `mul` always composes basis vectors additively regardless of the
    /// operands' magnitudes, so multiplying two `Numbers` with volts and
    /// amps always lands on watts' basis.
    #[test]
    fn mul_always_composes_unit_basis((v, a) in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0)) {
        let volts = Numbers::singleton(v, Some(VOLT));
        let amps = Numbers::singleton(a, Some(AMPERE));
        let watts = volts.mul(&amps);
        prop_assert_eq!(watts.unit.unwrap().basis, [1, 2, -3, 0, 0, 0, 0]);
    }

    /// Adding a value to itself under a commensurable (here: identical)
    /// unit never fails the commensurability guard, and halves of the
    /// result recover the original singleton.
    #[test]
    fn add_self_is_commensurable_and_doubles(v in -1_000.0f64..1_000.0) {
        let ohms = Numbers::singleton(v, Some(OHM));
        let doubled = ohms.add(&ohms).unwrap();
        prop_assert!((doubled.get_single().unwrap() - 2.0 * v).abs() < 1e-6);
    }
}
