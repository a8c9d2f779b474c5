//! `NumericSet`: a normalized, sorted list of disjoint closed intervals, and
//! the interval arithmetic built on top of it.
//!
//! This is the unit-less engine underneath [`crate::numbers::Numbers`]; see
//! that module for the unit-checked wrapper callers actually build
//! constraints with.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::sets::BooleanSet;

pub const REL_DIGITS: i32 = 7;
pub const ABS_DIGITS: i32 = 15;
pub const EPSILON_ABS: f64 = 1e-15;
pub const EPSILON_REL: f64 = 1e-6;
pub const PRINT_DIGITS: usize = 3;

/// A single closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> GraphResult<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(GraphError::InvalidArgument("NaN is not a valid interval bound".to_string()));
        }
        if min > max {
            return Err(GraphError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// Builds an interval without re-validating `min <= max`; used
    /// internally once a computation has already established the
    /// invariant (e.g. after sorting two candidate bounds).
    fn new_unchecked(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min - EPSILON_ABS && v <= self.max + EPSILON_ABS
    }

    pub fn is_point(&self) -> bool {
        (self.max - self.min).abs() <= EPSILON_ABS
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    fn overlaps_or_touches(&self, other: &Interval) -> bool {
        other.min <= self.max + EPSILON_ABS
    }
}

/// A normalized, sorted, non-overlapping collection of [`Interval`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NumericSet {
    intervals: Vec<Interval>,
}

fn normalize(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by(|a, b| a.min.total_cmp(&b.min));
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if last.overlaps_or_touches(&iv) => {
                last.max = last.max.max(iv.max);
            }
            _ => merged.push(iv),
        }
    }
    merged
}

impl NumericSet {
    pub fn empty() -> Self {
        Self { intervals: Vec::new() }
    }

    pub fn unbounded() -> Self {
        Self {
            intervals: vec![Interval::new_unchecked(f64::NEG_INFINITY, f64::INFINITY)],
        }
    }

    /// Builds a set from raw `(min, max)` pairs, sorting by `min` and
    /// merging any pair whose gap is within [`EPSILON_ABS`].
    pub fn setup_from_values(values: impl IntoIterator<Item = (f64, f64)>) -> GraphResult<Self> {
        let mut intervals = Vec::new();
        for (min, max) in values {
            intervals.push(Interval::new(min, max)?);
        }
        Ok(Self { intervals: normalize(intervals) })
    }

    pub fn setup_from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        Self { intervals: normalize(intervals.into_iter().collect()) }
    }

    pub fn setup_from_singleton(v: f64) -> Self {
        Self { intervals: vec![Interval::point(v)] }
    }

    pub fn setup_from_singletons(values: impl IntoIterator<Item = f64>) -> GraphResult<Self> {
        let intervals: Vec<Interval> = values.into_iter().map(Interval::point).collect();
        if intervals.iter().any(|iv| iv.min.is_nan()) {
            return Err(GraphError::InvalidArgument("NaN is not a valid value".to_string()));
        }
        Ok(Self { intervals: normalize(intervals) })
    }

    /// `[c - r*c, c + r*c]`, the center/relative-tolerance constructor used
    /// for expressing things like "10 kΩ ± 1 %".
    pub fn setup_from_center_rel(c: f64, r: f64) -> GraphResult<Self> {
        let a = c - r * c;
        let b = c + r * c;
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self { intervals: vec![Interval::new(min, max)?] })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].is_point()
    }

    pub fn get_single(&self) -> GraphResult<f64> {
        if self.is_singleton() {
            Ok(self.intervals[0].min)
        } else {
            Err(GraphError::NotSingleton)
        }
    }

    pub fn any(&self) -> GraphResult<f64> {
        self.intervals
            .first()
            .map(|iv| iv.min)
            .ok_or_else(|| GraphError::InvalidArgument("set is empty".to_string()))
    }

    pub fn contains(&self, v: f64) -> bool {
        self.intervals.iter().any(|iv| iv.contains(v))
    }

    pub fn min_elem(&self) -> Option<f64> {
        self.intervals.first().map(|iv| iv.min)
    }

    pub fn max_elem(&self) -> Option<f64> {
        self.intervals.last().map(|iv| iv.max)
    }

    /// The convex hull: the single interval spanning every member.
    pub fn as_gapless(&self) -> Interval {
        match (self.min_elem(), self.max_elem()) {
            (Some(min), Some(max)) => Interval::new_unchecked(min, max),
            _ => Interval::new_unchecked(0.0, 0.0),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.intervals.iter().any(|iv| !iv.is_finite())
    }

    pub fn is_finite(&self) -> bool {
        !self.is_unbounded()
    }

    pub fn is_integer(&self) -> bool {
        self.intervals
            .iter()
            .all(|iv| iv.is_finite() && iv.min.fract() == 0.0 && iv.max.fract() == 0.0)
    }

    /// Two-pointer sweep: every interval of `self` must be enclosed (within
    /// `EPSILON_ABS`) by some interval of `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        'outer: for a in &self.intervals {
            for b in &other.intervals {
                if b.min - EPSILON_ABS <= a.min && a.max <= b.max + EPSILON_ABS {
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    pub fn setic_equals(&self, other: &Self) -> bool {
        self.is_subset_of(other) && other.is_subset_of(self)
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                let min = a.min.max(b.min);
                let max = a.max.min(b.max);
                if min <= max {
                    out.push(Interval::new_unchecked(min, max));
                }
            }
        }
        Self { intervals: normalize(out) }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.intervals.clone();
        out.extend(other.intervals.iter().copied());
        Self { intervals: normalize(out) }
    }

    /// `(a union b) \ (a intersect b)`, computed by cutting every interval
    /// of the union against every interval of the intersection and keeping
    /// the surviving fragments.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let union = self.union(other);
        let intersection = self.intersect(other);
        let mut fragments = union.intervals;
        for cut in &intersection.intervals {
            let mut next = Vec::new();
            for frag in fragments {
                if cut.max < frag.min - EPSILON_ABS || cut.min > frag.max + EPSILON_ABS {
                    next.push(frag);
                    continue;
                }
                if cut.min > frag.min + EPSILON_ABS {
                    next.push(Interval::new_unchecked(frag.min, cut.min));
                }
                if cut.max < frag.max - EPSILON_ABS {
                    next.push(Interval::new_unchecked(cut.max, frag.max));
                }
            }
            fragments = next;
        }
        Self { intervals: normalize(fragments) }
    }

    pub fn op_total_span(&self) -> f64 {
        self.intervals.iter().map(|iv| (iv.max - iv.min).abs()).sum()
    }

    pub fn op_deviation_to(&self, other: &Self, relative: bool) -> f64 {
        let span = self.symmetric_difference(other).op_total_span();
        if !relative {
            return span;
        }
        let scale = self.as_gapless().max.abs().max(other.as_gapless().max.abs()).max(
            self.as_gapless().min.abs().max(other.as_gapless().min.abs()),
        );
        if scale == 0.0 {
            span
        } else {
            span / scale
        }
    }

    // -- arithmetic ---------------------------------------------------

    pub fn add(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                out.push(Interval::new_unchecked(a.min + b.min, a.max + b.max));
            }
        }
        Self { intervals: normalize(out) }
    }

    pub fn sub(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                out.push(Interval::new_unchecked(a.min - b.max, a.max - b.min));
            }
        }
        Self { intervals: normalize(out) }
    }

    /// Cartesian corner products over every pair of intervals.
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                let corners = [a.min * b.min, a.min * b.max, a.max * b.min, a.max * b.max];
                let min = corners.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                out.push(Interval::new_unchecked(min, max));
            }
        }
        Self { intervals: normalize(out) }
    }

    /// Division. Any divisor interval that touches or crosses zero
    /// contributes `[-inf, +inf]` to the result.
    pub fn div(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                if b.min <= 0.0 && b.max >= 0.0 {
                    out.push(Interval::new_unchecked(f64::NEG_INFINITY, f64::INFINITY));
                    continue;
                }
                let inv = Interval::new_unchecked(1.0 / b.max, 1.0 / b.min);
                let corners = [a.min * inv.min, a.min * inv.max, a.max * inv.min, a.max * inv.max];
                let min = corners.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                out.push(Interval::new_unchecked(min, max));
            }
        }
        Self { intervals: normalize(out) }
    }

    pub fn pow(&self, e: f64) -> Self {
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| {
                let a = iv.min.powf(e);
                let b = iv.max.powf(e);
                Interval::new_unchecked(a.min(b), a.max(b))
            })
            .collect();
        Self { intervals: normalize(out) }
    }

    pub fn abs(&self) -> Self {
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| {
                if iv.max <= 0.0 {
                    Interval::new_unchecked(iv.max.abs(), iv.min.abs())
                } else if iv.min >= 0.0 {
                    *iv
                } else {
                    Interval::new_unchecked(0.0, iv.min.abs().max(iv.max.abs()))
                }
            })
            .collect();
        Self { intervals: normalize(out) }
    }

    pub fn neg(&self) -> Self {
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| Interval::new_unchecked(-iv.max, -iv.min))
            .collect();
        Self { intervals: normalize(out) }
    }

    pub fn round(&self, n: i32) -> Self {
        let factor = 10f64.powi(n);
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| Interval::new_unchecked((iv.min * factor).round() / factor, (iv.max * factor).round() / factor))
            .collect();
        Self { intervals: normalize(out) }
    }

    pub fn floor(&self) -> Self {
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| Interval::new_unchecked(iv.min.floor(), iv.max.floor()))
            .collect();
        Self { intervals: normalize(out) }
    }

    pub fn ceil(&self) -> Self {
        let out: Vec<Interval> = self
            .intervals
            .iter()
            .map(|iv| Interval::new_unchecked(iv.min.ceil(), iv.max.ceil()))
            .collect();
        Self { intervals: normalize(out) }
    }

    // -- comparisons ----------------------------------------------------

    pub fn ge(&self, other: &Self) -> BooleanSet {
        let (a, b) = (self.as_gapless(), other.as_gapless());
        if a.min >= b.max {
            BooleanSet::new([true])
        } else if a.max < b.min {
            BooleanSet::new([false])
        } else {
            BooleanSet::new([false, true])
        }
    }

    pub fn gt(&self, other: &Self) -> BooleanSet {
        let (a, b) = (self.as_gapless(), other.as_gapless());
        if a.min > b.max {
            BooleanSet::new([true])
        } else if a.max <= b.min {
            BooleanSet::new([false])
        } else {
            BooleanSet::new([false, true])
        }
    }

    pub fn le(&self, other: &Self) -> BooleanSet {
        other.ge(self)
    }

    pub fn lt(&self, other: &Self) -> BooleanSet {
        other.gt(self)
    }

    pub fn uncertainty_equals(&self, other: &Self) -> BooleanSet {
        if self.is_singleton() && other.is_singleton() {
            if (self.intervals[0].min - other.intervals[0].min).abs() <= EPSILON_ABS {
                return BooleanSet::new([true]);
            }
        }
        if self.intersect(other).is_empty() {
            BooleanSet::new([false])
        } else {
            BooleanSet::new([false, true])
        }
    }
}
