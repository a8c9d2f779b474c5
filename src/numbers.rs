//! `Numbers`: a [`NumericSet`] paired with an optional [`Unit`], and the
//! unit-checked arithmetic built on top of both.
//!
//! Per the specification, commensurability is enforced for every operation
//! that *combines* two intervals as if they were the same quantity (`add`,
//! `sub`, the comparisons, and the setic family); it is deliberately *not*
//! enforced for `mul`/`div`, whose whole point is to combine distinct
//! units into a derived one (`V * A -> W`). See `DESIGN.md` for this
//! reading of an otherwise self-contradictory paragraph in the spec.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::numeric_set::NumericSet;
use crate::sets::BooleanSet;
use crate::units::{self, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Numbers {
    pub set: NumericSet,
    pub unit: Option<Unit>,
}

impl Numbers {
    pub fn new(set: NumericSet, unit: Option<Unit>) -> Self {
        Self { set, unit }
    }

    pub fn singleton(v: f64, unit: Option<Unit>) -> Self {
        Self::new(NumericSet::setup_from_singleton(v), unit)
    }

    pub fn singletons(values: impl IntoIterator<Item = f64>, unit: Option<Unit>) -> GraphResult<Self> {
        Ok(Self::new(NumericSet::setup_from_singletons(values)?, unit))
    }

    pub fn from_center_rel(c: f64, r: f64, unit: Option<Unit>) -> GraphResult<Self> {
        Ok(Self::new(NumericSet::setup_from_center_rel(c, r)?, unit))
    }

    pub fn unbounded(unit: Option<Unit>) -> Self {
        Self::new(NumericSet::unbounded(), unit)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.set.is_singleton()
    }

    pub fn get_single(&self) -> GraphResult<f64> {
        self.set.get_single()
    }

    pub fn any(&self) -> GraphResult<f64> {
        self.set.any()
    }

    fn commensurable(&self, other: &Self) -> bool {
        units::is_commensurable_with(self.unit.as_ref(), other.unit.as_ref())
    }

    /// `other`'s interval set, converted into `self`'s unit. Fails if the
    /// two units are not commensurable.
    fn converted_other(&self, other: &Self) -> GraphResult<NumericSet> {
        if !self.commensurable(other) {
            return Err(GraphError::UnitsNotCommensurable);
        }
        let intervals = other
            .set
            .intervals()
            .iter()
            .map(|iv| {
                let min = units::convert_value(iv.min, other.unit.as_ref(), self.unit.as_ref())?;
                let max = units::convert_value(iv.max, other.unit.as_ref(), self.unit.as_ref())?;
                crate::numeric_set::Interval::new(min.min(max), min.max(max))
            })
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(NumericSet::setup_from_intervals(intervals))
    }

    // -- arithmetic (commensurable-only) --------------------------------

    pub fn add(&self, other: &Self) -> GraphResult<Self> {
        let converted = self.converted_other(other)?;
        Ok(Self::new(self.set.add(&converted), self.unit))
    }

    pub fn sub(&self, other: &Self) -> GraphResult<Self> {
        let converted = self.converted_other(other)?;
        Ok(Self::new(self.set.sub(&converted), self.unit))
    }

    // -- arithmetic (unit-composing, commensurability not required) -----

    pub fn mul(&self, other: &Self) -> Self {
        let unit = units::op_multiply(self.unit.as_ref(), other.unit.as_ref());
        let unit = if unit.is_dimensionless() && self.unit.is_none() && other.unit.is_none() {
            None
        } else {
            Some(unit)
        };
        Self::new(self.set.mul(&other.set), unit)
    }

    pub fn div(&self, other: &Self) -> Self {
        let unit = units::op_divide(self.unit.as_ref(), other.unit.as_ref());
        let unit = if unit.is_dimensionless() && self.unit.is_none() && other.unit.is_none() {
            None
        } else {
            Some(unit)
        };
        Self::new(self.set.div(&other.set), unit)
    }

    pub fn pow(&self, e: f64) -> GraphResult<Self> {
        let unit = match &self.unit {
            None => None,
            Some(u) => Some(units::op_pow(Some(u), e)?),
        };
        Ok(Self::new(self.set.pow(e), unit))
    }

    pub fn sqrt(&self) -> GraphResult<Self> {
        self.pow(0.5)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.set.abs(), self.unit)
    }

    pub fn neg(&self) -> Self {
        Self::new(self.set.neg(), self.unit)
    }

    pub fn round(&self, n: i32) -> Self {
        Self::new(self.set.round(n), self.unit)
    }

    pub fn floor(&self) -> Self {
        Self::new(self.set.floor(), self.unit)
    }

    pub fn ceil(&self) -> Self {
        Self::new(self.set.ceil(), self.unit)
    }

    // -- comparisons ------------------------------------------------------

    pub fn ge(&self, other: &Self) -> GraphResult<BooleanSet> {
        Ok(self.set.ge(&self.converted_other(other)?))
    }

    pub fn gt(&self, other: &Self) -> GraphResult<BooleanSet> {
        Ok(self.set.gt(&self.converted_other(other)?))
    }

    pub fn le(&self, other: &Self) -> GraphResult<BooleanSet> {
        Ok(self.set.le(&self.converted_other(other)?))
    }

    pub fn lt(&self, other: &Self) -> GraphResult<BooleanSet> {
        Ok(self.set.lt(&self.converted_other(other)?))
    }

    pub fn uncertainty_equals(&self, other: &Self) -> GraphResult<BooleanSet> {
        Ok(self.set.uncertainty_equals(&self.converted_other(other)?))
    }

    // -- setic --------------------------------------------------------------

    pub fn setic_is_subset_of(&self, other: &Self) -> bool {
        match self.converted_other(other) {
            Ok(converted) => self.set.is_subset_of(&converted),
            Err(_) => false,
        }
    }

    pub fn setic_is_superset_of(&self, other: &Self) -> bool {
        other.setic_is_subset_of(self)
    }

    pub fn setic_equals(&self, other: &Self) -> bool {
        self.setic_is_subset_of(other) && other.setic_is_subset_of(self)
    }

    pub fn intersect(&self, other: &Self) -> GraphResult<Self> {
        let converted = self.converted_other(other)?;
        Ok(Self::new(self.set.intersect(&converted), self.unit))
    }

    pub fn union(&self, other: &Self) -> GraphResult<Self> {
        let converted = self.converted_other(other)?;
        Ok(Self::new(self.set.union(&converted), self.unit))
    }

    pub fn symmetric_difference(&self, other: &Self) -> GraphResult<Self> {
        let converted = self.converted_other(other)?;
        Ok(Self::new(self.set.symmetric_difference(&converted), self.unit))
    }

    pub fn op_total_span(&self) -> f64 {
        self.set.op_total_span()
    }

    pub fn op_deviation_to(&self, other: &Self, relative: bool) -> GraphResult<f64> {
        let converted = self.converted_other(other)?;
        Ok(self.set.op_deviation_to(&converted, relative))
    }

    /// Deterministic pretty-printer: chooses an SI prefix from a
    /// representative magnitude, then renders singleton / discrete-set /
    /// tolerance / range / unbounded forms as described in the
    /// specification.
    pub fn pretty_str(&self) -> String {
        let unit_str = units::compact_repr(self.unit.as_ref());
        let intervals = self.set.intervals();
        if intervals.is_empty() {
            return format!("{{}}{}", unit_str);
        }

        if self.set.is_unbounded() {
            return render_unbounded(&self.set, &unit_str);
        }

        if intervals.len() > 1 && intervals.iter().all(|iv| iv.is_point()) {
            let rendered: Vec<String> = intervals.iter().map(|iv| format_scaled(iv.min, &unit_str).0).collect();
            let (_, prefix_unit) = format_scaled(representative_magnitude(&self.set), &unit_str);
            return format!("{{{}}}{}", rendered.join(", "), prefix_unit);
        }

        if intervals.len() == 1 {
            let iv = intervals[0];
            if iv.is_point() {
                let (text, prefix_unit) = format_scaled(iv.min, &unit_str);
                return format!("{}{}", text, prefix_unit);
            }
            let center = (iv.min + iv.max) / 2.0;
            let half_width = (iv.max - iv.min) / 2.0;
            let rel_tol = if center != 0.0 { half_width / center.abs() } else { f64::INFINITY };
            if rel_tol < 0.25 {
                let (center_text, prefix_unit) = format_scaled(center, &unit_str);
                let pct = rel_tol * 100.0;
                return format!("{}\u{b1}{:.*}%{}", center_text, PRINT_DIGITS_AFTER_DOT, pct, prefix_unit);
            }
            let (lo_text, prefix_unit) = format_scaled(iv.min, &unit_str);
            let hi_text = format_scaled(iv.max, &unit_str).0;
            return format!("{}..{}{}", lo_text, hi_text, prefix_unit);
        }

        // Multiple disjoint, non-point intervals: render each range joined.
        let (_, prefix_unit) = format_scaled(representative_magnitude(&self.set), &unit_str);
        let rendered: Vec<String> = intervals
            .iter()
            .map(|iv| {
                if iv.is_point() {
                    format_scaled(iv.min, &unit_str).0
                } else {
                    format!("{}..{}", format_scaled(iv.min, &unit_str).0, format_scaled(iv.max, &unit_str).0)
                }
            })
            .collect();
        format!("{}{}", rendered.join(", "), prefix_unit)
    }
}

const PRINT_DIGITS_AFTER_DOT: usize = 1;

fn representative_magnitude(set: &NumericSet) -> f64 {
    let hull = set.as_gapless();
    hull.min.abs().max(hull.max.abs())
}

const PREFIXES: [(f64, &str); 9] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "\u{b5}"), // µ
    (1e-9, "n"),
    (1e-12, "p"),
];

fn choose_prefix(magnitude: f64) -> (f64, &'static str) {
    if magnitude == 0.0 || !magnitude.is_finite() {
        return (1.0, "");
    }
    for (factor, sym) in PREFIXES {
        if magnitude >= factor {
            return (factor, sym);
        }
    }
    *PREFIXES.last().unwrap()
}

/// Formats `value` using the SI prefix derived from its own magnitude,
/// returning `(formatted number, prefix + unit suffix)`.
fn format_scaled(value: f64, unit: &str) -> (String, String) {
    let (factor, prefix) = choose_prefix(value.abs());
    let scaled = value / factor;
    let text = format_digits(scaled);
    (text, format!("{}{}", prefix, unit))
}

fn format_digits(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (crate::numeric_set::PRINT_DIGITS as i32 - 1 - magnitude).max(0) as usize;
    let s = format!("{:.*}", decimals, v);
    trim_trailing_zeros(&s)
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    let trimmed = trimmed.trim_end_matches('.');
    trimmed.to_string()
}

fn render_unbounded(set: &NumericSet, unit: &str) -> String {
    let iv = set.as_gapless();
    match (iv.min.is_finite(), iv.max.is_finite()) {
        (false, false) => format!("\u{211d}{}", unit),
        (true, false) if iv.min >= 0.0 => format!("\u{211d}+{}", unit),
        (false, true) if iv.max <= 0.0 => format!("\u{211d}\u{207b}{}", unit),
        (true, false) => format!("\u{2265}{}{}", format_scaled(iv.min, unit).0, unit),
        (false, true) => format!("\u{2264}{}{}", format_scaled(iv.max, unit).0, unit),
        (true, true) => format!("{}..{}{}", format_scaled(iv.min, unit).0, format_scaled(iv.max, unit).0, unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::known::*;

    #[test]
    fn multiply_with_units_composes_basis() {
        let v = Numbers::singleton(2.0, Some(VOLT));
        let a = Numbers::singleton(3.0, Some(AMPERE));
        let w = v.mul(&a);
        assert_eq!(w.get_single().unwrap(), 6.0);
        assert_eq!(w.unit.unwrap().basis, WATT.basis);
    }

    #[test]
    fn commensurability_guard_on_intersect() {
        let v = Numbers::singleton(1.0, Some(VOLT));
        let s = Numbers::singleton(1.0, Some(SECOND));
        assert_eq!(v.intersect(&s), Err(GraphError::UnitsNotCommensurable));
        assert!(!v.setic_is_subset_of(&s));
    }

    #[test]
    fn unit_conversion_preserved_on_add() {
        let v = Numbers::singleton(1.0, Some(VOLT));
        let mv = Numbers::singleton(500.0, Some(MILLIVOLT));
        let sum = v.add(&mv).unwrap();
        assert!((sum.get_single().unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn division_crossing_zero_is_unbounded() {
        let a = Numbers::new(NumericSet::setup_from_values([(1.0, 2.0)]).unwrap(), None);
        let b = Numbers::new(NumericSet::setup_from_values([(-1.0, 1.0)]).unwrap(), None);
        let r = a.div(&b);
        assert!(r.set.is_unbounded());
    }

    #[test]
    fn pretty_print_contains_watt_and_uses_range_syntax() {
        let v = Numbers::new(NumericSet::setup_from_values([(0.9, 1.1)]).unwrap(), Some(VOLT));
        let a = Numbers::new(NumericSet::setup_from_values([(1.8, 2.2)]).unwrap(), Some(AMPERE));
        let w = v.mul(&a);
        let text = w.pretty_str();
        assert!(text.contains('W'));
        assert!(!text.contains('['));
    }

    #[test]
    fn round_trip_convert_preserves_value() {
        let a = Numbers::singleton(1.0, Some(VOLT));
        let as_mv = units::convert_value(a.get_single().unwrap(), Some(&VOLT), Some(&MILLIVOLT)).unwrap();
        let mv = Numbers::singleton(as_mv, Some(MILLIVOLT));
        let back = units::convert_value(mv.get_single().unwrap(), Some(&MILLIVOLT), Some(&VOLT)).unwrap();
        let back = Numbers::singleton(back, Some(VOLT));
        assert!(back.setic_equals(&a));
    }

    #[test]
    fn pow_requires_integral_unit_scaling() {
        let ohm = Numbers::singleton(4.0, Some(OHM));
        assert!(ohm.pow(0.5).is_err());
        let ohm_sq = Numbers::singleton(4.0, Some(units::Unit::new([2, 4, -6, -4, 0, 0, 0], 1.0)));
        assert!(ohm_sq.pow(0.5).is_ok());
    }

    #[test]
    fn dimensionless_sqrt_is_unrestricted() {
        let n = Numbers::singleton(4.0, None);
        let r = n.sqrt().unwrap();
        assert_eq!(r.get_single().unwrap(), 2.0);
    }
}
