//! The unit system: a compile-time-known basis over the seven SI base
//! quantities, commensurability checks, and derived-unit arithmetic.
//!
//! A unit is a basis vector `(kg, m, s, A, K, mol, cd)` plus a linear scale
//! factor relative to that basis' SI-coherent unit (so `MilliVolt` shares
//! `Volt`'s basis with `scale = 1e-3`). The basis entries are small signed
//! exponents, which is why [`Basis`] is `[i8; 7]` rather than anything
//! wider.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Exponents of `(kg, m, s, A, K, mol, cd)`.
pub type Basis = [i8; 7];

pub const DIMENSIONLESS: Basis = [0; 7];

const BASIS_SYMBOLS: [&str; 7] = ["kg", "m", "s", "A", "K", "mol", "cd"];

/// A unit: a basis vector and a scale factor relative to the SI-coherent
/// unit sharing that basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub basis: Basis,
    pub scale: f64,
}

impl Unit {
    pub const fn new(basis: Basis, scale: f64) -> Self {
        Self { basis, scale }
    }

    pub const fn dimensionless() -> Self {
        Self::new(DIMENSIONLESS, 1.0)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.basis == DIMENSIONLESS
    }
}

/// `None` stands for "no unit was ever attached", which the specification
/// treats as commensurable with anything (one-sided absence matches any
/// unit; two absences match each other).
pub fn is_commensurable_with(a: Option<&Unit>, b: Option<&Unit>) -> bool {
    match (a, b) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => a.basis == b.basis,
    }
}

/// Converts a value expressed in `from` into the equivalent value expressed
/// in `to`. Fails if the two units are not commensurable.
pub fn convert_value(v: f64, from: Option<&Unit>, to: Option<&Unit>) -> GraphResult<f64> {
    if !is_commensurable_with(from, to) {
        return Err(GraphError::UnitsNotCommensurable);
    }
    let from_scale = from.map(|u| u.scale).unwrap_or(1.0);
    let to_scale = to.map(|u| u.scale).unwrap_or(1.0);
    Ok(v * from_scale / to_scale)
}

fn basis_add(a: Basis, b: Basis, sign: i8) -> Basis {
    let mut out = DIMENSIONLESS;
    for i in 0..7 {
        out[i] = a[i] + sign * b[i];
    }
    out
}

/// Composes two (optional) units under multiplication, treating an absent
/// unit as dimensionless.
pub fn op_multiply(a: Option<&Unit>, b: Option<&Unit>) -> Unit {
    let a = a.copied().unwrap_or_else(Unit::dimensionless);
    let b = b.copied().unwrap_or_else(Unit::dimensionless);
    Unit::new(basis_add(a.basis, b.basis, 1), a.scale * b.scale)
}

/// Composes two (optional) units under division.
pub fn op_divide(a: Option<&Unit>, b: Option<&Unit>) -> Unit {
    let a = a.copied().unwrap_or_else(Unit::dimensionless);
    let b = b.copied().unwrap_or_else(Unit::dimensionless);
    Unit::new(basis_add(a.basis, b.basis, -1), a.scale / b.scale)
}

/// Inverts a unit (`1 / u`).
pub fn op_invert(a: Option<&Unit>) -> Unit {
    let a = a.copied().unwrap_or_else(Unit::dimensionless);
    let mut basis = DIMENSIONLESS;
    for i in 0..7 {
        basis[i] = -a.basis[i];
    }
    Unit::new(basis, 1.0 / a.scale)
}

/// Raises a unit to a power. Only integral exponents are representable in
/// the basis (exponents are `i8`), so `e` must round to an integer within
/// floating point noise; otherwise the caller gets [`GraphError::IncompatibleTypes`]
/// (e.g. `sqrt(1 Ω)` is not a representable unit, but `sqrt(1 Ω^2)` is).
pub fn op_pow(a: Option<&Unit>, e: f64) -> GraphResult<Unit> {
    let a = a.copied().unwrap_or_else(Unit::dimensionless);
    if a.is_dimensionless() {
        return Ok(Unit::dimensionless());
    }
    let mut basis = DIMENSIONLESS;
    for i in 0..7 {
        let scaled = a.basis[i] as f64 * e;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-9 || rounded < i8::MIN as f64 || rounded > i8::MAX as f64 {
            return Err(GraphError::IncompatibleTypes);
        }
        basis[i] = rounded as i8;
    }
    Ok(Unit::new(basis, a.scale.powf(e)))
}

/// Known SI-coherent and commonly-prefixed units, used both by tests and by
/// callers that want a ready-made [`Unit`] rather than building a basis
/// vector by hand.
pub mod known {
    use super::Unit;

    pub const DIMENSIONLESS: Unit = Unit::new(super::DIMENSIONLESS, 1.0);
    pub const KILOGRAM: Unit = Unit::new([1, 0, 0, 0, 0, 0, 0], 1.0);
    pub const METER: Unit = Unit::new([0, 1, 0, 0, 0, 0, 0], 1.0);
    pub const SECOND: Unit = Unit::new([0, 0, 1, 0, 0, 0, 0], 1.0);
    pub const AMPERE: Unit = Unit::new([0, 0, 0, 1, 0, 0, 0], 1.0);
    pub const KELVIN: Unit = Unit::new([0, 0, 0, 0, 1, 0, 0], 1.0);
    pub const MOLE: Unit = Unit::new([0, 0, 0, 0, 0, 1, 0], 1.0);
    pub const CANDELA: Unit = Unit::new([0, 0, 0, 0, 0, 0, 1], 1.0);

    pub const VOLT: Unit = Unit::new([1, 2, -3, -1, 0, 0, 0], 1.0);
    pub const MILLIVOLT: Unit = Unit::new([1, 2, -3, -1, 0, 0, 0], 1e-3);
    pub const MICROVOLT: Unit = Unit::new([1, 2, -3, -1, 0, 0, 0], 1e-6);
    pub const KILOVOLT: Unit = Unit::new([1, 2, -3, -1, 0, 0, 0], 1e3);

    pub const AMPERE_MILLI: Unit = Unit::new([0, 0, 0, 1, 0, 0, 0], 1e-3);
    pub const AMPERE_MICRO: Unit = Unit::new([0, 0, 0, 1, 0, 0, 0], 1e-6);

    pub const WATT: Unit = Unit::new([1, 2, -3, 0, 0, 0, 0], 1.0);
    pub const MILLIWATT: Unit = Unit::new([1, 2, -3, 0, 0, 0, 0], 1e-3);

    pub const OHM: Unit = Unit::new([1, 2, -3, -2, 0, 0, 0], 1.0);
    pub const KILOOHM: Unit = Unit::new([1, 2, -3, -2, 0, 0, 0], 1e3);
    pub const MILLIOHM: Unit = Unit::new([1, 2, -3, -2, 0, 0, 0], 1e-3);

    pub const FARAD: Unit = Unit::new([-1, -2, 4, 2, 0, 0, 0], 1.0);
    pub const MICROFARAD: Unit = Unit::new([-1, -2, 4, 2, 0, 0, 0], 1e-6);
    pub const NANOFARAD: Unit = Unit::new([-1, -2, 4, 2, 0, 0, 0], 1e-9);
    pub const PICOFARAD: Unit = Unit::new([-1, -2, 4, 2, 0, 0, 0], 1e-12);

    pub const HERTZ: Unit = Unit::new([0, 0, -1, 0, 0, 0, 0], 1.0);
    pub const KILOHERTZ: Unit = Unit::new([0, 0, -1, 0, 0, 0, 0], 1e3);
    pub const MEGAHERTZ: Unit = Unit::new([0, 0, -1, 0, 0, 0, 0], 1e6);

    pub const COULOMB: Unit = Unit::new([0, 0, 1, 1, 0, 0, 0], 1.0);
    pub const HENRY: Unit = Unit::new([1, 2, -2, -2, 0, 0, 0], 1.0);
}

/// Table of known basis vectors to their SI symbol, used by [`compact_repr`].
fn known_symbol(basis: &Basis) -> Option<&'static str> {
    use known::*;
    let table: &[(Unit, &str)] = &[
        (VOLT, "V"),
        (AMPERE, "A"),
        (WATT, "W"),
        (OHM, "\u{3a9}"), // Ω
        (FARAD, "F"),
        (HERTZ, "Hz"),
        (COULOMB, "C"),
        (HENRY, "H"),
        (SECOND, "s"),
        (METER, "m"),
        (KILOGRAM, "kg"),
        (KELVIN, "K"),
        (MOLE, "mol"),
        (CANDELA, "cd"),
    ];
    table.iter().find(|(u, _)| &u.basis == basis).map(|(_, s)| *s)
}

/// Compact textual representation of a unit's *dimension* (not its
/// magnitude): the SI symbol when the basis matches a known unit,
/// otherwise a dimensional expression like `kg*m^2*s^-3`. The empty basis
/// renders as `""` (dimensionless).
pub fn compact_repr(unit: Option<&Unit>) -> String {
    let Some(unit) = unit else { return String::new() };
    if unit.is_dimensionless() {
        return String::new();
    }
    if let Some(sym) = known_symbol(&unit.basis) {
        return sym.to_string();
    }
    let mut parts = Vec::new();
    for (i, exp) in unit.basis.iter().enumerate() {
        if *exp == 0 {
            continue;
        }
        if *exp == 1 {
            parts.push(BASIS_SYMBOLS[i].to_string());
        } else {
            parts.push(format!("{}^{}", BASIS_SYMBOLS[i], exp));
        }
    }
    parts.join("*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use known::*;

    #[test]
    fn commensurability_is_symmetric_and_absence_matches_anything() {
        assert!(is_commensurable_with(None, None));
        assert!(is_commensurable_with(Some(&VOLT), None));
        assert!(is_commensurable_with(None, Some(&VOLT)));
        assert!(is_commensurable_with(Some(&VOLT), Some(&MILLIVOLT)));
        assert!(!is_commensurable_with(Some(&VOLT), Some(&SECOND)));
    }

    #[test]
    fn convert_value_scales_correctly() {
        let v = convert_value(1.0, Some(&VOLT), Some(&MILLIVOLT)).unwrap();
        assert!((v - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn convert_incommensurable_fails() {
        assert_eq!(
            convert_value(1.0, Some(&VOLT), Some(&SECOND)),
            Err(GraphError::UnitsNotCommensurable)
        );
    }

    #[test]
    fn multiply_volt_by_ampere_yields_watt_basis() {
        let w = op_multiply(Some(&VOLT), Some(&AMPERE));
        assert_eq!(w.basis, WATT.basis);
    }

    #[test]
    fn divide_volt_by_ampere_yields_ohm_basis() {
        let ohm = op_divide(Some(&VOLT), Some(&AMPERE));
        assert_eq!(ohm.basis, OHM.basis);
    }

    #[test]
    fn invert_is_its_own_inverse() {
        let inv = op_invert(Some(&OHM));
        let back = op_invert(Some(&inv));
        assert_eq!(back.basis, OHM.basis);
    }

    #[test]
    fn pow_requires_integral_basis_scaling() {
        let ohm_squared = Unit::new([2, 4, -6, -4, 0, 0, 0], 1.0);
        assert!(op_pow(Some(&ohm_squared), 0.5).is_ok());
        assert!(op_pow(Some(&OHM), 0.5).is_err());
    }

    #[test]
    fn compact_repr_uses_si_symbols() {
        assert_eq!(compact_repr(Some(&WATT)), "W");
        assert_eq!(compact_repr(Some(&OHM)), "\u{3a9}");
        assert_eq!(compact_repr(None), "");
        assert_eq!(compact_repr(Some(&Unit::dimensionless())), "");
    }
}
