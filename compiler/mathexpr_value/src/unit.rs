//! Physical units.
//!
//! A small fixed table covering length, mass and time. A [`Unit`] carries an
//! optional magnitude expressed in its own unit; `cm` alone is valueless and
//! `5 cm` has value `5`.

use std::fmt;

use mathexpr_ir::format_number;

use crate::errors::{type_error, EvalResult};

use Dimension::{Length, Mass, Time};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Mass,
    Time,
}

/// One row of the unit table. `factor` converts to the SI base unit of the
/// dimension (metre, kilogram, second).
#[derive(Debug, PartialEq)]
pub struct UnitDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub dimension: Dimension,
    pub factor: f64,
}

const fn unit(
    name: &'static str,
    aliases: &'static [&'static str],
    dimension: Dimension,
    factor: f64,
) -> UnitDef {
    UnitDef {
        name,
        aliases,
        dimension,
        factor,
    }
}

static UNITS: &[UnitDef] = &[
    unit("m", &["meter", "meters", "metre", "metres"], Length, 1.0),
    unit("mm", &["millimeter", "millimeters"], Length, 0.001),
    unit("cm", &["centimeter", "centimeters"], Length, 0.01),
    unit("km", &["kilometer", "kilometers"], Length, 1000.0),
    unit("inch", &["inches"], Length, 0.0254),
    unit("ft", &["foot", "feet"], Length, 0.3048),
    unit("mi", &["mile", "miles"], Length, 1609.344),
    unit("g", &["gram", "grams"], Mass, 0.001),
    unit("mg", &["milligram", "milligrams"], Mass, 1e-6),
    unit("kg", &["kilogram", "kilograms"], Mass, 1.0),
    unit("lb", &["lbs", "pound", "pounds"], Mass, 0.453_592_37),
    unit("s", &["sec", "second", "seconds"], Time, 1.0),
    unit("ms", &["millisecond", "milliseconds"], Time, 0.001),
    unit("minute", &["minutes"], Time, 60.0),
    unit("h", &["hr", "hour", "hours"], Time, 3600.0),
];

fn lookup(name: &str) -> Option<&'static UnitDef> {
    UNITS
        .iter()
        .find(|def| def.name == name || def.aliases.contains(&name))
}

/// A unit with an optional magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit {
    value: Option<f64>,
    def: &'static UnitDef,
}

impl Unit {
    /// Valueless unit for a table name or alias.
    pub fn parse(name: &str) -> Option<Unit> {
        lookup(name).map(|def| Unit { value: None, def })
    }

    /// Whether `name` is a unit or unit alias.
    pub fn is_unit_name(name: &str) -> bool {
        lookup(name).is_some()
    }

    #[must_use]
    pub fn with_value(self, value: f64) -> Unit {
        Unit {
            value: Some(value),
            def: self.def,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn dimension(&self) -> Dimension {
        self.def.dimension
    }

    /// Magnitude in the SI base unit, treating a valueless unit as `1`.
    pub fn to_si(&self) -> f64 {
        self.value.unwrap_or(1.0) * self.def.factor
    }

    fn ensure_same_dimension(&self, other: &Unit) -> EvalResult<()> {
        if self.def.dimension == other.def.dimension {
            Ok(())
        } else {
            Err(type_error(
                &format!("a unit of {:?}", self.def.dimension).to_lowercase(),
                other.def.name,
            ))
        }
    }

    /// Express this unit's magnitude in `target`.
    pub fn to(&self, target: &Unit) -> EvalResult<Unit> {
        self.ensure_same_dimension(target)?;
        Ok(Unit {
            value: Some(self.to_si() / target.def.factor),
            def: target.def,
        })
    }

    /// Sum expressed in `self`'s unit.
    pub fn checked_add(&self, other: &Unit) -> EvalResult<Unit> {
        let rhs = other.to(self)?;
        Ok(self.with_value(self.value.unwrap_or(1.0) + rhs.value.unwrap_or(0.0)))
    }

    pub fn checked_sub(&self, other: &Unit) -> EvalResult<Unit> {
        let rhs = other.to(self)?;
        Ok(self.with_value(self.value.unwrap_or(1.0) - rhs.value.unwrap_or(0.0)))
    }

    /// Multiply the magnitude by a plain number.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Unit {
        self.with_value(self.value.unwrap_or(1.0) * factor)
    }

    /// Compare magnitudes of two units of one dimension.
    pub fn compare(&self, other: &Unit) -> EvalResult<f64> {
        self.ensure_same_dimension(other)?;
        Ok(self.to_si() - other.to_si())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} {}", format_number(value), self.def.name),
            None => write!(f, "{}", self.def.name),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
