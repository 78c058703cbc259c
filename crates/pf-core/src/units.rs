// pf-core/src/units.rs

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

use crate::{CoreError, CoreResult, ensure_non_negative, ensure_positive};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

pub mod constants {
    use super::*;

    /// Molar gas constant [J/(mol·K)]
    pub const R: f64 = 8.314_462_618;
    /// Reference temperature [K]
    pub const T_REF_K: f64 = 298.15;
    /// Standard atmosphere [Pa]
    pub const P_ATM_PA: f64 = 101_325.0;

    #[inline]
    pub fn t_ref() -> Temperature {
        k(T_REF_K)
    }

    #[inline]
    pub fn p_atm() -> Pressure {
        pa(P_ATM_PA)
    }
}

/// Quantity families accepted as unit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Absolute temperature (canonical: K)
    Temperature,
    /// Absolute pressure (canonical: Pa)
    Pressure,
}

impl Quantity {
    fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
        }
    }
}

/// Parse unit text (`"350 K"`, `"25C"`, `"1 atm"`, `"2 bar"`) to its canonical SI value.
///
/// A bare number is taken as already being in SI units.
pub fn parse_quantity(raw_text: &str, quantity: Quantity) -> CoreResult<f64> {
    let (value, unit) = split_value_and_unit(raw_text, quantity)?;
    let unit = unit.to_lowercase();

    match quantity {
        Quantity::Temperature => {
            let kelvin = match unit.as_str() {
                "" | "k" | "kelvin" => value,
                "c" | "°c" | "celsius" => value + 273.15,
                "f" | "°f" | "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
                "r" | "°r" | "rankine" => value * 5.0 / 9.0,
                _ => {
                    return Err(CoreError::UnknownUnit {
                        unit,
                        quantity: quantity.label(),
                    });
                }
            };
            ensure_positive(kelvin, "temperature")
        }
        Quantity::Pressure => {
            let pascal = match unit.as_str() {
                "" | "pa" | "pascal" => value,
                "kpa" => value * 1e3,
                "mpa" => value * 1e6,
                "bar" => value * 1e5,
                "mbar" => value * 100.0,
                "atm" => value * constants::P_ATM_PA,
                "torr" | "mmhg" => value * 133.322,
                "psia" => value * 6_894.76,
                "psi" => {
                    return Err(CoreError::AmbiguousUnit {
                        unit,
                        reason: "use 'psia' for absolute pressure",
                    });
                }
                _ => {
                    return Err(CoreError::UnknownUnit {
                        unit,
                        quantity: quantity.label(),
                    });
                }
            };
            ensure_non_negative(pascal, "pressure")
        }
    }
}

pub fn parse_temperature(raw_text: &str) -> CoreResult<Temperature> {
    parse_quantity(raw_text, Quantity::Temperature).map(k)
}

pub fn parse_pressure(raw_text: &str) -> CoreResult<Pressure> {
    parse_quantity(raw_text, Quantity::Pressure).map(pa)
}

/// Split `"14.7 psia"` into `(14.7, "psia")` and `"300"` into `(300.0, "")`.
fn split_value_and_unit(input: &str, quantity: Quantity) -> CoreResult<(f64, &str)> {
    let trimmed = input.trim();
    let split_idx = trimmed
        .find(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .unwrap_or(trimmed.len());

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| CoreError::Parse {
        quantity: quantity.label(),
        input: input.to_string(),
    })?;

    Ok((value, unit_part.trim()))
}
