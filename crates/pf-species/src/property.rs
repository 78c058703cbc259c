//! Property values, phases and evaluation conditions.

use std::fmt;
use std::str::FromStr;

use pf_core::units::{Pressure, Temperature};
use serde::{Deserialize, Serialize};

use crate::error::{SpeciesError, SpeciesResult};

/// Thermodynamic phase of a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "s", alias = "solid")]
    Solid,
    #[serde(rename = "l", alias = "liquid")]
    Liquid,
    #[serde(rename = "g", alias = "gas")]
    Gas,
}

impl Phase {
    pub fn symbol(self) -> char {
        match self {
            Phase::Solid => 's',
            Phase::Liquid => 'l',
            Phase::Gas => 'g',
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Phase {
    type Err = SpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "solid" => Ok(Phase::Solid),
            "l" | "liquid" => Ok(Phase::Liquid),
            "g" | "gas" | "vapor" => Ok(Phase::Gas),
            _ => Err(SpeciesError::TypeMismatch {
                property: "phase".to_string(),
                expected: "one of 's', 'l', 'g'",
                found: "text",
            }),
        }
    }
}

/// A property read from, or written to, a compound. Numbers are in SI units.
///
/// Deserialized text always stays `Text`, even when it spells a phase;
/// compounds parse it where a phase is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    Phase(Phase),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Number(_) => "number",
            PropertyValue::Phase(_) => "phase",
            PropertyValue::Text(_) => "text",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value or `TypeMismatch` naming `property`.
    pub fn expect_number(&self, property: &str) -> SpeciesResult<f64> {
        self.as_f64().ok_or_else(|| SpeciesError::TypeMismatch {
            property: property.to_string(),
            expected: "number",
            found: self.kind(),
        })
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "{v}"),
            PropertyValue::Phase(p) => write!(f, "{p}"),
            PropertyValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<Phase> for PropertyValue {
    fn from(p: Phase) -> Self {
        PropertyValue::Phase(p)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

/// Optional temperature, pressure and phase applied before a property read.
///
/// `None` leaves the compound's current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Conditions {
    pub temperature: Option<Temperature>,
    pub pressure: Option<Pressure>,
    pub phase: Option<Phase>,
}

impl Conditions {
    /// No condition changes.
    pub fn current() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, t: Temperature) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn with_pressure(mut self, p: Pressure) -> Self {
        self.pressure = Some(p);
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.pressure.is_none() && self.phase.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::k;

    #[test]
    fn phase_parsing() {
        assert_eq!("l".parse::<Phase>().unwrap(), Phase::Liquid);
        assert_eq!("Gas".parse::<Phase>().unwrap(), Phase::Gas);
        assert_eq!("solid".parse::<Phase>().unwrap(), Phase::Solid);
        assert!("plasma".parse::<Phase>().is_err());
        assert_eq!(Phase::Gas.to_string(), "g");
    }

    #[test]
    fn value_kinds() {
        let v = PropertyValue::from(373.15);
        assert_eq!(v.as_f64(), Some(373.15));
        assert_eq!(v.expect_number("Tb").unwrap(), 373.15);

        let v = PropertyValue::from("H2O");
        assert_eq!(v.as_str(), Some("H2O"));
        assert!(matches!(
            v.expect_number("formula"),
            Err(SpeciesError::TypeMismatch { found: "text", .. })
        ));
    }

    #[test]
    fn phase_like_text_deserializes_as_text() {
        let values: Vec<PropertyValue> = serde_json::from_str(r#"[300.0, "gas", "l"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Number(300.0),
                PropertyValue::Text("gas".into()),
                PropertyValue::Text("l".into()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&PropertyValue::Phase(Phase::Gas)).unwrap(),
            r#""g""#
        );
    }

    #[test]
    fn conditions_builder() {
        assert!(Conditions::current().is_empty());
        let c = Conditions::current()
            .with_temperature(k(350.0))
            .with_phase(Phase::Gas);
        assert!(!c.is_empty());
        assert_eq!(c.temperature.map(|t| t.value), Some(350.0));
        assert!(c.pressure.is_none());
    }
}
