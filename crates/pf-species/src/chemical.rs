//! Databank-backed compound.

use std::collections::BTreeMap;

use pf_core::units::constants::{R, p_atm, t_ref};
use pf_core::units::{Pressure, Temperature, k, pa};
use pf_core::{CoreError, ensure_finite, ensure_non_negative, ensure_positive};

use crate::compound::Compound;
use crate::databank::ChemicalRecord;
use crate::error::{SpeciesError, SpeciesResult};
use crate::property::{Phase, PropertyValue};

/// Record constants that may be overridden by assignment.
const OVERRIDABLE_CONSTANTS: [&str; 5] = ["Tb", "Tm", "Tc", "Pc", "omega"];
/// Properties that can only be read.
const READ_ONLY: [&str; 5] = ["CAS", "MW", "Psat", "Vm", "rho"];

/// A chemical built from a databank record, carrying its own conditions.
///
/// Assigned values for record constants and custom names are kept as
/// overrides and shadow the record when read. Derived properties
/// (`Psat`, `Vm`, `rho`) are evaluated at the current conditions from the
/// effective constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Chemical {
    id: String,
    record: ChemicalRecord,
    temperature: Temperature,
    pressure: Pressure,
    phase: Phase,
    overrides: BTreeMap<String, PropertyValue>,
}

impl Chemical {
    /// New chemical at 298.15 K, 1 atm, liquid.
    pub fn new(id: impl Into<String>, record: ChemicalRecord) -> Self {
        Self {
            id: id.into(),
            record,
            temperature: t_ref(),
            pressure: p_atm(),
            phase: Phase::Liquid,
            overrides: BTreeMap::new(),
        }
    }

    pub fn record(&self) -> &ChemicalRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.record.mw
    }

    /// Effective numeric constant, override first.
    fn constant(&self, name: &str) -> SpeciesResult<f64> {
        if let Some(value) = self.overrides.get(name) {
            return value.expect_number(name);
        }
        match name {
            "MW" => Ok(self.record.mw),
            "Tb" => Ok(self.record.tb),
            "Tm" => Ok(self.record.tm),
            "Tc" => Ok(self.record.tc),
            "Pc" => Ok(self.record.pc),
            "omega" => Ok(self.record.omega),
            _ => Err(self.unknown_property(name)),
        }
    }

    /// Vapor pressure [Pa] from the Lee–Kesler corresponding-states correlation.
    pub fn vapor_pressure(&self) -> SpeciesResult<f64> {
        let tc = self.constant("Tc")?;
        let pc = self.constant("Pc")?;
        let omega = self.constant("omega")?;
        let tr = self.temperature.value / tc;
        if tr > 1.0 {
            return Err(CoreError::NonPhysical {
                what: "reduced temperature above critical for vapor pressure",
                value: tr,
            }
            .into());
        }

        let ln_tr = tr.ln();
        let tr6 = tr.powi(6);
        let f0 = 5.927_14 - 6.096_48 / tr - 1.288_62 * ln_tr + 0.169_347 * tr6;
        let f1 = 15.2518 - 15.6875 / tr - 13.4721 * ln_tr + 0.435_77 * tr6;
        Ok(ensure_finite(pc * (f0 + omega * f1).exp(), "vapor pressure")?)
    }

    /// Molar volume [m³/mol]: ideal gas for the gas phase, Rackett with the
    /// Yamada–Gunn compressibility for condensed phases.
    pub fn molar_volume(&self) -> SpeciesResult<f64> {
        let t = self.temperature.value;
        match self.phase {
            Phase::Gas => {
                let p = ensure_positive(self.pressure.value, "gas-phase pressure")?;
                Ok(R * t / p)
            }
            Phase::Liquid | Phase::Solid => {
                let tc = self.constant("Tc")?;
                let pc = self.constant("Pc")?;
                let omega = self.constant("omega")?;
                let z_ra = 0.290_56 - 0.087_75 * omega;
                let tau = (1.0 - t / tc).max(0.0);
                let v = R * tc / pc * z_ra.powf(1.0 + tau.powf(2.0 / 7.0));
                Ok(ensure_positive(v, "molar volume")?)
            }
        }
    }

    /// Mass density [kg/m³].
    pub fn density(&self) -> SpeciesResult<f64> {
        Ok(self.record.mw * 1e-3 / self.molar_volume()?)
    }

    fn unknown_property(&self, name: &str) -> SpeciesError {
        SpeciesError::UnknownProperty {
            property: name.to_string(),
            identifier: self.id.clone(),
        }
    }

    fn mismatch(name: &str, expected: &'static str, found: &PropertyValue) -> SpeciesError {
        SpeciesError::TypeMismatch {
            property: name.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

impl Compound for Chemical {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn cas(&self) -> &str {
        &self.record.cas
    }

    fn temperature(&self) -> Temperature {
        self.temperature
    }

    fn set_temperature(&mut self, t: Temperature) -> SpeciesResult<()> {
        ensure_positive(t.value, "temperature")?;
        self.temperature = t;
        Ok(())
    }

    fn pressure(&self) -> Pressure {
        self.pressure
    }

    fn set_pressure(&mut self, p: Pressure) -> SpeciesResult<()> {
        ensure_non_negative(p.value, "pressure")?;
        self.pressure = p;
        Ok(())
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn property(&self, name: &str) -> SpeciesResult<PropertyValue> {
        tracing::trace!(id = %self.id, property = name, "property read");
        match name {
            "ID" => Ok(PropertyValue::Text(self.id.clone())),
            "CAS" => Ok(PropertyValue::Text(self.record.cas.clone())),
            "T" => Ok(PropertyValue::Number(self.temperature.value)),
            "P" => Ok(PropertyValue::Number(self.pressure.value)),
            "phase" => Ok(PropertyValue::Phase(self.phase)),
            "Psat" => self.vapor_pressure().map(PropertyValue::Number),
            "Vm" => self.molar_volume().map(PropertyValue::Number),
            "rho" => self.density().map(PropertyValue::Number),
            "name" | "formula" => Ok(self.overrides.get(name).cloned().unwrap_or_else(|| {
                let text = if name == "name" {
                    &self.record.name
                } else {
                    &self.record.formula
                };
                PropertyValue::Text(text.clone())
            })),
            _ => match self.overrides.get(name) {
                Some(value) => Ok(value.clone()),
                None => self.constant(name).map(PropertyValue::Number),
            },
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> SpeciesResult<()> {
        tracing::trace!(id = %self.id, property = name, %value, "property write");
        if READ_ONLY.contains(&name) {
            return Err(SpeciesError::ReadOnlyProperty {
                property: name.to_string(),
            });
        }

        match (name, value) {
            ("ID", PropertyValue::Text(id)) => {
                if id.trim().is_empty() {
                    return Err(SpeciesError::InvalidIdentifier {
                        what: "empty identifier".to_string(),
                    });
                }
                self.id = id;
            }
            ("ID", other) => return Err(Self::mismatch(name, "text", &other)),
            ("T", PropertyValue::Number(v)) => self.set_temperature(k(v))?,
            ("P", PropertyValue::Number(v)) => self.set_pressure(pa(v))?,
            ("T" | "P", other) => return Err(Self::mismatch(name, "number", &other)),
            ("phase", PropertyValue::Phase(phase)) => self.phase = phase,
            ("phase", PropertyValue::Text(text)) => self.phase = text.parse()?,
            ("phase", other) => return Err(Self::mismatch(name, "phase", &other)),
            ("name" | "formula", text @ PropertyValue::Text(_)) => {
                self.overrides.insert(name.to_string(), text);
            }
            ("name" | "formula", other) => return Err(Self::mismatch(name, "text", &other)),
            (constant, PropertyValue::Number(v)) if OVERRIDABLE_CONSTANTS.contains(&constant) => {
                ensure_finite(v, "property value")?;
                self.overrides
                    .insert(name.to_string(), PropertyValue::Number(v));
            }
            (constant, other) if OVERRIDABLE_CONSTANTS.contains(&constant) => {
                return Err(Self::mismatch(name, "number", &other));
            }
            (_, custom) => {
                self.overrides.insert(name.to_string(), custom);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::databank::{CompoundFactory, Databank};
    use pf_core::units::constants::P_ATM_PA;

    fn water() -> Chemical {
        Databank::builtin().create("Water").unwrap()
    }

    #[test]
    fn defaults_to_reference_conditions() {
        let w = water();
        assert_eq!(w.temperature().value, 298.15);
        assert_eq!(w.pressure().value, 101_325.0);
        assert_eq!(w.phase(), Phase::Liquid);
        assert_eq!(w.property("ID").unwrap(), PropertyValue::Text("Water".into()));
        assert_eq!(w.property("formula").unwrap(), PropertyValue::Text("H2O".into()));
    }

    #[test]
    fn record_constants_read_as_numbers() {
        let w = water();
        assert_eq!(w.property("Tb").unwrap().as_f64(), Some(373.124));
        assert_eq!(w.property("MW").unwrap().as_f64(), Some(18.015_28));
        assert_eq!(w.property("CAS").unwrap().as_str(), Some("7732-18-5"));
    }

    #[test]
    fn unknown_property_names_the_compound() {
        let err = water().property("boilingPointX").unwrap_err();
        assert_eq!(
            err,
            SpeciesError::UnknownProperty {
                property: "boilingPointX".into(),
                identifier: "Water".into(),
            }
        );
    }

    #[test]
    fn vapor_pressure_near_normal_boiling_point() {
        let mut w = water();
        w.set_temperature(k(373.124)).unwrap();
        let psat = w.vapor_pressure().unwrap();
        assert!(psat > 0.8 * P_ATM_PA && psat < 1.2 * P_ATM_PA, "Psat = {psat}");
    }

    #[test]
    fn vapor_pressure_rejects_supercritical() {
        let mut methane = Databank::builtin().create("Methane").unwrap();
        methane.set_temperature(k(300.0)).unwrap();
        assert!(matches!(
            methane.property("Psat"),
            Err(SpeciesError::Core(CoreError::NonPhysical { .. }))
        ));
    }

    #[test]
    fn density_by_phase() {
        let mut w = water();
        let rho_liquid = w.density().unwrap();
        assert!(rho_liquid > 700.0 && rho_liquid < 1200.0, "rho = {rho_liquid}");

        w.set_phase(Phase::Gas);
        w.set_temperature(k(400.0)).unwrap();
        let rho_gas = w.density().unwrap();
        let ideal = 101_325.0 * 18.015_28e-3 / (R * 400.0);
        assert!((rho_gas - ideal).abs() < 1e-9);
    }

    #[test]
    fn conditions_are_validated() {
        let mut w = water();
        assert!(w.set_temperature(k(0.0)).is_err());
        assert!(w.set_pressure(pa(-1.0)).is_err());
        assert!(w.set_property("T", PropertyValue::Number(f64::NAN)).is_err());
        assert_eq!(w.temperature().value, 298.15);
    }

    #[test]
    fn rejected_conditions_leave_state_unchanged() {
        use crate::property::Conditions;

        let mut w = water();
        let conditions = Conditions::current()
            .with_temperature(k(350.0))
            .with_pressure(pa(-1.0))
            .with_phase(Phase::Gas);
        assert!(matches!(w.apply(&conditions), Err(SpeciesError::Core(_))));
        assert_eq!(w.temperature().value, 298.15);
        assert_eq!(w.pressure().value, P_ATM_PA);
        assert_eq!(w.phase(), Phase::Liquid);

        w.apply(&conditions.with_pressure(pa(2.0e5))).unwrap();
        assert_eq!(w.temperature().value, 350.0);
        assert_eq!(w.phase(), Phase::Gas);
    }

    #[test]
    fn typed_assignment() {
        let mut w = water();
        w.set_property("T", 350.0.into()).unwrap();
        assert_eq!(w.temperature().value, 350.0);
        w.set_property("phase", "g".into()).unwrap();
        assert_eq!(w.phase(), Phase::Gas);

        assert!(matches!(
            w.set_property("T", "hot".into()),
            Err(SpeciesError::TypeMismatch { expected: "number", found: "text", .. })
        ));
        assert!(matches!(
            w.set_property("Tc", Phase::Gas.into()),
            Err(SpeciesError::TypeMismatch { .. })
        ));
        assert!(matches!(
            w.set_property("MW", 18.0.into()),
            Err(SpeciesError::ReadOnlyProperty { .. })
        ));
    }

    #[test]
    fn overrides_shadow_record_and_feed_correlations() {
        let mut w = water();
        let before = w.vapor_pressure().unwrap();
        w.set_property("Tb", 373.0.into()).unwrap();
        assert_eq!(w.property("Tb").unwrap().as_f64(), Some(373.0));
        assert_eq!(w.record().tb, 373.124);

        w.set_property("Pc", 2.0e7.into()).unwrap();
        assert!(w.vapor_pressure().unwrap() < before);
    }

    #[test]
    fn custom_properties_round_trip() {
        let mut w = water();
        w.set_property("price", 0.05.into()).unwrap();
        w.set_property("supplier", "municipal".into()).unwrap();
        assert_eq!(w.property("price").unwrap().as_f64(), Some(0.05));
        assert_eq!(w.property("supplier").unwrap().as_str(), Some("municipal"));
    }
}
