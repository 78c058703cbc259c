//! Compound abstraction consumed by the species collection.

use std::cell::RefCell;
use std::rc::Rc;

use pf_core::units::{Pressure, Temperature};

use crate::error::SpeciesResult;
use crate::property::{Conditions, Phase, PropertyValue};

/// Shared handle to a compound.
///
/// The collection owns one handle per member; streams and other consumers may
/// hold clones of it, so mutation through any handle is visible to all.
pub type CompoundRef<C> = Rc<RefCell<C>>;

/// Wrap a compound in a shared handle.
pub fn share<C: Compound>(compound: C) -> CompoundRef<C> {
    Rc::new(RefCell::new(compound))
}

/// A single chemical species: static identity plus mutable conditions and
/// named property access.
///
/// Implementations validate conditions (positive finite temperature,
/// non-negative finite pressure) and report unknown property names as
/// [`SpeciesError::UnknownProperty`](crate::SpeciesError::UnknownProperty).
pub trait Compound {
    /// Identifier the compound is stored under.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: &str);

    /// CAS registry number.
    fn cas(&self) -> &str;

    fn temperature(&self) -> Temperature;

    fn set_temperature(&mut self, t: Temperature) -> SpeciesResult<()>;

    fn pressure(&self) -> Pressure;

    fn set_pressure(&mut self, p: Pressure) -> SpeciesResult<()>;

    fn phase(&self) -> Phase;

    fn set_phase(&mut self, phase: Phase);

    /// Read a named property at the current conditions.
    fn property(&self, name: &str) -> SpeciesResult<PropertyValue>;

    /// Assign a named property.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> SpeciesResult<()>;

    /// Apply every condition that is set; unset ones are left as they are.
    ///
    /// Either every set condition is applied or the compound is left as it was.
    fn apply(&mut self, conditions: &Conditions) -> SpeciesResult<()> {
        let previous = self.temperature();
        if let Some(t) = conditions.temperature {
            self.set_temperature(t)?;
        }
        if let Some(p) = conditions.pressure
            && let Err(err) = self.set_pressure(p)
        {
            self.set_temperature(previous)?;
            return Err(err);
        }
        if let Some(phase) = conditions.phase {
            self.set_phase(phase);
        }
        Ok(())
    }
}
