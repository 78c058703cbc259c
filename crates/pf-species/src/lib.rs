//! pf-species: species collections for process simulation.
//!
//! Provides:
//! - The `Compound` trait and shared compound handles
//! - Identifier classification (names, CAS, InChI, InChIKey, PubChem, SMILES)
//! - A thermodynamic `Databank` that resolves identifiers to `Chemical`s
//! - `Species`: an ordered, name-indexed, freezable collection of compounds
//!   with bulk property get/set
//! - YAML/JSON species configuration
//!
//! # Example
//!
//! ```
//! use pf_species::{Conditions, Databank, Species};
//!
//! let databank = Databank::builtin();
//! let mut species = Species::create(["Water", "Ethanol", "Methanol"], &databank).unwrap();
//!
//! species.rekey(["Methanol", "Water"]).unwrap();
//! assert_eq!(species.identifiers().collect::<Vec<_>>(), ["Methanol", "Water"]);
//!
//! let mw = species.get_values(["Water"], "MW", &Conditions::current()).unwrap();
//! assert!((mw[0] - 18.015).abs() < 1e-3);
//! ```

pub mod chemical;
pub mod compound;
pub mod config;
pub mod databank;
pub mod error;
pub mod identifier;
pub mod property;
pub mod species;

// Re-exports for ergonomics
pub use chemical::Chemical;
pub use compound::{Compound, CompoundRef, share};
pub use config::{PropertyAssignment, SpeciesConfig};
pub use databank::{ChemicalRecord, CompoundFactory, Databank};
pub use error::{ConfigError, ConfigResult, SpeciesError, SpeciesResult};
pub use identifier::{Identifier, is_valid_cas};
pub use property::{Conditions, Phase, PropertyValue};
pub use species::{Iter, Selection, Species, SpeciesHandle};
