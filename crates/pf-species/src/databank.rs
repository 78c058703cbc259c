//! Thermodynamic databank and the compound factory that resolves identifiers against it.

use std::path::Path;

use pf_core::{ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::chemical::Chemical;
use crate::compound::Compound;
use crate::error::{ConfigError, ConfigResult, SpeciesError, SpeciesResult};
use crate::identifier::{Identifier, is_valid_cas};

/// Constant properties and identifiers of one chemical.
///
/// Units: `mw` in g/mol, temperatures in K, `pc` in Pa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    pub name: String,
    pub cas: String,
    pub formula: String,
    pub mw: f64,
    pub tb: f64,
    pub tm: f64,
    pub tc: f64,
    pub pc: f64,
    pub omega: f64,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inchi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inchikey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubchem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

impl ChemicalRecord {
    fn validate(&self) -> SpeciesResult<()> {
        if self.name.trim().is_empty() {
            return Err(SpeciesError::InvalidIdentifier {
                what: format!("record with CAS {} has an empty name", self.cas),
            });
        }
        if !is_valid_cas(&self.cas) {
            return Err(SpeciesError::InvalidIdentifier {
                what: format!("'{}' is not a valid CAS number for {}", self.cas, self.name),
            });
        }
        ensure_positive(self.mw, "molar mass")?;
        ensure_positive(self.tb, "normal boiling point")?;
        ensure_positive(self.tm, "melting point")?;
        ensure_positive(self.tc, "critical temperature")?;
        ensure_positive(self.pc, "critical pressure")?;
        ensure_finite(self.omega, "acentric factor")?;
        Ok(())
    }

    /// Exact match on the field selected by the identifier kind; names and
    /// synonyms compare case-insensitively.
    pub fn matches(&self, identifier: &Identifier<'_>) -> bool {
        match *identifier {
            Identifier::Name(name) => {
                self.name.eq_ignore_ascii_case(name)
                    || self.formula == name
                    || self.synonyms.iter().any(|s| s.eq_ignore_ascii_case(name))
            }
            Identifier::Cas(cas) => self.cas == cas,
            Identifier::InChI(inchi) => self.inchi.as_deref() == Some(inchi),
            Identifier::InChIKey(key) => self.inchikey.as_deref() == Some(key),
            Identifier::PubChem(cid) => self.pubchem == Some(cid),
            Identifier::Smiles(smiles) => self.smiles.as_deref() == Some(smiles),
        }
    }

    /// Case-insensitive substring search over name, formula, CAS and synonyms.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.name.to_ascii_lowercase().contains(&query)
            || self.formula.to_ascii_lowercase().contains(&query)
            || self.cas.contains(&query)
            || self
                .synonyms
                .iter()
                .any(|s| s.to_ascii_lowercase().contains(&query))
    }
}

/// Creates compounds from identifier strings.
pub trait CompoundFactory {
    type Compound: Compound;

    /// Resolve `identifier` to a new compound whose `id()` is the identifier.
    ///
    /// Fails with [`SpeciesError::CompoundResolution`] when the identifier is
    /// unknown or malformed.
    fn create(&self, identifier: &str) -> SpeciesResult<Self::Compound>;
}

impl<F, C> CompoundFactory for F
where
    F: Fn(&str) -> SpeciesResult<C>,
    C: Compound,
{
    type Compound = C;

    fn create(&self, identifier: &str) -> SpeciesResult<C> {
        self(identifier)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DatabankFile {
    #[serde(default)]
    chemicals: Vec<ChemicalRecord>,
}

/// Ordered set of chemical records, unique by CAS number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Databank {
    records: Vec<ChemicalRecord>,
}

impl Databank {
    /// Empty databank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Databank preloaded with common process chemicals.
    pub fn builtin() -> Self {
        Self {
            records: BUILTIN_CHEMICALS.iter().map(BuiltinChemical::record).collect(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = ChemicalRecord>) -> SpeciesResult<Self> {
        let mut databank = Self::new();
        for record in records {
            databank.insert(record)?;
        }
        Ok(databank)
    }

    /// Add a record; rejects invalid records and CAS numbers already present.
    pub fn insert(&mut self, record: ChemicalRecord) -> SpeciesResult<()> {
        record.validate()?;
        if self.records.iter().any(|r| r.cas == record.cas) {
            return Err(SpeciesError::duplicate(record.cas));
        }
        tracing::trace!(name = %record.name, cas = %record.cas, "databank record added");
        self.records.push(record);
        Ok(())
    }

    /// Add every record of `other`, stopping at the first rejected one.
    pub fn extend(&mut self, other: Databank) -> SpeciesResult<()> {
        for record in other.records {
            self.insert(record)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ChemicalRecord] {
        &self.records
    }

    /// Find the record an identifier refers to.
    pub fn lookup(&self, identifier: &str) -> SpeciesResult<&ChemicalRecord> {
        let parsed = Identifier::parse(identifier).map_err(|err| SpeciesError::CompoundResolution {
            identifier: identifier.to_string(),
            reason: err.to_string(),
        })?;

        self.records
            .iter()
            .find(|r| r.matches(&parsed))
            .ok_or_else(|| {
                tracing::warn!(%identifier, kind = parsed.kind(), "identifier not in databank");
                SpeciesError::CompoundResolution {
                    identifier: identifier.to_string(),
                    reason: format!("no record matches {} '{}'", parsed.kind(), parsed),
                }
            })
    }

    pub fn search(&self, query: &str) -> Vec<&ChemicalRecord> {
        self.records.iter().filter(|r| r.matches_query(query)).collect()
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: DatabankFile = serde_yaml::from_str(content)?;
        Ok(Self::from_records(file.chemicals)?)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let file: DatabankFile = serde_json::from_str(content)?;
        Ok(Self::from_records(file.chemicals)?)
    }

    /// Load a `.yaml`/`.yml` or `.json` databank file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        let file = DatabankFile {
            chemicals: self.records.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl CompoundFactory for Databank {
    type Compound = Chemical;

    fn create(&self, identifier: &str) -> SpeciesResult<Chemical> {
        let record = self.lookup(identifier)?;
        Ok(Chemical::new(identifier.trim(), record.clone()))
    }
}

struct BuiltinChemical {
    name: &'static str,
    cas: &'static str,
    formula: &'static str,
    mw: f64,
    tb: f64,
    tm: f64,
    tc: f64,
    pc: f64,
    omega: f64,
    synonyms: &'static [&'static str],
    inchi: &'static str,
    inchikey: &'static str,
    pubchem: u64,
    smiles: &'static str,
}

impl BuiltinChemical {
    fn record(&self) -> ChemicalRecord {
        ChemicalRecord {
            name: self.name.to_string(),
            cas: self.cas.to_string(),
            formula: self.formula.to_string(),
            mw: self.mw,
            tb: self.tb,
            tm: self.tm,
            tc: self.tc,
            pc: self.pc,
            omega: self.omega,
            synonyms: self.synonyms.iter().map(|s| s.to_string()).collect(),
            inchi: Some(self.inchi.to_string()),
            inchikey: Some(self.inchikey.to_string()),
            pubchem: Some(self.pubchem),
            smiles: Some(self.smiles.to_string()),
        }
    }
}

const BUILTIN_CHEMICALS: [BuiltinChemical; 14] = [
    BuiltinChemical {
        name: "Water",
        cas: "7732-18-5",
        formula: "H2O",
        mw: 18.015_28,
        tb: 373.124,
        tm: 273.15,
        tc: 647.096,
        pc: 22.064e6,
        omega: 0.3443,
        synonyms: &["oxidane"],
        inchi: "InChI=1S/H2O/h1H2",
        inchikey: "XLYOFNOQVPJJNP-UHFFFAOYSA-N",
        pubchem: 962,
        smiles: "O",
    },
    BuiltinChemical {
        name: "Ethanol",
        cas: "64-17-5",
        formula: "C2H6O",
        mw: 46.068_44,
        tb: 351.39,
        tm: 159.05,
        tc: 514.71,
        pc: 6.268e6,
        omega: 0.646,
        synonyms: &["ethyl alcohol", "EtOH"],
        inchi: "InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3",
        inchikey: "LFQSCWFLJHTTHZ-UHFFFAOYSA-N",
        pubchem: 702,
        smiles: "CCO",
    },
    BuiltinChemical {
        name: "Methanol",
        cas: "67-56-1",
        formula: "CH4O",
        mw: 32.041_86,
        tb: 337.632,
        tm: 175.15,
        tc: 512.5,
        pc: 8.084e6,
        omega: 0.5625,
        synonyms: &["methyl alcohol", "MeOH"],
        inchi: "InChI=1S/CH4O/c1-2/h2H,1H3",
        inchikey: "OKKJLVBELUTLKV-UHFFFAOYSA-N",
        pubchem: 887,
        smiles: "CO",
    },
    BuiltinChemical {
        name: "Methane",
        cas: "74-82-8",
        formula: "CH4",
        mw: 16.042_46,
        tb: 111.667,
        tm: 90.694,
        tc: 190.564,
        pc: 4.5992e6,
        omega: 0.011_42,
        synonyms: &[],
        inchi: "InChI=1S/CH4/h1H4",
        inchikey: "VNWKTOKETHGBQD-UHFFFAOYSA-N",
        pubchem: 297,
        smiles: "C",
    },
    BuiltinChemical {
        name: "Propane",
        cas: "74-98-6",
        formula: "C3H8",
        mw: 44.095_62,
        tb: 231.036,
        tm: 85.525,
        tc: 369.89,
        pc: 4.2512e6,
        omega: 0.1521,
        synonyms: &["n-propane"],
        inchi: "InChI=1S/C3H8/c1-3-2/h3H2,1-2H3",
        inchikey: "ATUOYWHBWRKTHZ-UHFFFAOYSA-N",
        pubchem: 6334,
        smiles: "CCC",
    },
    BuiltinChemical {
        name: "Nitrogen",
        cas: "7727-37-9",
        formula: "N2",
        mw: 28.0134,
        tb: 77.355,
        tm: 63.15,
        tc: 126.192,
        pc: 3.3958e6,
        omega: 0.0372,
        synonyms: &["dinitrogen"],
        inchi: "InChI=1S/N2/c1-2",
        inchikey: "IJGRMHOSHXDMSA-UHFFFAOYSA-N",
        pubchem: 947,
        smiles: "N#N",
    },
    BuiltinChemical {
        name: "Oxygen",
        cas: "7782-44-7",
        formula: "O2",
        mw: 31.9988,
        tb: 90.188,
        tm: 54.361,
        tc: 154.581,
        pc: 5.043e6,
        omega: 0.0222,
        synonyms: &["dioxygen"],
        inchi: "InChI=1S/O2/c1-2",
        inchikey: "MYMOFIZGZYHOMD-UHFFFAOYSA-N",
        pubchem: 977,
        smiles: "O=O",
    },
    BuiltinChemical {
        name: "Carbon dioxide",
        cas: "124-38-9",
        formula: "CO2",
        mw: 44.0095,
        tb: 194.67,
        tm: 216.59,
        tc: 304.1282,
        pc: 7.3773e6,
        omega: 0.223_94,
        synonyms: &["carbonic anhydride"],
        inchi: "InChI=1S/CO2/c2-1-3",
        inchikey: "CURLTUGMZLYLDI-UHFFFAOYSA-N",
        pubchem: 280,
        smiles: "C(=O)=O",
    },
    BuiltinChemical {
        name: "Ammonia",
        cas: "7664-41-7",
        formula: "H3N",
        mw: 17.030_52,
        tb: 239.82,
        tm: 195.42,
        tc: 405.56,
        pc: 11.357e6,
        omega: 0.2526,
        synonyms: &["azane", "NH3"],
        inchi: "InChI=1S/H3N/h1H3",
        inchikey: "QGZKDVFQNNGYKY-UHFFFAOYSA-N",
        pubchem: 222,
        smiles: "N",
    },
    BuiltinChemical {
        name: "Benzene",
        cas: "71-43-2",
        formula: "C6H6",
        mw: 78.111_84,
        tb: 353.24,
        tm: 278.68,
        tc: 562.05,
        pc: 4.894e6,
        omega: 0.2103,
        synonyms: &["benzol"],
        inchi: "InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H",
        inchikey: "UHOVQNZJYSORNB-UHFFFAOYSA-N",
        pubchem: 241,
        smiles: "c1ccccc1",
    },
    BuiltinChemical {
        name: "Toluene",
        cas: "108-88-3",
        formula: "C7H8",
        mw: 92.138_42,
        tb: 383.75,
        tm: 178.18,
        tc: 591.75,
        pc: 4.1263e6,
        omega: 0.2657,
        synonyms: &["methylbenzene"],
        inchi: "InChI=1S/C7H8/c1-7-5-3-2-4-6-7/h2-6H,1H3",
        inchikey: "YXFVVABEGXRONW-UHFFFAOYSA-N",
        pubchem: 1140,
        smiles: "Cc1ccccc1",
    },
    BuiltinChemical {
        name: "Acetone",
        cas: "67-64-1",
        formula: "C3H6O",
        mw: 58.079_14,
        tb: 329.2,
        tm: 178.5,
        tc: 508.1,
        pc: 4.7e6,
        omega: 0.3065,
        synonyms: &["propanone", "2-propanone"],
        inchi: "InChI=1S/C3H6O/c1-3(2)4/h1-2H3",
        inchikey: "CSCPPACGZOOCGX-UHFFFAOYSA-N",
        pubchem: 180,
        smiles: "CC(=O)C",
    },
    BuiltinChemical {
        name: "Acetic acid",
        cas: "64-19-7",
        formula: "C2H4O2",
        mw: 60.051_96,
        tb: 391.05,
        tm: 289.81,
        tc: 591.95,
        pc: 5.786e6,
        omega: 0.4665,
        synonyms: &["ethanoic acid", "AcOH"],
        inchi: "InChI=1S/C2H4O2/c1-2(3)4/h1H3,(H,3,4)",
        inchikey: "QTBSBXVTEAMEQO-UHFFFAOYSA-N",
        pubchem: 176,
        smiles: "CC(=O)O",
    },
    BuiltinChemical {
        name: "Glycerol",
        cas: "56-81-5",
        formula: "C3H8O3",
        mw: 92.093_82,
        tb: 561.0,
        tm: 291.33,
        tc: 850.0,
        pc: 7.5e6,
        omega: 0.5127,
        synonyms: &["glycerin", "propane-1,2,3-triol"],
        inchi: "InChI=1S/C3H8O3/c4-1-3(6)2-5/h3-6H,1-2H2",
        inchikey: "PEDCQBHIVMGVHV-UHFFFAOYSA-N",
        pubchem: 753,
        smiles: "C(C(CO)O)O",
    },
];
