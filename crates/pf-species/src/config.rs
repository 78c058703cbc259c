//! Species configuration files.
//!
//! ```yaml
//! databank: extra_chemicals.yaml   # optional, merged onto the built-in databank
//! species: [Water, Ethanol, "SMILES=CC(=O)O"]
//! properties:                      # optional, applied in order
//!   - species: [Water]
//!     property: Tb
//!     value: 373.15
//! frozen: true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chemical::Chemical;
use crate::databank::Databank;
use crate::error::{ConfigError, ConfigResult};
use crate::property::PropertyValue;
use crate::species::Species;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Extra databank file, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databank: Option<PathBuf>,
    pub species: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyAssignment>,
    #[serde(default)]
    pub frozen: bool,
}

/// One `set_properties` call applied after the collection is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub species: Vec<String>,
    pub property: String,
    pub value: PropertyValue,
}

impl SpeciesConfig {
    pub fn new(species: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            databank: None,
            species: species.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
            frozen: false,
        }
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a `.yaml`/`.yml` or `.json` config. A relative `databank` path is
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                });
            }
        };
        if let (Some(databank), Some(dir)) = (&config.databank, path.parent())
            && databank.is_relative()
        {
            config.databank = Some(dir.join(databank));
        }
        tracing::debug!(path = %path.display(), species = config.species.len(), "species config loaded");
        Ok(config)
    }

    pub fn save_yaml(&self, path: &Path) -> ConfigResult<()> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Built-in databank plus the configured extra file, if any.
    pub fn databank(&self) -> ConfigResult<Databank> {
        let mut databank = Databank::builtin();
        if let Some(path) = &self.databank {
            databank.extend(Databank::load(path)?)?;
        }
        Ok(databank)
    }

    /// Build the collection against [`databank`](Self::databank).
    pub fn build(&self) -> ConfigResult<Species<Chemical>> {
        self.build_with(&self.databank()?)
    }

    /// Build the collection against an explicit databank.
    pub fn build_with(&self, databank: &Databank) -> ConfigResult<Species<Chemical>> {
        let mut species = Species::create(&self.species, databank)?;
        for assignment in &self.properties {
            species.set_properties(
                &assignment.species,
                &assignment.property,
                assignment.value.clone(),
            )?;
        }
        if self.frozen {
            species.freeze();
        }
        Ok(species)
    }
}
