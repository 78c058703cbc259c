use std::path::PathBuf;

use pf_species::{Compound, ConfigError, Databank, SpeciesConfig, SpeciesError};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("{prefix}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const HYDROGEN_DATABANK: &str = r#"
chemicals:
  - name: Hydrogen
    cas: 1333-74-0
    formula: H2
    mw: 2.01588
    tb: 20.271
    tm: 13.957
    tc: 33.145
    pc: 1296400.0
    omega: -0.219
    synonyms: [dihydrogen]
    pubchem: 783
"#;

#[test]
fn load_yaml_with_relative_databank() {
    let dir = unique_temp_dir("pf_species_config_yaml");
    std::fs::write(dir.join("extra.yaml"), HYDROGEN_DATABANK).unwrap();
    std::fs::write(
        dir.join("species.yaml"),
        "databank: extra.yaml\nspecies: [Water, dihydrogen, \"PubChem=783\"]\n",
    )
    .unwrap();

    let config = SpeciesConfig::load(&dir.join("species.yaml")).unwrap();
    assert_eq!(config.databank, Some(dir.join("extra.yaml")));

    let species = config.build().unwrap();
    assert_eq!(species.len(), 3);
    assert_eq!(
        species.cas_numbers().collect::<Vec<_>>(),
        ["7732-18-5", "1333-74-0", "1333-74-0"]
    );
}

#[test]
fn save_and_reload_round_trip() {
    let dir = unique_temp_dir("pf_species_config_roundtrip");
    let path = dir.join("species.yml");

    let mut config = SpeciesConfig::new(["Ammonia", "Carbon dioxide"]);
    config.frozen = true;
    config.save_yaml(&path).unwrap();

    let loaded = SpeciesConfig::load(&path).unwrap();
    assert_eq!(config, loaded);

    let species = loaded.build().unwrap();
    assert!(species.is_frozen());
    assert_eq!(species.get("Ammonia").unwrap().borrow().cas(), "7664-41-7");
}

#[test]
fn databank_conflicting_with_builtin_is_rejected() {
    let dir = unique_temp_dir("pf_species_config_conflict");
    let water = Databank::builtin().lookup("Water").unwrap().clone();
    let conflicting = Databank::from_records([water]).unwrap();
    std::fs::write(dir.join("water.yaml"), conflicting.to_yaml_string().unwrap()).unwrap();

    let mut config = SpeciesConfig::new(["Water"]);
    config.databank = Some(dir.join("water.yaml"));
    assert!(matches!(
        config.build(),
        Err(ConfigError::Species(SpeciesError::DuplicateIdentifier { .. }))
    ));
}

#[test]
fn unsupported_extension() {
    let dir = unique_temp_dir("pf_species_config_ext");
    let path = dir.join("species.toml");
    std::fs::write(&path, "species = []").unwrap();
    assert!(matches!(
        SpeciesConfig::load(&path),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}
