//! End-to-end behavior of species collections built from the built-in databank.

use std::rc::Rc;

use pf_core::units::{k, pa};
use pf_species::{
    Chemical, Compound, CompoundFactory, Conditions, Databank, Phase, PropertyValue, Species,
    SpeciesError, SpeciesResult, share,
};

fn databank() -> Databank {
    Databank::builtin()
}

#[test]
fn every_identifier_form_resolves() {
    let ids = [
        "Water",
        "64-17-5",
        "InChI=1S/CH4O/c1-2/h2H,1H3",
        "InChIKey=VNWKTOKETHGBQD-UHFFFAOYSA-N",
        "PubChem=6334",
        "SMILES=c1ccccc1",
    ];
    let species = Species::create(ids, &databank()).unwrap();

    assert_eq!(species.identifiers().collect::<Vec<_>>(), ids);
    assert_eq!(
        species.cas_numbers().collect::<Vec<_>>(),
        ["7732-18-5", "64-17-5", "67-56-1", "74-82-8", "74-98-6", "71-43-2"]
    );
}

#[test]
fn freeze_blocks_structure_but_not_reads() {
    let mut species = Species::create(["Water", "Ethanol", "Acetone"], &databank()).unwrap();
    species.freeze();

    let extra = share(databank().create("Toluene").unwrap());
    assert!(matches!(
        species.insert("Toluene", extra),
        Err(SpeciesError::ImmutableCollection)
    ));
    assert!(matches!(
        species.remove("Acetone"),
        Err(SpeciesError::ImmutableCollection)
    ));
    assert!(matches!(
        species.rekey(["Acetone"]),
        Err(SpeciesError::ImmutableCollection)
    ));

    assert_eq!(species.iter().count(), 3);
    let mw = species
        .get_values(["Acetone", "Water"], "MW", &Conditions::current())
        .unwrap();
    assert_eq!(mw, vec![58.079_14, 18.015_28]);
}

#[test]
fn rekey_drops_and_reorders_without_new_compounds() {
    let mut species = Species::create(["Water", "Ethanol", "Methanol"], &databank()).unwrap();
    let before: Vec<_> = species.iter().cloned().collect();

    species.rekey(["Methanol", "Water"]).unwrap();

    let after: Vec<_> = species.iter().collect();
    assert_eq!(after.len(), 2);
    assert!(Rc::ptr_eq(after[0], &before[2]));
    assert!(Rc::ptr_eq(after[1], &before[0]));
    // The dropped compound is still alive for whoever holds it.
    assert_eq!(before[1].borrow().id(), "Ethanol");
}

#[test]
fn conditions_stick_after_property_read() {
    let species = Species::create(["Water", "Benzene"], &databank()).unwrap();
    let conditions = Conditions::current()
        .with_temperature(k(350.0))
        .with_pressure(pa(2.0e5));

    let psat = species
        .get_values(["Water", "Benzene"], "Psat", &conditions)
        .unwrap();
    assert_eq!(psat.len(), 2);
    assert!(psat[1] > psat[0], "benzene is more volatile than water");

    let t = species
        .get_values(["Water", "Benzene"], "T", &Conditions::current())
        .unwrap();
    assert_eq!(t, vec![350.0, 350.0]);
    let p = species
        .get_properties("Benzene", "P", &Conditions::current())
        .unwrap();
    assert_eq!(p, vec![PropertyValue::Number(2.0e5)]);
}

#[test]
fn invalid_conditions_are_reported() {
    let species = Species::create(["Water"], &databank()).unwrap();
    let conditions = Conditions::current().with_temperature(k(-5.0));
    assert!(matches!(
        species.get_properties("Water", "Tb", &conditions),
        Err(SpeciesError::Core(_))
    ));
}

#[test]
fn adopt_without_copy_aliases_the_original() {
    let mut original = Species::create(["Water", "Ethanol"], &databank()).unwrap();
    let address: *const Species<Chemical> = &original;

    {
        let mut handle = Species::adopt(&mut original, false);
        assert!(handle.is_shared());
        assert!(std::ptr::eq(&*handle, address));
        handle.remove("Ethanol").unwrap();
    }

    assert_eq!(original.identifiers().collect::<Vec<_>>(), ["Water"]);
}

#[test]
fn adopt_with_copy_is_fully_independent() {
    let mut original = Species::create(["Water", "Ethanol"], &databank()).unwrap();
    original.freeze();

    let mut copy = Species::adopt(&mut original, true);
    assert!(!copy.is_shared());
    assert!(!copy.is_frozen());
    copy.rename("Water", "H2O").unwrap();
    copy.remove("Ethanol").unwrap();
    copy.set_properties("H2O", "T", 310.0).unwrap();
    drop(copy);

    assert_eq!(original.len(), 2);
    let water = original.get("Water").unwrap().borrow();
    assert_eq!(water.id(), "Water");
    assert_eq!(water.temperature().value, 298.15);
}

#[test]
fn from_compounds_builds_a_new_collection() {
    let databank = databank();
    let water = share(databank.create("Water").unwrap());
    let glycerol = share(databank.create("glycerin").unwrap());

    let species = Species::from_compounds([Rc::clone(&glycerol), Rc::clone(&water)]).unwrap();
    assert_eq!(
        species.identifiers().collect::<Vec<_>>(),
        ["glycerin", "Water"]
    );
    assert!(Rc::ptr_eq(species.get("Water").unwrap(), &water));

    let err = Species::from_compounds([Rc::clone(&water), water]).unwrap_err();
    assert!(matches!(err, SpeciesError::DuplicateIdentifier { .. }));
}

#[test]
fn custom_factory_closure() {
    let databank = databank();
    let gas_factory = |id: &str| -> SpeciesResult<Chemical> {
        let mut chemical = databank.create(id)?;
        chemical.set_phase(Phase::Gas);
        Ok(chemical)
    };
    let species = Species::create(["Nitrogen", "Oxygen"], &gas_factory).unwrap();
    for compound in &species {
        assert_eq!(compound.borrow().phase(), Phase::Gas);
    }
}
