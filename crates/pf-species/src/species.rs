//! Ordered, name-indexed collection of compounds.
//!
//! A [`Species`] maps identifiers to shared compound handles in insertion
//! order. It is built by resolving identifiers through a
//! [`CompoundFactory`], mutated by key while it is still private to its
//! creator, and frozen for good once it is attached to streams.
//!
//! ```
//! use pf_core::units::k;
//! use pf_species::{Conditions, Databank, Species};
//!
//! let databank = Databank::builtin();
//! let mut species = Species::create(["Water", "Ethanol"], &databank).unwrap();
//! let tb = species.get_values(["Water", "Ethanol"], "Tb", &Conditions::current()).unwrap();
//! assert!(tb[0] > tb[1]);
//!
//! let psat = species
//!     .get_values("Ethanol", "Psat", &Conditions::current().with_temperature(k(350.0)))
//!     .unwrap();
//! assert!(psat[0] > 0.0);
//!
//! species.freeze();
//! assert!(species.remove("Water").is_err());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::chemical::Chemical;
use crate::compound::{Compound, CompoundRef, share};
use crate::databank::CompoundFactory;
use crate::error::{SpeciesError, SpeciesResult};
use crate::property::{Conditions, PropertyValue};

struct Entry<C> {
    key: String,
    compound: CompoundRef<C>,
}

impl<C> Clone for Entry<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            compound: Rc::clone(&self.compound),
        }
    }
}

/// Ordered collection of compounds keyed by identifier.
///
/// Invariants: keys are unique and non-empty, and every compound's own
/// `id()` equals the key it is stored under. Once [`freeze`](Self::freeze)d,
/// the structure (membership, keys, order) can no longer change; the
/// compounds themselves stay mutable through property setters.
pub struct Species<C = Chemical> {
    entries: Vec<Entry<C>>,
    /// Reverse lookup: key -> position in `entries`.
    index: HashMap<String, usize>,
    frozen: bool,
}

impl<C> Default for Species<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            frozen: false,
        }
    }
}

impl<C: Compound> Species<C> {
    /// Empty, mutable collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve each identifier through `factory`, in order.
    ///
    /// All-or-nothing: the first unresolvable identifier fails the whole
    /// call with [`SpeciesError::CompoundResolution`] and no collection is
    /// returned. Repeated identifiers fail with
    /// [`SpeciesError::DuplicateIdentifier`].
    pub fn create<I, S, F>(identifiers: I, factory: &F) -> SpeciesResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: CompoundFactory<Compound = C>,
    {
        let mut species = Self::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            let compound = factory.create(identifier).map_err(|err| match err {
                SpeciesError::CompoundResolution { .. } => err,
                other => SpeciesError::CompoundResolution {
                    identifier: identifier.to_string(),
                    reason: other.to_string(),
                },
            })?;
            let key = compound.id().to_string();
            species.push_new(key, share(compound))?;
        }
        tracing::debug!(count = species.len(), "species created");
        Ok(species)
    }

    /// New collection over existing compound handles, keyed by each
    /// compound's own identifier. Handles are shared, not copied.
    pub fn from_compounds<I>(compounds: I) -> SpeciesResult<Self>
    where
        I: IntoIterator<Item = CompoundRef<C>>,
    {
        let mut species = Self::new();
        for compound in compounds {
            let key = compound.borrow().id().to_string();
            species.push_new(key, compound)?;
        }
        Ok(species)
    }

    fn push_new(&mut self, key: String, compound: CompoundRef<C>) -> SpeciesResult<()> {
        ensure_key(&key)?;
        if self.index.contains_key(&key) {
            return Err(SpeciesError::duplicate(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry { key, compound });
        Ok(())
    }

    fn ensure_mutable(&self) -> SpeciesResult<()> {
        if self.frozen {
            Err(SpeciesError::ImmutableCollection)
        } else {
            Ok(())
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key.clone(), i))
            .collect();
    }

    /// Store `compound` under `key`, setting the compound's identifier to the key.
    ///
    /// Replacing an existing key keeps its position and returns the old handle.
    /// A handle already stored under a different key is rejected.
    pub fn insert(
        &mut self,
        key: &str,
        compound: CompoundRef<C>,
    ) -> SpeciesResult<Option<CompoundRef<C>>> {
        self.ensure_mutable()?;
        ensure_key(key)?;
        if let Some(other) = self
            .entries
            .iter()
            .find(|e| e.key != key && Rc::ptr_eq(&e.compound, &compound))
        {
            return Err(SpeciesError::duplicate(other.key.clone()));
        }

        compound.borrow_mut().set_id(key);
        match self.index.get(key) {
            Some(&i) => {
                let old = std::mem::replace(&mut self.entries[i].compound, compound);
                Ok(Some(old))
            }
            None => {
                self.push_new(key.to_string(), compound)?;
                Ok(None)
            }
        }
    }

    /// Remove a member and return its handle.
    pub fn remove(&mut self, key: &str) -> SpeciesResult<CompoundRef<C>> {
        self.ensure_mutable()?;
        let i = self.position(key)?;
        let entry = self.entries.remove(i);
        self.reindex();
        tracing::debug!(%key, "species removed");
        Ok(entry.compound)
    }

    /// Rebuild the collection in the order of `new_keys`.
    ///
    /// Every key must be a current member and appear once; members left out
    /// are dropped. Compound handles are reused, never recreated. Nothing
    /// changes unless the whole key list is valid.
    pub fn rekey<I, S>(&mut self, new_keys: I) -> SpeciesResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_mutable()?;
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for key in new_keys {
            let key = key.as_ref();
            let i = self.position(key)?;
            if !seen.insert(i) {
                return Err(SpeciesError::duplicate(key));
            }
            order.push(i);
        }

        let dropped = self.entries.len() - order.len();
        self.entries = order.into_iter().map(|i| self.entries[i].clone()).collect();
        self.reindex();
        tracing::debug!(count = self.len(), dropped, "species rekeyed");
        Ok(())
    }

    /// Rename one member in place, updating the compound's identifier.
    pub fn rename(&mut self, old: &str, new: &str) -> SpeciesResult<()> {
        self.ensure_mutable()?;
        ensure_key(new)?;
        let i = self.position(old)?;
        if old == new {
            return Ok(());
        }
        if self.index.contains_key(new) {
            return Err(SpeciesError::duplicate(new));
        }

        let entry = &mut self.entries[i];
        entry.key = new.to_string();
        entry.compound.borrow_mut().set_id(new);
        self.index.remove(old);
        self.index.insert(new.to_string(), i);
        tracing::debug!(%old, %new, "species renamed");
        Ok(())
    }

    /// Permanently reject structural mutation.
    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(species = %self, "species frozen");
        }
        self.frozen = true;
    }

    /// Freeze and wrap for attachment to any number of read-only consumers.
    pub fn into_shared(mut self) -> Rc<Self> {
        self.freeze();
        Rc::new(self)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&CompoundRef<C>> {
        self.index_of(key).map(|i| &self.entries[i].compound)
    }

    /// Member handle or [`SpeciesError::UnknownIdentifier`].
    pub fn lookup(&self, key: &str) -> SpeciesResult<&CompoundRef<C>> {
        self.position(key).map(|i| &self.entries[i].compound)
    }

    fn position(&self, key: &str) -> SpeciesResult<usize> {
        self.index_of(key).ok_or_else(|| SpeciesError::unknown(key))
    }

    /// Compounds in insertion order.
    pub fn iter(&self) -> Iter<'_, C> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Keys in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// CAS numbers in insertion order.
    pub fn cas_numbers(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|e| e.compound.borrow().cas().to_string())
    }

    fn resolve<'s>(&self, selection: &Selection<'s>) -> SpeciesResult<Vec<&CompoundRef<C>>> {
        selection.identifiers().iter().map(|id| self.lookup(id)).collect()
    }

    /// Read `property` from each selected compound, in selection order.
    ///
    /// Every identifier is checked before any compound is touched. The set
    /// fields of `conditions` are then applied to each compound before its
    /// read and stay applied afterwards.
    pub fn get_properties<'s>(
        &self,
        selection: impl Into<Selection<'s>>,
        property: &str,
        conditions: &Conditions,
    ) -> SpeciesResult<Vec<PropertyValue>> {
        let targets = self.resolve(&selection.into())?;
        let mut values = Vec::with_capacity(targets.len());
        for compound in targets {
            if !conditions.is_empty() {
                compound.borrow_mut().apply(conditions)?;
            }
            values.push(compound.borrow().property(property)?);
        }
        Ok(values)
    }

    /// [`get_properties`](Self::get_properties) for numeric properties.
    pub fn get_values<'s>(
        &self,
        selection: impl Into<Selection<'s>>,
        property: &str,
        conditions: &Conditions,
    ) -> SpeciesResult<Vec<f64>> {
        self.get_properties(selection, property, conditions)?
            .iter()
            .map(|v| v.expect_number(property))
            .collect()
    }

    /// Assign `value` to `property` on each selected compound.
    ///
    /// Allowed on frozen collections: compounds are shared objects and the
    /// change is visible to every holder. `ID` is refused here because it
    /// would detach compounds from their keys; use [`rename`](Self::rename).
    pub fn set_properties<'s>(
        &self,
        selection: impl Into<Selection<'s>>,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> SpeciesResult<()> {
        if property == "ID" {
            return Err(SpeciesError::ReadOnlyProperty {
                property: property.to_string(),
            });
        }
        let value = value.into();
        for compound in self.resolve(&selection.into())? {
            compound.borrow_mut().set_property(property, value.clone())?;
        }
        Ok(())
    }

    /// Human-readable member listing.
    pub fn describe(&self) -> String {
        format!("Species:\n {}", self.joined_identifiers())
    }

    pub fn show(&self) {
        println!("{}", self.describe());
    }

    fn joined_identifiers(&self) -> String {
        self.identifiers().collect::<Vec<_>>().join(", ")
    }
}

impl<C: Compound + Clone> Species<C> {
    /// Reuse or copy an existing collection.
    ///
    /// With `copy == false` the result is `existing` itself: mutating it
    /// mutates the original. With `copy == true` the result is
    /// [`copied`](Self::copied).
    pub fn adopt(existing: &mut Self, copy: bool) -> SpeciesHandle<'_, C> {
        if copy {
            SpeciesHandle::Copied(existing.copied())
        } else {
            SpeciesHandle::Shared(existing)
        }
    }

    /// Independent, unfrozen copy with its own compounds, in the same order.
    ///
    /// Nothing done to the copy (renames, inserts, property writes) reaches
    /// this collection or its compounds.
    pub fn copied(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| Entry {
                    key: e.key.clone(),
                    compound: share(e.compound.borrow().clone()),
                })
                .collect(),
            index: self.index.clone(),
            frozen: false,
        }
    }
}

fn ensure_key(key: &str) -> SpeciesResult<()> {
    if key.trim().is_empty() {
        Err(SpeciesError::InvalidIdentifier {
            what: "empty species key".to_string(),
        })
    } else {
        Ok(())
    }
}

impl<C: Compound> fmt::Display for Species<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Species: {}>", self.joined_identifiers())
    }
}

impl<C: Compound> fmt::Debug for Species<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Species")
            .field("identifiers", &self.identifiers().collect::<Vec<_>>())
            .field("frozen", &self.frozen)
            .finish()
    }
}

/// Iterator over the compounds of a [`Species`], in insertion order.
pub struct Iter<'a, C> {
    inner: std::slice::Iter<'a, Entry<C>>,
}

impl<'a, C> Iterator for Iter<'a, C> {
    type Item = &'a CompoundRef<C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &e.compound)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C> DoubleEndedIterator for Iter<'_, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| &e.compound)
    }
}

impl<C> ExactSizeIterator for Iter<'_, C> {}

impl<'a, C: Compound> IntoIterator for &'a Species<C> {
    type Item = &'a CompoundRef<C>;
    type IntoIter = Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of [`Species::adopt`]: the original collection or an independent copy.
pub enum SpeciesHandle<'a, C: Compound> {
    Shared(&'a mut Species<C>),
    Copied(Species<C>),
}

impl<C: Compound> SpeciesHandle<'_, C> {
    pub fn is_shared(&self) -> bool {
        matches!(self, SpeciesHandle::Shared(_))
    }
}

impl<C: Compound> Deref for SpeciesHandle<'_, C> {
    type Target = Species<C>;

    fn deref(&self) -> &Species<C> {
        match self {
            SpeciesHandle::Shared(species) => species,
            SpeciesHandle::Copied(species) => species,
        }
    }
}

impl<C: Compound> DerefMut for SpeciesHandle<'_, C> {
    fn deref_mut(&mut self) -> &mut Species<C> {
        match self {
            SpeciesHandle::Shared(species) => species,
            SpeciesHandle::Copied(species) => species,
        }
    }
}

/// One identifier or an ordered list of identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    One(&'a str),
    Many(Vec<&'a str>),
}

impl<'a> Selection<'a> {
    pub fn identifiers(&self) -> &[&'a str] {
        match self {
            Selection::One(id) => std::slice::from_ref(id),
            Selection::Many(ids) => ids,
        }
    }
}

impl<'a> From<&'a str> for Selection<'a> {
    fn from(id: &'a str) -> Self {
        Selection::One(id)
    }
}

impl<'a> From<&'a String> for Selection<'a> {
    fn from(id: &'a String) -> Self {
        Selection::One(id)
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Selection<'a> {
    fn from(ids: [&'a str; N]) -> Self {
        Selection::Many(ids.to_vec())
    }
}

impl<'a> From<&'a [&'a str]> for Selection<'a> {
    fn from(ids: &'a [&'a str]) -> Self {
        Selection::Many(ids.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for Selection<'a> {
    fn from(ids: Vec<&'a str>) -> Self {
        Selection::Many(ids)
    }
}

impl<'a> From<&'a [String]> for Selection<'a> {
    fn from(ids: &'a [String]) -> Self {
        Selection::Many(ids.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Selection<'a> {
    fn from(ids: &'a Vec<String>) -> Self {
        Selection::from(ids.as_slice())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::databank::Databank;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rekey_permutation_preserves_handles(order in Just((0..6).collect::<Vec<usize>>()).prop_shuffle(), keep in 0usize..=6) {
            let databank = Databank::builtin();
            let names: Vec<String> = databank.records().iter().take(6).map(|r| r.name.clone()).collect();
            let mut species = Species::create(&names, &databank).unwrap();
            let handles: Vec<_> = species.iter().cloned().collect();

            let new_keys: Vec<&str> = order.iter().take(keep).map(|&i| names[i].as_str()).collect();
            species.rekey(&new_keys).unwrap();

            prop_assert_eq!(species.len(), keep);
            for (compound, &i) in species.iter().zip(order.iter()) {
                prop_assert!(Rc::ptr_eq(compound, &handles[i]));
                let borrowed = compound.borrow();
                prop_assert_eq!(borrowed.id(), names[i].as_str());
            }
        }
    }
}
