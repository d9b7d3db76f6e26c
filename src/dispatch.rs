//! Dispatch table: methods placed at their perfect-hash slots.
//!
//! This is the complete contract handed to an emitter. Entries are stored in
//! slot order and each carries its own logical index and parameters, so nothing
//! downstream relies on positional correspondence with the key set.

use ahash::AHashSet;
use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::keyset::KeySet;
use crate::mph::{Construction, HashParams, MphIndexer};
use crate::types::{MethodDescriptor, ParamType};

/// One method at its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchEntry {
    /// Dispatch index into the handler/arity tables
    pub slot: usize,
    /// Position in the key set (reserved methods are 0, 1, 2)
    pub logical_index: usize,
    /// Method name and parameters
    #[serde(flatten)]
    pub method: MethodDescriptor,
}

impl DispatchEntry {
    /// Method name
    #[inline]
    pub fn name(&self) -> &str {
        &self.method.name
    }

    /// Ordered parameter types
    #[inline]
    pub fn params(&self) -> &[ParamType] {
        &self.method.params
    }
}

/// Assembled dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchTable {
    params: HashParams,
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    /// Place every key-set method at the slot the construction assigned it,
    /// then verify the result.
    pub fn assemble(keyset: &KeySet, construction: Construction) -> Result<Self> {
        if construction.slots.len() != keyset.len() {
            return Err(Error::verification(format!(
                "{} slots assigned for {} keys",
                construction.slots.len(),
                keyset.len()
            )));
        }

        let mut placed: Vec<Option<DispatchEntry>> = vec![None; keyset.len()];
        for ((logical_index, method), &slot) in keyset.iter().enumerate().zip(&construction.slots) {
            let cell = placed
                .get_mut(slot)
                .ok_or_else(|| Error::verification(format!("slot {} out of range", slot)))?;
            if let Some(prev) = cell.as_ref() {
                return Err(Error::verification(format!(
                    "{} and {} both assigned slot {}",
                    prev.name(),
                    method.name,
                    slot
                )));
            }
            *cell = Some(DispatchEntry { slot, logical_index, method: method.clone() });
        }

        let entries = placed
            .into_iter()
            .enumerate()
            .map(|(slot, e)| e.ok_or_else(|| Error::verification(format!("slot {} unclaimed", slot))))
            .collect::<Result<Vec<_>>>()?;

        let table = Self { params: construction.params, entries };
        table.verify()?;
        Ok(table)
    }

    /// Check that every stored key round-trips through the lookup formula to its
    /// own slot and that names are unique.
    pub fn verify(&self) -> Result<()> {
        if self.params.slot_count() != self.entries.len() {
            return Err(Error::verification(format!(
                "hash covers {} slots but table has {} entries",
                self.params.slot_count(),
                self.entries.len()
            )));
        }

        let mut names = AHashSet::with_capacity(self.entries.len());
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.slot != slot {
                return Err(Error::verification(format!(
                    "entry {} recorded at slot {} but stored at {}",
                    entry.name(),
                    entry.slot,
                    slot
                )));
            }
            let computed = self.params.eval(entry.name());
            if computed != slot {
                return Err(Error::verification(format!(
                    "{} hashes to slot {} but is stored at {}",
                    entry.name(),
                    computed,
                    slot
                )));
            }
            if !names.insert(entry.name()) {
                return Err(Error::DuplicateKey { name: entry.name().to_string() });
            }
        }
        Ok(())
    }

    /// Resolve a request method name.
    ///
    /// The stored key at the computed slot must equal `candidate`; unknown
    /// names that land on an occupied slot return `None`.
    pub fn lookup(&self, candidate: &str) -> Option<&DispatchEntry> {
        let entry = self.entries.get(self.params.eval(candidate))?;
        (entry.name() == candidate).then_some(entry)
    }

    /// Entry at a dispatch index
    pub fn entry(&self, slot: usize) -> Option<&DispatchEntry> {
        self.entries.get(slot)
    }

    /// Entries in slot order
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Salts and displacements
    pub fn params(&self) -> &HashParams {
        &self.params
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for an assembled table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Methods listed by `__funcs`: every non-hidden name with its slot, in slot order.
    pub fn public_methods(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .filter(|e| !e.method.is_hidden())
            .map(|e| (e.name(), e.slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MethodEntry;
    use crate::mph::{construct, MphConfig};

    fn entry(name: &str, params: &[&str]) -> MethodEntry {
        MethodEntry {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn build(methods: &[MethodEntry], seed: u64) -> DispatchTable {
        let keyset = KeySet::with_system_methods(methods).unwrap();
        let cfg = MphConfig { seed: Some(seed), ..Default::default() };
        let construction = construct(&keyset.names(), &cfg).unwrap();
        DispatchTable::assemble(&keyset, construction).unwrap()
    }

    fn sample() -> Vec<MethodEntry> {
        vec![
            entry("echo", &["TEXT_STRING"]),
            entry("always_error", &[]),
            entry("sum_array", &["ARRAY"]),
        ]
    }

    #[test]
    fn test_sample_table_resolves_every_method() {
        let table = build(&sample(), 17);
        assert_eq!(table.len(), 6);

        let echo = table.lookup("echo").unwrap();
        assert_eq!(echo.params(), &[ParamType::TextString]);
        assert_eq!(echo.logical_index, 3);
        assert_eq!(table.entry(echo.slot), Some(echo));

        for name in ["__funcs", "__ping", "__version", "always_error", "sum_array"] {
            let e = table.lookup(name).unwrap();
            assert_eq!(e.name(), name);
        }
    }

    #[test]
    fn test_reserved_methods_keep_logical_indices() {
        let table = build(&sample(), 3);
        for (i, name) in ["__funcs", "__ping", "__version"].iter().enumerate() {
            let e = table.lookup(name).unwrap();
            assert_eq!(e.logical_index, i);
            assert!(e.params().is_empty());
        }
    }

    #[test]
    fn test_entries_are_in_slot_order() {
        let table = build(&sample(), 11);
        for (i, e) in table.entries().iter().enumerate() {
            assert_eq!(e.slot, i);
        }
    }

    /// Unknown names always land on an occupied slot; the key comparison rejects them
    #[test]
    fn test_unknown_names_are_rejected() {
        let table = build(&sample(), 23);
        for i in 0..500 {
            let candidate = format!("unknown_{}", i);
            let slot = table.params().eval(&candidate);
            let occupant = table.entry(slot).unwrap();
            assert_ne!(occupant.name(), candidate);
            assert!(table.lookup(&candidate).is_none());
        }
        assert!(table.lookup("").is_none());
        assert!(table.lookup("ECHO").is_none());
    }

    #[test]
    fn test_public_methods_skip_hidden_names() {
        let mut methods = sample();
        methods.push(entry("_hidden_ping", &[]));
        let table = build(&methods, 5);

        let public: Vec<&str> = table.public_methods().map(|(name, _)| name).collect();
        assert_eq!(public.len(), 3);
        assert!(public.contains(&"echo"));
        assert!(!public.iter().any(|n| n.starts_with('_')));
        for (name, slot) in table.public_methods() {
            assert_eq!(table.lookup(name).unwrap().slot, slot);
        }
    }

    #[test]
    fn test_assemble_rejects_colliding_construction() {
        let keyset = KeySet::with_system_methods(&sample()).unwrap();
        let cfg = MphConfig { seed: Some(1), ..Default::default() };
        let mut construction = construct(&keyset.names(), &cfg).unwrap();
        construction.slots[1] = construction.slots[0];

        let err = DispatchTable::assemble(&keyset, construction).unwrap_err();
        assert!(matches!(err, Error::Verification(_)));
    }

    #[test]
    fn test_serializes_to_json() {
        let table = build(&sample(), 8);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["entries"].as_array().unwrap().len(), 6);
        assert_eq!(json["params"]["key_count"], 6);
        assert_eq!(json["params"]["salt1"].as_array().unwrap().len(), crate::mph::SALT_LEN);
    }
}
