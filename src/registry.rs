//! Probe registry
//!
//! An ordered collection of [`Probe`] descriptors keyed by identifier.
//! Registration is insert-or-update: re-registering an existing identifier
//! mutates the entry in place, and probes are never individually removed.
//! Lookup is a linear scan, which is fine for the expected population of a
//! few dozen probes.
//!
//! The registry itself is not synchronized. [`crate::PinWatch`] wraps it in
//! an `RwLock` so application registration calls cannot race the sampling
//! flow's traversal.

use crate::types::{Probe, ProbeKind, SharedValue, ValueFn, ValueSource, VIRTUAL_ID_FLOOR};
use std::sync::Arc;

/// Ordered, identifier-keyed collection of probes
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: Vec<Probe>,
}

impl ProbeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered probes
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// All probes in registration order
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Look up a probe by identifier
    pub fn get(&self, id: u16) -> Option<&Probe> {
        self.probes.iter().find(|p| p.id == id)
    }

    fn position(&self, id: u16) -> Option<usize> {
        self.probes.iter().position(|p| p.id == id)
    }

    /// Register a hardware probe, or update an existing entry in place.
    ///
    /// `kind` and `label` only overwrite when supplied, so a later call can
    /// amend one field without clobbering the other. The getter slot is
    /// always applied: `Some` installs a getter source, `None` clears a
    /// previously installed getter but leaves a shared-cell attachment
    /// intact.
    pub fn upsert(
        &mut self,
        id: u16,
        kind: Option<ProbeKind>,
        label: Option<&str>,
        getter: Option<ValueFn>,
    ) {
        match self.position(id) {
            Some(index) => {
                let probe = &mut self.probes[index];
                if let Some(kind) = kind {
                    probe.kind = kind;
                }
                if let Some(label) = label {
                    probe.label = label.to_string();
                }
                match getter {
                    Some(f) => probe.source = ValueSource::Getter(f),
                    None => {
                        if matches!(probe.source, ValueSource::Getter(_)) {
                            probe.source = ValueSource::None;
                        }
                    }
                }
            }
            None => self.probes.push(Probe {
                id,
                kind: kind.unwrap_or_default(),
                label: label.unwrap_or("-").to_string(),
                source: getter.map_or(ValueSource::None, ValueSource::Getter),
            }),
        }
    }

    /// Attach a virtual probe to a shared value cell.
    ///
    /// Identifiers below [`VIRTUAL_ID_FLOOR`] are coerced up to the floor so
    /// virtual probes never collide with hardware pin numbers. An existing
    /// entry is converted in place into a virtual probe. Returns the
    /// effective identifier.
    pub fn attach_shared(&mut self, id: u16, value: Arc<SharedValue>, name: &str) -> u16 {
        let id = id.max(VIRTUAL_ID_FLOOR);
        match self.position(id) {
            Some(index) => {
                let probe = &mut self.probes[index];
                probe.kind = ProbeKind::Virtual;
                probe.label = name.to_string();
                probe.source = ValueSource::Shared(value);
            }
            None => self.probes.push(Probe {
                id,
                kind: ProbeKind::Virtual,
                label: name.to_string(),
                source: ValueSource::Shared(value),
            }),
        }
        id
    }

    /// Seed the cached-scalar source of an existing probe.
    ///
    /// Returns `false` when no probe with `id` is registered. Overwrites any
    /// previously configured source.
    pub fn set_cached(&mut self, id: u16, value: f32) -> bool {
        match self.position(id) {
            Some(index) => {
                self.probes[index].source = ValueSource::Cached(value);
                true
            }
            None => false,
        }
    }

    /// Insert placeholder entries for every identifier not already present.
    ///
    /// Existing entries are left untouched; calling this repeatedly is a
    /// no-op after the first time.
    pub fn add_placeholders(&mut self, ids: &[u16]) {
        for &id in ids {
            if self.get(id).is_none() {
                self.probes.push(Probe::placeholder(id));
            }
        }
    }
}
