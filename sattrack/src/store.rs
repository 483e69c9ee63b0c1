//! The element store.
//!
//! Everything runs on one thread. Readers take an `Rc` to the current
//! snapshot, the slow cycle swaps in a whole new one, so a reader never
//! sees a half-replaced catalog.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};
use tleproto::RawCatalog;
use tletypes::prelude::*;
use tracing::debug;

use crate::units::Timestamp;

/// A named element set as held by the store
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct OrbitalElementSet {
    pub name: String,
    pub lines: ElementLines,
}

impl OrbitalElementSet {
    pub fn new<N: Into<String>>(name: N, lines: ElementLines) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }
}

impl From<UnstructuredTle> for OrbitalElementSet {
    fn from(tle: UnstructuredTle) -> Self {
        Self::new(tle.satellite_name, tle.lines)
    }
}

/// An immutable catalog, keyed by satellite name
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ElementSnapshot {
    sets: BTreeMap<String, OrbitalElementSet>,
    retrieved_at: Option<Timestamp>,
    dropped: usize,
}

impl ElementSnapshot {
    /// Later sets replace earlier ones of the same name
    pub fn new<I: IntoIterator<Item = OrbitalElementSet>>(sets: I) -> Self {
        Self {
            sets: sets.into_iter().map(|s| (s.name.clone(), s)).collect(),
            retrieved_at: None,
            dropped: 0,
        }
    }

    /// Normalizes a retrieved catalog. Entries carrying neither naming
    /// convention are dropped and counted.
    pub fn from_raw(raw: RawCatalog, retrieved_at: Timestamp) -> Self {
        let mut dropped = 0;
        let mut sets = BTreeMap::new();
        for (name, entry) in raw.into_iter() {
            match entry.normalize() {
                Some(lines) => {
                    sets.insert(name.clone(), OrbitalElementSet::new(name, lines));
                }
                None => {
                    debug!(name = %name, "Dropping catalog entry without element lines");
                    dropped += 1;
                }
            }
        }
        Self {
            sets,
            retrieved_at: Some(retrieved_at),
            dropped,
        }
    }

    pub fn get(&self, name: &str) -> Option<&OrbitalElementSet> {
        self.sets.get(name)
    }

    /// Ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &OrbitalElementSet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn retrieved_at(&self) -> Option<Timestamp> {
        self.retrieved_at
    }

    /// Number of entries dropped during normalization
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Shared handle to the current snapshot
#[derive(Clone, Debug, Default)]
pub struct ElementStore(Rc<RefCell<Rc<ElementSnapshot>>>);

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Rc<ElementSnapshot> {
        self.0.borrow().clone()
    }

    /// Replaces the whole catalog. Snapshots already handed out are unaffected.
    pub fn replace(&self, snapshot: ElementSnapshot) {
        *self.0.borrow_mut() = Rc::new(snapshot);
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
