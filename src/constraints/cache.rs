//! Cache of built constraint sets
//!
//! Keyed by a fingerprint of the configured constraint names only. Expected
//! values come from settings that never change while the cache is alive
//! (`JwtService::reconfigure` clears it), and time is read at evaluation.

use crate::config::Settings;
use crate::constraints::ConstraintSet;
use crate::limits::MAX_CACHED_CONSTRAINT_SETS;

use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// SHA-256 over the length-prefixed constraint names
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub(crate) fn of<S: AsRef<str>>(names: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for name in names {
            let name = name.as_ref().as_bytes();
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name);
        }
        Self(hasher.finalize().into())
    }
}

pub(crate) struct ConstraintCache {
    entries: Cache<Fingerprint, Arc<ConstraintSet>>,
    builds: AtomicUsize,
}

impl ConstraintCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Cache::new(MAX_CACHED_CONSTRAINT_SETS),
            builds: AtomicUsize::new(0),
        }
    }

    /// Get the set for the configured names, building it on a miss
    pub(crate) fn get(&self, settings: &Settings) -> Arc<ConstraintSet> {
        let fingerprint = Fingerprint::of(&settings.constraint_names);
        self.entries.get_with(fingerprint, || {
            self.builds.fetch_add(1, Ordering::Relaxed);
            let set = ConstraintSet::build(settings);
            tracing::debug!(constraints = ?set.names(), "built constraint set");
            Arc::new(set)
        })
    }

    pub(crate) fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of sets built since creation
    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ConstraintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintCache")
            .field("builds", &self.builds())
            .finish_non_exhaustive()
    }
}
