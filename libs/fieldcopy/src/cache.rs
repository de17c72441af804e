use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::plan::{FieldPlan, TypePairKey};
use crate::record::Record;

/// Field plans keyed by type pair.
///
/// Read-mostly: lookups take the read lock, a miss takes the write lock and
/// re-checks before building, so each pair is built at most once. Entries
/// are never evicted; the key space is bounded by the type pairs the program
/// actually copies between.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<TypePairKey, Arc<FieldPlan>>>,
    builds: AtomicU64,
    hits: AtomicU64,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build<S: Record, T: Record>(&self) -> Arc<FieldPlan> {
        let key = TypePairKey::of::<S, T>();

        if let Some(plan) = self.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(plan);
        }

        let mut guard = self.write();
        // Another caller may have built it between the two locks.
        if let Some(plan) = guard.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(plan);
        }

        let plan = Arc::new(FieldPlan::for_types::<S, T>());
        self.builds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            pair = %key,
            matched = plan.len(),
            mismatched = plan.mismatched().count(),
            "field plan built"
        );
        guard.insert(key, Arc::clone(&plan));
        plan
    }

    pub fn get<S: Record, T: Record>(&self) -> Option<Arc<FieldPlan>> {
        self.read().get(&TypePairKey::of::<S, T>()).cloned()
    }

    pub fn contains<S: Record, T: Record>(&self) -> bool {
        self.read().contains_key(&TypePairKey::of::<S, T>())
    }

    /// Number of plans derived from scratch since creation.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypePairKey, Arc<FieldPlan>>> {
        match self.plans.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("plan cache read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypePairKey, Arc<FieldPlan>>> {
        match self.plans.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("plan cache write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
