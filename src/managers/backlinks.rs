use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::models::{LinkTarget, Reference};

/// Reverse index of target → notes that reference it
#[derive(Debug, Default)]
pub struct BacklinkIndex {
    /// target -> notes linking to it
    backlinks: HashMap<LinkTarget, BTreeSet<Uuid>>,
    /// note -> targets it contributed, kept so a resave can retract them
    outbound: HashMap<Uuid, Vec<LinkTarget>>,
}

impl BacklinkIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every edge contributed by `source` with the given references
    pub fn replace(&mut self, source: Uuid, references: &[Reference]) {
        self.remove(source);

        let mut targets: Vec<LinkTarget> = references
            .iter()
            .filter_map(Reference::link_target)
            .collect();
        targets.sort();
        targets.dedup();

        for target in &targets {
            self.backlinks
                .entry(target.clone())
                .or_default()
                .insert(source);
        }
        if !targets.is_empty() {
            self.outbound.insert(source, targets);
        }
    }

    /// Drop every edge contributed by `source`
    pub fn remove(&mut self, source: Uuid) {
        let Some(previous) = self.outbound.remove(&source) else {
            return;
        };
        for target in previous {
            if let Some(sources) = self.backlinks.get_mut(&target) {
                sources.remove(&source);
                if sources.is_empty() {
                    self.backlinks.remove(&target);
                }
            }
        }
    }

    /// Notes that reference `target`, sorted
    #[must_use]
    pub fn backlinks_for(&self, target: &LinkTarget) -> Vec<Uuid> {
        self.backlinks
            .get(target)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Targets referenced by `source`
    #[must_use]
    pub fn outbound_for(&self, source: Uuid) -> Vec<LinkTarget> {
        self.outbound.get(&source).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.backlinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backlinks.is_empty()
    }
}
