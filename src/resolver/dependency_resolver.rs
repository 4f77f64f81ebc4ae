use crate::model::{Target, TargetUniverse};
use serde::Serialize;

/// A unit's imports split by whether they name a unit of the universe.
///
/// External dependencies are kept even though descriptors do not list them
/// as prerequisites; callers decide whether to emit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDeps {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl ResolvedDeps {
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }
}

pub struct DependencyResolver<'a> {
    universe: &'a TargetUniverse,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(universe: &'a TargetUniverse) -> Self {
        Self { universe }
    }

    /// Partition `target`'s recorded imports into internal and external.
    ///
    /// An identifier missing from the universe is external, even when it
    /// looks like a unit of the scanned tree.
    pub fn resolve(&self, target: &Target) -> ResolvedDeps {
        let (internal, external): (Vec<String>, Vec<String>) = target
            .imports()
            .iter()
            .cloned()
            .partition(|imp| self.universe.contains(imp));

        // imports() iterates in order, so both halves are already ascending
        ResolvedDeps { internal, external }
    }
}
