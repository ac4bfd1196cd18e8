// SPDX-License-Identifier: Apache-2.0

//! Choice sets: groups of AND nodes known to compute the same function up to
//! complement. A set is keyed by its representative (the member consumers
//! reference); the remaining members are only reachable through this
//! relation.

use std::collections::BTreeMap;

use crate::aig::gate::AigRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSets {
    classes: BTreeMap<AigRef, Vec<AigRef>>,
}

impl ChoiceSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `member` to the set represented by `repr`, preserving
    /// insertion order.
    pub fn add(&mut self, repr: AigRef, member: AigRef) {
        self.classes.entry(repr).or_default().push(member);
    }

    /// Members of the set headed by `repr`, excluding `repr` itself.
    pub fn members(&self, repr: AigRef) -> &[AigRef] {
        self.classes
            .get(&repr)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_representative(&self, aig_ref: AigRef) -> bool {
        self.classes.contains_key(&aig_ref)
    }

    pub fn representative_of(&self, member: AigRef) -> Option<AigRef> {
        self.classes
            .iter()
            .find(|(_, members)| members.contains(&member))
            .map(|(repr, _)| *repr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AigRef, &Vec<AigRef>)> {
        self.classes.iter()
    }

    /// Number of sets.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total number of non-representative members across all sets.
    pub fn member_count(&self) -> usize {
        self.classes.values().map(|v| v.len()).sum()
    }
}
