// SPDX-License-Identifier: Apache-2.0

//! Cuts: bounded local decompositions of a mapper node over a set of leaf
//! nodes.
//!
//! A non-trivial cut records how its function is assembled from two child
//! cuts (each either a sub-cut internal to the decomposition or the trivial
//! cut of one of its leaves) with an independent complement bit per child,
//! plus an overall `phase` bit applied to the composed AND:
//!
//! ```text
//! f(cut) = not_cond(and(not_cond(f(child0), c0), not_cond(f(child1), c1)), phase)
//! ```

use crate::mapper::manager::MapRef;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CutId(pub usize);

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CutChild {
    pub cut: CutId,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    /// Node whose function this cut computes.
    pub root: MapRef,
    pub leaves: Vec<MapRef>,
    /// `None` for the trivial cut of a node (its only leaf is the node
    /// itself).
    pub children: Option<[CutChild; 2]>,
    pub phase: bool,
    pub delay: f32,
    pub area_flow: f32,
}

impl Cut {
    pub fn trivial(root: MapRef) -> Self {
        Self {
            root,
            leaves: vec![root],
            children: None,
            phase: false,
            delay: 0.0,
            area_flow: 0.0,
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.children.is_none()
    }

    pub fn size(&self) -> usize {
        self.leaves.len()
    }
}

/// Merges two sorted leaf lists, returning `None` if the union exceeds
/// `limit` leaves.
pub fn merge_leaves(a: &[MapRef], b: &[MapRef], limit: usize) -> Option<Vec<MapRef>> {
    let mut merged = Vec::with_capacity(limit);
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = if j == b.len() || (i < a.len() && a[i] < b[j]) {
            i += 1;
            a[i - 1]
        } else if i == a.len() || b[j] < a[i] {
            j += 1;
            b[j - 1]
        } else {
            i += 1;
            j += 1;
            a[i - 1]
        };
        if merged.len() == limit {
            return None;
        }
        merged.push(next);
    }
    Some(merged)
}
