// SPDX-License-Identifier: Apache-2.0

//! Derives the local function of a mapped node from its best cut.
//!
//! The cut's decomposition tree is walked from the root, composing child
//! functions with their complement bits and applying each cut's phase. Leaf
//! trivial cuts are seeded with variables in leaf order. Results are
//! memoized per cut in a `CutScratch` that lives for exactly one pass.

use std::collections::HashMap;

use crate::error::{MapError, Result};
use crate::logic::func::{FuncGraph, FuncLit};
use crate::mapper::cut::CutId;
use crate::mapper::manager::{MapManager, MapRef};

/// Per-pass memo from cut to synthesized function.
#[derive(Debug, Default)]
pub struct CutScratch {
    data: HashMap<CutId, FuncLit>,
    seeded: Vec<CutId>,
    visited: Vec<CutId>,
}

impl CutScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.seeded.is_empty() && self.visited.is_empty()
    }

    pub fn get(&self, cut: CutId) -> Option<FuncLit> {
        self.data.get(&cut).copied()
    }

    /// Cuts whose results were computed (not seeded) in this pass, in
    /// completion order.
    pub fn visited(&self) -> &[CutId] {
        &self.visited
    }

    fn write(&mut self, cut: CutId, func: FuncLit) {
        let previous = self.data.insert(cut, func);
        assert!(
            previous.is_none(),
            "cut {:?} written twice in one synthesis pass",
            cut
        );
    }

    /// Binds a leaf's trivial cut to its variable.
    pub fn seed(&mut self, cut: CutId, func: FuncLit) {
        self.write(cut, func);
        self.seeded.push(cut);
    }

    fn record(&mut self, cut: CutId, func: FuncLit) {
        self.write(cut, func);
        self.visited.push(cut);
    }

    /// Drops every seeded and visited entry.
    pub fn clear(&mut self) {
        for cut in self.seeded.drain(..) {
            self.data.remove(&cut);
        }
        for cut in self.visited.drain(..) {
            self.data.remove(&cut);
        }
        debug_assert!(self.data.is_empty());
    }
}

/// Synthesizes the function computed by `cut`, recursing into its children.
///
/// Every trivial cut reached must have been seeded; reaching an unseeded one
/// means the decomposition escapes the cut's leaves.
pub fn synthesize_cut_function(
    manager: &MapManager,
    funcs: &mut FuncGraph,
    scratch: &mut CutScratch,
    cut_id: CutId,
) -> Result<FuncLit> {
    if let Some(func) = scratch.get(cut_id) {
        return Ok(func);
    }
    let cut = manager.cut(cut_id);
    let Some([child0, child1]) = cut.children else {
        return Err(MapError::Invariant(format!(
            "decomposition reaches node {} which is not a leaf of the cut",
            cut.root.id
        )));
    };
    let func0 = synthesize_cut_function(manager, funcs, scratch, child0.cut)?;
    let func1 = synthesize_cut_function(manager, funcs, scratch, child1.cut)?;
    let func0 = funcs.not_cond(func0, child0.negated);
    let func1 = funcs.not_cond(func1, child1.negated);
    let func = funcs.and(func0, func1);
    let func = funcs.not_cond(func, cut.phase);
    scratch.record(cut_id, func);
    Ok(func)
}

/// Synthesizes the function of `node`'s best cut over variables numbered by
/// leaf position.
pub fn synthesize_node_function(
    manager: &MapManager,
    funcs: &mut FuncGraph,
    node: MapRef,
) -> Result<FuncLit> {
    let best = manager.best_cut(node).ok_or_else(|| {
        MapError::Invariant(format!("node {} has no best cut", node.id))
    })?;
    let leaves = &manager.cut(best).leaves;
    if leaves.len() < 2 {
        return Err(MapError::Invariant(format!(
            "best cut of node {} has {} leaves; at least 2 are required",
            node.id,
            leaves.len()
        )));
    }
    for (i, leaf) in leaves.iter().enumerate() {
        if leaves[..i].contains(leaf) {
            return Err(MapError::Invariant(format!(
                "best cut of node {} lists leaf {} twice",
                node.id, leaf.id
            )));
        }
    }

    let mut scratch = CutScratch::new();
    for (i, leaf) in leaves.iter().enumerate() {
        let var = funcs.var(i);
        scratch.seed(manager.node(*leaf).trivial_cut(), var);
    }
    let result = synthesize_cut_function(manager, funcs, &mut scratch, best);
    log::trace!(
        "node {}: synthesized {} cuts over {} leaves",
        node.id,
        scratch.visited().len(),
        leaves.len()
    );
    scratch.clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::cut::{Cut, CutChild};
    use crate::mapper::params::MapParams;
    use crate::mapper::select::{CutSelector, PriorityCutSelector};
    use pretty_assertions::assert_eq;

    /// Evaluates a cut's decomposition tree directly, as a reference for the
    /// synthesized function.
    fn eval_cut(manager: &MapManager, cut_id: CutId, leaf_values: &HashMap<MapRef, bool>) -> bool {
        let cut = manager.cut(cut_id);
        match cut.children {
            None => leaf_values[&cut.root],
            Some([c0, c1]) => {
                let v0 = eval_cut(manager, c0.cut, leaf_values) ^ c0.negated;
                let v1 = eval_cut(manager, c1.cut, leaf_values) ^ c1.negated;
                (v0 && v1) ^ cut.phase
            }
        }
    }

    fn assert_matches_decomposition(
        manager: &MapManager,
        funcs: &FuncGraph,
        node: MapRef,
        func: FuncLit,
    ) {
        let cut_id = manager.best_cut(node).unwrap();
        let leaves = manager.cut(cut_id).leaves.clone();
        assert!(leaves.len() <= 10);
        let table = funcs.truth_table(func, leaves.len());
        for m in 0..(1usize << leaves.len()) {
            let leaf_values: HashMap<MapRef, bool> = leaves
                .iter()
                .enumerate()
                .map(|(i, leaf)| (*leaf, (m >> i) & 1 == 1))
                .collect();
            assert_eq!(
                table[m],
                eval_cut(manager, cut_id, &leaf_values),
                "node {} row {}",
                node.id,
                m
            );
        }
    }

    fn and_manager() -> (MapManager, MapRef, MapRef, MapRef) {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let i1 = m.create_input();
        let i2 = m.create_input();
        let g = m.create_and(i1, false, i2, false);
        m.create_output(g, false);
        (m, i1, i2, g)
    }

    #[test]
    fn test_and_with_phase_zero_and_one() {
        for phase in [false, true] {
            let (mut m, i1, i2, g) = and_manager();
            let cut = m.derive_cut(g, &[i1, i2], phase).unwrap();
            m.set_best_cut(g, cut);
            let mut funcs = FuncGraph::new();
            let func = synthesize_node_function(&m, &mut funcs, g).unwrap();
            let v0 = funcs.var(0);
            let v1 = funcs.var(1);
            let and = funcs.and(v0, v1);
            assert_eq!(func, funcs.not_cond(and, phase));
        }
    }

    #[test]
    fn test_leaf_order_sets_variable_numbering() {
        let (mut m, i1, i2, g) = and_manager();
        let mut funcs = FuncGraph::new();
        // Reversed leaves: I2 is variable 0.
        let cut = m.derive_cut(g, &[i2, i1], false).unwrap();
        m.set_best_cut(g, cut);
        let func = synthesize_node_function(&m, &mut funcs, g).unwrap();
        assert_eq!(funcs.to_expr(func), "and(v0, v1)");
        let m_cut = m.cut(cut).clone();
        let [c0, _] = m_cut.children.unwrap();
        assert_eq!(c0.cut, m.node(i1).trivial_cut());
    }

    #[test]
    fn test_single_leaf_cut_is_an_invariant_error() {
        let (mut m, i1, _, g) = and_manager();
        let cut = m.add_cut(Cut {
            root: g,
            leaves: vec![i1],
            children: None,
            phase: false,
            delay: 0.0,
            area_flow: 0.0,
        });
        m.set_best_cut(g, cut);
        let mut funcs = FuncGraph::new();
        assert!(matches!(
            synthesize_node_function(&m, &mut funcs, g),
            Err(MapError::Invariant(_))
        ));
    }

    #[test]
    fn test_decomposition_escaping_leaves_is_an_invariant_error() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let a = m.create_input();
        let b = m.create_input();
        let c = m.create_input();
        let ab = m.create_and(a, false, b, false);
        let root = m.create_and(ab, false, c, true);
        // Claims leaves {a, c} but decomposes through ab's trivial cut.
        let bad = m.add_cut(Cut {
            root,
            leaves: vec![a, c],
            children: Some([
                CutChild {
                    cut: m.node(ab).trivial_cut(),
                    negated: false,
                },
                CutChild {
                    cut: m.node(c).trivial_cut(),
                    negated: true,
                },
            ]),
            phase: false,
            delay: 0.0,
            area_flow: 0.0,
        });
        m.set_best_cut(root, bad);
        let mut funcs = FuncGraph::new();
        let err = synthesize_node_function(&m, &mut funcs, root).unwrap_err();
        assert!(err.to_string().contains("not a leaf"), "{}", err);
    }

    #[test]
    fn test_scratch_is_empty_after_clear() {
        let (mut m, i1, i2, g) = and_manager();
        let cut = m.derive_cut(g, &[i1, i2], false).unwrap();
        let mut funcs = FuncGraph::new();
        let mut scratch = CutScratch::new();
        let v0 = funcs.var(0);
        let v1 = funcs.var(1);
        scratch.seed(m.node(i1).trivial_cut(), v0);
        scratch.seed(m.node(i2).trivial_cut(), v1);
        synthesize_cut_function(&m, &mut funcs, &mut scratch, cut).unwrap();
        assert_eq!(scratch.visited(), &[cut]);
        // A memo hit returns the stored result without recomputing.
        synthesize_cut_function(&m, &mut funcs, &mut scratch, cut).unwrap();
        assert_eq!(scratch.visited().len(), 1);
        scratch.clear();
        assert!(scratch.is_empty());
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn test_double_write_panics() {
        let (m, i1, _, _) = and_manager();
        let mut funcs = FuncGraph::new();
        let mut scratch = CutScratch::new();
        let v0 = funcs.var(0);
        scratch.seed(m.node(i1).trivial_cut(), v0);
        scratch.seed(m.node(i1).trivial_cut(), v0);
    }

    #[test]
    fn test_overlapping_passes_match_decomposition() {
        // Two overlapping cones over shared leaves; mapping with small K
        // forces multi-level cuts that share sub-cuts and leaves.
        let params = MapParams {
            lut_size: 4,
            ..MapParams::default()
        };
        let mut m = MapManager::start(params).unwrap();
        let ins: Vec<MapRef> = (0..6).map(|_| m.create_input()).collect();
        let a = m.create_and(ins[0], false, ins[1], true);
        let b = m.create_and(ins[1], false, ins[2], false);
        let c = m.create_and(a, true, b, true);
        let d = m.create_and(c, false, ins[3], false);
        let e = m.create_and(b, false, ins[4], true);
        let f = m.create_and(d, true, e, false);
        let g = m.create_and(f, false, ins[5], true);
        m.create_output(g, true);
        m.create_output(c, false);
        PriorityCutSelector::new().select(&mut m).unwrap();
        let mut funcs = FuncGraph::new();
        for node in [a, b, c, d, e, f, g] {
            let func = synthesize_node_function(&m, &mut funcs, node).unwrap();
            assert_matches_decomposition(&m, &funcs, node, func);
            // Synthesizing again yields the same hashed function.
            assert_eq!(
                synthesize_node_function(&m, &mut funcs, node).unwrap(),
                func
            );
        }
    }
}
