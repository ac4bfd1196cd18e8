// SPDX-License-Identifier: Apache-2.0

//! Materializes mapper nodes as logic network nodes, one per best cut.

use std::collections::HashMap;

use crate::error::{MapError, Result};
use crate::logic::network::{LogicNetwork, NodeId};
use crate::mapper::manager::{MapManager, MapRef};
use crate::techmap::synth::synthesize_node_function;

/// Memoized mapper-to-network reconstruction.
///
/// The correspondence map is owned by this value and only ever grows; once a
/// mapper node has a network counterpart every later request reuses it.
pub struct NodeReconstructor<'a> {
    manager: &'a MapManager,
    copies: HashMap<MapRef, NodeId>,
}

impl<'a> NodeReconstructor<'a> {
    pub fn new(manager: &'a MapManager) -> Self {
        Self {
            manager,
            copies: HashMap::new(),
        }
    }

    /// Records `node` as the counterpart of `map_ref` (used for the constant
    /// and primary inputs, which are not reconstructed from cuts).
    pub fn set_copy(&mut self, map_ref: MapRef, node: NodeId) {
        self.copies.insert(map_ref, node);
    }

    pub fn copy_of(&self, map_ref: MapRef) -> Option<NodeId> {
        self.copies.get(&map_ref).copied()
    }

    pub fn copy_count(&self) -> usize {
        self.copies.len()
    }

    /// Returns the network node for `root`, creating it and any missing
    /// nodes for the leaves of its best cut (transitively) first.
    ///
    /// Traversal uses an explicit stack. A node is created when first
    /// visited; its fanins and function are attached once all of its leaves
    /// have counterparts.
    pub fn reconstruct(&mut self, net: &mut LogicNetwork, root: MapRef) -> Result<NodeId> {
        if let Some(existing) = self.copy_of(root) {
            return Ok(existing);
        }
        let mut pending: HashMap<MapRef, NodeId> = HashMap::new();
        let mut stack: Vec<(MapRef, bool)> = vec![(root, false)];
        while let Some((current, leaves_done)) = stack.pop() {
            if leaves_done {
                self.finish(net, current, &mut pending)?;
                continue;
            }
            if self.copies.contains_key(&current) {
                continue;
            }
            if pending.contains_key(&current) {
                return Err(MapError::Invariant(format!(
                    "best cuts form a cycle through node {}",
                    current.id
                )));
            }
            let node = self.manager.node(current);
            let best = match (node.is_and(), node.best_cut()) {
                (true, Some(best)) => best,
                _ => {
                    return Err(MapError::Invariant(format!(
                        "node {} ({:?}) has no network counterpart and no best cut",
                        current.id, node.kind
                    )))
                }
            };
            let leaves = &self.manager.cut(best).leaves;
            if leaves.len() < 2 {
                return Err(MapError::Invariant(format!(
                    "best cut of node {} has {} leaves; at least 2 are required",
                    current.id,
                    leaves.len()
                )));
            }
            pending.insert(current, net.create_node());
            stack.push((current, true));
            for leaf in leaves.iter().rev() {
                if self.copies.contains_key(leaf) {
                    continue;
                }
                if pending.contains_key(leaf) {
                    return Err(MapError::Invariant(format!(
                        "best cuts form a cycle through nodes {} and {}",
                        current.id, leaf.id
                    )));
                }
                stack.push((*leaf, false));
            }
        }
        self.copy_of(root).ok_or_else(|| {
            MapError::Invariant(format!("node {} was not materialized", root.id))
        })
    }

    fn finish(
        &mut self,
        net: &mut LogicNetwork,
        current: MapRef,
        pending: &mut HashMap<MapRef, NodeId>,
    ) -> Result<()> {
        let Some(new_node) = pending.remove(&current) else {
            return Err(MapError::Invariant(format!(
                "node {} finished without being started",
                current.id
            )));
        };
        let best = self.manager.best_cut(current).ok_or_else(|| {
            MapError::Invariant(format!("node {} lost its best cut", current.id))
        })?;
        for leaf in &self.manager.cut(best).leaves {
            let fanin = self.copy_of(*leaf).ok_or_else(|| {
                MapError::Invariant(format!(
                    "leaf {} of node {} was not materialized first",
                    leaf.id, current.id
                ))
            })?;
            net.add_fanin(new_node, fanin);
        }
        let func = synthesize_node_function(self.manager, &mut net.funcs, current)?;
        net.set_function(new_node, func);
        self.copies.insert(current, new_node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::params::MapParams;
    use crate::mapper::select::{CutSelector, StructuralCutSelector};
    use pretty_assertions::assert_eq;

    fn seeded<'a>(m: &'a MapManager, net: &mut LogicNetwork) -> NodeReconstructor<'a> {
        let mut r = NodeReconstructor::new(m);
        let c = net.create_const(false);
        r.set_copy(m.const_node(), c);
        for (i, input) in m.inputs().iter().enumerate() {
            let id = net.create_input(format!("i{}", i));
            r.set_copy(*input, id);
        }
        r
    }

    #[test]
    fn test_shared_leaf_is_materialized_once() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let a = m.create_input();
        let b = m.create_input();
        let c = m.create_input();
        let shared = m.create_and(a, false, b, false);
        let left = m.create_and(shared, false, c, false);
        let right = m.create_and(shared, true, c, true);
        m.create_output(left, false);
        m.create_output(right, false);
        StructuralCutSelector.select(&mut m).unwrap();
        let mut net = LogicNetwork::new("f".to_string());
        let mut r = seeded(&m, &mut net);
        let l = r.reconstruct(&mut net, left).unwrap();
        let before = net.logic_count();
        let rr = r.reconstruct(&mut net, right).unwrap();
        assert_eq!(net.logic_count(), before + 1);
        let shared_node = r.copy_of(shared).unwrap();
        assert_eq!(net.node(l).unwrap().fanins[0], shared_node);
        assert_eq!(net.node(rr).unwrap().fanins[0], shared_node);
        // Reconstructing again is a pure lookup.
        assert_eq!(r.reconstruct(&mut net, left).unwrap(), l);
        assert_eq!(net.logic_count(), before + 1);
    }

    #[test]
    fn test_node_created_before_its_leaves() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let a = m.create_input();
        let b = m.create_input();
        let c = m.create_input();
        let ab = m.create_and(a, false, b, false);
        let top = m.create_and(ab, false, c, false);
        m.create_output(top, false);
        StructuralCutSelector.select(&mut m).unwrap();
        let mut net = LogicNetwork::new("f".to_string());
        let mut r = seeded(&m, &mut net);
        let top_node = r.reconstruct(&mut net, top).unwrap();
        let ab_node = r.copy_of(ab).unwrap();
        assert!(top_node < ab_node);
        let order = net.topo_order().unwrap();
        let pos = |id: NodeId| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(ab_node) < pos(top_node));
    }

    #[test]
    fn test_missing_best_cut_is_an_invariant_error() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let a = m.create_input();
        let b = m.create_input();
        let g = m.create_and(a, false, b, false);
        let mut net = LogicNetwork::new("f".to_string());
        let mut r = seeded(&m, &mut net);
        assert!(matches!(
            r.reconstruct(&mut net, g),
            Err(MapError::Invariant(_))
        ));
    }

    #[test]
    fn test_unseeded_input_is_an_invariant_error() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let a = m.create_input();
        let mut net = LogicNetwork::new("f".to_string());
        let mut r = NodeReconstructor::new(&m);
        let err = r.reconstruct(&mut net, a).unwrap_err();
        assert!(
            err.to_string().contains("no network counterpart"),
            "{}",
            err
        );
        assert_eq!(r.copy_count(), 0);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut m = MapManager::start(MapParams::default()).unwrap();
        let mut acc = m.create_input();
        for _ in 0..20_000 {
            let x = m.create_input();
            acc = m.create_and(acc, false, x, true);
        }
        m.create_output(acc, false);
        StructuralCutSelector.select(&mut m).unwrap();
        let mut net = LogicNetwork::new("chain".to_string());
        let mut r = seeded(&m, &mut net);
        r.reconstruct(&mut net, acc).unwrap();
        assert_eq!(net.logic_count(), 20_001);
    }
}
