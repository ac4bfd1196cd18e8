// SPDX-License-Identifier: Apache-2.0

//! The mapper's own node space.
//!
//! A `MapManager` holds one node per constant, primary input and AND of the
//! loaded network, the cuts computed for those nodes, the choice relation
//! between equivalent nodes, and the primary outputs. Cut selection itself
//! is delegated to a `CutSelector`.

use std::collections::{BTreeMap, HashMap};

use crate::mapper::cut::{Cut, CutChild, CutId};
use crate::mapper::params::MapParams;
use crate::mapper::select::CutSelector;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct MapRef {
    pub id: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapNodeKind {
    /// The constant false node; always node 0.
    Const,
    Input {
        index: usize,
    },
    And {
        fanin0: MapRef,
        compl0: bool,
        fanin1: MapRef,
        compl1: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    pub kind: MapNodeKind,
    /// Value under the all-zero input assignment.
    pub phase: bool,
    pub level: usize,
    pub arrival: f32,
    pub area_flow: f32,
    trivial_cut: CutId,
    best_cut: Option<CutId>,
}

impl MapNode {
    pub fn is_and(&self) -> bool {
        matches!(self.kind, MapNodeKind::And { .. })
    }

    pub fn trivial_cut(&self) -> CutId {
        self.trivial_cut
    }

    pub fn best_cut(&self) -> Option<CutId> {
        self.best_cut
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOutput {
    pub fanin: MapRef,
    pub negated: bool,
}

#[derive(Debug)]
pub struct MapManager {
    params: MapParams,
    nodes: Vec<MapNode>,
    inputs: Vec<MapRef>,
    outputs: Vec<MapOutput>,
    cuts: Vec<Cut>,
    /// Priority cut list per node; the trivial cut, when present, is last.
    node_cuts: Vec<Vec<CutId>>,
    /// Representative -> members, in chain order.
    choices: BTreeMap<MapRef, Vec<MapRef>>,
}

impl MapManager {
    /// Creates a manager holding only the constant node.
    pub fn start(params: MapParams) -> Result<Self, String> {
        params.validate()?;
        let mut manager = MapManager {
            params,
            nodes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            cuts: Vec::new(),
            node_cuts: Vec::new(),
            choices: BTreeMap::new(),
        };
        manager.push_node(MapNodeKind::Const, false, 0);
        Ok(manager)
    }

    fn push_node(&mut self, kind: MapNodeKind, phase: bool, level: usize) -> MapRef {
        let node_ref = MapRef {
            id: self.nodes.len(),
        };
        let trivial_cut = self.add_cut(Cut::trivial(node_ref));
        self.nodes.push(MapNode {
            kind,
            phase,
            level,
            arrival: 0.0,
            area_flow: 0.0,
            trivial_cut,
            best_cut: None,
        });
        self.node_cuts.push(Vec::new());
        node_ref
    }

    pub fn params(&self) -> &MapParams {
        &self.params
    }

    pub fn const_node(&self) -> MapRef {
        MapRef { id: 0 }
    }

    pub fn create_input(&mut self) -> MapRef {
        let index = self.inputs.len();
        let node_ref = self.push_node(MapNodeKind::Input { index }, false, 0);
        self.nodes[node_ref.id].arrival = self.params.arrival(index);
        self.inputs.push(node_ref);
        node_ref
    }

    pub fn create_and(
        &mut self,
        fanin0: MapRef,
        compl0: bool,
        fanin1: MapRef,
        compl1: bool,
    ) -> MapRef {
        let n0 = &self.nodes[fanin0.id];
        let n1 = &self.nodes[fanin1.id];
        let phase = (n0.phase ^ compl0) && (n1.phase ^ compl1);
        let level = 1 + n0.level.max(n1.level);
        self.push_node(
            MapNodeKind::And {
                fanin0,
                compl0,
                fanin1,
                compl1,
            },
            phase,
            level,
        )
    }

    /// Appends `member` to the choice chain headed by `repr`.
    pub fn add_choice(&mut self, repr: MapRef, member: MapRef) {
        self.choices.entry(repr).or_default().push(member);
    }

    pub fn choices_of(&self, repr: MapRef) -> &[MapRef] {
        self.choices
            .get(&repr)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn create_output(&mut self, fanin: MapRef, negated: bool) {
        self.outputs.push(MapOutput { fanin, negated });
    }

    pub fn node(&self, node_ref: MapRef) -> &MapNode {
        &self.nodes[node_ref.id]
    }

    pub fn node_mut(&mut self, node_ref: MapRef) -> &mut MapNode {
        &mut self.nodes[node_ref.id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn and_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_and()).count()
    }

    pub fn node_refs(&self) -> impl Iterator<Item = MapRef> {
        (0..self.nodes.len()).map(|id| MapRef { id })
    }

    pub fn inputs(&self) -> &[MapRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[MapOutput] {
        &self.outputs
    }

    pub fn add_cut(&mut self, cut: Cut) -> CutId {
        let id = CutId(self.cuts.len());
        self.cuts.push(cut);
        id
    }

    pub fn cut(&self, id: CutId) -> &Cut {
        &self.cuts[id.0]
    }

    pub fn cut_count(&self) -> usize {
        self.cuts.len()
    }

    pub fn best_cut(&self, node_ref: MapRef) -> Option<CutId> {
        self.nodes[node_ref.id].best_cut
    }

    pub fn set_best_cut(&mut self, node_ref: MapRef, cut: CutId) {
        self.nodes[node_ref.id].best_cut = Some(cut);
    }

    pub fn node_cuts(&self, node_ref: MapRef) -> &[CutId] {
        &self.node_cuts[node_ref.id]
    }

    pub fn set_node_cuts(&mut self, node_ref: MapRef, cuts: Vec<CutId>) {
        self.node_cuts[node_ref.id] = cuts;
    }

    /// Number of AND and output references to each node.
    pub fn fanout_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in &self.nodes {
            if let MapNodeKind::And { fanin0, fanin1, .. } = node.kind {
                counts[fanin0.id] += 1;
                counts[fanin1.id] += 1;
            }
        }
        for output in &self.outputs {
            counts[output.fanin.id] += 1;
        }
        counts
    }

    /// Builds a cut of `root` over exactly `leaves` by following the AND
    /// structure below `root` until a leaf is reached. The returned cut keeps
    /// `leaves` in the given order and carries `phase`; it is not installed
    /// as the best cut.
    pub fn derive_cut(
        &mut self,
        root: MapRef,
        leaves: &[MapRef],
        phase: bool,
    ) -> Result<CutId, String> {
        if leaves.contains(&root) {
            return Err(format!("node {} cannot be a leaf of its own cut", root.id));
        }
        let mut memo: HashMap<MapRef, CutId> = HashMap::new();
        for leaf in leaves {
            memo.insert(*leaf, self.nodes[leaf.id].trivial_cut);
        }
        let children = self.derive_children(root, leaves, &mut memo)?;
        Ok(self.add_cut(Cut {
            root,
            leaves: leaves.to_vec(),
            children: Some(children),
            phase,
            delay: 0.0,
            area_flow: 0.0,
        }))
    }

    fn derive_children(
        &mut self,
        node_ref: MapRef,
        leaves: &[MapRef],
        memo: &mut HashMap<MapRef, CutId>,
    ) -> Result<[CutChild; 2], String> {
        let MapNodeKind::And {
            fanin0,
            compl0,
            fanin1,
            compl1,
        } = self.nodes[node_ref.id].kind
        else {
            return Err(format!(
                "node {} is not an AND node and is not among the leaves {:?}",
                node_ref.id,
                leaves.iter().map(|l| l.id).collect::<Vec<_>>()
            ));
        };
        let cut0 = self.derive_sub_cut(fanin0, leaves, memo)?;
        let cut1 = self.derive_sub_cut(fanin1, leaves, memo)?;
        Ok([
            CutChild {
                cut: cut0,
                negated: compl0,
            },
            CutChild {
                cut: cut1,
                negated: compl1,
            },
        ])
    }

    fn derive_sub_cut(
        &mut self,
        node_ref: MapRef,
        leaves: &[MapRef],
        memo: &mut HashMap<MapRef, CutId>,
    ) -> Result<CutId, String> {
        if let Some(cut) = memo.get(&node_ref) {
            return Ok(*cut);
        }
        let children = self.derive_children(node_ref, leaves, memo)?;
        let mut sub_leaves: Vec<MapRef> = children
            .iter()
            .flat_map(|c| self.cuts[c.cut.0].leaves.clone())
            .collect();
        sub_leaves.sort();
        sub_leaves.dedup();
        let cut = self.add_cut(Cut {
            root: node_ref,
            leaves: sub_leaves,
            children: Some(children),
            phase: false,
            delay: 0.0,
            area_flow: 0.0,
        });
        memo.insert(node_ref, cut);
        Ok(cut)
    }

    /// Runs `selector` over this manager and checks that every AND node
    /// reachable from a primary output through best cuts ended up with one.
    pub fn perform_mapping(&mut self, selector: &mut dyn CutSelector) -> Result<(), String> {
        let name = selector.name().to_string();
        selector
            .select(self)
            .map_err(|e| format!("{}: {:#}", name, e))?;
        let mut visited = vec![false; self.nodes.len()];
        let mut worklist: Vec<MapRef> = self.outputs.iter().map(|o| o.fanin).collect();
        while let Some(current) = worklist.pop() {
            if visited[current.id] {
                continue;
            }
            visited[current.id] = true;
            let node = &self.nodes[current.id];
            if !node.is_and() {
                continue;
            }
            let Some(best) = node.best_cut else {
                return Err(format!(
                    "{}: node {} is reachable from an output but has no best cut",
                    name, current.id
                ));
            };
            for leaf in &self.cuts[best.0].leaves {
                if *leaf != current {
                    worklist.push(*leaf);
                }
            }
        }
        Ok(())
    }
}
