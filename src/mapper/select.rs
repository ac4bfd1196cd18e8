// SPDX-License-Identifier: Apache-2.0

//! Cut selection services. A `CutSelector` decides, for every AND node in a
//! `MapManager`, which cut implements it; reconstruction then materializes
//! exactly those decisions.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::anyhow;

use crate::mapper::cut::{merge_leaves, Cut, CutChild, CutId};
use crate::mapper::manager::{MapManager, MapNodeKind, MapRef};
use crate::mapper::params::MapObjective;

pub trait CutSelector {
    fn name(&self) -> &str;

    /// Installs a best cut on every AND node of `manager`.
    fn select(&mut self, manager: &mut MapManager) -> anyhow::Result<()>;
}

/// Picks, for every AND node, the two-leaf cut over its immediate fanins. The
/// mapped network then mirrors the AIG one node per AND.
#[derive(Debug, Default)]
pub struct StructuralCutSelector;

impl CutSelector for StructuralCutSelector {
    fn name(&self) -> &str {
        "structural"
    }

    fn select(&mut self, manager: &mut MapManager) -> anyhow::Result<()> {
        let refs: Vec<MapRef> = manager.node_refs().collect();
        for node_ref in refs {
            let node = manager.node(node_ref);
            let MapNodeKind::And {
                fanin0,
                compl0,
                fanin1,
                compl1,
            } = node.kind
            else {
                continue;
            };
            let level = node.level as f32;
            let cut = Cut {
                root: node_ref,
                leaves: vec![fanin0, fanin1],
                children: Some([
                    CutChild {
                        cut: manager.node(fanin0).trivial_cut(),
                        negated: compl0,
                    },
                    CutChild {
                        cut: manager.node(fanin1).trivial_cut(),
                        negated: compl1,
                    },
                ]),
                phase: false,
                delay: level,
                area_flow: 1.0,
            };
            let cut_id = manager.add_cut(cut);
            manager.set_best_cut(node_ref, cut_id);
            manager.node_mut(node_ref).arrival = level;
        }
        Ok(())
    }
}

/// Bottom-up K-feasible priority-cut mapper.
///
/// Every node keeps at most `cuts_per_node` cuts ranked by the configured
/// objective; cuts of a node are formed by merging one cut of each fanin
/// (a fanin's trivial cut included), and a choice representative also
/// inherits the cuts of its members with the phase adjusted to the
/// representative's polarity.
#[derive(Debug, Default)]
pub struct PriorityCutSelector {
    cuts_enumerated: usize,
}

impl PriorityCutSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of candidate cuts considered by the last `select` call.
    pub fn cuts_enumerated(&self) -> usize {
        self.cuts_enumerated
    }

    fn compare(objective: MapObjective, a: &Cut, b: &Cut) -> Ordering {
        let by_delay = a.delay.total_cmp(&b.delay);
        let by_area = a.area_flow.total_cmp(&b.area_flow);
        let primary = match objective {
            MapObjective::Delay => by_delay.then(by_area),
            MapObjective::Area => by_area.then(by_delay),
        };
        primary.then(a.leaves.len().cmp(&b.leaves.len()))
    }

    fn leaf_costs(manager: &MapManager, fanouts: &[usize], leaves: &[MapRef]) -> (f32, f32) {
        let mut arrival: f32 = 0.0;
        let mut area_flow = 1.0;
        for leaf in leaves {
            let node = manager.node(*leaf);
            arrival = arrival.max(node.arrival);
            area_flow += node.area_flow / fanouts[leaf.id].max(1) as f32;
        }
        (arrival + 1.0, area_flow)
    }

    fn enumerate_node(
        &mut self,
        manager: &MapManager,
        fanouts: &[usize],
        node_ref: MapRef,
    ) -> Vec<Cut> {
        let MapNodeKind::And {
            fanin0,
            compl0,
            fanin1,
            compl1,
        } = manager.node(node_ref).kind
        else {
            return Vec::new();
        };
        let lut_size = manager.params().lut_size;
        let mut candidates: Vec<Cut> = Vec::new();
        for &c0 in manager.node_cuts(fanin0) {
            for &c1 in manager.node_cuts(fanin1) {
                self.cuts_enumerated += 1;
                let Some(leaves) = merge_leaves(
                    &manager.cut(c0).leaves,
                    &manager.cut(c1).leaves,
                    lut_size,
                ) else {
                    continue;
                };
                if leaves.len() < 2 {
                    continue;
                }
                let (delay, area_flow) = Self::leaf_costs(manager, fanouts, &leaves);
                candidates.push(Cut {
                    root: node_ref,
                    leaves,
                    children: Some([
                        CutChild {
                            cut: c0,
                            negated: compl0,
                        },
                        CutChild {
                            cut: c1,
                            negated: compl1,
                        },
                    ]),
                    phase: false,
                    delay,
                    area_flow,
                });
            }
        }
        let repr_phase = manager.node(node_ref).phase;
        for &member in manager.choices_of(node_ref) {
            let flip = repr_phase != manager.node(member).phase;
            for &cut_id in manager.node_cuts(member) {
                let cut = manager.cut(cut_id);
                if cut.is_trivial() {
                    continue;
                }
                self.cuts_enumerated += 1;
                candidates.push(Cut {
                    root: node_ref,
                    phase: cut.phase ^ flip,
                    ..cut.clone()
                });
            }
        }
        candidates
    }
}

impl CutSelector for PriorityCutSelector {
    fn name(&self) -> &str {
        "priority-cuts"
    }

    fn select(&mut self, manager: &mut MapManager) -> anyhow::Result<()> {
        self.cuts_enumerated = 0;
        let objective = manager.params().objective;
        let cuts_per_node = manager.params().cuts_per_node;
        let fanouts = manager.fanout_counts();
        let refs: Vec<MapRef> = manager.node_refs().collect();
        let mut kept_total = 0;
        for node_ref in refs {
            let trivial = manager.node(node_ref).trivial_cut();
            if !manager.node(node_ref).is_and() {
                manager.set_node_cuts(node_ref, vec![trivial]);
                continue;
            }
            let mut candidates = self.enumerate_node(manager, &fanouts, node_ref);
            candidates.sort_by(|a, b| Self::compare(objective, a, b));
            let mut seen = HashSet::new();
            candidates.retain(|cut| seen.insert(cut.leaves.clone()));
            candidates.truncate(cuts_per_node);
            let Some(best) = candidates.first() else {
                return Err(anyhow!("node {} has no feasible cut", node_ref.id));
            };
            let (arrival, area_flow) = (best.delay, best.area_flow);
            let mut kept: Vec<CutId> = candidates
                .into_iter()
                .map(|cut| manager.add_cut(cut))
                .collect();
            kept_total += kept.len();
            manager.set_best_cut(node_ref, kept[0]);
            let node = manager.node_mut(node_ref);
            node.arrival = arrival;
            node.area_flow = area_flow;
            kept.push(trivial);
            manager.set_node_cuts(node_ref, kept);
        }
        let depth = manager
            .outputs()
            .iter()
            .map(|o| manager.node(o.fanin).arrival)
            .fold(0.0f32, f32::max);
        log::debug!(
            "{}: {} candidate cuts, {} kept over {} AND nodes, mapped depth {}",
            self.name(),
            self.cuts_enumerated,
            kept_total,
            manager.and_count(),
            depth
        );
        Ok(())
    }
}
