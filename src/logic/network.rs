// SPDX-License-Identifier: Apache-2.0

//! The mapped logic network: one node per selected cut, each carrying a local
//! function over its fanins.
//!
//! Node slots are never reused; deleting a node leaves a hole so that
//! `NodeId`s handed out earlier stay valid.

use std::fmt;

use serde::Serialize;

use crate::aig::gate::Aig;
use crate::logic::func::{FuncGraph, FuncLit};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId {
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicNodeKind {
    Const,
    Input { name: String },
    Logic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicNode {
    pub kind: LogicNodeKind,
    pub fanins: Vec<NodeId>,
    /// Local function; variable `i` is `fanins[i]`. `None` until assigned,
    /// and always `None` for inputs.
    pub func: Option<FuncLit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicOutput {
    pub name: String,
    pub driver: Option<NodeId>,
    /// Complemented connection; cleared by output decoupling.
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub inputs: usize,
    pub outputs: usize,
    pub nodes: usize,
    pub edges: usize,
    pub levels: usize,
    pub max_fanin: usize,
}

#[derive(Debug, Clone)]
pub struct LogicNetwork {
    pub name: String,
    nodes: Vec<Option<LogicNode>>,
    inputs: Vec<NodeId>,
    pub outputs: Vec<LogicOutput>,
    pub funcs: FuncGraph,
    pub exdc: Option<Box<Aig>>,
}

impl LogicNetwork {
    pub fn new(name: String) -> Self {
        Self {
            name,
            nodes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            funcs: FuncGraph::new(),
            exdc: None,
        }
    }

    fn push(&mut self, node: LogicNode) -> NodeId {
        let id = NodeId {
            id: self.nodes.len(),
        };
        self.nodes.push(Some(node));
        id
    }

    pub fn create_input(&mut self, name: String) -> NodeId {
        let id = self.push(LogicNode {
            kind: LogicNodeKind::Input { name },
            fanins: Vec::new(),
            func: None,
        });
        self.inputs.push(id);
        id
    }

    pub fn create_const(&mut self, value: bool) -> NodeId {
        let func = self.funcs.not_cond(self.funcs.const_false(), value);
        self.push(LogicNode {
            kind: LogicNodeKind::Const,
            fanins: Vec::new(),
            func: Some(func),
        })
    }

    /// Creates a logic node with no fanins and no function yet.
    pub fn create_node(&mut self) -> NodeId {
        self.push(LogicNode {
            kind: LogicNodeKind::Logic,
            fanins: Vec::new(),
            func: None,
        })
    }

    pub fn add_fanin(&mut self, node: NodeId, fanin: NodeId) {
        if let Some(n) = self.nodes[node.id].as_mut() {
            n.fanins.push(fanin);
        }
    }

    pub fn set_function(&mut self, node: NodeId, func: FuncLit) {
        if let Some(n) = self.nodes[node.id].as_mut() {
            n.func = Some(func);
        }
    }

    pub fn add_output(&mut self, name: String) -> usize {
        self.outputs.push(LogicOutput {
            name,
            driver: None,
            negated: false,
        });
        self.outputs.len() - 1
    }

    pub fn connect_output(&mut self, index: usize, driver: NodeId, negated: bool) {
        let output = &mut self.outputs[index];
        output.driver = Some(driver);
        output.negated = negated;
    }

    pub fn node(&self, id: NodeId) -> Option<&LogicNode> {
        self.nodes.get(id.id).and_then(|n| n.as_ref())
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Ids of live nodes in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(id, _)| NodeId { id })
    }

    /// Number of live logic and constant nodes.
    pub fn logic_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| !matches!(n.kind, LogicNodeKind::Input { .. }))
            .count()
    }

    /// References to each slot from live nodes' fanins and from outputs.
    pub fn fanout_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in self.nodes.iter().flatten() {
            for fanin in &node.fanins {
                if fanin.id < counts.len() {
                    counts[fanin.id] += 1;
                }
            }
        }
        for output in &self.outputs {
            if let Some(driver) = output.driver {
                if driver.id < counts.len() {
                    counts[driver.id] += 1;
                }
            }
        }
        counts
    }

    /// Deletes `id` if it is a live non-input node nothing refers to.
    /// Returns whether a node was deleted; calling it again is a no-op.
    pub fn remove_if_unused(&mut self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) if !matches!(node.kind, LogicNodeKind::Input { .. }) => {}
            _ => return false,
        }
        if self.fanout_counts()[id.id] != 0 {
            return false;
        }
        log::trace!("removing unused node %{}", id.id);
        self.nodes[id.id] = None;
        true
    }

    /// Live nodes ordered so that every fanin precedes its consumers.
    /// Errors on a cycle or a reference to a missing node.
    pub fn topo_order(&self) -> Result<Vec<NodeId>, String> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut order = Vec::new();
        for start in self.node_ids() {
            if marks[start.id] != Mark::Unvisited {
                continue;
            }
            let mut worklist: Vec<(NodeId, bool)> = vec![(start, false)];
            while let Some((current, expanded)) = worklist.pop() {
                if expanded {
                    marks[current.id] = Mark::Done;
                    order.push(current);
                    continue;
                }
                if marks[current.id] != Mark::Unvisited {
                    continue;
                }
                marks[current.id] = Mark::OnStack;
                worklist.push((current, true));
                let Some(node) = self.node(current) else {
                    return Err(format!("node %{} is deleted", current.id));
                };
                for fanin in node.fanins.iter().rev() {
                    if !self.is_live(*fanin) {
                        return Err(format!(
                            "node %{} has dangling fanin %{}",
                            current.id, fanin.id
                        ));
                    }
                    match marks[fanin.id] {
                        Mark::Done => {}
                        Mark::OnStack => {
                            return Err(format!(
                                "cycle through nodes %{} and %{}",
                                current.id, fanin.id
                            ))
                        }
                        Mark::Unvisited => worklist.push((*fanin, false)),
                    }
                }
            }
        }
        Ok(order)
    }

    pub fn stats(&self) -> NetworkStats {
        let mut levels = vec![0usize; self.nodes.len()];
        let mut max_level = 0;
        if let Ok(order) = self.topo_order() {
            for id in order {
                if let Some(node) = self.node(id) {
                    if node.kind == LogicNodeKind::Logic {
                        let level = 1 + node.fanins.iter().map(|f| levels[f.id]).max().unwrap_or(0);
                        levels[id.id] = level;
                        max_level = max_level.max(level);
                    }
                }
            }
        }
        let live: Vec<&LogicNode> = self.nodes.iter().flatten().collect();
        NetworkStats {
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            nodes: self.logic_count(),
            edges: live.iter().map(|n| n.fanins.len()).sum(),
            levels: max_level,
            max_fanin: live.iter().map(|n| n.fanins.len()).max().unwrap_or(0),
        }
    }

    fn node_name(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.kind) {
            Some(LogicNodeKind::Input { name }) => name.clone(),
            _ => format!("%{}", id.id),
        }
    }
}

impl fmt::Display for LogicNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input_str = self
            .inputs
            .iter()
            .map(|id| self.node_name(*id))
            .collect::<Vec<String>>()
            .join(", ");
        let output_str = self
            .outputs
            .iter()
            .map(|o| o.name.clone())
            .collect::<Vec<String>>()
            .join(", ");
        writeln!(f, "fn {}({}) -> ({}) {{", self.name, input_str, output_str)?;
        for id in self.node_ids() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if matches!(node.kind, LogicNodeKind::Input { .. }) {
                continue;
            }
            let fanin_str = node
                .fanins
                .iter()
                .map(|fanin| self.node_name(*fanin))
                .collect::<Vec<String>>()
                .join(", ");
            let func_str = match node.func {
                Some(func) => self.funcs.to_expr(func),
                None => "?".to_string(),
            };
            writeln!(f, "  %{} = lut[{}]({})", id.id, fanin_str, func_str)?;
        }
        for output in &self.outputs {
            let driver_str = match output.driver {
                Some(driver) => self.node_name(driver),
                None => "?".to_string(),
            };
            if output.negated {
                writeln!(f, "  {} = not({})", output.name, driver_str)?;
            } else {
                writeln!(f, "  {} = {}", output.name, driver_str)?;
            }
        }
        write!(f, "}}")
    }
}
