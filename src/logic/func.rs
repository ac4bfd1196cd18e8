// SPDX-License-Identifier: Apache-2.0

//! `FuncGraph` is a structurally hashed AND-inverter graph used to hold the
//! local functions of logic network nodes. Variable `i` of a function stands
//! for fanin `i` of the node it is attached to.
//!
//! All functions of a network live in one shared graph: building the same
//! expression twice yields the same `FuncLit`.

use std::collections::{HashMap, HashSet};

use bitvec::vec::BitVec;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FuncRef {
    pub id: usize,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FuncLit {
    pub node: FuncRef,
    pub negated: bool,
}

impl FuncLit {
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            node: self.node,
            negated: !self.negated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuncNode {
    /// Constant false; always node 0.
    Const,
    Var(usize),
    And { a: FuncLit, b: FuncLit },
}

#[derive(Debug, Clone)]
pub struct FuncGraph {
    nodes: Vec<FuncNode>,
    vars: HashMap<usize, FuncRef>,
    strash: HashMap<(FuncLit, FuncLit), FuncRef>,
}

impl Default for FuncGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FuncGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![FuncNode::Const],
            vars: HashMap::new(),
            strash: HashMap::new(),
        }
    }

    pub fn node(&self, func_ref: FuncRef) -> &FuncNode {
        &self.nodes[func_ref.id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn const_false(&self) -> FuncLit {
        FuncLit {
            node: FuncRef { id: 0 },
            negated: false,
        }
    }

    pub fn const_true(&self) -> FuncLit {
        self.const_false().negate()
    }

    /// Returns `Some(value)` if `lit` is a constant.
    pub fn const_value(&self, lit: FuncLit) -> Option<bool> {
        if lit.node.id == 0 {
            Some(lit.negated)
        } else {
            None
        }
    }

    /// The projection onto variable `index`; repeated calls return the same
    /// literal.
    pub fn var(&mut self, index: usize) -> FuncLit {
        if let Some(existing) = self.vars.get(&index) {
            return FuncLit {
                node: *existing,
                negated: false,
            };
        }
        let node = FuncRef {
            id: self.nodes.len(),
        };
        self.nodes.push(FuncNode::Var(index));
        self.vars.insert(index, node);
        FuncLit {
            node,
            negated: false,
        }
    }

    pub fn not(&self, lit: FuncLit) -> FuncLit {
        lit.negate()
    }

    pub fn not_cond(&self, lit: FuncLit, negate: bool) -> FuncLit {
        if negate {
            lit.negate()
        } else {
            lit
        }
    }

    pub fn and(&mut self, a: FuncLit, b: FuncLit) -> FuncLit {
        if self.const_value(a) == Some(false) || self.const_value(b) == Some(false) {
            return self.const_false();
        }
        if self.const_value(a) == Some(true) {
            return b;
        }
        if self.const_value(b) == Some(true) {
            return a;
        }
        if a == b {
            return a;
        }
        if a.node == b.node {
            return self.const_false();
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(existing) = self.strash.get(&key) {
            return FuncLit {
                node: *existing,
                negated: false,
            };
        }
        let node = FuncRef {
            id: self.nodes.len(),
        };
        self.nodes.push(FuncNode::And { a: key.0, b: key.1 });
        self.strash.insert(key, node);
        FuncLit {
            node,
            negated: false,
        }
    }

    pub fn or(&mut self, a: FuncLit, b: FuncLit) -> FuncLit {
        self.and(a.negate(), b.negate()).negate()
    }

    /// Nodes in the cone of `lit`, in increasing id (topological) order.
    pub fn cone(&self, lit: FuncLit) -> Vec<FuncRef> {
        let mut seen = HashSet::new();
        let mut worklist = vec![lit.node];
        while let Some(current) = worklist.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let FuncNode::And { a, b } = &self.nodes[current.id] {
                worklist.push(a.node);
                worklist.push(b.node);
            }
        }
        let mut cone: Vec<FuncRef> = seen.into_iter().collect();
        cone.sort();
        cone
    }

    /// Sorted variable indices `lit` depends on structurally.
    pub fn support(&self, lit: FuncLit) -> Vec<usize> {
        let mut support: Vec<usize> = self
            .cone(lit)
            .into_iter()
            .filter_map(|r| match self.nodes[r.id] {
                FuncNode::Var(index) => Some(index),
                _ => None,
            })
            .collect();
        support.sort();
        support
    }

    fn eval_cone(&self, cone: &[FuncRef], lit: FuncLit, vars: &[bool]) -> bool {
        let mut values: HashMap<FuncRef, bool> = HashMap::with_capacity(cone.len());
        for r in cone {
            let value = match &self.nodes[r.id] {
                FuncNode::Const => false,
                FuncNode::Var(index) => vars[*index],
                FuncNode::And { a, b } => {
                    (values[&a.node] ^ a.negated) && (values[&b.node] ^ b.negated)
                }
            };
            values.insert(*r, value);
        }
        values[&lit.node] ^ lit.negated
    }

    /// Evaluates `lit` with variable `i` bound to `vars[i]`.
    pub fn eval(&self, lit: FuncLit, vars: &[bool]) -> bool {
        let cone = self.cone(lit);
        self.eval_cone(&cone, lit, vars)
    }

    /// Truth table of `lit` over `var_count` variables; bit `m` holds the
    /// value for the assignment whose variable `i` is bit `i` of `m`.
    pub fn truth_table(&self, lit: FuncLit, var_count: usize) -> BitVec {
        let cone = self.cone(lit);
        let rows = 1usize << var_count;
        let mut table = BitVec::repeat(false, rows);
        let mut vars = vec![false; var_count];
        for m in 0..rows {
            for (i, v) in vars.iter_mut().enumerate() {
                *v = (m >> i) & 1 == 1;
            }
            table.set(m, self.eval_cone(&cone, lit, &vars));
        }
        table
    }

    /// Textual form, e.g. `not(and(v0, not(v1)))`.
    pub fn to_expr(&self, lit: FuncLit) -> String {
        let base = match &self.nodes[lit.node.id] {
            FuncNode::Const => {
                return if lit.negated { "1" } else { "0" }.to_string();
            }
            FuncNode::Var(index) => format!("v{}", index),
            FuncNode::And { a, b } => format!("and({}, {})", self.to_expr(*a), self.to_expr(*b)),
        };
        if lit.negated {
            format!("not({})", base)
        } else {
            base
        }
    }
}
