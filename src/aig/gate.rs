// SPDX-License-Identifier: Apache-2.0

//! Source network representation: a structurally hashed AND-inverter graph
//! with optional choice (equivalence) sets and an optional don't-care network.

use std::fmt;

use crate::aig::choice::ChoiceSets;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct AigRef {
    pub id: usize,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct AigOperand {
    pub node: AigRef,
    pub negated: bool,
}

impl AigOperand {
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            node: self.node,
            negated: !self.negated,
        }
    }

    #[must_use]
    pub fn negate_if(&self, negate: bool) -> Self {
        Self {
            node: self.node,
            negated: self.negated ^ negate,
        }
    }
}

impl From<AigRef> for AigOperand {
    fn from(node: AigRef) -> Self {
        AigOperand {
            node,
            negated: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    Literal(bool),
    Input { name: String },
    And2 { a: AigOperand, b: AigOperand },
}

impl AigNode {
    pub fn get_operands(&self) -> Vec<AigOperand> {
        match self {
            AigNode::Literal(_) | AigNode::Input { .. } => vec![],
            AigNode::And2 { a, b } => vec![*a, *b],
        }
    }

    pub fn get_args(&self) -> Vec<AigRef> {
        match self {
            AigNode::Literal(_) | AigNode::Input { .. } => vec![],
            AigNode::And2 { a, b } => vec![a.node, b.node],
        }
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And2 { .. })
    }
}

/// A primary input. `arrival` is timing metadata handed to the mapper
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub name: String,
    pub node: AigRef,
    pub arrival: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub name: String,
    pub operand: AigOperand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aig {
    pub name: String,
    /// Node 0 is always `Literal(false)`.
    pub gates: Vec<AigNode>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub choices: ChoiceSets,
    /// External don't-care network; carried through mapping verbatim.
    pub exdc: Option<Box<Aig>>,
}

impl Aig {
    pub fn get(&self, aig_ref: AigRef) -> &AigNode {
        &self.gates[aig_ref.id]
    }

    pub fn const_ref(&self) -> AigRef {
        AigRef { id: 0 }
    }

    pub fn and_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_and()).count()
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Number of AND/output references to each node. Choice links are not
    /// counted.
    pub fn fanout_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.gates.len()];
        for gate in &self.gates {
            for arg in gate.get_args() {
                if arg.id < counts.len() {
                    counts[arg.id] += 1;
                }
            }
        }
        for output in &self.outputs {
            if output.operand.node.id < counts.len() {
                counts[output.operand.node.id] += 1;
            }
        }
        counts
    }

    /// Value of every node when all primary inputs are zero.
    ///
    /// Members of a choice set are equivalent to their representative up to
    /// complement; comparing these values tells which polarity relates them.
    pub fn phases(&self) -> Vec<bool> {
        let mut phases = vec![false; self.gates.len()];
        for (id, gate) in self.gates.iter().enumerate() {
            phases[id] = match gate {
                AigNode::Literal(value) => *value,
                AigNode::Input { .. } => false,
                AigNode::And2 { a, b } => {
                    let pa = phases.get(a.node.id).copied().unwrap_or(false) ^ a.negated;
                    let pb = phases.get(b.node.id).copied().unwrap_or(false) ^ b.negated;
                    pa && pb
                }
            };
        }
        phases
    }

    fn node_name(&self, aig_ref: AigRef) -> String {
        match self.gates.get(aig_ref.id) {
            Some(AigNode::Input { name }) => name.clone(),
            _ => format!("%{}", aig_ref.id),
        }
    }

    fn operand_str(&self, operand: AigOperand) -> String {
        let node_str = self.node_name(operand.node);
        if operand.negated {
            format!("not({})", node_str)
        } else {
            node_str
        }
    }
}

impl fmt::Display for Aig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input_str = self
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .collect::<Vec<String>>()
            .join(", ");
        let output_str = self
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect::<Vec<String>>()
            .join(", ");
        writeln!(f, "fn {}({}) -> ({}) {{", self.name, input_str, output_str)?;
        for (id, gate) in self.gates.iter().enumerate() {
            if let AigNode::And2 { a, b } = gate {
                writeln!(
                    f,
                    "  %{} = and({}, {})",
                    id,
                    self.operand_str(*a),
                    self.operand_str(*b)
                )?;
            }
        }
        for (repr, members) in self.choices.iter() {
            let members_str = members
                .iter()
                .map(|m| format!("%{}", m.id))
                .collect::<Vec<String>>()
                .join(", ");
            writeln!(f, "  choice %{} = [{}]", repr.id, members_str)?;
        }
        for output in &self.outputs {
            writeln!(
                f,
                "  {} = {}",
                output.name,
                self.operand_str(output.operand)
            )?;
        }
        write!(f, "}}")
    }
}
