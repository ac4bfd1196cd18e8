// SPDX-License-Identifier: Apache-2.0

use bitvec::vec::BitVec;

use crate::aig::gate::{Aig, AigNode};

/// Returns the value of every node in `aig` for one input assignment. Node
/// ids are topological, so a single forward sweep suffices.
pub fn eval_all(aig: &Aig, inputs: &[bool]) -> BitVec {
    assert_eq!(inputs.len(), aig.inputs.len());
    let mut values = BitVec::repeat(false, aig.gates.len());
    for (input, value) in aig.inputs.iter().zip(inputs) {
        values.set(input.node.id, *value);
    }
    for (id, gate) in aig.gates.iter().enumerate() {
        let value = match gate {
            AigNode::Literal(v) => *v,
            AigNode::Input { .. } => values[id],
            AigNode::And2 { a, b } => {
                (values[a.node.id] ^ a.negated) && (values[b.node.id] ^ b.negated)
            }
        };
        values.set(id, value);
    }
    values
}

/// Evaluates the primary outputs of `aig` for one input assignment.
pub fn eval(aig: &Aig, inputs: &[bool]) -> Vec<bool> {
    let values = eval_all(aig, inputs);
    aig.outputs
        .iter()
        .map(|o| values[o.operand.node.id] ^ o.operand.negated)
        .collect()
}

/// Bit-parallel evaluation: each `u64` carries 64 independent input
/// assignments.
pub fn eval_words(aig: &Aig, inputs: &[u64]) -> Vec<u64> {
    assert_eq!(inputs.len(), aig.inputs.len());
    let mut values = vec![0u64; aig.gates.len()];
    for (input, value) in aig.inputs.iter().zip(inputs) {
        values[input.node.id] = *value;
    }
    let word = |values: &[u64], id: usize, negated: bool| {
        if negated {
            !values[id]
        } else {
            values[id]
        }
    };
    for (id, gate) in aig.gates.iter().enumerate() {
        values[id] = match gate {
            AigNode::Literal(v) => {
                if *v {
                    u64::MAX
                } else {
                    0
                }
            }
            AigNode::Input { .. } => values[id],
            AigNode::And2 { a, b } => {
                word(&values, a.node.id, a.negated) & word(&values, b.node.id, b.negated)
            }
        };
    }
    aig.outputs
        .iter()
        .map(|o| word(&values, o.operand.node.id, o.operand.negated))
        .collect()
}
