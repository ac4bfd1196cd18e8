// SPDX-License-Identifier: Apache-2.0

//! Structural checks over `Aig`s.

use std::collections::{HashMap, HashSet};

use crate::aig::gate::{Aig, AigNode, AigOperand, AigRef};
use crate::aig::topo::and_load_order;

/// Checks that `aig` is well formed: node 0 is the false literal, every
/// operand refers to an earlier node, inputs and outputs refer to valid
/// nodes, and the don't-care network (if any) is itself well formed.
pub fn check_aig(aig: &Aig) -> Result<(), String> {
    check_structure(aig)?;
    if let Some(exdc) = &aig.exdc {
        check_aig(exdc).map_err(|e| format!("exdc network: {}", e))?;
    }
    Ok(())
}

fn check_structure(aig: &Aig) -> Result<(), String> {
    match aig.gates.first() {
        Some(AigNode::Literal(false)) => {}
        other => {
            return Err(format!(
                "{}: node 0 must be the false literal; got {:?}",
                aig.name, other
            ))
        }
    }
    for (id, gate) in aig.gates.iter().enumerate().skip(1) {
        match gate {
            AigNode::Literal(_) => {
                return Err(format!("{}: extra literal node %{}", aig.name, id));
            }
            AigNode::Input { .. } => {}
            AigNode::And2 { a, b } => {
                for operand in [a, b] {
                    if operand.node.id >= id {
                        return Err(format!(
                            "{}: node %{} has operand %{} that is not an earlier node",
                            aig.name, id, operand.node.id
                        ));
                    }
                }
            }
        }
    }
    let mut input_nodes = HashSet::new();
    for input in &aig.inputs {
        match aig.gates.get(input.node.id) {
            Some(AigNode::Input { .. }) => {}
            _ => {
                return Err(format!(
                    "{}: input {} does not refer to an input node",
                    aig.name, input.name
                ))
            }
        }
        if !input_nodes.insert(input.node) {
            return Err(format!(
                "{}: input node %{} is listed twice",
                aig.name, input.node.id
            ));
        }
    }
    for (id, gate) in aig.gates.iter().enumerate() {
        if matches!(gate, AigNode::Input { .. }) && !input_nodes.contains(&AigRef { id }) {
            return Err(format!("{}: input node %{} is not listed", aig.name, id));
        }
    }
    for output in &aig.outputs {
        if output.operand.node.id >= aig.gates.len() {
            return Err(format!(
                "{}: output {} refers to missing node %{}",
                aig.name, output.name, output.operand.node.id
            ));
        }
    }
    Ok(())
}

/// Checks that `aig` is in structurally hashed form with well-formed choice
/// sets, which is what the mapper loader requires. The don't-care network is
/// not inspected.
pub fn check_strashed(aig: &Aig) -> Result<(), String> {
    check_structure(aig)?;
    let mut seen: HashMap<(AigOperand, AigOperand), usize> = HashMap::new();
    for (id, gate) in aig.gates.iter().enumerate() {
        let AigNode::And2 { a, b } = gate else {
            continue;
        };
        if a.node.id == 0 || b.node.id == 0 {
            return Err(format!("node %{} has a constant operand", id));
        }
        if a.node == b.node {
            return Err(format!(
                "node %{} has both operands on node %{}",
                id, a.node.id
            ));
        }
        let key = if a <= b { (*a, *b) } else { (*b, *a) };
        if let Some(prev) = seen.insert(key, id) {
            return Err(format!(
                "nodes %{} and %{} are structurally identical",
                prev, id
            ));
        }
    }
    check_choices(aig)
}

fn check_choices(aig: &Aig) -> Result<(), String> {
    let fanouts = aig.fanout_counts();
    let mut members_seen = HashSet::new();
    for (repr, members) in aig.choices.iter() {
        let is_and = |r: &AigRef| aig.gates.get(r.id).map_or(false, |g| g.is_and());
        if !is_and(repr) {
            return Err(format!(
                "choice representative %{} is not an AND node",
                repr.id
            ));
        }
        if aig.choices.representative_of(*repr).is_some() {
            return Err(format!(
                "choice representative %{} is also a member of another set",
                repr.id
            ));
        }
        for member in members {
            if !is_and(member) {
                return Err(format!("choice member %{} is not an AND node", member.id));
            }
            if member == repr || aig.choices.is_representative(*member) {
                return Err(format!(
                    "choice member %{} is also a representative",
                    member.id
                ));
            }
            if !members_seen.insert(*member) {
                return Err(format!(
                    "choice member %{} belongs to more than one set",
                    member.id
                ));
            }
            if fanouts[member.id] != 0 {
                return Err(format!(
                    "choice member %{} has {} fanouts; members must be unreferenced",
                    member.id, fanouts[member.id]
                ));
            }
        }
    }
    and_load_order(aig).map(|_| ())
}
