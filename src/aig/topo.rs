// SPDX-License-Identifier: Apache-2.0

use crate::aig::gate::{Aig, AigNode, AigRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

fn and_deps(aig: &Aig, node: AigRef) -> Vec<AigRef> {
    let mut deps: Vec<AigRef> = aig
        .get(node)
        .get_args()
        .into_iter()
        .filter(|arg| aig.get(*arg).is_and())
        .collect();
    deps.extend_from_slice(aig.choices.members(node));
    deps
}

/// Returns every AND node of `aig` in an order where both operands of a node,
/// and all choice members of a representative, precede it.
///
/// Uses an explicit worklist so deep graphs do not exhaust the call stack.
/// Returns an error naming a node on the cycle if operand or choice links
/// form one.
pub fn and_load_order(aig: &Aig) -> Result<Vec<AigRef>, String> {
    let mut marks = vec![Mark::Unvisited; aig.gates.len()];
    let mut order = Vec::with_capacity(aig.gates.len());
    for (id, gate) in aig.gates.iter().enumerate() {
        if !matches!(gate, AigNode::And2 { .. }) || marks[id] != Mark::Unvisited {
            continue;
        }
        // (node, dependencies expanded)
        let mut worklist: Vec<(AigRef, bool)> = vec![(AigRef { id }, false)];
        while let Some((current, expanded)) = worklist.pop() {
            if expanded {
                marks[current.id] = Mark::Done;
                order.push(current);
                continue;
            }
            match marks[current.id] {
                Mark::Done => continue,
                Mark::OnStack => {
                    return Err(format!("cycle through node %{}", current.id));
                }
                Mark::Unvisited => {}
            }
            marks[current.id] = Mark::OnStack;
            worklist.push((current, true));
            for dep in and_deps(aig, current).into_iter().rev() {
                match marks[dep.id] {
                    Mark::Done => {}
                    Mark::OnStack => {
                        return Err(format!(
                            "cycle through node %{} (reached from %{})",
                            dep.id, current.id
                        ));
                    }
                    Mark::Unvisited => worklist.push((dep, false)),
                }
            }
        }
    }
    Ok(order)
}
