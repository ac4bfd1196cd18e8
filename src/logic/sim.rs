// SPDX-License-Identifier: Apache-2.0

use crate::logic::network::{LogicNetwork, LogicNodeKind};

/// Evaluates the primary outputs of `net` for one assignment of its inputs
/// (in input order). Unconnected outputs evaluate to false.
pub fn eval(net: &LogicNetwork, inputs: &[bool]) -> Result<Vec<bool>, String> {
    if inputs.len() != net.inputs().len() {
        return Err(format!(
            "expected {} input values, got {}",
            net.inputs().len(),
            inputs.len()
        ));
    }
    let mut values = vec![false; net.slot_count()];
    for (id, value) in net.inputs().iter().zip(inputs) {
        values[id.id] = *value;
    }
    for id in net.topo_order()? {
        let Some(node) = net.node(id) else {
            continue;
        };
        if matches!(node.kind, LogicNodeKind::Input { .. }) {
            continue;
        }
        let Some(func) = node.func else {
            return Err(format!("node %{} has no function", id.id));
        };
        let fanin_values: Vec<bool> = node.fanins.iter().map(|f| values[f.id]).collect();
        values[id.id] = net.funcs.eval(func, &fanin_values);
    }
    Ok(net
        .outputs
        .iter()
        .map(|o| o.driver.map_or(false, |d| values[d.id] ^ o.negated))
        .collect())
}
