// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use crate::aig::check::check_aig;
use crate::logic::network::{LogicNetwork, LogicNodeKind};

/// Structural validation of a mapped network. All problems found are
/// reported together, separated by `; `.
pub fn check_network(net: &LogicNetwork) -> Result<(), String> {
    let mut problems: Vec<String> = Vec::new();
    for id in net.node_ids() {
        let Some(node) = net.node(id) else {
            continue;
        };
        match &node.kind {
            LogicNodeKind::Input { name } => {
                if !node.fanins.is_empty() || node.func.is_some() {
                    problems.push(format!("input {} has fanins or a function", name));
                }
            }
            LogicNodeKind::Const => {
                if !node.fanins.is_empty() {
                    problems.push(format!("constant node %{} has fanins", id.id));
                }
                match node.func {
                    Some(func) if net.funcs.const_value(func).is_some() => {}
                    _ => problems.push(format!(
                        "constant node %{} does not carry a constant function",
                        id.id
                    )),
                }
            }
            LogicNodeKind::Logic => {
                let mut seen = HashSet::new();
                for fanin in &node.fanins {
                    if !net.is_live(*fanin) {
                        problems.push(format!(
                            "node %{} has dangling fanin %{}",
                            id.id, fanin.id
                        ));
                    }
                    if !seen.insert(*fanin) {
                        problems.push(format!(
                            "node %{} lists fanin %{} twice",
                            id.id, fanin.id
                        ));
                    }
                }
                match node.func {
                    None => problems.push(format!("node %{} has no function", id.id)),
                    Some(func) => {
                        if let Some(index) = net
                            .funcs
                            .support(func)
                            .into_iter()
                            .find(|i| *i >= node.fanins.len())
                        {
                            problems.push(format!(
                                "node %{} function uses variable {} but has {} fanins",
                                id.id,
                                index,
                                node.fanins.len()
                            ));
                        }
                    }
                }
            }
        }
    }
    for input in net.inputs() {
        match net.node(*input).map(|n| &n.kind) {
            Some(LogicNodeKind::Input { .. }) => {}
            _ => problems.push(format!("input %{} is not a live input node", input.id)),
        }
    }
    for output in &net.outputs {
        match output.driver {
            None => problems.push(format!("output {} has no driver", output.name)),
            Some(driver) if !net.is_live(driver) => problems.push(format!(
                "output {} is driven by missing node %{}",
                output.name, driver.id
            )),
            Some(_) => {}
        }
        if output.negated {
            problems.push(format!(
                "output {} has a complemented connection",
                output.name
            ));
        }
    }
    if problems.is_empty() {
        if let Err(e) = net.topo_order() {
            problems.push(e);
        }
    }
    if let Some(exdc) = &net.exdc {
        if let Err(e) = check_aig(exdc) {
            problems.push(format!("exdc network: {}", e));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}
