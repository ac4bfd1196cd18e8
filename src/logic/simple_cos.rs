// SPDX-License-Identifier: Apache-2.0

//! Primary output decoupling.
//!
//! Afterwards every output is driven, uncomplemented, by a non-input node
//! that drives no other output. Internal fanouts of a driver are left alone.

use std::collections::HashSet;

use crate::logic::func::FuncLit;
use crate::logic::network::{LogicNetwork, LogicNodeKind, NodeId};

fn create_buffer(net: &mut LogicNetwork, fanin: NodeId, negate: bool) -> NodeId {
    let node = net.create_node();
    net.add_fanin(node, fanin);
    let v0 = net.funcs.var(0);
    let func = net.funcs.not_cond(v0, negate);
    net.set_function(node, func);
    node
}

fn duplicate(net: &mut LogicNetwork, source: NodeId, func: FuncLit, negate: bool) -> NodeId {
    let fanins = net
        .node(source)
        .map(|n| n.fanins.clone())
        .unwrap_or_default();
    let is_const = matches!(
        net.node(source).map(|n| &n.kind),
        Some(LogicNodeKind::Const)
    );
    if is_const {
        let value = net.funcs.const_value(func).unwrap_or(false) ^ negate;
        return net.create_const(value);
    }
    let node = net.create_node();
    for fanin in fanins {
        net.add_fanin(node, fanin);
    }
    let func = net.funcs.not_cond(func, negate);
    net.set_function(node, func);
    node
}

/// Decouples primary output drivers. With `duplicate` set, a shared or
/// complemented driver is copied for the output; otherwise a buffer or
/// inverter is inserted. Constant drivers are always copied and input
/// drivers always get a buffer. A replaced driver that ends up with no
/// consumers is deleted. Returns the number of nodes created.
pub fn make_simple_cos(net: &mut LogicNetwork, duplicate_drivers: bool) -> usize {
    let fanouts = net.fanout_counts();
    let mut claimed: HashSet<NodeId> = HashSet::new();
    let mut replaced: Vec<NodeId> = Vec::new();
    let mut added = 0;
    for index in 0..net.outputs.len() {
        let output = &net.outputs[index];
        let Some(driver) = output.driver else {
            continue;
        };
        let negated = output.negated;
        let Some(node) = net.node(driver) else {
            continue;
        };
        let kind = node.kind.clone();
        let func = node.func;
        let new_driver = match (kind, func) {
            (LogicNodeKind::Input { .. }, _) => {
                added += 1;
                create_buffer(net, driver, negated)
            }
            (_, None) => continue,
            (LogicNodeKind::Const, Some(func)) => {
                if !negated && !claimed.contains(&driver) {
                    driver
                } else {
                    added += 1;
                    duplicate(net, driver, func, negated)
                }
            }
            (LogicNodeKind::Logic, Some(func)) => {
                if claimed.contains(&driver) || (negated && fanouts[driver.id] > 1) {
                    added += 1;
                    if duplicate_drivers {
                        duplicate(net, driver, func, negated)
                    } else {
                        create_buffer(net, driver, negated)
                    }
                } else {
                    if negated {
                        let flipped = func.negate();
                        net.set_function(driver, flipped);
                    }
                    driver
                }
            }
        };
        if new_driver != driver {
            replaced.push(driver);
        }
        claimed.insert(new_driver);
        net.connect_output(index, new_driver, false);
    }
    // Copies share the original's fanins, so only the replaced drivers
    // themselves can become unused.
    let removed = replaced
        .into_iter()
        .filter(|id| net.remove_if_unused(*id))
        .count();
    if added != 0 {
        log::debug!(
            "{}: decoupled output drivers with {} new nodes, {} replaced drivers removed",
            net.name,
            added,
            removed
        );
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::check::check_network;
    use crate::logic::sim::eval;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// `n = a & b` driving outputs: `o0 = n`, `o1 = !n`, `o2 = a`,
    /// `o3 = !a`.
    fn shared_driver_network() -> LogicNetwork {
        let mut net = LogicNetwork::new("f".to_string());
        let a = net.create_input("a".to_string());
        let b = net.create_input("b".to_string());
        let n = net.create_node();
        net.add_fanin(n, a);
        net.add_fanin(n, b);
        let v0 = net.funcs.var(0);
        let v1 = net.funcs.var(1);
        let func = net.funcs.and(v0, v1);
        net.set_function(n, func);
        let connections = [
            ("o0", n, false),
            ("o1", n, true),
            ("o2", a, false),
            ("o3", a, true),
        ];
        for (name, driver, negated) in connections {
            let o = net.add_output(name.to_string());
            net.connect_output(o, driver, negated);
        }
        net
    }

    #[test_case(true)]
    #[test_case(false)]
    fn test_outputs_become_simple_and_keep_function(duplicate_drivers: bool) {
        let mut net = shared_driver_network();
        let before: Vec<Vec<bool>> = (0..4)
            .map(|m| eval(&net, &[m & 1 != 0, m & 2 != 0]).unwrap())
            .collect();
        let added = make_simple_cos(&mut net, duplicate_drivers);
        assert_eq!(added, 3);
        assert_eq!(check_network(&net), Ok(()));
        let drivers: HashSet<NodeId> = net.outputs.iter().map(|o| o.driver.unwrap()).collect();
        assert_eq!(drivers.len(), 4);
        for m in 0..4 {
            assert_eq!(eval(&net, &[m & 1 != 0, m & 2 != 0]).unwrap(), before[m]);
        }
    }

    #[test]
    fn test_single_fanout_complement_is_absorbed() {
        let mut net = LogicNetwork::new("f".to_string());
        let a = net.create_input("a".to_string());
        let n = net.create_node();
        net.add_fanin(n, a);
        let v0 = net.funcs.var(0);
        net.set_function(n, v0);
        let o = net.add_output("o".to_string());
        net.connect_output(o, n, true);
        assert_eq!(make_simple_cos(&mut net, true), 0);
        assert_eq!(net.outputs[0].driver, Some(n));
        assert!(!net.outputs[0].negated);
        assert_eq!(net.node(n).unwrap().func, Some(v0.negate()));
    }

    #[test]
    fn test_shared_constant_is_copied() {
        let mut net = LogicNetwork::new("f".to_string());
        let c = net.create_const(false);
        for name in ["z0", "z1"] {
            let o = net.add_output(name.to_string());
            net.connect_output(o, c, name == "z1");
        }
        assert_eq!(make_simple_cos(&mut net, true), 1);
        assert_eq!(eval(&net, &[]).unwrap(), vec![false, true]);
        assert_eq!(check_network(&net), Ok(()));
        assert!(net.is_live(c));
    }

    #[test]
    fn test_replaced_complemented_constant_is_removed() {
        let mut net = LogicNetwork::new("f".to_string());
        let c = net.create_const(false);
        let o = net.add_output("one".to_string());
        net.connect_output(o, c, true);
        assert_eq!(make_simple_cos(&mut net, true), 1);
        assert!(!net.is_live(c));
        assert_eq!(net.logic_count(), 1);
        assert_eq!(eval(&net, &[]).unwrap(), vec![true]);
    }

    #[test_case(true)]
    #[test_case(false)]
    fn test_driver_of_only_complemented_outputs(duplicate_drivers: bool) {
        let mut net = LogicNetwork::new("f".to_string());
        let a = net.create_input("a".to_string());
        let b = net.create_input("b".to_string());
        let n = net.create_node();
        net.add_fanin(n, a);
        net.add_fanin(n, b);
        let v0 = net.funcs.var(0);
        let v1 = net.funcs.var(1);
        let func = net.funcs.and(v0, v1);
        net.set_function(n, func);
        for name in ["o0", "o1"] {
            let o = net.add_output(name.to_string());
            net.connect_output(o, n, true);
        }
        make_simple_cos(&mut net, duplicate_drivers);
        assert_eq!(check_network(&net), Ok(()));
        let fanouts = net.fanout_counts();
        for id in net.node_ids() {
            if !net.inputs().contains(&id) {
                assert!(fanouts[id.id] > 0, "node %{} is unreferenced", id.id);
            }
        }
        // Duplication leaves the original unused; buffering keeps it as the
        // inverters' fanin.
        assert_eq!(net.is_live(n), !duplicate_drivers);
        for m in 0..4 {
            let want = !((m & 1 != 0) && (m & 2 != 0));
            assert_eq!(
                eval(&net, &[m & 1 != 0, m & 2 != 0]).unwrap(),
                vec![want, want]
            );
        }
    }
}
