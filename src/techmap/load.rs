// SPDX-License-Identifier: Apache-2.0

//! Loads a structurally hashed AIG into a fresh `MapManager`.

use std::collections::HashMap;

use crate::aig::check::check_strashed;
use crate::aig::gate::{Aig, AigNode, AigRef};
use crate::aig::topo::and_load_order;
use crate::error::{MapError, Result};
use crate::mapper::manager::{MapManager, MapRef};
use crate::mapper::params::MapParams;

fn copy_of(copies: &HashMap<AigRef, MapRef>, aig_ref: AigRef) -> Result<MapRef> {
    copies.get(&aig_ref).copied().ok_or_else(|| {
        MapError::Invariant(format!(
            "source node %{} was referenced before it was loaded",
            aig_ref.id
        ))
    })
}

/// Creates one mapper node per constant, primary input and AND of `aig`,
/// links choice members to their representatives, and creates the mapper's
/// primary outputs (keeping each output's complement bit as-is).
///
/// The source-to-mapper correspondence only lives for the duration of this
/// call.
pub fn load_into_mapper(aig: &Aig, params: MapParams) -> Result<MapManager> {
    check_strashed(aig).map_err(MapError::Precondition)?;
    let order = and_load_order(aig).map_err(MapError::Precondition)?;
    let mut manager = MapManager::start(params).map_err(MapError::MapperInit)?;

    let mut copies: HashMap<AigRef, MapRef> = HashMap::with_capacity(aig.gates.len());
    copies.insert(aig.const_ref(), manager.const_node());
    for input in &aig.inputs {
        let map_ref = manager.create_input();
        copies.insert(input.node, map_ref);
    }

    let progress_step = (order.len() / 10).max(1);
    for (i, aig_ref) in order.iter().enumerate() {
        if i % progress_step == 0 {
            log::debug!("{}: loaded {}/{} AND nodes", aig.name, i, order.len());
        }
        let AigNode::And2 { a, b } = aig.get(*aig_ref) else {
            continue;
        };
        let fanin0 = copy_of(&copies, a.node)?;
        let fanin1 = copy_of(&copies, b.node)?;
        let map_ref = manager.create_and(fanin0, a.negated, fanin1, b.negated);
        copies.insert(*aig_ref, map_ref);
        for member in aig.choices.members(*aig_ref) {
            let member_ref = copy_of(&copies, *member)?;
            manager.add_choice(map_ref, member_ref);
        }
    }

    for output in &aig.outputs {
        let fanin = copy_of(&copies, output.operand.node)?;
        manager.create_output(fanin, output.operand.negated);
    }
    log::debug!(
        "{}: loaded {} inputs, {} AND nodes, {} choice sets, {} outputs",
        aig.name,
        manager.inputs().len(),
        manager.and_count(),
        manager.choice_count(),
        manager.outputs().len()
    );
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::builder::{AigBuilder, AigBuilderOptions};
    use crate::aig::gate::AigOperand;
    use crate::mapper::manager::MapNodeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_preserves_structure_and_polarity() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::opt());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let g = b.add_and(x.negate(), y);
        b.add_output("o".to_string(), g.negate());
        b.add_output("x".to_string(), x);
        let aig = b.build();
        let m = load_into_mapper(&aig, MapParams::default()).unwrap();
        assert_eq!(m.inputs().len(), 2);
        assert_eq!(m.and_count(), 1);
        let and_ref = m.outputs()[0].fanin;
        assert!(m.outputs()[0].negated);
        assert_eq!(
            m.node(and_ref).kind,
            MapNodeKind::And {
                fanin0: m.inputs()[0],
                compl0: true,
                fanin1: m.inputs()[1],
                compl1: false,
            }
        );
        assert_eq!(m.outputs()[1].fanin, m.inputs()[0]);
        assert!(!m.outputs()[1].negated);
    }

    #[test]
    fn test_load_links_choices() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::opt());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let z = b.add_input("z".to_string());
        let xy = b.add_and(x, y);
        let repr = b.add_and(xy, z);
        let yz = b.add_and(y, z);
        let member = b.add_and(x, yz);
        b.add_choice(repr.node, member.node);
        b.add_output("o".to_string(), repr);
        let aig = b.build();
        let m = load_into_mapper(&aig, MapParams::default()).unwrap();
        let repr_ref = m.outputs()[0].fanin;
        assert_eq!(m.choices_of(repr_ref).len(), 1);
        let member_ref = m.choices_of(repr_ref)[0];
        assert!(member_ref < repr_ref);
        assert_eq!(m.node(member_ref).phase, m.node(repr_ref).phase);
    }

    #[test]
    fn test_non_strashed_input_is_a_precondition_error() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::no_opt());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let g0 = b.add_and(x, y);
        let g1 = b.add_and(x, y);
        let o = b.add_or(g0, g1);
        b.add_output("o".to_string(), o);
        let aig = b.build();
        match load_into_mapper(&aig, MapParams::default()) {
            Err(MapError::Precondition(msg)) => assert!(msg.contains("structurally identical")),
            other => panic!("expected precondition error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bad_params_are_a_mapper_init_error() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::opt());
        let x = b.add_input("x".to_string());
        b.add_output("o".to_string(), AigOperand::from(x.node));
        let aig = b.build();
        let params = MapParams {
            cuts_per_node: 0,
            ..MapParams::default()
        };
        assert!(matches!(
            load_into_mapper(&aig, params),
            Err(MapError::MapperInit(_))
        ));
    }
}
