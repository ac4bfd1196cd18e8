// SPDX-License-Identifier: Apache-2.0

//! Top-level mapping flow: load the source AIG into a mapper, run cut
//! selection, and materialize the selected cuts as a logic network.

use crate::aig::check::check_strashed;
use crate::aig::gate::Aig;
use crate::error::{MapError, Result};
use crate::logic::check::check_network;
use crate::logic::network::LogicNetwork;
use crate::logic::simple_cos::make_simple_cos;
use crate::mapper::manager::MapManager;
use crate::mapper::params::MapParams;
use crate::mapper::select::{CutSelector, PriorityCutSelector};
use crate::techmap::load::load_into_mapper;
use crate::techmap::rebuild::NodeReconstructor;

/// Arrival time of each primary input, in input order.
pub fn input_arrival_times(aig: &Aig) -> Vec<f32> {
    aig.inputs.iter().map(|input| input.arrival).collect()
}

/// Maps `aig` with the default priority-cut selector.
pub fn map_network(aig: &Aig, params: &MapParams) -> Result<LogicNetwork> {
    map_network_with(aig, params, &mut PriorityCutSelector::new())
}

/// Maps `aig` using `selector` to choose a best cut for every AND node.
///
/// Arrival times in `params` are replaced by the source inputs' arrival
/// metadata. On any failure the mapper and the partially built network are
/// dropped and nothing is returned.
pub fn map_network_with(
    aig: &Aig,
    params: &MapParams,
    selector: &mut dyn CutSelector,
) -> Result<LogicNetwork> {
    if let Err(e) = check_strashed(aig) {
        log::error!(
            "{}: source is not a structurally hashed AIG: {}",
            aig.name,
            e
        );
        return Err(MapError::Precondition(e));
    }
    if aig.has_choices() {
        log::info!(
            "{}: mapping with {} choice nodes",
            aig.name,
            aig.choices.len()
        );
    }

    let mut params = params.clone();
    params.arrival_times = input_arrival_times(aig);
    let duplicate_drivers = params.duplicate_drivers;

    let mut manager = load_into_mapper(aig, params)?;
    if let Err(e) = manager.perform_mapping(selector) {
        log::warn!("{}: mapping failed: {}", aig.name, e);
        return Err(MapError::MappingService(e));
    }

    let mut net = match build_mapped_network(aig, &manager, duplicate_drivers) {
        Ok(net) => net,
        Err(e) => {
            log::error!("{}: {}", aig.name, e);
            return Err(e);
        }
    };
    drop(manager);

    net.exdc = aig.exdc.clone();
    if let Err(e) = check_network(&net) {
        log::warn!("{}: the network check has failed: {}", aig.name, e);
        return Err(MapError::PostValidation(e));
    }
    let stats = net.stats();
    log::info!(
        "{}: mapped {} AND nodes into {} nodes ({} edges, {} levels, max fanin {})",
        aig.name,
        aig.and_count(),
        stats.nodes,
        stats.edges,
        stats.levels,
        stats.max_fanin
    );
    Ok(net)
}

fn build_mapped_network(
    aig: &Aig,
    manager: &MapManager,
    duplicate_drivers: bool,
) -> Result<LogicNetwork> {
    let mut net = LogicNetwork::new(aig.name.clone());
    for input in &aig.inputs {
        net.create_input(input.name.clone());
    }
    for output in &aig.outputs {
        net.add_output(output.name.clone());
    }

    // Fresh correspondence; nothing from an earlier run is visible here.
    let mut rebuild = NodeReconstructor::new(manager);
    let const_node = net.create_const(false);
    rebuild.set_copy(manager.const_node(), const_node);
    for (map_input, net_input) in manager.inputs().iter().zip(net.inputs()) {
        rebuild.set_copy(*map_input, *net_input);
    }

    for (index, output) in manager.outputs().iter().enumerate() {
        let driver = rebuild.reconstruct(&mut net, output.fanin)?;
        net.connect_output(index, driver, output.negated);
    }
    log::debug!(
        "{}: reconstructed {} nodes",
        aig.name,
        rebuild.copy_count() - manager.inputs().len() - 1
    );

    if net.remove_if_unused(const_node) {
        log::debug!("{}: removed unused constant node", aig.name);
    }
    make_simple_cos(&mut net, duplicate_drivers);
    Ok(net)
}
