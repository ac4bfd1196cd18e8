// SPDX-License-Identifier: Apache-2.0

//! Example of mapping one shared AIG from many threads at once.
use lazy_static::lazy_static;
use rayon::prelude::*;
use xlsynth_techmap::aig::Aig;
use xlsynth_techmap::logic::LogicNetwork;
use xlsynth_techmap::mapper::params::MapParams;
use xlsynth_techmap::techmap::map_network;
use xlsynth_techmap::test_utils::{check_equivalence, make_ripple_adder_with_choices};

lazy_static! {
    // An adder whose carries carry an alternative majority structure, shared
    // read-only by every thread.
    static ref SAMPLE_AIG: Aig = make_ripple_adder_with_choices(6);
}

/// Maps the sample with a different LUT size per thread.
fn map_with_lut_size(lut_size: usize) -> LogicNetwork {
    let params = MapParams {
        lut_size,
        ..MapParams::default()
    };
    map_network(&SAMPLE_AIG, &params).expect("map_network failed")
}

pub fn validate_all_threads_map_sample() {
    let lut_sizes: Vec<usize> = (0..num_cpus::get()).map(|i| 2 + i % 5).collect();
    let results: Vec<(usize, LogicNetwork)> = lut_sizes
        .into_par_iter()
        .map(|k| (k, map_with_lut_size(k)))
        .collect();

    for (k, net) in results.iter() {
        check_equivalence(&SAMPLE_AIG, net, *k as u64).expect("mapped network differs");
        // Every thread mapping with the same K must produce the same network.
        assert_eq!(net.to_string(), map_with_lut_size(*k).to_string());
    }
}
