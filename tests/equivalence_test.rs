// SPDX-License-Identifier: Apache-2.0

use test_case::test_case;
use xlsynth_techmap::logic::check::check_network;
use xlsynth_techmap::mapper::params::{MapObjective, MapParams};
use xlsynth_techmap::techmap::map_network;
use xlsynth_techmap::test_utils::{
    check_equivalence, make_random_aig, make_ripple_adder, make_ripple_adder_with_choices,
};

#[test_case(2; "k2")]
#[test_case(3; "k3")]
#[test_case(4; "k4")]
#[test_case(5; "k5")]
#[test_case(6; "k6")]
fn test_random_aigs_map_equivalently(lut_size: usize) {
    let params = MapParams {
        lut_size,
        ..MapParams::default()
    };
    for seed in 0..8u64 {
        let aig = make_random_aig(seed, 6, 40, 4);
        let net = map_network(&aig, &params).unwrap();
        assert_eq!(check_network(&net), Ok(()));
        assert_eq!(check_equivalence(&aig, &net, seed), Ok(()), "seed {}", seed);
        for id in net.node_ids() {
            assert!(net.node(id).unwrap().fanins.len() <= lut_size);
        }
    }
}

#[test_case(MapObjective::Delay; "delay")]
#[test_case(MapObjective::Area; "area")]
fn test_adder_with_choices(objective: MapObjective) {
    let aig = make_ripple_adder_with_choices(8);
    assert!(aig.has_choices());
    let params = MapParams {
        lut_size: 4,
        objective,
        ..MapParams::default()
    };
    let net = map_network(&aig, &params).unwrap();
    assert_eq!(check_equivalence(&aig, &net, 1), Ok(()));
}

#[test]
fn test_wide_adder_uses_sampled_equivalence() {
    // 2 * 12 inputs is past the exhaustive limit.
    let aig = make_ripple_adder(12);
    let net = map_network(&aig, &MapParams::default()).unwrap();
    assert_eq!(check_equivalence(&aig, &net, 7), Ok(()));
    assert_eq!(net.outputs.len(), 13);
}

#[test]
fn test_buffering_instead_of_duplication() {
    let aig = make_ripple_adder(4);
    let params = MapParams {
        duplicate_drivers: false,
        ..MapParams::default()
    };
    let net = map_network(&aig, &params).unwrap();
    assert_eq!(check_equivalence(&aig, &net, 3), Ok(()));
}
