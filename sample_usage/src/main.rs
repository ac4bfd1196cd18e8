// SPDX-License-Identifier: Apache-2.0

mod multithread;

use xlsynth_techmap::mapper::params::MapParams;
use xlsynth_techmap::techmap::map_network;
use xlsynth_techmap::test_utils::{check_equivalence, make_ripple_adder};

/// Maps a 4-bit adder into 4-input LUTs and checks the result against the
/// source AIG.
fn validate_adder() -> Result<(), Box<dyn std::error::Error>> {
    let aig = make_ripple_adder(4);
    log::info!("mapping {} with {} AND nodes", aig.name, aig.and_count());
    let params = MapParams {
        lut_size: 4,
        ..MapParams::default()
    };
    let net = map_network(&aig, &params)?;
    check_equivalence(&aig, &net, 0)?;
    println!("{}", net);
    Ok(())
}

fn main() {
    let _ = env_logger::try_init();
    let result = validate_adder();
    println!("adder mapping validation result: {:?}", result);
    multithread::validate_all_threads_map_sample();
}

#[test]
fn test_validate_adder() {
    let _ = env_logger::try_init();
    validate_adder().expect("validation should succeed");
}
