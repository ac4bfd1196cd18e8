// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use xlsynth_techmap::mapper::params::{MapObjective, MapParams};
use xlsynth_techmap::techmap::map_network;
use xlsynth_techmap::test_utils::{
    check_equivalence, make_ripple_adder, make_ripple_adder_with_choices,
};

/// Maps a sample ripple-carry adder AIG into a LUT network and reports the
/// result.
#[derive(Parser, Debug)]
struct Args {
    /// Width of the sample adder.
    #[arg(long, default_value_t = 8)]
    adder_bits: usize,

    /// Whether to add alternative carry structures as choices.
    #[arg(long, default_value_t = false)]
    #[arg(action = clap::ArgAction::Set)]
    choices: bool,

    /// Path to a JSON file with mapper parameters; flags below override it.
    #[arg(long)]
    params: Option<String>,

    /// Maximum number of LUT inputs (K).
    #[arg(long)]
    lut_size: Option<usize>,

    /// Priority cuts kept per node.
    #[arg(long)]
    cuts_per_node: Option<usize>,

    /// Optimize for area instead of delay.
    #[arg(long, default_value_t = false)]
    #[arg(action = clap::ArgAction::Set)]
    area: bool,

    /// Whether to print the mapped network.
    #[arg(long, default_value_t = false)]
    #[arg(action = clap::ArgAction::Set)]
    print: bool,

    /// Whether to check the mapped network against the source by simulation.
    #[arg(long, default_value_t = true)]
    #[arg(action = clap::ArgAction::Set)]
    check_equivalence: bool,
}

fn load_params(args: &Args) -> anyhow::Result<MapParams> {
    let mut params = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => MapParams::default(),
    };
    if let Some(lut_size) = args.lut_size {
        params.lut_size = lut_size;
    }
    if let Some(cuts_per_node) = args.cuts_per_node {
        params.cuts_per_node = cuts_per_node;
    }
    if args.area {
        params.objective = MapObjective::Area;
    }
    Ok(params)
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();
    let params = load_params(&args)?;
    log::info!("params: {}", serde_json::to_string(&params)?);

    let aig = if args.choices {
        make_ripple_adder_with_choices(args.adder_bits)
    } else {
        make_ripple_adder(args.adder_bits)
    };
    let net = map_network(&aig, &params)?;

    if args.print {
        println!("{}", net);
    }
    println!("source: {} AND nodes", aig.and_count());
    println!("mapped: {}", serde_json::to_string(&net.stats())?);

    if args.check_equivalence {
        check_equivalence(&aig, &net, 0).map_err(anyhow::Error::msg)?;
        println!("equivalence: ok");
    }
    Ok(())
}
