// SPDX-License-Identifier: Apache-2.0

//! Sample networks and simulation-based equivalence checking shared by the
//! tests, the `techmap` binary and the sample programs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::aig::builder::{AigBuilder, AigBuilderOptions};
use crate::aig::gate::{Aig, AigOperand};
use crate::aig::sim as aig_sim;
use crate::logic::network::LogicNetwork;
use crate::logic::sim as logic_sim;

/// Inputs up to this count are checked exhaustively.
pub const EXHAUSTIVE_INPUT_LIMIT: usize = 16;
const RANDOM_SAMPLES: usize = 4096;

struct AdderBits {
    sums: Vec<AigOperand>,
    carry: AigOperand,
}

fn build_adder(b: &mut AigBuilder, bits: usize, with_choices: bool) -> AdderBits {
    let a: Vec<AigOperand> = (0..bits).map(|i| b.add_input(format!("a{}", i))).collect();
    let y: Vec<AigOperand> = (0..bits).map(|i| b.add_input(format!("b{}", i))).collect();
    let mut sums = Vec::with_capacity(bits);
    let mut carry = b.get_false();
    for i in 0..bits {
        let half = b.add_xor(a[i], y[i]);
        sums.push(b.add_xor(half, carry));
        let generate = b.add_and(a[i], y[i]);
        let propagate = b.add_and(carry, half);
        let next = b.add_or(generate, propagate);
        if with_choices && i > 0 {
            // Majority written as ab | ac | bc, an alternative to the
            // generate/propagate form above.
            let ac = b.add_and(a[i], carry);
            let bc = b.add_and(y[i], carry);
            let ab_or_ac = b.add_or(generate, ac);
            let alt = b.add_or(ab_or_ac, bc);
            if alt.node != next.node {
                b.add_choice(next.node, alt.node);
            }
        }
        carry = next;
    }
    AdderBits { sums, carry }
}

/// An unsigned `bits`-wide ripple-carry adder with outputs `s0..` and
/// `cout`.
pub fn make_ripple_adder(bits: usize) -> Aig {
    let mut b = AigBuilder::new(format!("add{}", bits), AigBuilderOptions::opt());
    let adder = build_adder(&mut b, bits, false);
    for (i, sum) in adder.sums.into_iter().enumerate() {
        b.add_output(format!("s{}", i), sum);
    }
    b.add_output("cout".to_string(), adder.carry);
    b.build()
}

/// Like `make_ripple_adder`, but every carry above bit 0 also carries an
/// equivalent majority structure as a choice.
pub fn make_ripple_adder_with_choices(bits: usize) -> Aig {
    let mut b = AigBuilder::new(format!("add{}_choices", bits), AigBuilderOptions::opt());
    let adder = build_adder(&mut b, bits, true);
    for (i, sum) in adder.sums.into_iter().enumerate() {
        b.add_output(format!("s{}", i), sum);
    }
    b.add_output("cout".to_string(), adder.carry);
    b.build()
}

/// A random strashed AIG. Each new AND combines two distinct, randomly
/// complemented earlier non-constant nodes; outputs are drawn from the most
/// recent nodes.
pub fn make_random_aig(
    seed: u64,
    input_count: usize,
    and_count: usize,
    output_count: usize,
) -> Aig {
    assert!(input_count >= 2);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut b = AigBuilder::new(format!("random_{}", seed), AigBuilderOptions::opt());
    let mut pool: Vec<AigOperand> = (0..input_count)
        .map(|i| b.add_input(format!("i{}", i)))
        .collect();
    for _ in 0..and_count {
        let x = pool[rng.gen_range(0..pool.len())];
        let mut y = pool[rng.gen_range(0..pool.len())];
        while y.node == x.node {
            y = pool[rng.gen_range(0..pool.len())];
        }
        let g = b.add_and(
            x.negate_if(rng.gen_bool(0.5)),
            y.negate_if(rng.gen_bool(0.5)),
        );
        if g.node.id != 0 && !pool.iter().any(|p| p.node == g.node) {
            pool.push(AigOperand::from(g.node));
        }
    }
    let window = pool.len().min(output_count.max(1) * 2);
    for i in 0..output_count {
        let pick = pool[pool.len() - 1 - rng.gen_range(0..window)];
        b.add_output(format!("o{}", i), pick.negate_if(rng.gen_bool(0.5)));
    }
    b.build()
}

/// Compares `aig` and `net` output by output, exhaustively for up to
/// `EXHAUSTIVE_INPUT_LIMIT` inputs and on random assignments otherwise.
pub fn check_equivalence(aig: &Aig, net: &LogicNetwork, seed: u64) -> Result<(), String> {
    let input_count = aig.inputs.len();
    if net.inputs().len() != input_count || net.outputs.len() != aig.outputs.len() {
        return Err(format!(
            "interface mismatch: source has {} inputs / {} outputs, mapped has {} / {}",
            input_count,
            aig.outputs.len(),
            net.inputs().len(),
            net.outputs.len()
        ));
    }
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let exhaustive = input_count <= EXHAUSTIVE_INPUT_LIMIT;
    let rounds = if exhaustive {
        1usize << input_count
    } else {
        RANDOM_SAMPLES
    };
    for round in 0..rounds {
        let assignment: Vec<bool> = if exhaustive {
            (0..input_count).map(|i| (round >> i) & 1 == 1).collect()
        } else {
            (0..input_count).map(|_| rng.gen_bool(0.5)).collect()
        };
        let want = aig_sim::eval(aig, &assignment);
        let got = logic_sim::eval(net, &assignment)?;
        if want != got {
            return Err(format!(
                "mismatch for inputs {:?}: source {:?}, mapped {:?}",
                assignment, want, got
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::check::check_strashed;

    #[test]
    fn test_ripple_adder_adds() {
        let aig = make_ripple_adder(3);
        for a in 0..8usize {
            for b in 0..8usize {
                let mut assignment = Vec::new();
                assignment.extend((0..3).map(|i| (a >> i) & 1 == 1));
                assignment.extend((0..3).map(|i| (b >> i) & 1 == 1));
                let out = aig_sim::eval(&aig, &assignment);
                let sum = out
                    .iter()
                    .enumerate()
                    .fold(0usize, |acc, (i, bit)| acc | ((*bit as usize) << i));
                assert_eq!(sum, a + b);
            }
        }
    }

    #[test]
    fn test_adder_with_choices_is_strashed() {
        let aig = make_ripple_adder_with_choices(4);
        assert_eq!(check_strashed(&aig), Ok(()));
        assert_eq!(aig.choices.len(), 3);
        let phases = aig.phases();
        for (repr, members) in aig.choices.iter() {
            // Both structures compute the complement of the carry.
            assert_eq!(phases[repr.id], phases[members[0].id]);
        }
    }

    #[test]
    fn test_random_aig_is_deterministic_and_strashed() {
        let a = make_random_aig(7, 6, 40, 3);
        let b = make_random_aig(7, 6, 40, 3);
        assert_eq!(a, b);
        assert_eq!(check_strashed(&a), Ok(()));
        assert_eq!(a.outputs.len(), 3);
    }
}
