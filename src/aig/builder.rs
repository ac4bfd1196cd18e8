// SPDX-License-Identifier: Apache-2.0

//! `AigBuilder` builds up an `Aig` as operations are added.
//!
//! With folding on, trivially simplifiable ANDs (constant operands, repeated
//! or complementary operands) never create nodes; with hashing on, an AND of
//! an operand pair already seen returns the existing node. Both on yields a
//! structurally hashed graph, which is what the mapper expects.
//!
//! ```
//! use xlsynth_techmap::aig::builder::{AigBuilder, AigBuilderOptions};
//!
//! let mut b = AigBuilder::new("and2".to_string(), AigBuilderOptions::opt());
//! let x = b.add_input("x".to_string());
//! let y = b.add_input("y".to_string());
//! let o = b.add_and(x, y);
//! b.add_output("o".to_string(), o);
//! let aig = b.build();
//! assert_eq!(aig.and_count(), 1);
//! ```

use std::collections::HashMap;

use crate::aig::choice::ChoiceSets;
use crate::aig::gate::{Aig, AigNode, AigOperand, AigRef, Input, Output};

#[derive(Debug, Clone, Copy)]
pub struct AigBuilderOptions {
    pub fold: bool,
    pub hash: bool,
}

impl AigBuilderOptions {
    /// Folding and hashing enabled.
    pub fn opt() -> Self {
        Self {
            fold: true,
            hash: true,
        }
    }

    pub fn no_opt() -> Self {
        Self {
            fold: false,
            hash: false,
        }
    }
}

pub struct AigBuilder {
    pub name: String,
    pub gates: Vec<AigNode>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub choices: ChoiceSets,
    pub options: AigBuilderOptions,
    exdc: Option<Box<Aig>>,
    strash: HashMap<(AigOperand, AigOperand), AigRef>,
}

impl AigBuilder {
    pub fn new(name: String, options: AigBuilderOptions) -> Self {
        Self {
            name,
            gates: vec![AigNode::Literal(false)],
            inputs: Vec::new(),
            outputs: Vec::new(),
            choices: ChoiceSets::new(),
            options,
            exdc: None,
            strash: HashMap::new(),
        }
    }

    pub fn build(self) -> Aig {
        Aig {
            name: self.name,
            gates: self.gates,
            inputs: self.inputs,
            outputs: self.outputs,
            choices: self.choices,
            exdc: self.exdc,
        }
    }

    pub fn get_false(&self) -> AigOperand {
        AigOperand {
            node: AigRef { id: 0 },
            negated: false,
        }
    }

    pub fn get_true(&self) -> AigOperand {
        self.get_false().negate()
    }

    pub fn is_known_false(&self, operand: AigOperand) -> bool {
        operand.node.id == 0 && !operand.negated
    }

    pub fn is_known_true(&self, operand: AigOperand) -> bool {
        operand.node.id == 0 && operand.negated
    }

    pub fn add_input(&mut self, name: String) -> AigOperand {
        self.add_input_with_arrival(name, 0.0)
    }

    pub fn add_input_with_arrival(&mut self, name: String, arrival: f32) -> AigOperand {
        let node = AigRef {
            id: self.gates.len(),
        };
        self.gates.push(AigNode::Input { name: name.clone() });
        self.inputs.push(Input {
            name,
            node,
            arrival,
        });
        node.into()
    }

    pub fn add_output(&mut self, name: String, operand: AigOperand) {
        self.outputs.push(Output { name, operand });
    }

    pub fn add_not(&mut self, operand: AigOperand) -> AigOperand {
        operand.negate()
    }

    pub fn add_and(&mut self, a: AigOperand, b: AigOperand) -> AigOperand {
        if self.options.fold {
            if self.is_known_false(a) || self.is_known_false(b) {
                return self.get_false();
            }
            if self.is_known_true(a) {
                return b;
            }
            if self.is_known_true(b) {
                return a;
            }
            if a == b {
                return a;
            }
            if a.node == b.node {
                return self.get_false();
            }
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if self.options.hash {
            if let Some(existing) = self.strash.get(&key) {
                return (*existing).into();
            }
        }
        let node = AigRef {
            id: self.gates.len(),
        };
        self.gates.push(AigNode::And2 { a: key.0, b: key.1 });
        if self.options.hash {
            self.strash.insert(key, node);
        }
        node.into()
    }

    pub fn add_or(&mut self, a: AigOperand, b: AigOperand) -> AigOperand {
        self.add_and(a.negate(), b.negate()).negate()
    }

    pub fn add_xor(&mut self, a: AigOperand, b: AigOperand) -> AigOperand {
        let both = self.add_and(a, b);
        let neither = self.add_and(a.negate(), b.negate());
        self.add_and(both.negate(), neither.negate())
    }

    /// `sel ? on_true : on_false`
    pub fn add_mux(
        &mut self,
        sel: AigOperand,
        on_true: AigOperand,
        on_false: AigOperand,
    ) -> AigOperand {
        let t = self.add_and(sel, on_true);
        let f = self.add_and(sel.negate(), on_false);
        self.add_or(t, f)
    }

    /// Records `member` as an alternative implementation of `repr`.
    pub fn add_choice(&mut self, repr: AigRef, member: AigRef) {
        self.choices.add(repr, member);
    }

    pub fn set_exdc(&mut self, exdc: Aig) {
        self.exdc = Some(Box::new(exdc));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::sim::eval;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_fold_constant_operands() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::opt());
        let x = b.add_input("x".to_string());
        let f = b.get_false();
        let t = b.get_true();
        assert_eq!(b.add_and(x, f), f);
        assert_eq!(b.add_and(t, x), x);
        assert_eq!(b.add_and(x, x), x);
        assert_eq!(b.add_and(x, x.negate()), f);
        assert_eq!(b.gates.len(), 2);
    }

    #[test]
    fn test_hash_is_order_insensitive() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::opt());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let g0 = b.add_and(x, y.negate());
        let g1 = b.add_and(y.negate(), x);
        assert_eq!(g0, g1);
        assert_eq!(b.gates.len(), 4);
    }

    #[test]
    fn test_no_opt_keeps_duplicates() {
        let mut b = AigBuilder::new("f".to_string(), AigBuilderOptions::no_opt());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let g0 = b.add_and(x, y);
        let g1 = b.add_and(x, y);
        assert_ne!(g0, g1);
    }

    #[test_case(false, false)]
    #[test_case(false, true)]
    #[test_case(true, false)]
    #[test_case(true, true)]
    fn test_derived_ops_truth_table(fold: bool, hash: bool) {
        let mut b = AigBuilder::new("ops".to_string(), AigBuilderOptions { fold, hash });
        let s = b.add_input("s".to_string());
        let x = b.add_input("x".to_string());
        let y = b.add_input("y".to_string());
        let or = b.add_or(x, y);
        let xor = b.add_xor(x, y);
        let mux = b.add_mux(s, x, y);
        b.add_output("or".to_string(), or);
        b.add_output("xor".to_string(), xor);
        b.add_output("mux".to_string(), mux);
        let aig = b.build();
        for bits in 0..8u32 {
            let sv = bits & 1 != 0;
            let xv = bits & 2 != 0;
            let yv = bits & 4 != 0;
            let got = eval(&aig, &[sv, xv, yv]);
            assert_eq!(got, vec![xv || yv, xv ^ yv, if sv { xv } else { yv }]);
        }
    }
}
