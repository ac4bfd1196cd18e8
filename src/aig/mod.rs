// SPDX-License-Identifier: Apache-2.0

pub mod builder;
pub mod check;
pub mod choice;
pub mod gate;
pub mod sim;
pub mod topo;

pub use builder::{AigBuilder, AigBuilderOptions};
pub use choice::ChoiceSets;
pub use gate::{Aig, AigNode, AigOperand, AigRef, Input, Output};
