// SPDX-License-Identifier: Apache-2.0

pub mod driver;
pub mod load;
pub mod rebuild;
pub mod synth;

pub use driver::{map_network, map_network_with};
