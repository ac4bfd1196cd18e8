// SPDX-License-Identifier: Apache-2.0

//! Materializes LUT technology-mapping results.
//!
//! A structurally hashed AIG (optionally carrying choice sets) is loaded into
//! a mapper node space, a `CutSelector` picks a best cut for every AND node,
//! and each selected cut reachable from the outputs becomes one node of a
//! `LogicNetwork` whose local function is derived from the cut's
//! decomposition.
//!
//! ```
//! use xlsynth_techmap::mapper::params::MapParams;
//! use xlsynth_techmap::techmap::map_network;
//! use xlsynth_techmap::test_utils::{check_equivalence, make_ripple_adder};
//!
//! let aig = make_ripple_adder(4);
//! let params = MapParams { lut_size: 4, ..MapParams::default() };
//! let net = map_network(&aig, &params).unwrap();
//! assert!(check_equivalence(&aig, &net, 0).is_ok());
//! ```

pub mod aig;
pub mod error;
pub mod logic;
pub mod mapper;
pub mod techmap;
pub mod test_utils;

pub use error::MapError;
