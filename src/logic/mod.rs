// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod func;
pub mod network;
pub mod simple_cos;
pub mod sim;

pub use func::{FuncGraph, FuncLit, FuncNode, FuncRef};
pub use network::{LogicNetwork, LogicNode, LogicNodeKind, LogicOutput, NetworkStats, NodeId};
