// SPDX-License-Identifier: Apache-2.0

pub mod cut;
pub mod manager;
pub mod params;
pub mod select;

pub use cut::{Cut, CutChild, CutId};
pub use manager::{MapManager, MapNode, MapNodeKind, MapOutput, MapRef};
pub use params::{MapObjective, MapParams};
pub use select::{CutSelector, PriorityCutSelector, StructuralCutSelector};
