// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

pub const MIN_LUT_SIZE: usize = 2;
pub const MAX_LUT_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapObjective {
    Delay,
    Area,
}

impl Default for MapObjective {
    fn default() -> Self {
        MapObjective::Delay
    }
}

/// Mapper configuration.
///
/// ```
/// use xlsynth_techmap::mapper::params::MapParams;
///
/// let params: MapParams = serde_json::from_str(r#"{"lut_size": 4}"#).unwrap();
/// assert_eq!(params.lut_size, 4);
/// assert_eq!(params.cuts_per_node, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParams {
    /// Maximum number of leaves per cut (K).
    pub lut_size: usize,
    /// Priority cuts retained per node during enumeration.
    pub cuts_per_node: usize,
    pub objective: MapObjective,
    /// Per-primary-input arrival times; empty means all zero.
    pub arrival_times: Vec<f32>,
    /// When decoupling output drivers, duplicate shared drivers rather than
    /// inserting buffers.
    pub duplicate_drivers: bool,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            lut_size: 6,
            cuts_per_node: 8,
            objective: MapObjective::Delay,
            arrival_times: Vec::new(),
            duplicate_drivers: true,
        }
    }
}

impl MapParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_LUT_SIZE..=MAX_LUT_SIZE).contains(&self.lut_size) {
            return Err(format!(
                "lut_size {} is outside [{}, {}]",
                self.lut_size, MIN_LUT_SIZE, MAX_LUT_SIZE
            ));
        }
        if self.cuts_per_node == 0 {
            return Err("cuts_per_node must be at least 1".to_string());
        }
        if let Some(t) = self.arrival_times.iter().find(|t| !t.is_finite()) {
            return Err(format!("arrival time {} is not finite", t));
        }
        Ok(())
    }

    pub fn arrival(&self, input_index: usize) -> f32 {
        self.arrival_times.get(input_index).copied().unwrap_or(0.0)
    }
}
