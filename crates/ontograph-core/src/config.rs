//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Settings for the relation-to-graph pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
}

/// How connected components of a non-planar graph are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentPolicy {
    /// Test every component for planarity again and pick its layout.
    #[default]
    Redetect,
    /// Always use the force-directed layout for components.
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Half-width of the square every layout is rescaled into.
    pub scale: f64,
    pub component_policy: ComponentPolicy,
    pub kamada_kawai: KamadaKawaiConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            component_policy: ComponentPolicy::default(),
            kamada_kawai: KamadaKawaiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KamadaKawaiConfig {
    /// Upper bound on the number of nodes moved.
    pub max_iterations: usize,
    /// Newton steps spent on one node before picking the next.
    pub inner_iterations: usize,
    /// Stop once every node's energy gradient is below this.
    pub epsilon: f64,
}

impl Default for KamadaKawaiConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            inner_iterations: 50,
            epsilon: 1e-4,
        }
    }
}
