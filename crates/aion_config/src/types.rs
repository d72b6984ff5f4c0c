//! Configuration types deserialized from `route.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `route.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Maze router tuning.
    #[serde(default)]
    pub router: RouterConfig,
}

/// Tuning knobs for the maze router.
///
/// ```text
/// [router]
/// max_expanded_nodes = 100000
/// distance_weight = 2
/// clock_bias = 1000
/// history_increment = 1
/// reserve_pins = true
/// clock_buffer_prefixes = ["BUFG", "BUFH", "BUFIO", "BUFR"]
/// clock_pin_names = ["CLK"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Number of popped search nodes after which a single sink search aborts.
    pub max_expanded_nodes: usize,
    /// Multiplier applied to `distance + hop level` in the node cost.
    pub distance_weight: i32,
    /// Cost subtracted when a clock-like connection enters clock fabric.
    pub clock_bias: i32,
    /// History penalty added to a wire every time a committed path uses it.
    pub history_increment: i32,
    /// Reserve every pin wire for its own net before routing starts.
    pub reserve_pins: bool,
    /// Primitive kind prefixes identifying clock buffer instances.
    pub clock_buffer_prefixes: Vec<String>,
    /// Substrings of pin names treated as clock inputs.
    pub clock_pin_names: Vec<String>,
}

impl RouterConfig {
    /// Default node expansion cap per sink search.
    pub const DEFAULT_MAX_EXPANDED_NODES: usize = 100_000;
    /// Default distance weight.
    pub const DEFAULT_DISTANCE_WEIGHT: i32 = 2;
    /// Default clock fabric bias.
    pub const DEFAULT_CLOCK_BIAS: i32 = 1000;
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_expanded_nodes: Self::DEFAULT_MAX_EXPANDED_NODES,
            distance_weight: Self::DEFAULT_DISTANCE_WEIGHT,
            clock_bias: Self::DEFAULT_CLOCK_BIAS,
            history_increment: 1,
            reserve_pins: true,
            clock_buffer_prefixes: ["BUFG", "BUFH", "BUFIO", "BUFR"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            clock_pin_names: vec!["CLK".to_string()],
        }
    }
}
