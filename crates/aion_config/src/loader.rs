//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RouteConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "route.toml";

/// Loads the routing configuration from a project directory.
///
/// Reads `<project_dir>/route.toml` if it exists; a missing file yields the
/// default configuration.
pub fn load_config(project_dir: &Path) -> Result<RouteConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(RouteConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<RouteConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RouteConfig, ConfigError> {
    let config: RouteConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable by the router.
fn validate_config(config: &RouteConfig) -> Result<(), ConfigError> {
    let router = &config.router;
    if router.max_expanded_nodes == 0 {
        return Err(ConfigError::ValidationError(
            "router.max_expanded_nodes must be greater than zero".to_string(),
        ));
    }
    if router.distance_weight < 0 {
        return Err(ConfigError::ValidationError(format!(
            "router.distance_weight must not be negative (got {})",
            router.distance_weight
        )));
    }
    if router.history_increment < 0 {
        return Err(ConfigError::ValidationError(format!(
            "router.history_increment must not be negative (got {})",
            router.history_increment
        )));
    }
    if router.clock_pin_names.iter().any(|n| n.is_empty()) {
        return Err(ConfigError::ValidationError(
            "router.clock_pin_names must not contain empty names".to_string(),
        ));
    }
    Ok(())
}
