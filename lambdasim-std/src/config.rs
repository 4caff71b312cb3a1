//! Simulator configuration.

use serde::{Deserialize, Serialize};

/// Function name reported when none is configured.
pub const DEFAULT_FUNCTION_NAME: &str = "lambda-simulator";
/// Function version reported when none is configured.
pub const DEFAULT_FUNCTION_VERSION: &str = "$LATEST";

/// Environment variable overriding [`SimulatorConfig::function_name`].
pub const FUNCTION_NAME_ENV: &str = "LAMBDASIM_FUNCTION_NAME";
/// Environment variable overriding [`SimulatorConfig::function_version`].
pub const FUNCTION_VERSION_ENV: &str = "LAMBDASIM_FUNCTION_VERSION";

/// Identity of the simulated function.
///
/// Missing fields fall back to their defaults when deserialized, so a partial
/// document (or an empty one) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Name exposed through the invocation context.
    pub function_name: String,
    /// Version exposed through the context, the START line and the version header.
    pub function_version: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            function_version: DEFAULT_FUNCTION_VERSION.to_string(),
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by `LAMBDASIM_FUNCTION_NAME` / `LAMBDASIM_FUNCTION_VERSION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup(FUNCTION_NAME_ENV).filter(|value| !value.is_empty()) {
            config.function_name = name;
        }
        if let Some(version) = lookup(FUNCTION_VERSION_ENV).filter(|value| !value.is_empty()) {
            config.function_version = version;
        }
        config
    }
}
