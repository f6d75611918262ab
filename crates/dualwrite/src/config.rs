//! Collector configuration.

use dualwrite_core::translate::kinds;
use dualwrite_engine::MirrorConfig;
use serde::{Deserialize, Serialize};

/// Role name pattern (SQL `LIKE`) identifying internally managed roles.
pub const DEFAULT_MANAGED_ROLE_PATTERN: &str = "managed:%";

/// Configuration for the standard collector set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Permission kinds to collect managed permissions for, one collector each.
    pub managed_kinds: Vec<String>,
    /// `LIKE` pattern for managed role names.
    pub managed_role_pattern: String,
    /// Paging for engine reads.
    pub mirror: MirrorConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            managed_kinds: vec![kinds::FOLDERS.to_string(), kinds::DASHBOARDS.to_string()],
            managed_role_pattern: DEFAULT_MANAGED_ROLE_PATTERN.to_string(),
            mirror: MirrorConfig::default(),
        }
    }
}
