//! Paging configuration for mirror reads.

use serde::{Deserialize, Serialize};

/// Configuration for reading an object's tuples back from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Page size sent with every read. `None` leaves it to the engine.
    pub page_size: Option<u32>,
    /// Maximum reads per relation before giving up. Values below 1 count as 1.
    pub max_pages: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            page_size: None,
            max_pages: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MirrorConfig = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(config.page_size, Some(50));
        assert_eq!(config.max_pages, 1000);
    }
}
