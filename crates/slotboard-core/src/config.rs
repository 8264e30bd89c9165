//! Sync configuration: server endpoint, site, credentials, and the
//! status-derivation policy for the deployment.

use serde::{Deserialize, Serialize};

use crate::storage::{Store, SYNC_CONFIG_KEY};

/// One warehouse site as reported by the server's site list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub site_id: i64,
    pub short_code: String,
    pub yard_name: String,
}

/// How a location's status is derived from the stock items returned for
/// it. Fixed per deployment, never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any item present means red, otherwise green.
    #[default]
    AnyItem,
    /// Red only when an item's type contains the door tag; other items
    /// are green.
    DoorTag,
}

/// Everything the sync orchestrator needs to talk to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub server_url: String,
    /// Query parameter naming the location in the lookup request.
    pub location_param: String,
    pub site: Option<Site>,
    pub username: String,
    pub password: String,
    pub policy: StatusPolicy,
}

impl SyncConfig {
    /// First missing required field, or None when sync may proceed.
    /// Credentials and site are optional; deployments without them leave
    /// the fields empty.
    pub fn missing(&self) -> Option<&'static str> {
        if self.server_url.trim().is_empty() {
            return Some("server URL");
        }
        if self.location_param.trim().is_empty() {
            return Some("location parameter name");
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_none()
    }

    /// Load from the store, falling back to defaults on any failure.
    pub fn load(store: &dyn Store) -> Self {
        match store.get(SYNC_CONFIG_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Persist to the store. Failures are logged and swallowed.
    pub fn save(&self, store: &dyn Store) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = store.set(SYNC_CONFIG_KEY, &json) {
                    log::warn!("failed to persist sync config: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize sync config: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_missing_fields() {
        let mut config = SyncConfig::default();
        assert_eq!(config.missing(), Some("server URL"));
        config.server_url = "http://warehouse.local:8080".to_string();
        assert_eq!(config.missing(), Some("location parameter name"));
        config.location_param = "location".to_string();
        assert!(config.is_complete());
    }

    #[test]
    fn test_config_persistence_roundtrip() {
        let store = MemoryStore::new();
        let config = SyncConfig {
            server_url: "http://warehouse.local".to_string(),
            location_param: "loc".to_string(),
            site: Some(Site {
                site_id: 3,
                short_code: "NW".to_string(),
                yard_name: "North West Yard".to_string(),
            }),
            username: "ops".to_string(),
            password: "secret".to_string(),
            policy: StatusPolicy::DoorTag,
        };
        config.save(&store);
        assert_eq!(SyncConfig::load(&store), config);
    }

    #[test]
    fn test_corrupt_config_resets_to_default() {
        let store = MemoryStore::new();
        store.set(SYNC_CONFIG_KEY, "???").unwrap();
        assert_eq!(SyncConfig::load(&store), SyncConfig::default());
    }
}
