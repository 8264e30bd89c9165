//! Warehouse server collaborator: per-location stock lookups and the
//! site list.
//!
//! The lookup contract is total: `check` always resolves to a value.
//! Transport errors and not-found responses collapse to a yellow status
//! with no items, so the sync loop needs no error handling at all.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::config::{Site, StatusPolicy, SyncConfig};
use crate::item::Status;

/// Substring of the item-type field marking a door under
/// [`StatusPolicy::DoorTag`]. Matched case-insensitively.
const DOOR_TYPE_TAG: &str = "door";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One stock record as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub tag: i64,
    pub item_type: String,
    pub vstock_no: String,
}

/// Outcome of one location lookup. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: Status,
    pub items: Vec<StockItem>,
}

impl CheckResult {
    /// The sentinel for failed or not-found lookups.
    pub fn unknown() -> Self {
        Self { status: Status::Yellow, items: Vec::new() }
    }
}

/// Derive a status from a successful lookup's item list.
pub fn derive_status(policy: StatusPolicy, items: &[StockItem]) -> Status {
    match policy {
        StatusPolicy::AnyItem => {
            if items.is_empty() {
                Status::Green
            } else {
                Status::Red
            }
        }
        StatusPolicy::DoorTag => {
            let has_door = items
                .iter()
                .any(|item| item.item_type.to_lowercase().contains(DOOR_TYPE_TAG));
            if has_door { Status::Red } else { Status::Green }
        }
    }
}

/// The location-check service consumed by the sync orchestrator.
pub trait LocationCheck: Send + Sync {
    /// Look up the stock at a named location. Must never fail; any
    /// transport or server error resolves to [`CheckResult::unknown`].
    fn check(&self, location_name: &str) -> BoxFuture<'_, CheckResult>;
}

/// HTTP implementation against the warehouse server.
pub struct HttpLocationCheck {
    client: reqwest::Client,
    config: SyncConfig,
}

impl HttpLocationCheck {
    pub fn new(config: SyncConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }

    async fn fetch(&self, location_name: &str) -> CheckResult {
        let url = format!("{}/api/stock", self.config.server_url.trim_end_matches('/'));
        let mut request = self
            .client
            .get(&url)
            .query(&[(self.config.location_param.as_str(), location_name)]);
        if let Some(site) = &self.config.site {
            request = request.query(&[("siteId", site.site_id.to_string())]);
        }
        if !self.config.username.is_empty() {
            request = request.basic_auth(&self.config.username, Some(&self.config.password));
        }
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                log::debug!("lookup for {location_name} failed: {e}");
                return CheckResult::unknown();
            }
        };
        if !response.status().is_success() {
            // 404 means the location is unknown to the server.
            return CheckResult::unknown();
        }
        match response.json::<Vec<StockItem>>().await {
            Ok(items) => {
                let status = derive_status(self.config.policy, &items);
                CheckResult { status, items }
            }
            Err(e) => {
                log::debug!("lookup for {location_name} returned bad payload: {e}");
                CheckResult::unknown()
            }
        }
    }
}

impl LocationCheck for HttpLocationCheck {
    fn check(&self, location_name: &str) -> BoxFuture<'_, CheckResult> {
        let name = location_name.to_string();
        Box::pin(async move { self.fetch(&name).await })
    }
}

/// Fetch the server's site list. Any failure, including malformed XML,
/// yields an empty list.
pub async fn list_sites(server_url: &str) -> Vec<Site> {
    let url = format!("{}/api/sites", server_url.trim_end_matches('/'));
    let body = match reqwest::get(&url).await {
        Ok(r) => match r.text().await {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        },
        Err(e) => {
            log::debug!("site list fetch failed: {e}");
            return Vec::new();
        }
    };
    parse_site_list(&body)
}

/// Parse repeated `<site>` elements out of the site-list XML. Tolerant
/// of unknown siblings; sites missing a required field are skipped.
pub fn parse_site_list(xml: &str) -> Vec<Site> {
    element_bodies(xml, "site")
        .into_iter()
        .filter_map(|body| {
            Some(Site {
                site_id: child_text(body, "siteId")?.trim().parse().ok()?,
                short_code: child_text(body, "shortCode")?.trim().to_string(),
                yard_name: child_text(body, "yardName")?.trim().to_string(),
            })
        })
        .collect()
}

/// All inner bodies of `<tag>...</tag>` occurrences, in order.
fn element_bodies<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut bodies = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find(&open) {
        let after = &rest[start + open.len()..];
        let Some(end) = after.find(&close) else { break };
        bodies.push(&after[..end]);
        rest = &after[end + close.len()..];
    }
    bodies
}

fn child_text<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    element_bodies(body, tag).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_type: &str) -> StockItem {
        StockItem { tag: 1, item_type: item_type.to_string(), vstock_no: "V1".to_string() }
    }

    #[test]
    fn test_any_item_policy() {
        assert_eq!(derive_status(StatusPolicy::AnyItem, &[]), Status::Green);
        assert_eq!(
            derive_status(StatusPolicy::AnyItem, &[item("pallet"), item("crate")]),
            Status::Red
        );
    }

    #[test]
    fn test_door_tag_policy() {
        assert_eq!(derive_status(StatusPolicy::DoorTag, &[]), Status::Green);
        assert_eq!(derive_status(StatusPolicy::DoorTag, &[item("pallet")]), Status::Green);
        assert_eq!(
            derive_status(StatusPolicy::DoorTag, &[item("pallet"), item("Roller Door")]),
            Status::Red
        );
    }

    #[test]
    fn test_stock_item_wire_shape() {
        let json = r#"{"tag":42,"itemType":"pallet","vstockNo":"VS-100"}"#;
        let parsed: StockItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tag, 42);
        assert_eq!(parsed.item_type, "pallet");
        assert_eq!(parsed.vstock_no, "VS-100");
    }

    #[test]
    fn test_parse_site_list() {
        let xml = r#"<?xml version="1.0"?>
            <sites>
              <site>
                <siteId>1</siteId>
                <shortCode>NW</shortCode>
                <yardName>North West Yard</yardName>
              </site>
              <site>
                <siteId>7</siteId>
                <shortCode>SE</shortCode>
                <yardName>South East Yard</yardName>
              </site>
            </sites>"#;
        let sites = parse_site_list(xml);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].short_code, "NW");
        assert_eq!(sites[1].site_id, 7);
    }

    #[test]
    fn test_parse_site_list_malformed_is_empty() {
        assert!(parse_site_list("").is_empty());
        assert!(parse_site_list("not xml at all").is_empty());
        // A site missing a field is skipped, the rest survive.
        let xml = "<site><siteId>1</siteId></site>\
                   <site><siteId>2</siteId><shortCode>A</shortCode><yardName>Y</yardName></site>";
        let sites = parse_site_list(xml);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].site_id, 2);
    }
}
