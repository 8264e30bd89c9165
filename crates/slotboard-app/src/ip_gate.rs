//! Startup IP gate. Resolves the public IP and refuses to run when it
//! matches the deny list. Resolution failure is treated as allow.

use std::time::Duration;

const IP_LOOKUP_URL: &str = "https://api.ipify.org";

/// Deny-listed public IPs, comma-separated, from the environment.
pub fn deny_list() -> Vec<String> {
    std::env::var("SLOTBOARD_DENY_IPS")
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve the caller's public IP. None on any failure.
pub fn resolve_public_ip() -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .ok()?;
    let ip = client.get(IP_LOOKUP_URL).send().ok()?.text().ok()?;
    let ip = ip.trim().to_string();
    if ip.is_empty() { None } else { Some(ip) }
}

/// True when the app may start. Fail-open: an unresolved IP allows.
pub fn is_allowed(resolved: Option<&str>, deny: &[String]) -> bool {
    match resolved {
        Some(ip) => !deny.iter().any(|denied| denied == ip),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_ip_allows() {
        assert!(is_allowed(None, &["10.0.0.1".to_string()]));
    }

    #[test]
    fn test_denied_ip_blocks() {
        let deny = vec!["203.0.113.7".to_string()];
        assert!(!is_allowed(Some("203.0.113.7"), &deny));
        assert!(is_allowed(Some("203.0.113.8"), &deny));
        assert!(is_allowed(Some("203.0.113.7"), &[]));
    }
}
