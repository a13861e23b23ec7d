use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::db::Store;
use crate::models::{source, Element, SyncSummary};
use crate::utils::{commastr_to_list, qualify_hostname, strip_prefix_len};

use super::client::NetBoxClient;
use super::types::NbDevice;

fn custom_field<'a>(device: &'a NbDevice, key: &str) -> Option<&'a Value> {
    device.custom_fields.get(key).filter(|v| !v.is_null())
}

fn custom_field_label<'a>(device: &'a NbDevice, key: &str) -> Option<&'a str> {
    custom_field(device, key)?.get("label")?.as_str()
}

/// Normalize one NetBox device or virtual machine into a canonical element.
/// Returns None when the device has no usable name. Any other missing field
/// keeps its documented default — normalization never aborts on a gap.
pub fn parse_device(device: &NbDevice, default_domain: &str) -> Option<Element> {
    let name = device.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        return None;
    }

    let mut element = Element {
        hostname: qualify_hostname(name, default_domain),
        ..Default::default()
    };

    if let Some(device_type) = &device.device_type {
        if let Some(manufacturer) = &device_type.manufacturer {
            element.manufacturer = manufacturer.name.clone();
        }
        element.model = device_type.model.clone();
    }

    element.comments = device.comments.clone();
    element.tags = device.tags.iter().map(|t| t.name().to_string()).collect();

    if let Some(parents) = custom_field(device, "parents").and_then(|v| v.as_str()) {
        element.parents = commastr_to_list(parents, Some(default_domain));
    }

    element.role = device.role.as_ref().map(|r| r.name.clone()).unwrap_or_default();
    if element.role.is_empty() {
        // NetBox is (slowly) renaming device_role -> role; accept the old field
        if let Some(role) = &device.device_role {
            element.role = role.name.clone();
        }
    }

    if let Some(site) = &device.site {
        if site.name != "Default" {
            element.site_name = site.name.clone();
        }
    }

    if let Some(platform) = &device.platform {
        element.platform = platform.name.clone();
    }

    if let Some(ip) = &device.primary_ip4 {
        element.ipv4_addr = strip_prefix_len(&ip.address).to_string();
    }

    if let Some(status) = &device.status {
        if status.label != "Active" {
            element.active = false;
        }
    }

    if let Some(label) = custom_field_label(device, "alarm_timeperiod") {
        element.alarm_timeperiod = label.split_whitespace().next().unwrap_or("").to_string();
    }
    if let Some(label) = custom_field_label(device, "alarm_destination") {
        element.alarm_destination = commastr_to_list(label, None);
    }
    if let Some(label) = custom_field_label(device, "connection_method") {
        element.connection_method = label.to_string();
    }

    // A present-but-null custom field means "use the default", i.e. true
    if let Some(value) = device.custom_fields.get("monitor_icinga") {
        element.monitor_icinga = value.as_bool().unwrap_or(true);
    }
    if let Some(value) = device.custom_fields.get("monitor_librenms") {
        element.monitor_librenms = value.as_bool().unwrap_or(true);
    }
    if let Some(value) = device.custom_fields.get("backup_oxidized") {
        element.backup_oxidized = value.as_bool().unwrap_or(true);
    }

    Some(element)
}

/// Fetch all devices and virtual machines from NetBox, normalize them and
/// replace the netbox-tagged rows in the cache.
pub async fn run_sync(config: &Config, store: &Store) -> Result<SyncSummary> {
    let client = NetBoxClient::new(config.netbox_url.clone(), config.netbox_token.clone())?;

    // Keyed by hostname; devices are merged after virtual machines so a
    // device wins a hostname collision.
    let mut elements: BTreeMap<String, Element> = BTreeMap::new();
    let mut skipped = 0usize;

    tracing::info!("Fetching virtual machines from NetBox");
    for device in client.list_virtual_machines().await? {
        match parse_device(&device, &config.default_domain) {
            Some(element) => {
                elements.insert(element.hostname.clone(), element);
            }
            None => skipped += 1,
        }
    }

    tracing::info!("Fetching devices from NetBox");
    for device in client.list_devices().await? {
        match parse_device(&device, &config.default_domain) {
            Some(element) => {
                elements.insert(element.hostname.clone(), element);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::info!("Skipped {} NetBox records without a usable name", skipped);
    }

    let elements: Vec<Element> = elements.into_values().collect();
    store.replace_elements(source::NETBOX, &elements).await?;
    tracing::info!("Stored {} elements from NetBox", elements.len());

    Ok(SyncSummary {
        message: format!("Synced {} elements from NetBox", elements.len()),
        elements: elements.len(),
        skipped,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(value: Value) -> NbDevice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_device_without_name_is_skipped() {
        assert!(parse_device(&device(json!({})), "example.com").is_none());
        assert!(parse_device(&device(json!({ "name": null })), "example.com").is_none());
        assert!(parse_device(&device(json!({ "name": "" })), "example.com").is_none());
    }

    #[test]
    fn test_missing_fields_keep_defaults() {
        let element = parse_device(&device(json!({ "name": "R1" })), "example.com").unwrap();
        assert_eq!(element.hostname, "r1.example.com");
        assert_eq!(element.manufacturer, "");
        assert_eq!(element.model, "");
        assert_eq!(element.role, "");
        assert_eq!(element.site_name, "");
        assert_eq!(element.ipv4_addr, "");
        assert_eq!(element.connection_method, "ssh");
        assert!(element.active);
        assert!(element.monitor_icinga);
        assert!(element.monitor_librenms);
        assert!(element.backup_oxidized);
        assert!(element.parents.is_empty());
        assert!(element.alarm_destination.is_empty());
    }

    #[test]
    fn test_full_field_mapping() {
        let element = parse_device(
            &device(json!({
                "name": "sw1.lab.example.com",
                "device_type": {
                    "model": "EX4300",
                    "manufacturer": { "id": 3, "name": "Juniper" }
                },
                "role": { "id": 1, "name": "Switch" },
                "site": { "id": 2, "name": "Site B" },
                "platform": { "id": 4, "name": "junos" },
                "primary_ip4": { "address": "192.0.2.10/24" },
                "status": { "value": "active", "label": "Active" },
                "comments": "lab switch",
                "tags": [{ "id": 9, "name": "lab" }, "legacy-tag"],
                "custom_fields": {
                    "parents": "core1, core2",
                    "alarm_timeperiod": { "label": "24x7 support" },
                    "alarm_destination": { "label": "noc,oncall" },
                    "connection_method": { "label": "telnet" },
                    "monitor_icinga": false,
                    "monitor_librenms": null
                }
            })),
            "example.com",
        )
        .unwrap();

        assert_eq!(element.hostname, "sw1.lab.example.com");
        assert_eq!(element.manufacturer, "Juniper");
        assert_eq!(element.model, "EX4300");
        assert_eq!(element.role, "Switch");
        assert_eq!(element.site_name, "Site B");
        assert_eq!(element.platform, "junos");
        assert_eq!(element.ipv4_addr, "192.0.2.10");
        assert!(element.active);
        assert_eq!(element.comments, "lab switch");
        assert_eq!(element.tags, vec!["lab", "legacy-tag"]);
        assert_eq!(element.parents, vec!["core1.example.com", "core2.example.com"]);
        assert_eq!(element.alarm_timeperiod, "24x7");
        assert_eq!(element.alarm_destination, vec!["noc", "oncall"]);
        assert_eq!(element.connection_method, "telnet");
        assert!(!element.monitor_icinga);
        assert!(element.monitor_librenms); // null means default
    }

    #[test]
    fn test_legacy_device_role_fallback() {
        let element = parse_device(
            &device(json!({
                "name": "r2",
                "device_role": { "id": 7, "name": "Router" }
            })),
            "example.com",
        )
        .unwrap();
        assert_eq!(element.role, "Router");
    }

    #[test]
    fn test_default_site_is_cleared() {
        let element = parse_device(
            &device(json!({ "name": "r3", "site": { "id": 1, "name": "Default" } })),
            "example.com",
        )
        .unwrap();
        assert_eq!(element.site_name, "");
    }

    #[test]
    fn test_non_active_status_deactivates() {
        let element = parse_device(
            &device(json!({
                "name": "r4",
                "status": { "value": "offline", "label": "Offline" }
            })),
            "example.com",
        )
        .unwrap();
        assert!(!element.active);
    }
}
