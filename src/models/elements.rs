use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Provenance tags partitioning cache rows by upstream source
pub mod source {
    pub const NETBOX: &str = "netbox";
    pub const BECS: &str = "becs";
}

/// Canonical network element record, merged from NetBox and BECS.
/// Every field has a defined default so a partially-populated upstream
/// record always normalizes to a fully-populated element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub hostname: String,
    pub manufacturer: String,
    pub model: String,
    pub comments: String,
    pub tags: Vec<String>,
    pub parents: Vec<String>,
    pub role: String,
    pub site_name: String,
    pub platform: String,
    pub ipv4_addr: String,
    pub ipv6_addr: String,
    pub active: bool,
    pub alarm_timeperiod: String,
    pub alarm_destination: Vec<String>,
    pub connection_method: String,
    pub monitor_icinga: bool,
    pub monitor_librenms: bool,
    pub backup_oxidized: bool,
    /// Interfaces in insertion order, serialized as a name-keyed map
    #[serde(serialize_with = "serialize_interfaces")]
    pub interfaces: Vec<Interface>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            comments: String::new(),
            tags: Vec::new(),
            parents: Vec::new(),
            role: String::new(),
            site_name: String::new(),
            platform: String::new(),
            ipv4_addr: String::new(),
            ipv6_addr: String::new(),
            active: true,
            alarm_timeperiod: String::new(),
            alarm_destination: Vec::new(),
            connection_method: "ssh".to_string(),
            monitor_icinga: true,
            monitor_librenms: true,
            backup_oxidized: true,
            interfaces: Vec::new(),
        }
    }
}

/// An interface owned by an element, referenced by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub name: String,
    pub role: String,
    pub ipv4_prefix: String,
    pub ipv6_prefix: String,
    pub active: bool,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            ipv4_prefix: String::new(),
            ipv6_prefix: String::new(),
            active: true,
        }
    }
}

fn serialize_interfaces<S>(interfaces: &[Interface], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(interfaces.len()))?;
    for interface in interfaces {
        map.serialize_entry(&interface.name, interface)?;
    }
    map.end()
}
