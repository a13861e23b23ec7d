use serde::Deserialize;
use std::collections::HashMap;

// --- NetBox API types ---

#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NestedRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChoice {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NbDeviceType {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub manufacturer: Option<NestedRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NbIPAddress {
    #[serde(default)]
    pub address: String,
}

/// Tags arrive as objects on current NetBox and as plain strings on
/// older releases — accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NbTag {
    Name(String),
    Ref(NestedRef),
}

impl NbTag {
    pub fn name(&self) -> &str {
        match self {
            NbTag::Name(name) => name,
            NbTag::Ref(tag) => &tag.name,
        }
    }
}

/// A device or virtual machine as returned by the NetBox API.
/// Every nested field is optional; normalization fills defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NbDevice {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_type: Option<NbDeviceType>,
    #[serde(default)]
    pub role: Option<NestedRef>,
    /// Legacy name for `role`, still emitted by older NetBox versions
    #[serde(default)]
    pub device_role: Option<NestedRef>,
    #[serde(default)]
    pub site: Option<NestedRef>,
    #[serde(default)]
    pub platform: Option<NestedRef>,
    #[serde(default)]
    pub primary_ip4: Option<NbIPAddress>,
    #[serde(default)]
    pub status: Option<StatusChoice>,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub tags: Vec<NbTag>,
    #[serde(default)]
    pub custom_fields: HashMap<String, serde_json::Value>,
}
