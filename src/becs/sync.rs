use anyhow::Result;
use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::db::Store;
use crate::models::{source, Element, Interface, SyncSummary};
use crate::utils::{commastr_to_list, qualify_hostname, strip_prefix_len};

use super::client::BecsClient;
use super::types::BecsObject;

/// Convert the interface objects of one element tree, pairing each
/// interface with the address of its resource-inet child.
fn collect_interfaces(objects: &[BecsObject]) -> Vec<Interface> {
    objects
        .iter()
        .filter(|o| o.class == "interface")
        .map(|iface| {
            let prefix = objects
                .iter()
                .find(|r| r.class == "resource-inet" && r.parentoid == iface.oid)
                .and_then(|r| r.prefix());
            Interface {
                name: iface.name.clone(),
                role: iface.role.clone(),
                ipv4_prefix: prefix.unwrap_or_default(),
                ipv6_prefix: String::new(),
                active: iface.active(),
            }
        })
        .collect()
}

/// Ancestor element names, nearest first, domain-qualified
fn parent_chain(
    object: &BecsObject,
    by_oid: &HashMap<i64, &BecsObject>,
    default_domain: &str,
) -> Vec<String> {
    let mut parents = Vec::new();
    let mut seen = HashSet::new();
    let mut oid = object.parentoid;

    while let Some(parent) = by_oid.get(&oid) {
        if !seen.insert(oid) {
            break;
        }
        if !parent.name.is_empty() {
            parents.push(qualify_hostname(&parent.name, default_domain));
        }
        oid = parent.parentoid;
    }
    parents
}

/// Normalize one BECS element into a canonical element.
/// The management address comes from the loopback0 prefix when present,
/// else the first interface with any address; an element with no resolvable
/// address is skipped entirely.
pub fn build_element(
    object: &BecsObject,
    interfaces: Vec<Interface>,
    parents: Vec<String>,
    default_domain: &str,
) -> Option<Element> {
    let mut mgmt = interfaces
        .iter()
        .find(|i| i.name == "loopback0" && !i.ipv4_prefix.is_empty())
        .map(|i| i.ipv4_prefix.clone());

    if mgmt.is_none() {
        if let Some(interface) = interfaces.iter().find(|i| !i.ipv4_prefix.is_empty()) {
            tracing::info!(
                "No loopback address on {}, using interface {} ({})",
                object.name,
                interface.name,
                interface.ipv4_prefix
            );
            mgmt = Some(interface.ipv4_prefix.clone());
        }
    }

    let ipv4_addr = match mgmt {
        Some(addr) => strip_prefix_len(&addr).to_string(),
        None => {
            tracing::info!("No management ip address found, ignoring {}", object.name);
            return None;
        }
    };

    Some(Element {
        hostname: qualify_hostname(&object.name, default_domain),
        manufacturer: "Waystream".to_string(),
        role: "Access nod".to_string(),
        platform: object.elementtype.clone(),
        ipv4_addr,
        active: object.active(),
        alarm_timeperiod: object.alarm_timeperiod.clone(),
        alarm_destination: commastr_to_list(&object.alarm_destination, None),
        connection_method: "telnet".to_string(),
        backup_oxidized: false,
        parents,
        interfaces,
        ..Default::default()
    })
}

/// Fetch all elements of the configured type from BECS, normalize them and
/// replace the becs-tagged rows in the cache.
pub async fn run_sync(config: &Config, store: &Store) -> Result<SyncSummary> {
    let mut client = BecsClient::new(config.becs_url.clone())?;
    client.login(&config.becs_username, &config.becs_password).await?;

    let result = sync_elements(config, store, &client).await;

    if let Err(e) = client.logout().await {
        tracing::warn!("BECS logout failed: {}", e);
    }
    result
}

async fn sync_elements(config: &Config, store: &Store, client: &BecsClient) -> Result<SyncSummary> {
    tracing::info!("Fetching elements from BECS");
    let objects = client.get_elements().await?;
    let by_oid: HashMap<i64, &BecsObject> = objects.iter().map(|o| (o.oid, o)).collect();

    let mut elements = Vec::new();
    let mut interface_count = 0usize;
    let mut skipped = 0usize;

    for object in &objects {
        if object.elementtype != config.becs_element_type {
            continue;
        }

        let tree = client.get_element_tree(object.oid).await?;
        let interfaces = collect_interfaces(&tree);
        let parents = parent_chain(object, &by_oid, &config.default_domain);

        match build_element(object, interfaces, parents, &config.default_domain) {
            Some(element) => {
                interface_count += element.interfaces.len();
                elements.push(element);
            }
            None => skipped += 1,
        }
    }

    store.replace_elements(source::BECS, &elements).await?;
    tracing::info!(
        "Stored {} elements with {} interfaces from BECS ({} skipped)",
        elements.len(),
        interface_count,
        skipped
    );

    Ok(SyncSummary {
        message: format!("Synced {} elements from BECS", elements.len()),
        elements: elements.len(),
        interfaces: interface_count,
        skipped,
        ..Default::default()
    })
}
