use anyhow::{Context, Result};
use std::collections::HashSet;
use tokio::process::Command;

use crate::config::Config;
use crate::db::Store;
use crate::models::{Element, SyncSummary};
use crate::oxidized::OxidizedClient;
use crate::utils::{ifname_to_dns_label, strip_domain, strip_prefix_len};

use super::parser;
use super::records::RecordSet;

/// Stage A: one host record per element with a management address.
/// Host records are inserted first, so they win all later ties.
pub fn add_host_records(records: &mut RecordSet, elements: &[Element], default_domain: &str) {
    for element in elements {
        if element.ipv4_addr.is_empty() {
            continue;
        }
        let label = strip_domain(&element.hostname, default_domain);
        records.add_host(&label, strip_prefix_len(&element.ipv4_addr));
    }
}

/// Stage B: interface records from the element cache itself.
/// Returns the number of dropped conflicting records.
pub fn add_interface_records(records: &mut RecordSet, elements: &[Element]) -> usize {
    let mut conflicts = 0;
    for element in elements {
        for interface in &element.interfaces {
            if interface.ipv4_prefix.is_empty() {
                continue;
            }
            let label = ifname_to_dns_label(&element.hostname, &interface.name);
            if !records.add_interface(&label, "A", strip_prefix_len(&interface.ipv4_prefix)) {
                conflicts += 1;
            }
        }
    }
    conflicts
}

/// An element takes part in config parsing unless its backup flag is off or
/// its platform/model is on an ignore list.
fn backup_eligible(element: &Element, config: &Config) -> bool {
    if !element.backup_oxidized {
        return false;
    }
    if config.ignore_platforms.contains(&element.platform) {
        return false;
    }
    if config.ignore_models.contains(&element.model) {
        return false;
    }
    true
}

/// Stage C: parse the latest configuration backup of every eligible element.
/// A missing backup is a warning, not an error.
pub async fn parse_element_configs(
    records: &mut RecordSet,
    elements: &[Element],
    oxidized: &OxidizedClient,
    config: &Config,
) {
    for element in elements {
        if !backup_eligible(element, config) {
            continue;
        }
        match oxidized.get_element_config(&element.hostname).await {
            Ok(Some(conf)) => parser::parse(records, &element.hostname, &conf),
            Ok(None) => {
                tracing::warn!("Missing configuration backup for {}", element.hostname);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch configuration backup for {}: {}",
                    element.hostname,
                    e
                );
            }
        }
    }
}

fn record_line(label: &str, rtype: &str, value: &str) -> String {
    format!("{:<40}  {:<4}   {}\n", label, rtype, value)
}

/// Render the record set in the flat records-file format: host records with
/// forward and reverse entries, then interface records split by whether
/// their address duplicates a host address (those get no reverse entry).
pub fn build_records_file(records: &RecordSet, default_domain: &str) -> String {
    let mut out = String::new();
    out.push_str(";\n; Autogenerated from elements management address\n;\n");
    out.push_str(&format!("$DOMAIN {}\n", default_domain));

    let mut host_addrs: HashSet<&str> = HashSet::new();

    out.push_str(";\n; Forward entries, hostname\n;\n\n$FORWARD 1\n$REVERSE 1\n\n");
    for record in records.iter().filter(|r| r.host) {
        host_addrs.insert(record.value.as_str());
        out.push_str(&record_line(&record.label, record.rtype, &record.value));
    }

    // Interface addresses that duplicate a host address keep forward-only
    // entries, typically loopbacks that already have a hostname entry
    out.push_str(";\n; Forward entries, interfaces\n;\n\n$FORWARD 1\n$REVERSE 0\n\n");
    for record in records.iter().filter(|r| !r.host) {
        if host_addrs.contains(record.value.as_str()) {
            out.push_str(&record_line(&record.label, record.rtype, &record.value));
        }
    }

    out.push_str(";\n; Reverse entries, interfaces\n;\n\n$FORWARD 1\n$REVERSE 1\n\n;\n");
    for record in records.iter().filter(|r| !r.host) {
        if !host_addrs.contains(record.value.as_str()) {
            out.push_str(&record_line(&record.label, record.rtype, &record.value));
        }
    }

    out
}

/// Ask the nameserver manager to pick up the new records file.
/// Fire-and-forget: a failed reload is logged, never fatal.
async fn reload_nameserver(command: &str) {
    if command.is_empty() {
        tracing::info!("No DNS reload command configured, skipping reload");
        return;
    }

    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return;
    };

    match Command::new(program).args(parts).status().await {
        Ok(status) if status.success() => tracing::info!("Nameserver reload requested"),
        Ok(status) => tracing::warn!("Nameserver reload exited with {}", status),
        Err(e) => tracing::warn!("Failed to run nameserver reload command: {}", e),
    }
}

/// Build the full record set from the element cache and configuration
/// backups, write the records file and trigger a nameserver reload.
pub async fn run_pipeline(config: &Config, store: &Store) -> Result<SyncSummary> {
    let elements = store.list_elements(&config.default_domain).await?;
    let mut records = RecordSet::new();

    add_host_records(&mut records, &elements, &config.default_domain);
    let conflicts = add_interface_records(&mut records, &elements);

    if config.oxidized_url.is_empty() {
        tracing::info!("No backup service configured, skipping configuration parsing");
    } else {
        let oxidized = OxidizedClient::new(config.oxidized_url.clone())?;
        parse_element_configs(&mut records, &elements, &oxidized, config).await;
    }

    let contents = build_records_file(&records, &config.default_domain);
    tokio::fs::write(&config.records_file, contents)
        .await
        .with_context(|| format!("Failed to write {}", config.records_file))?;
    tracing::info!("Wrote {} DNS records to {}", records.len(), config.records_file);

    reload_nameserver(&config.dns_reload_command).await;

    Ok(SyncSummary {
        message: format!("Wrote {} DNS records", records.len()),
        records: records.len(),
        skipped: conflicts,
        ..Default::default()
    })
}
