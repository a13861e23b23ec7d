use std::collections::btree_map::Values;
use std::collections::BTreeMap;

/// A derived DNS record, keyed by its label. Never persisted — the record
/// set is rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct DnsRecord {
    pub label: String,
    pub rtype: &'static str,
    pub value: String,
    /// true for a device's own management address, false for a record
    /// derived from an interface
    pub host: bool,
}

/// Label-keyed record set. The first writer for a label always wins; the
/// three insertion paths differ only in how loudly a collision is reported.
#[derive(Debug, Default)]
pub struct RecordSet {
    records: BTreeMap<String, DnsRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<&DnsRecord> {
        self.records.get(label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> Values<'_, String, DnsRecord> {
        self.records.values()
    }

    /// Host record from an element's management address. Host records are
    /// inserted first and are authoritative, so an already-taken label is
    /// skipped without noise.
    pub fn add_host(&mut self, label: &str, value: &str) {
        if self.contains(label) {
            return;
        }
        self.insert(label, "A", value, true);
    }

    /// Interface record from API-sourced element data. A collision here
    /// means two authoritative records disagree: logged and dropped.
    pub fn add_interface(&mut self, label: &str, rtype: &'static str, value: &str) -> bool {
        if self.contains(label) {
            tracing::warn!("Name conflict, record '{}' already exists", label);
            return false;
        }
        self.insert(label, rtype, value, false);
        true
    }

    /// Record from a parsed configuration backup. API records were inserted
    /// earlier and win quietly; the first parsed occurrence of a label wins
    /// over later ones.
    pub fn add_parsed(&mut self, label: &str, rtype: &'static str, value: &str) -> bool {
        if self.contains(label) {
            tracing::debug!("Label '{}' already present, keeping earlier record", label);
            return false;
        }
        self.insert(label, rtype, value, false);
        true
    }

    fn insert(&mut self, label: &str, rtype: &'static str, value: &str, host: bool) {
        self.records.insert(
            label.to_string(),
            DnsRecord {
                label: label.to_string(),
                rtype,
                value: value.to_string(),
                host,
            },
        );
    }
}
