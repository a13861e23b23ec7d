use std::net::{Ipv4Addr, Ipv6Addr};

use crate::utils::{ifname_to_dns_label, strip_prefix_len};

use super::records::RecordSet;

/// Extract interface addresses from a router/switch configuration dump.
/// Handles different vendor dialects (cisco, huawei, ...) by recognizing a
/// small set of literal statement prefixes; unrecognized lines are ignored.
///
/// Records merge into the caller-supplied set, so label uniqueness holds
/// across a whole batch of configurations.
pub fn parse(records: &mut RecordSet, hostname: &str, conf: &str) {
    let lines: Vec<&str> = conf.lines().collect();
    let mut ix = 0;

    while ix < lines.len() {
        let line = lines[ix];
        ix += 1;

        let Some(ifname) = line.strip_prefix("interface ") else {
            continue;
        };
        let label = ifname_to_dns_label(hostname, ifname);

        // Scan this interface's config block until a blank line or comment
        while ix < lines.len() {
            let line = lines[ix].trim_end();
            ix += 1;
            if line.is_empty() || line.starts_with('!') || line.starts_with('#') {
                break;
            }

            let line = line.trim_start();
            if let Some(rest) = line
                .strip_prefix("ip address ")
                .or_else(|| line.strip_prefix("ipv4 address "))
            {
                let addr = rest.split_whitespace().next().unwrap_or("");
                if addr.parse::<Ipv4Addr>().is_ok() {
                    records.add_parsed(&label, "A", addr);
                } else {
                    tracing::warn!("hostname '{}', ipv4_addr '{}' incorrect", label, addr);
                }
            } else if let Some(rest) = line.strip_prefix("ipv6 address ") {
                let addr = strip_prefix_len(rest.split_whitespace().next().unwrap_or(""));
                if addr.parse::<Ipv6Addr>().is_ok() {
                    records.add_parsed(&label, "AAAA", addr);
                } else {
                    tracing::warn!("hostname '{}', ipv6_addr '{}' incorrect", label, addr);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_interface_address() {
        let mut records = RecordSet::new();
        let conf = "interface Gi0/1\nip address 10.0.0.1 255.255.255.0\n!\n";
        parse(&mut records, "r1.example.com", conf);

        assert_eq!(records.len(), 1);
        let record = records.get("r1.gi0-1").unwrap();
        assert_eq!(record.rtype, "A");
        assert_eq!(record.value, "10.0.0.1");
        assert!(!record.host);
    }

    #[test]
    fn test_invalid_literal_is_discarded() {
        let mut records = RecordSet::new();
        parse(
            &mut records,
            "r1.example.com",
            "interface Gi0/1\nip address 999.1.1.1 255.255.255.0\n!\n",
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_ipv6_address_strips_prefix_length() {
        let mut records = RecordSet::new();
        parse(
            &mut records,
            "r1.example.com",
            "interface Vlan10\nipv6 address 2001:db8::1/64\n!\n",
        );
        let record = records.get("r1.vlan10").unwrap();
        assert_eq!(record.rtype, "AAAA");
        assert_eq!(record.value, "2001:db8::1");
    }

    #[test]
    fn test_huawei_style_ipv4_statement() {
        let mut records = RecordSet::new();
        parse(
            &mut records,
            "sw1.example.com",
            "interface GigabitEthernet0/0/1\n ipv4 address 192.0.2.1 255.255.255.252\n#\n",
        );
        assert_eq!(records.get("sw1.gigabitethernet0-0-1").unwrap().value, "192.0.2.1");
    }

    #[test]
    fn test_blank_line_closes_interface_context() {
        let mut records = RecordSet::new();
        let conf = "interface Gi0/1\ndescription uplink\n\nip address 10.0.0.1 255.255.255.0\n";
        parse(&mut records, "r1.example.com", conf);
        // The address statement sits outside any interface block
        assert!(records.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_across_configs() {
        let mut records = RecordSet::new();
        parse(
            &mut records,
            "r1.example.com",
            "interface lo0\nip address 10.0.0.1 255.255.255.255\n!\n",
        );
        parse(
            &mut records,
            "r1.example.com",
            "interface lo0\nip address 10.9.9.9 255.255.255.255\n!\n",
        );
        assert_eq!(records.get("r1.lo0").unwrap().value, "10.0.0.1");
    }

    #[test]
    fn test_unrecognized_dialect_lines_are_ignored() {
        let mut records = RecordSet::new();
        let conf = "version 15.2\nhostname r1\ninterface Gi0/2\n switchport mode access\n spanning-tree portfast\n!\nend\n";
        parse(&mut records, "r1.example.com", conf);
        assert!(records.is_empty());
    }
}
