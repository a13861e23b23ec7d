/// Qualify a hostname with the default domain when it has no domain part.
/// Hostnames are always stored lowercased and fully qualified.
pub fn qualify_hostname(hostname: &str, default_domain: &str) -> String {
    let hostname = hostname.trim().to_lowercase();
    if hostname.is_empty() || hostname.contains('.') {
        hostname
    } else {
        format!("{}.{}", hostname, default_domain)
    }
}

/// Strip the default domain suffix from a hostname, yielding the bare label
/// used as a DNS record key.
pub fn strip_domain(hostname: &str, default_domain: &str) -> String {
    let suffix = format!(".{}", default_domain);
    match hostname.strip_suffix(&suffix) {
        Some(bare) => bare.to_string(),
        None => hostname.to_string(),
    }
}

/// Split a comma-separated string into a trimmed, ordered list.
/// With `add_domain`, each entry without a dot is qualified with that domain.
pub fn commastr_to_list(value: &str, add_domain: Option<&str>) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match add_domain {
                Some(domain) if !entry.contains('.') && !entry.is_empty() => {
                    format!("{}.{}", entry, domain)
                }
                _ => entry.to_string(),
            }
        })
        .collect()
}

/// Derive the DNS label for an interface: first hostname label joined with the
/// lowercased interface name, slashes replaced with dashes and spaces removed.
/// "r1.example.com" + "Gi0/1" -> "r1.gi0-1"
pub fn ifname_to_dns_label(hostname: &str, ifname: &str) -> String {
    let host = hostname.split('.').next().unwrap_or(hostname);
    format!("{}.{}", host, ifname.to_lowercase())
        .replace('/', "-")
        .replace(' ', "")
}

/// Strip a trailing /prefixlen from an address string.
pub fn strip_prefix_len(addr: &str) -> &str {
    addr.split('/').next().unwrap_or(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_hostname() {
        assert_eq!(qualify_hostname("r1", "example.com"), "r1.example.com");
        assert_eq!(qualify_hostname("R1", "example.com"), "r1.example.com");
        assert_eq!(qualify_hostname("r1.other.net", "example.com"), "r1.other.net");
        assert_eq!(qualify_hostname("", "example.com"), "");
    }

    #[test]
    fn test_strip_domain() {
        assert_eq!(strip_domain("r1.example.com", "example.com"), "r1");
        assert_eq!(strip_domain("r1.other.net", "example.com"), "r1.other.net");
        assert_eq!(strip_domain("r1", "example.com"), "r1");
    }

    #[test]
    fn test_commastr_to_list() {
        assert_eq!(commastr_to_list("", None), Vec::<String>::new());
        assert_eq!(commastr_to_list("a, b ,c", None), vec!["a", "b", "c"]);
        assert_eq!(
            commastr_to_list("core1,dist2.other.net", Some("example.com")),
            vec!["core1.example.com", "dist2.other.net"]
        );
    }

    #[test]
    fn test_ifname_to_dns_label() {
        assert_eq!(ifname_to_dns_label("r1.example.com", "Gi0/1"), "r1.gi0-1");
        assert_eq!(ifname_to_dns_label("r1", "loopback0"), "r1.loopback0");
        assert_eq!(
            ifname_to_dns_label("sw2.example.com", "Vlan 100"),
            "sw2.vlan100"
        );
    }

    #[test]
    fn test_strip_prefix_len() {
        assert_eq!(strip_prefix_len("10.0.0.1/32"), "10.0.0.1");
        assert_eq!(strip_prefix_len("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_prefix_len("2001:db8::1/64"), "2001:db8::1");
    }
}
