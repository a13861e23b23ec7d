/// One object from a BECS objectTreeFind response. The tree is flat on the
/// wire: interfaces reference their element and resource-inet entries
/// reference their interface through `parentoid`.
#[derive(Debug, Clone, Default)]
pub struct BecsObject {
    pub oid: i64,
    pub parentoid: i64,
    pub class: String,
    pub name: String,
    pub elementtype: String,
    pub flags: Option<String>,
    pub role: String,
    pub alarm_timeperiod: String,
    pub alarm_destination: String,
    /// Address of a nested resource-inet entry
    pub address: String,
    /// Prefix length of a nested resource-inet entry
    pub prefixlen: Option<i64>,
}

impl BecsObject {
    /// Absent flags mean active; a "disable" token deactivates
    pub fn active(&self) -> bool {
        match &self.flags {
            None => true,
            Some(flags) => !flags.contains("disable"),
        }
    }

    /// Address/prefixlen of a resource-inet object, when present
    pub fn prefix(&self) -> Option<String> {
        if self.address.is_empty() {
            return None;
        }
        match self.prefixlen {
            Some(len) => Some(format!("{}/{}", self.address, len)),
            None => Some(self.address.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_from_flags() {
        let mut object = BecsObject::default();
        assert!(object.active());
        object.flags = Some("locked".to_string());
        assert!(object.active());
        object.flags = Some("disable,locked".to_string());
        assert!(!object.active());
    }

    #[test]
    fn test_prefix() {
        let mut object = BecsObject::default();
        assert_eq!(object.prefix(), None);
        object.address = "10.1.2.3".to_string();
        assert_eq!(object.prefix().as_deref(), Some("10.1.2.3"));
        object.prefixlen = Some(32);
        assert_eq!(object.prefix().as_deref(), Some("10.1.2.3/32"));
    }
}
