//! Replacement rules for retired SMIv1 module names.

/// Which imported symbols a rule applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompatTag {
    /// Exactly this symbol.
    Exact(String),
    /// Any symbol starting with this text.
    Prefix(String),
}

impl CompatTag {
    #[must_use]
    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            Self::Exact(tag) => symbol == tag,
            Self::Prefix(tag) => symbol.starts_with(tag.as_str()),
        }
    }
}

/// `old` is served by `replacement`, optionally only for some symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatRule {
    pub old: String,
    pub replacement: String,
    pub tag: Option<CompatTag>,
}

impl CompatRule {
    #[must_use]
    pub fn new(old: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            replacement: replacement.into(),
            tag: None,
        }
    }

    #[must_use]
    pub fn exact(mut self, symbol: impl Into<String>) -> Self {
        self.tag = Some(CompatTag::Exact(symbol.into()));
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag = Some(CompatTag::Prefix(prefix.into()));
        self
    }

    /// Whether importing `symbol` from `module` should use this rule.
    #[must_use]
    pub fn applies(&self, module: &str, symbol: &str) -> bool {
        self.old == module && self.tag.as_ref().map_or(true, |tag| tag.matches(symbol))
    }
}

/// Seed list of well-known renames.
#[must_use]
pub fn default_rules() -> Vec<CompatRule> {
    vec![
        CompatRule::new("RFC1065-SMI", "RFC1155-SMI"),
        CompatRule::new("RFC1066-MIB", "RFC1156-MIB"),
        CompatRule::new("RFC1156-MIB", "RFC1158-MIB"),
        CompatRule::new("RFC1158-MIB", "RFC1213-MIB"),
        CompatRule::new("RFC1155-SMI", "SNMPv2-SMI"),
        CompatRule::new("RFC1213-MIB", "SNMPv2-SMI").exact("mib-2"),
        CompatRule::new("RFC1213-MIB", "SNMPv2-MIB").prefix("sys"),
        CompatRule::new("RFC1213-MIB", "IF-MIB").prefix("if"),
        CompatRule::new("RFC1213-MIB", "IP-MIB").prefix("ip"),
        CompatRule::new("RFC1213-MIB", "IP-MIB").prefix("icmp"),
        CompatRule::new("RFC1213-MIB", "TCP-MIB").prefix("tcp"),
        CompatRule::new("RFC1213-MIB", "UDP-MIB").prefix("udp"),
        CompatRule::new("RFC1213-MIB", "SNMPv2-SMI").exact("transmission"),
        CompatRule::new("RFC1213-MIB", "SNMPv2-MIB").prefix("snmp"),
        CompatRule::new("RFC1231-MIB", "TOKENRING-MIB"),
        CompatRule::new("RFC1271-MIB", "RMON-MIB"),
        CompatRule::new("RFC1286-MIB", "SOURCE-ROUTING-MIB").prefix("dot1dSr"),
        CompatRule::new("RFC1286-MIB", "BRIDGE-MIB"),
        CompatRule::new("RFC1315-MIB", "FRAME-RELAY-DTE-MIB"),
        CompatRule::new("RFC1316-MIB", "CHARACTER-MIB"),
        CompatRule::new("RFC1406-MIB", "DS1-MIB"),
        CompatRule::new("RFC-1213", "RFC1213-MIB"),
    ]
}
