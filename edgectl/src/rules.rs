use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use edgegw::types::{ANY, ANY_LOWER, FirewallPolicy, FirewallRule, FirewallRuleProtocols};
use serde::Deserialize;

/// A file of firewall rules.
///
/// ```toml
/// [[rule]]
/// description = "ssh"
/// policy = "allow"
/// protocol = "tcp"
/// destination_ip = "203.0.113.2"
/// destination_port = "22"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RulesFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    #[serde(default)]
    pub description: String,
    pub policy: String,
    #[serde(default = "any_lower")]
    pub protocol: String,
    #[serde(default = "any")]
    pub source_ip: String,
    #[serde(default = "any")]
    pub source_port: String,
    #[serde(default = "any")]
    pub destination_ip: String,
    #[serde(default = "any")]
    pub destination_port: String,
    #[serde(default)]
    pub logging: bool,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn any() -> String {
    ANY.to_string()
}

fn any_lower() -> String {
    ANY_LOWER.to_string()
}

fn enabled() -> bool {
    true
}

impl RulesFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Self::read_string(&s).with_context(|| format!("parsing {path:?}"))
    }

    pub fn read_string(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn into_rules(self) -> Result<Vec<FirewallRule>> {
        self.rules.into_iter().map(RuleEntry::into_rule).collect()
    }
}

impl RuleEntry {
    fn into_rule(self) -> Result<FirewallRule> {
        let policy: FirewallPolicy = self.policy.parse()?;
        let mut protocols = FirewallRuleProtocols::default();
        for p in self.protocol.split(',').map(str::trim) {
            match p.to_ascii_lowercase().as_str() {
                "any" => protocols.any = true,
                "tcp" => protocols.tcp = true,
                "udp" => protocols.udp = true,
                "icmp" => protocols.icmp = true,
                other => bail!("invalid protocol {other:?} in rule {:?}", self.description),
            }
        }
        Ok(FirewallRule {
            is_enabled: self.enabled,
            description: self.description,
            policy: policy.to_string(),
            protocols: Some(protocols),
            destination_port_range: self.destination_port,
            destination_ip: self.destination_ip,
            source_port_range: self.source_port,
            source_ip: self.source_ip,
            enable_logging: self.logging,
            ..FirewallRule::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RulesFile;

    #[test]
    fn parse_rules() {
        let rules = RulesFile::read_string(
            r#"
            [[rule]]
            description = "ssh"
            policy = "allow"
            protocol = "tcp"
            destination_ip = "203.0.113.2"
            destination_port = "22"

            [[rule]]
            policy = "deny"
            protocol = "tcp, udp"
            source_ip = "198.51.100.0/24"
            logging = true
            "#,
        )
        .unwrap()
        .into_rules()
        .unwrap();

        assert_eq!(2, rules.len());
        assert_eq!("allow", rules[0].policy);
        assert!(rules[0].protocols.unwrap().tcp);
        assert_eq!("Any", rules[0].source_ip);
        assert_eq!("22", rules[0].destination_port_range);
        assert!(rules[0].is_enabled);

        assert_eq!("drop", rules[1].policy);
        let p = rules[1].protocols.unwrap();
        assert!(p.tcp && p.udp && !p.any);
        assert!(rules[1].enable_logging);
    }

    #[test]
    fn reject_bad_rules() {
        let f = RulesFile::read_string("[[rule]]\npolicy = \"maybe\"\n").unwrap();
        assert!(f.into_rules().is_err());
        let f = RulesFile::read_string("[[rule]]\npolicy = \"allow\"\nprotocol = \"gre\"\n");
        assert!(f.unwrap().into_rules().is_err());
        assert!(RulesFile::read_string("[[rule]]\npolicy = \"allow\"\nport = 1\n").is_err());
    }
}
