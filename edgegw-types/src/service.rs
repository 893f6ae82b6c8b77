use serde::{Deserialize, Serialize};

use crate::{Document, GatewayIpsecVpnService, NatRuleType, Reference, XMLNS, is_false};

/// The network services of an edge gateway.
///
/// Every section is optional. A document sent to the `configureServices`
/// action only replaces the sections it contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EdgeGatewayServiceConfiguration {
    #[serde(rename = "@xmlns", skip_serializing_if = "String::is_empty")]
    pub xmlns: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_dhcp_service: Option<GatewayDhcpService>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_service: Option<FirewallService>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_service: Option<NatService>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_ipsec_vpn_service: Option<GatewayIpsecVpnService>,
}

impl Document for EdgeGatewayServiceConfiguration {
    const ROOT: &'static str = "EdgeGatewayServiceConfiguration";
}

impl EdgeGatewayServiceConfiguration {
    /// An empty document in the vCloud namespace.
    pub fn new() -> Self {
        Self {
            xmlns: XMLNS.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayDhcpService {
    pub is_enabled: bool,

    #[serde(rename = "Pool", skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<DhcpPoolService>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DhcpPoolService {
    #[serde(skip_serializing_if = "is_false")]
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_lease_time: Option<u32>,

    pub max_lease_time: u32,
    pub low_ip_address: String,
    pub high_ip_address: String,
}

impl DhcpPoolService {
    pub fn network_href(&self) -> &str {
        self.network.as_ref().map(|n| n.href.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NatService {
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub nat_type: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy: String,

    #[serde(rename = "NatRule", skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<NatRule>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_ip: String,
}

impl NatService {
    /// A copy of the service settings without any rules.
    pub fn without_rules(&self) -> Self {
        Self {
            is_enabled: self.is_enabled,
            nat_type: self.nat_type.clone(),
            policy: self.policy.clone(),
            rules: Vec::new(),
            external_ip: self.external_ip.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NatRule {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_type: String,

    #[serde(skip_serializing_if = "is_false")]
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_nat_rule: Option<GatewayNatRule>,
}

impl NatRule {
    pub fn is(&self, t: NatRuleType) -> bool {
        self.rule_type == t.as_str()
    }

    /// The gateway part of the rule, or an empty one.
    pub fn gateway(&self) -> GatewayNatRuleView<'_> {
        GatewayNatRuleView(self.gateway_nat_rule.as_ref())
    }
}

/// Field access on an optional [`GatewayNatRule`], with absent fields read
/// as empty strings.
#[derive(Debug, Clone, Copy)]
pub struct GatewayNatRuleView<'a>(Option<&'a GatewayNatRule>);

impl<'a> GatewayNatRuleView<'a> {
    pub fn interface_href(&self) -> &'a str {
        self.0
            .and_then(|g| g.interface.as_ref())
            .map(|i| i.href.as_str())
            .unwrap_or("")
    }

    pub fn original_ip(&self) -> &'a str {
        self.0.map(|g| g.original_ip.as_str()).unwrap_or("")
    }

    pub fn original_port(&self) -> &'a str {
        self.0.map(|g| g.original_port.as_str()).unwrap_or("")
    }

    pub fn translated_ip(&self) -> &'a str {
        self.0.map(|g| g.translated_ip.as_str()).unwrap_or("")
    }

    pub fn translated_port(&self) -> &'a str {
        self.0.map(|g| g.translated_port.as_str()).unwrap_or("")
    }

    pub fn protocol(&self) -> &'a str {
        self.0.map(|g| g.protocol.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayNatRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<Reference>,

    pub original_ip: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub original_port: String,

    pub translated_ip: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub translated_port: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub icmp_sub_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FirewallService {
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_action: String,

    pub log_default_action: bool,

    #[serde(rename = "FirewallRule", skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<FirewallRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FirewallRule {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub is_enabled: bool,
    pub match_on_translate: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<FirewallRuleProtocols>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub icmp_sub_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    pub destination_port_range: String,
    pub destination_ip: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<i32>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_port_range: String,

    pub source_ip: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,

    pub enable_logging: bool,
}

impl FirewallRule {
    /// Does this rule apply to any protocol?
    pub fn any_protocol(&self) -> bool {
        self.protocols.as_ref().is_some_and(|p| p.any)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FirewallRuleProtocols {
    #[serde(skip_serializing_if = "is_false")]
    pub icmp: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub any: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub tcp: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub udp: bool,
}

impl FirewallRuleProtocols {
    pub fn any() -> Self {
        Self {
            any: true,
            ..Self::default()
        }
    }
}
