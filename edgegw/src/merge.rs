//! Computing new service configurations from existing ones.
//!
//! The API does not give rules a usable identity, so whether an existing
//! rule is "the same" as a requested one is decided structurally, by
//! comparing a fixed set of fields. Every such comparison is one of the
//! predicates below. Entries that survive a merge keep their order, new
//! entries are appended.

use bon::Builder;
use edgegw_types::{ANY, ANY_LOWER, XMLNS};
use edgegw_types::{DhcpPoolService, EdgeGatewayServiceConfiguration, GatewayDhcpService};
use edgegw_types::{FirewallPolicy, FirewallRule, FirewallRuleProtocols, FirewallService};
use edgegw_types::{GatewayNatRule, NatRule, NatRuleType, NatService, Reference};

pub const DEFAULT_LEASE_TIME: u32 = 3600;
pub const MAX_LEASE_TIME: u32 = 7200;

/// A configuration document to submit.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceUpdate {
    /// Replace a single section. All other sections are left untouched by
    /// the server.
    Partial(Section),
    /// Replace every section contained in the document.
    Full(EdgeGatewayServiceConfiguration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Dhcp(GatewayDhcpService),
    Nat(NatService),
    Firewall(FirewallService),
}

impl ServiceUpdate {
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }

    pub fn into_document(self) -> EdgeGatewayServiceConfiguration {
        match self {
            Self::Partial(s) => {
                let mut d = EdgeGatewayServiceConfiguration::new();
                match s {
                    Section::Dhcp(x) => d.gateway_dhcp_service = Some(x),
                    Section::Nat(x) => d.nat_service = Some(x),
                    Section::Firewall(x) => d.firewall_service = Some(x),
                }
                d
            }
            Self::Full(mut d) => {
                d.xmlns = XMLNS.to_string();
                d
            }
        }
    }

    /// Write the accepted update back into a local configuration.
    ///
    /// Sections absent from the update are left as they are.
    pub fn apply_to(&self, c: &mut EdgeGatewayServiceConfiguration) {
        match self {
            Self::Partial(Section::Dhcp(x)) => c.gateway_dhcp_service = Some(x.clone()),
            Self::Partial(Section::Nat(x)) => c.nat_service = Some(x.clone()),
            Self::Partial(Section::Firewall(x)) => c.firewall_service = Some(x.clone()),
            Self::Full(d) => {
                if let Some(x) = &d.gateway_dhcp_service {
                    c.gateway_dhcp_service = Some(x.clone())
                }
                if let Some(x) = &d.firewall_service {
                    c.firewall_service = Some(x.clone())
                }
                if let Some(x) = &d.nat_service {
                    c.nat_service = Some(x.clone())
                }
                if let Some(x) = &d.gateway_ipsec_vpn_service {
                    c.gateway_ipsec_vpn_service = Some(x.clone())
                }
            }
        }
    }
}

/// A DHCP address pool to add.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct DhcpPool {
    #[builder(into)]
    pub start_address: String,
    #[builder(into)]
    pub end_address: String,
    /// Defaults to [`DEFAULT_LEASE_TIME`].
    pub default_lease_time: Option<u32>,
    /// Defaults to [`MAX_LEASE_TIME`].
    pub max_lease_time: Option<u32>,
}

/// A NAT port mapping between an external and an internal endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub rule_type: NatRuleType,
    pub external_ip: String,
    pub external_port: String,
    pub internal_ip: String,
    pub internal_port: String,
}

impl PortMapping {
    pub fn new<A, B, C, D>(t: NatRuleType, ext_ip: A, ext_port: B, int_ip: C, int_port: D) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
        D: Into<String>,
    {
        Self {
            rule_type: t,
            external_ip: ext_ip.into(),
            external_port: ext_port.into(),
            internal_ip: int_ip.into(),
            internal_port: int_port.into(),
        }
    }

    /// A mapping using the same port on both sides.
    pub fn single_port<A, B, C>(t: NatRuleType, ext_ip: A, int_ip: B, port: C) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        let port = port.into();
        Self::new(t, ext_ip, port.clone(), int_ip, port)
    }
}

// Predicates ////////////////////////////////////////////////////////////////

pub fn pool_on_network(pool: &DhcpPoolService, network: &Reference) -> bool {
    pool.network_href() == network.href
}

/// Matches on rule type, original endpoint and interface.
///
/// The translated endpoint is ignored, so this may match several rules.
pub fn same_endpoint(rule: &NatRule, m: &PortMapping, interface: &str) -> bool {
    let g = rule.gateway();
    rule.is(m.rule_type)
        && g.original_ip() == m.external_ip
        && g.original_port() == m.external_port
        && g.interface_href() == interface
}

/// Matches on rule type, original and translated endpoints and interface.
pub fn same_mapping(rule: &NatRule, m: &PortMapping, interface: &str) -> bool {
    let g = rule.gateway();
    same_endpoint(rule, m, interface)
        && g.translated_ip() == m.internal_ip
        && g.translated_port() == m.internal_port
}

/// The DNAT half of a 1:1 mapping.
pub fn one_to_one_dnat(rule: &NatRule, internal: &str, external: &str, uplink: &str) -> bool {
    let g = rule.gateway();
    rule.is(NatRuleType::Dnat)
        && g.original_ip() == external
        && g.translated_ip() == internal
        && g.original_port() == ANY_LOWER
        && g.translated_port() == ANY_LOWER
        && g.protocol() == ANY_LOWER
        && g.interface_href() == uplink
}

/// The SNAT half of a 1:1 mapping.
pub fn one_to_one_snat(rule: &NatRule, internal: &str, external: &str, uplink: &str) -> bool {
    let g = rule.gateway();
    rule.is(NatRuleType::Snat)
        && g.original_ip() == internal
        && g.translated_ip() == external
        && g.interface_href() == uplink
}

fn allow_any(rule: &FirewallRule) -> bool {
    rule.policy == FirewallPolicy::Allow.as_str()
        && rule.any_protocol()
        && rule.destination_port_range == ANY
        && rule.source_port_range == ANY
}

/// Allow everything from anywhere to `external`.
pub fn inbound_allow_any(rule: &FirewallRule, external: &str) -> bool {
    allow_any(rule) && rule.source_ip == ANY && rule.destination_ip == external
}

/// Allow everything from `internal` to anywhere.
pub fn outbound_allow_any(rule: &FirewallRule, internal: &str) -> bool {
    allow_any(rule) && rule.source_ip == internal && rule.destination_ip == ANY
}

// Merges ////////////////////////////////////////////////////////////////////

/// Replace all pools of `network` with `pools`.
pub fn dhcp_service(
    existing: Option<&GatewayDhcpService>,
    network: &Reference,
    pools: &[DhcpPool],
) -> GatewayDhcpService {
    let mut service = match existing {
        None => GatewayDhcpService {
            is_enabled: true,
            pools: Vec::new(),
        },
        Some(s) => GatewayDhcpService {
            is_enabled: s.is_enabled,
            pools: s
                .pools
                .iter()
                .filter(|p| !pool_on_network(p, network))
                .cloned()
                .collect(),
        },
    };
    service.pools.extend(pools.iter().map(|p| DhcpPoolService {
        is_enabled: true,
        network: Some(Reference::new(&network.href).with_name(&network.name)),
        default_lease_time: Some(p.default_lease_time.unwrap_or(DEFAULT_LEASE_TIME)),
        max_lease_time: p.max_lease_time.unwrap_or(MAX_LEASE_TIME),
        low_ip_address: p.start_address.clone(),
        high_ip_address: p.end_address.clone(),
    }));
    service
}

/// Add a TCP rule for `m` on `interface`, replacing an identical one.
pub fn add_nat_rule(existing: Option<&NatService>, m: &PortMapping, interface: &str) -> NatService {
    let mut service = match existing {
        None => NatService {
            is_enabled: true,
            ..NatService::default()
        },
        Some(s) => {
            let mut n = s.without_rules();
            n.rules = s
                .rules
                .iter()
                .filter(|r| !same_mapping(r, m, interface))
                .cloned()
                .collect();
            n
        }
    };
    service.rules.push(NatRule {
        rule_type: m.rule_type.to_string(),
        is_enabled: true,
        gateway_nat_rule: Some(GatewayNatRule {
            interface: Some(Reference::new(interface)),
            original_ip: m.external_ip.clone(),
            original_port: m.external_port.clone(),
            translated_ip: m.internal_ip.clone(),
            translated_port: m.internal_port.clone(),
            protocol: "tcp".to_string(),
            ..GatewayNatRule::default()
        }),
        ..NatRule::default()
    });
    service
}

/// Remove every rule with the original endpoint of `m` on `interface`.
pub fn remove_nat_rules(existing: &NatService, m: &PortMapping, interface: &str) -> NatService {
    let mut n = existing.without_rules();
    n.rules = existing
        .rules
        .iter()
        .filter(|r| !same_endpoint(r, m, interface))
        .cloned()
        .collect();
    n
}

/// A firewall with exactly the given rules.
pub fn firewall_service(default_action: FirewallPolicy, rules: Vec<FirewallRule>) -> FirewallService {
    FirewallService {
        is_enabled: true,
        default_action: default_action.to_string(),
        log_default_action: true,
        rules,
    }
}

/// Append the NAT and firewall rules of a 1:1 mapping.
pub fn add_one_to_one(
    c: &mut EdgeGatewayServiceConfiguration,
    internal: &str,
    external: &str,
    description: &str,
    uplink: &str,
) {
    let nat = c.nat_service.get_or_insert_with(|| NatService {
        is_enabled: true,
        ..NatService::default()
    });

    nat.rules.push(NatRule {
        description: description.to_string(),
        rule_type: NatRuleType::Snat.to_string(),
        is_enabled: true,
        gateway_nat_rule: Some(GatewayNatRule {
            interface: Some(Reference::new(uplink)),
            original_ip: internal.to_string(),
            translated_ip: external.to_string(),
            protocol: ANY_LOWER.to_string(),
            ..GatewayNatRule::default()
        }),
        ..NatRule::default()
    });

    nat.rules.push(NatRule {
        description: description.to_string(),
        rule_type: NatRuleType::Dnat.to_string(),
        is_enabled: true,
        gateway_nat_rule: Some(GatewayNatRule {
            interface: Some(Reference::new(uplink)),
            original_ip: external.to_string(),
            original_port: ANY_LOWER.to_string(),
            translated_ip: internal.to_string(),
            translated_port: ANY_LOWER.to_string(),
            protocol: ANY_LOWER.to_string(),
            ..GatewayNatRule::default()
        }),
        ..NatRule::default()
    });

    let fw = c.firewall_service.get_or_insert_with(|| FirewallService {
        is_enabled: true,
        default_action: FirewallPolicy::Drop.to_string(),
        ..FirewallService::default()
    });

    fw.rules.push(allow_any_rule(description, ANY, external));
    fw.rules.push(allow_any_rule(description, internal, ANY));
}

fn allow_any_rule(description: &str, source: &str, destination: &str) -> FirewallRule {
    FirewallRule {
        description: description.to_string(),
        is_enabled: true,
        policy: FirewallPolicy::Allow.to_string(),
        protocols: Some(FirewallRuleProtocols::any()),
        destination_port_range: ANY.to_string(),
        destination_ip: destination.to_string(),
        source_port_range: ANY.to_string(),
        source_ip: source.to_string(),
        enable_logging: false,
        ..FirewallRule::default()
    }
}

/// Remove the NAT and firewall rules of a 1:1 mapping.
///
/// The NAT service is enabled afterwards, whatever its previous state.
pub fn remove_one_to_one(
    c: &mut EdgeGatewayServiceConfiguration,
    internal: &str,
    external: &str,
    uplink: &str,
) {
    if let Some(nat) = &mut c.nat_service {
        nat.rules.retain(|r| {
            !one_to_one_dnat(r, internal, external, uplink)
                && !one_to_one_snat(r, internal, external, uplink)
        });
        nat.is_enabled = true
    }
    if let Some(fw) = &mut c.firewall_service {
        fw.rules
            .retain(|r| !inbound_allow_any(r, external) && !outbound_allow_any(r, internal));
    }
}

#[cfg(test)]
mod tests {
    use edgegw_types::{
        DhcpPoolService, EdgeGatewayServiceConfiguration, FirewallPolicy, FirewallRule,
        FirewallRuleProtocols, FirewallService, GatewayDhcpService, GatewayNatRule, NatRule,
        NatRuleType, NatService, Reference, XMLNS,
    };
    use quickcheck::{Arbitrary, Gen, quickcheck};

    use super::*;

    const UPLINK: &str = "https://vca.example.com/api/admin/network/ext";
    const OTHER: &str = "https://vca.example.com/api/admin/network/other";

    fn pool(net: &str, low: &str) -> DhcpPoolService {
        DhcpPoolService {
            is_enabled: true,
            network: Some(Reference::new(net)),
            default_lease_time: Some(60),
            max_lease_time: 120,
            low_ip_address: low.into(),
            high_ip_address: "10.0.0.200".into(),
        }
    }

    fn rule(t: NatRuleType, oip: &str, oport: &str, tip: &str, tport: &str, ifc: &str) -> NatRule {
        NatRule {
            rule_type: t.to_string(),
            is_enabled: true,
            gateway_nat_rule: Some(GatewayNatRule {
                interface: Some(Reference::new(ifc)),
                original_ip: oip.into(),
                original_port: oport.into(),
                translated_ip: tip.into(),
                translated_port: tport.into(),
                protocol: "tcp".into(),
                ..GatewayNatRule::default()
            }),
            ..NatRule::default()
        }
    }

    fn nat(rules: Vec<NatRule>) -> NatService {
        NatService {
            is_enabled: false,
            nat_type: "ipTranslation".into(),
            policy: "allowTraffic".into(),
            rules,
            external_ip: "203.0.113.2".into(),
        }
    }

    #[test]
    fn dhcp_replaces_pools_of_network() {
        let net = Reference::new("net-a").with_name("a");
        let existing = GatewayDhcpService {
            is_enabled: false,
            pools: vec![
                pool("net-b", "10.1.0.1"),
                pool("net-a", "10.0.0.1"),
                pool("net-c", "10.2.0.1"),
                pool("net-a", "10.0.0.101"),
            ],
        };
        let new = [
            DhcpPool::builder()
                .start_address("10.0.0.10")
                .end_address("10.0.0.20")
                .build(),
            DhcpPool::builder()
                .start_address("10.0.0.30")
                .end_address("10.0.0.40")
                .default_lease_time(100)
                .max_lease_time(200)
                .build(),
        ];
        let s = dhcp_service(Some(&existing), &net, &new);
        assert!(!s.is_enabled);
        let lows: Vec<_> = s.pools.iter().map(|p| p.low_ip_address.as_str()).collect();
        assert_eq!(vec!["10.1.0.1", "10.2.0.1", "10.0.0.10", "10.0.0.30"], lows);
        assert_eq!(existing.pools[0], s.pools[0]);
        assert_eq!(existing.pools[2], s.pools[1]);

        let added = &s.pools[2];
        assert!(added.is_enabled);
        assert_eq!(Some(&net), added.network.as_ref());
        assert_eq!(Some(DEFAULT_LEASE_TIME), added.default_lease_time);
        assert_eq!(MAX_LEASE_TIME, added.max_lease_time);
        assert_eq!(Some(100), s.pools[3].default_lease_time);
        assert_eq!(200, s.pools[3].max_lease_time);
    }

    #[test]
    fn dhcp_default_lease_times() {
        let net = Reference::new("net-a");
        let p = DhcpPool::builder()
            .start_address("10.0.0.10")
            .end_address("10.0.0.20")
            .build();
        let s = dhcp_service(None, &net, &[p]);
        assert!(s.is_enabled);
        assert_eq!(1, s.pools.len());
        assert_eq!(Some(3600), s.pools[0].default_lease_time);
        assert_eq!(7200, s.pools[0].max_lease_time);
        assert_eq!("10.0.0.10", s.pools[0].low_ip_address);
        assert_eq!("10.0.0.20", s.pools[0].high_ip_address);
    }

    #[test]
    fn nat_add_appends_new_rule() {
        let existing = nat(vec![
            rule(NatRuleType::Dnat, "1.1.1.1", "22", "10.0.0.1", "22", UPLINK),
            rule(NatRuleType::Snat, "10.0.0.0/24", "", "1.1.1.1", "", UPLINK),
        ]);
        let m = PortMapping::new(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080");
        let s = add_nat_rule(Some(&existing), &m, UPLINK);
        assert_eq!(3, s.rules.len());
        assert_eq!(existing.rules[..], s.rules[..2]);
        assert_eq!(existing.without_rules(), s.without_rules());

        let r = &s.rules[2];
        assert!(r.is(NatRuleType::Dnat));
        assert!(r.is_enabled);
        assert_eq!("tcp", r.gateway().protocol());
        assert_eq!(UPLINK, r.gateway().interface_href());
        assert_eq!("8080", r.gateway().translated_port());
    }

    #[test]
    fn nat_add_replaces_identical_rule() {
        let mut dup = rule(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080", UPLINK);
        dup.description = "old".into();
        dup.id = "65537".into();
        let existing = nat(vec![
            dup,
            rule(NatRuleType::Dnat, "1.1.1.1", "22", "10.0.0.1", "22", UPLINK),
        ]);
        let m = PortMapping::new(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080");
        let s = add_nat_rule(Some(&existing), &m, UPLINK);
        assert_eq!(2, s.rules.len());
        assert_eq!(existing.rules[1], s.rules[0]);
        assert!(same_mapping(&s.rules[1], &m, UPLINK));
        assert!(s.rules[1].id.is_empty());
    }

    #[test]
    fn nat_add_keeps_rules_on_other_interface() {
        let existing = nat(vec![rule(
            NatRuleType::Dnat,
            "1.1.1.1",
            "80",
            "10.0.0.2",
            "8080",
            OTHER,
        )]);
        let m = PortMapping::new(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080");
        let s = add_nat_rule(Some(&existing), &m, UPLINK);
        assert_eq!(2, s.rules.len());
    }

    #[test]
    fn nat_add_without_service() {
        let m = PortMapping::single_port(NatRuleType::Snat, "1.1.1.1", "10.0.0.2", "443");
        let s = add_nat_rule(None, &m, UPLINK);
        assert!(s.is_enabled);
        assert!(s.nat_type.is_empty());
        assert_eq!(1, s.rules.len());
        assert_eq!("443", s.rules[0].gateway().original_port());
        assert_eq!("443", s.rules[0].gateway().translated_port());
    }

    #[test]
    fn nat_remove_drops_every_rule_of_endpoint() {
        let existing = nat(vec![
            rule(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080", UPLINK),
            rule(NatRuleType::Dnat, "1.1.1.1", "22", "10.0.0.1", "22", UPLINK),
            rule(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.3", "80", UPLINK),
            rule(NatRuleType::Snat, "1.1.1.1", "80", "10.0.0.2", "8080", UPLINK),
            rule(NatRuleType::Dnat, "1.1.1.1", "80", "10.0.0.2", "8080", OTHER),
        ]);
        let m = PortMapping::new(NatRuleType::Dnat, "1.1.1.1", "80", "10.9.9.9", "1");
        let s = remove_nat_rules(&existing, &m, UPLINK);
        assert_eq!(3, s.rules.len());
        assert_eq!(existing.rules[1], s.rules[0]);
        assert_eq!(existing.rules[3], s.rules[1]);
        assert_eq!(existing.rules[4], s.rules[2]);
        assert_eq!(existing.without_rules(), s.without_rules());
    }

    #[test]
    fn firewall_replaces_rules() {
        let r = FirewallRule {
            policy: "allow".into(),
            destination_ip: "1.1.1.1".into(),
            ..FirewallRule::default()
        };
        let s = firewall_service(FirewallPolicy::Drop, vec![r.clone()]);
        assert!(s.is_enabled);
        assert!(s.log_default_action);
        assert_eq!("drop", s.default_action);
        assert_eq!(vec![r], s.rules);
    }

    fn services() -> EdgeGatewayServiceConfiguration {
        EdgeGatewayServiceConfiguration {
            nat_service: Some(nat(vec![
                rule(NatRuleType::Dnat, "1.1.1.1", "22", "10.0.0.1", "22", UPLINK),
                rule(NatRuleType::Snat, "10.0.0.0/24", "", "1.1.1.1", "", UPLINK),
            ])),
            firewall_service: Some(FirewallService {
                is_enabled: true,
                default_action: "drop".into(),
                log_default_action: false,
                rules: vec![FirewallRule {
                    is_enabled: true,
                    policy: "allow".into(),
                    protocols: Some(FirewallRuleProtocols {
                        tcp: true,
                        ..FirewallRuleProtocols::default()
                    }),
                    destination_port_range: "22".into(),
                    destination_ip: "1.1.1.1".into(),
                    source_port_range: "Any".into(),
                    source_ip: "Any".into(),
                    ..FirewallRule::default()
                }],
            }),
            ..EdgeGatewayServiceConfiguration::default()
        }
    }

    #[test]
    fn one_to_one_appends_four_rules() {
        let mut c = services();
        add_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", "web", UPLINK);

        let nat = c.nat_service.as_ref().unwrap();
        assert_eq!(4, nat.rules.len());
        assert!(one_to_one_snat(&nat.rules[2], "10.0.0.5", "1.1.1.5", UPLINK));
        assert!(one_to_one_dnat(&nat.rules[3], "10.0.0.5", "1.1.1.5", UPLINK));
        assert_eq!("any", nat.rules[2].gateway().protocol());
        assert_eq!("web", nat.rules[3].description);

        let fw = c.firewall_service.as_ref().unwrap();
        assert_eq!(3, fw.rules.len());
        assert!(inbound_allow_any(&fw.rules[1], "1.1.1.5"));
        assert!(outbound_allow_any(&fw.rules[2], "10.0.0.5"));
        assert!(!fw.rules[1].enable_logging);
    }

    #[test]
    fn one_to_one_round_trip() {
        let before = services();
        let mut c = before.clone();
        add_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", "web", UPLINK);
        remove_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", UPLINK);

        let nat = c.nat_service.as_ref().unwrap();
        assert_eq!(before.nat_service.as_ref().unwrap().rules, nat.rules);
        assert!(nat.is_enabled);
        assert_eq!(before.firewall_service, c.firewall_service);
    }

    #[test]
    fn one_to_one_remove_keeps_other_mappings() {
        let mut c = services();
        add_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", "web", UPLINK);
        add_one_to_one(&mut c, "10.0.0.6", "1.1.1.6", "db", UPLINK);
        remove_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", UPLINK);

        let nat = c.nat_service.as_ref().unwrap();
        assert_eq!(4, nat.rules.len());
        assert!(one_to_one_snat(&nat.rules[2], "10.0.0.6", "1.1.1.6", UPLINK));

        let fw = c.firewall_service.as_ref().unwrap();
        assert_eq!(3, fw.rules.len());
        assert_eq!("db", fw.rules[1].description);
    }

    #[test]
    fn one_to_one_without_services() {
        let mut c = EdgeGatewayServiceConfiguration::default();
        add_one_to_one(&mut c, "10.0.0.5", "1.1.1.5", "web", UPLINK);
        assert!(c.nat_service.as_ref().unwrap().is_enabled);
        assert_eq!(2, c.firewall_service.as_ref().unwrap().rules.len());
    }

    #[test]
    fn partial_and_full_documents() {
        let p = ServiceUpdate::Partial(Section::Nat(nat(Vec::new())));
        assert!(p.is_partial());
        let d = p.into_document();
        assert_eq!(XMLNS, d.xmlns);
        assert!(d.nat_service.is_some());
        assert!(d.firewall_service.is_none());
        assert!(d.gateway_dhcp_service.is_none());

        let f = ServiceUpdate::Full(services());
        assert!(!f.is_partial());
        let d = f.into_document();
        assert_eq!(XMLNS, d.xmlns);
        assert!(d.nat_service.is_some());
        assert!(d.firewall_service.is_some());
    }

    #[test]
    fn apply_partial_update() {
        let mut c = services();
        let fw = firewall_service(FirewallPolicy::Allow, Vec::new());
        ServiceUpdate::Partial(Section::Firewall(fw.clone())).apply_to(&mut c);
        assert_eq!(Some(fw), c.firewall_service);
        assert_eq!(services().nat_service, c.nat_service);
    }

    // Properties ////////////////////////////////////////////////////////////

    const IPS: &[&str] = &["1.1.1.1", "1.1.1.2", "10.0.0.1", "10.0.0.2"];
    const PORTS: &[&str] = &["22", "80", "any", ""];
    const IFCS: &[&str] = &[UPLINK, OTHER];

    fn pick(g: &mut Gen, xs: &[&'static str]) -> &'static str {
        g.choose(xs).copied().unwrap()
    }

    #[derive(Debug, Clone)]
    struct Mapping(PortMapping);

    impl Arbitrary for Mapping {
        fn arbitrary(g: &mut Gen) -> Self {
            let t = *g.choose(&[NatRuleType::Snat, NatRuleType::Dnat]).unwrap();
            Self(PortMapping::new(
                t,
                pick(g, IPS),
                pick(g, PORTS),
                pick(g, IPS),
                pick(g, PORTS),
            ))
        }
    }

    #[derive(Debug, Clone)]
    struct Rules(Vec<NatRule>);

    impl Arbitrary for Rules {
        fn arbitrary(g: &mut Gen) -> Self {
            let n = usize::arbitrary(g) % 12;
            let rules = (0..n)
                .map(|i| {
                    let Mapping(m) = Mapping::arbitrary(g);
                    let mut r = rule(
                        m.rule_type,
                        &m.external_ip,
                        &m.external_port,
                        &m.internal_ip,
                        &m.internal_port,
                        pick(g, IFCS),
                    );
                    r.id = i.to_string();
                    r
                })
                .collect();
            Self(rules)
        }
    }

    quickcheck! {
        fn add_nat_rule_replaces_or_appends(rules: Rules, m: Mapping) -> bool {
            let (Rules(rules), Mapping(m)) = (rules, m);
            let existing = nat(rules.clone());
            let s = add_nat_rule(Some(&existing), &m, UPLINK);
            let kept: Vec<_> = rules
                .iter()
                .filter(|r| !same_mapping(r, &m, UPLINK))
                .cloned()
                .collect();
            let (last, init) = s.rules.split_last().unwrap();
            init == kept.as_slice()
                && same_mapping(last, &m, UPLINK)
                && s.rules.iter().filter(|r| same_mapping(r, &m, UPLINK)).count() == 1
        }

        fn remove_nat_rules_drops_all_matches(rules: Rules, m: Mapping) -> bool {
            let (Rules(rules), Mapping(m)) = (rules, m);
            let existing = nat(rules.clone());
            let s = remove_nat_rules(&existing, &m, UPLINK);
            let dropped = rules.len() - s.rules.len();
            let expected = rules.iter().filter(|r| same_endpoint(r, &m, UPLINK)).count();
            dropped == expected
                && s.rules.iter().all(|r| !same_endpoint(r, &m, UPLINK))
                && s.rules.iter().all(|r| rules.contains(r))
        }

        fn one_to_one_add_then_remove(rules: Rules, a: u8, b: u8) -> bool {
            let internal = format!("10.1.0.{a}");
            let external = format!("203.0.113.{b}");
            let before = EdgeGatewayServiceConfiguration {
                nat_service: Some(nat(rules.0)),
                ..EdgeGatewayServiceConfiguration::default()
            };
            let mut c = before.clone();
            add_one_to_one(&mut c, &internal, &external, "x", UPLINK);
            remove_one_to_one(&mut c, &internal, &external, UPLINK);
            let rules_before = before.nat_service.as_ref().map(|n| &n.rules);
            c.nat_service.as_ref().map(|n| &n.rules) == rules_before
                && c.firewall_service.is_some_and(|f| f.rules.is_empty())
        }
    }
}
