use edgegw_types::{
    EdgeGateway, EdgeGatewayServiceConfiguration, FirewallPolicy, GatewayNatRule, NatRule,
    NatRuleType, NatService, Reference, TaskStatus, XMLNS, from_xml, to_xml,
};

const GATEWAY: &str = include_str!("data/edge_gateway.xml");

#[test]
fn decode_gateway() {
    let gw: EdgeGateway = from_xml(GATEWAY).unwrap();
    assert_eq!("gw-1", gw.name);
    assert_eq!("https://vca.example.com/api/admin/edgeGateway/42", gw.href);
    assert_eq!("primary gateway", gw.description);
    assert_eq!(3, gw.interfaces().len());

    let services = gw.services().unwrap();

    let dhcp = services.gateway_dhcp_service.as_ref().unwrap();
    assert!(dhcp.is_enabled);
    assert_eq!(1, dhcp.pools.len());
    assert_eq!(Some(3600), dhcp.pools[0].default_lease_time);
    assert_eq!(
        "https://vca.example.com/api/admin/network/routed",
        dhcp.pools[0].network_href()
    );

    let fw = services.firewall_service.as_ref().unwrap();
    assert_eq!(FirewallPolicy::Drop.as_str(), fw.default_action);
    assert_eq!(2, fw.rules.len());
    assert!(!fw.rules[0].any_protocol());
    assert!(fw.rules[1].any_protocol());
    assert_eq!(Some(22), fw.rules[0].port);

    let nat = services.nat_service.as_ref().unwrap();
    assert_eq!(2, nat.rules.len());
    assert!(nat.rules[0].is(NatRuleType::Dnat));
    assert!(nat.rules[1].is(NatRuleType::Snat));
    assert_eq!("22", nat.rules[0].gateway().original_port());
    assert_eq!("", nat.rules[1].gateway().original_port());

    let vpn = services.gateway_ipsec_vpn_service.as_ref().unwrap();
    assert_eq!(1, vpn.tunnels.len());
    assert_eq!(1500, vpn.tunnels[0].mtu);
    assert_eq!("10.20.0.0/16", vpn.tunnels[0].peer_subnet[0].name);
}

#[test]
fn last_uplink_wins() {
    let gw: EdgeGateway = from_xml(GATEWAY).unwrap();
    let uplink = gw.uplink().unwrap();
    assert_eq!("ext-b", uplink.name);
    assert_eq!("https://vca.example.com/api/admin/network/b", uplink.href);
}

#[test]
fn no_uplink_without_configuration() {
    let gw = EdgeGateway::default();
    assert!(gw.interfaces().is_empty());
    assert!(gw.uplink().is_none());
    assert!(gw.services().is_none());
}

#[test]
fn partial_document_names_one_section() {
    let mut doc = EdgeGatewayServiceConfiguration::new();
    doc.nat_service = Some(NatService {
        is_enabled: true,
        rules: vec![NatRule {
            rule_type: NatRuleType::Dnat.to_string(),
            is_enabled: true,
            gateway_nat_rule: Some(GatewayNatRule {
                interface: Some(Reference::new("https://vca.example.com/api/admin/network/b")),
                original_ip: "203.0.113.2".into(),
                original_port: "80".into(),
                translated_ip: "192.168.109.10".into(),
                translated_port: "8080".into(),
                protocol: "tcp".into(),
                ..GatewayNatRule::default()
            }),
            ..NatRule::default()
        }],
        ..NatService::default()
    });

    let xml = to_xml(&doc).unwrap();
    assert!(xml.starts_with(&format!(
        "<EdgeGatewayServiceConfiguration xmlns=\"{XMLNS}\">"
    )));
    assert!(xml.contains("<NatService>"));
    assert!(xml.contains("<RuleType>DNAT</RuleType>"));
    assert!(xml.contains("<TranslatedPort>8080</TranslatedPort>"));
    assert!(xml.contains("href=\"https://vca.example.com/api/admin/network/b\""));
    assert!(!xml.contains("FirewallService"));
    assert!(!xml.contains("GatewayDhcpService"));
    assert!(!xml.contains("GatewayIpsecVpnService"));
    assert!(!xml.contains("<Description>"));
    assert!(!xml.contains("<Id>"));
}

#[test]
fn full_document_keeps_every_section() {
    let gw: EdgeGateway = from_xml(GATEWAY).unwrap();
    let mut doc = gw.services().unwrap().clone();
    doc.xmlns = XMLNS.to_string();

    let xml = to_xml(&doc).unwrap();
    let back: EdgeGatewayServiceConfiguration = from_xml(&xml).unwrap();
    assert_eq!(doc.gateway_dhcp_service, back.gateway_dhcp_service);
    assert_eq!(doc.firewall_service, back.firewall_service);
    assert_eq!(doc.nat_service, back.nat_service);
    assert_eq!(doc.gateway_ipsec_vpn_service, back.gateway_ipsec_vpn_service);
}

#[test]
fn task_status_names() {
    assert_eq!(TaskStatus::PreRunning, TaskStatus::from("preRunning"));
    assert_eq!("preRunning", TaskStatus::PreRunning.to_string());
    assert_eq!(TaskStatus::Unknown, TaskStatus::from("bogus"));
}
