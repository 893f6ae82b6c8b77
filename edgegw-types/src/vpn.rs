use serde::{Deserialize, Serialize};

use crate::{Reference, is_false};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayIpsecVpnService {
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<GatewayIpsecVpnEndpoint>,

    #[serde(rename = "Tunnel", skip_serializing_if = "Vec::is_empty")]
    pub tunnels: Vec<GatewayIpsecVpnTunnel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayIpsecVpnEndpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Reference>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub public_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayIpsecVpnTunnel {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipsec_vpn_third_party_peer: Option<IpsecVpnThirdPartyPeer>,

    pub peer_ip_address: String,
    pub peer_id: String,
    pub local_ip_address: String,
    pub local_id: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub local_subnet: Vec<IpsecVpnSubnet>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peer_subnet: Vec<IpsecVpnSubnet>,

    pub shared_secret: String,

    #[serde(skip_serializing_if = "is_false")]
    pub shared_secret_encrypted: bool,

    pub encryption_protocol: String,
    pub mtu: u32,

    #[serde(skip_serializing_if = "is_false")]
    pub is_enabled: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub is_operational: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IpsecVpnThirdPartyPeer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub peer_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IpsecVpnSubnet {
    pub name: String,
    pub gateway: String,
    pub netmask: String,
}
