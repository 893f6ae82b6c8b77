use serde::{Deserialize, Serialize};

use crate::{Document, EdgeGatewayServiceConfiguration, Reference, is_false};

/// Interface type of the interface facing the provider network.
pub const UPLINK: &str = "uplink";

/// An edge gateway as returned by a GET of its href.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EdgeGateway {
    #[serde(rename = "@xmlns", skip_serializing_if = "String::is_empty")]
    pub xmlns: String,

    #[serde(rename = "@href", skip_serializing_if = "String::is_empty")]
    pub href: String,

    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(rename = "@id", skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@status", skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<GatewayConfiguration>,
}

impl Document for EdgeGateway {
    const ROOT: &'static str = "EdgeGateway";
}

impl EdgeGateway {
    /// All gateway interfaces, in document order.
    pub fn interfaces(&self) -> &[GatewayInterface] {
        self.configuration
            .as_ref()
            .and_then(|c| c.gateway_interfaces.as_ref())
            .map(|i| i.interfaces.as_slice())
            .unwrap_or_default()
    }

    /// The uplink network.
    ///
    /// If several interfaces are flagged as uplink, the last one wins.
    pub fn uplink(&self) -> Option<&Reference> {
        self.interfaces()
            .iter()
            .filter(|i| i.is_uplink())
            .filter_map(|i| i.network.as_ref())
            .last()
    }

    pub fn services(&self) -> Option<&EdgeGatewayServiceConfiguration> {
        self.configuration
            .as_ref()
            .and_then(|c| c.edge_gateway_service_configuration.as_ref())
    }

    /// Mutable access to the service configuration, created if missing.
    pub fn services_mut(&mut self) -> &mut EdgeGatewayServiceConfiguration {
        self.configuration
            .get_or_insert_with(GatewayConfiguration::default)
            .edge_gateway_service_configuration
            .get_or_insert_with(EdgeGatewayServiceConfiguration::default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayConfiguration {
    #[serde(skip_serializing_if = "is_false")]
    pub backward_compatibility_mode: bool,

    pub gateway_backing_config: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_interfaces: Option<GatewayInterfaces>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_gateway_service_configuration: Option<EdgeGatewayServiceConfiguration>,

    #[serde(skip_serializing_if = "is_false")]
    pub ha_enabled: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub use_default_route_for_dns_relay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayInterfaces {
    #[serde(rename = "GatewayInterface", skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<GatewayInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayInterface {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Reference>,

    pub interface_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_participation: Option<SubnetParticipation>,

    #[serde(skip_serializing_if = "is_false")]
    pub apply_rate_limit: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_rate_limit: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_rate_limit: Option<f64>,

    #[serde(skip_serializing_if = "is_false")]
    pub use_for_default_route: bool,
}

impl GatewayInterface {
    pub fn is_uplink(&self) -> bool {
        self.interface_type == UPLINK
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SubnetParticipation {
    pub gateway: String,
    pub netmask: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
}
