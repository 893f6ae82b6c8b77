//! Schema types of the vCloud v1.5 API (version 5.6) as far as edge gateway
//! network services are concerned.
//!
//! Field names follow the XML element names in PascalCase, attributes are
//! prefixed with `@`. Optional text elements are modelled as `String`s which
//! are omitted from the output when empty.

mod error;
mod gateway;
mod kind;
mod reference;
mod service;
mod task;
mod vpn;
mod xml;

pub use error::ApiError;
pub use gateway::{EdgeGateway, GatewayConfiguration, GatewayInterface, GatewayInterfaces};
pub use gateway::{SubnetParticipation, UPLINK};
pub use kind::{FirewallPolicy, NatRuleType, ParseKindError};
pub use reference::Reference;
pub use service::{DhcpPoolService, EdgeGatewayServiceConfiguration, GatewayDhcpService};
pub use service::{FirewallRule, FirewallRuleProtocols, FirewallService};
pub use service::{GatewayNatRule, GatewayNatRuleView, NatRule, NatService};
pub use task::{Task, TaskStatus};
pub use vpn::{GatewayIpsecVpnEndpoint, GatewayIpsecVpnService, GatewayIpsecVpnTunnel};
pub use vpn::{IpsecVpnSubnet, IpsecVpnThirdPartyPeer};
pub use xml::{Document, XML_HEADER, XMLNS, from_xml, to_xml};

/// The value used for "any address" and "any port" in firewall rules.
pub const ANY: &str = "Any";

/// The value used for "any port" and "any protocol" in NAT rules.
pub const ANY_LOWER: &str = "any";

fn is_false(b: &bool) -> bool {
    !*b
}
