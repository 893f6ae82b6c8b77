use edgegw_types as types;
use edgegw_types::{DhcpPoolService, EdgeGatewayServiceConfiguration, FirewallPolicy};
use edgegw_types::{FirewallRule, NatRule, NatRuleType, Reference, XML_HEADER, from_xml, to_xml};
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::merge::{self, DhcpPool, PortMapping, Section, ServiceUpdate};
use crate::{Client, Error, Request, Task};

/// Path of the reconfiguration action relative to the gateway href.
pub const CONFIGURE_SERVICES: &str = "action/configureServices";

/// Content type of service configuration documents.
pub const SERVICE_CONFIG_TYPE: &str =
    "application/vnd.vmware.admin.edgeGatewayServiceConfiguration+xml";

/// An edge gateway and the last configuration we have seen of it.
///
/// The snapshot is only updated by [`EdgeGateway::refresh`] and by our own
/// accepted reconfigurations. Changes made by others are not visible until
/// the next refresh.
#[derive(Debug, Clone)]
pub struct EdgeGateway {
    client: Client,
    href: Option<Url>,
    snapshot: Option<types::EdgeGateway>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    WhileBusy,
    Never,
}

impl EdgeGateway {
    /// A gateway without href or snapshot.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            href: None,
            snapshot: None,
        }
    }

    /// A gateway to be loaded from `href`.
    pub fn with_href(client: Client, href: Url) -> Self {
        Self {
            client,
            href: Some(href),
            snapshot: None,
        }
    }

    /// A gateway from an already fetched document.
    pub fn from_snapshot(client: Client, gw: types::EdgeGateway) -> Result<Self, Error> {
        let href = if gw.href.is_empty() {
            None
        } else {
            Some(Url::parse(&gw.href)?)
        };
        Ok(Self {
            client,
            href,
            snapshot: Some(gw),
        })
    }

    pub fn href(&self) -> Option<&Url> {
        self.href.as_ref()
    }

    pub fn snapshot(&self) -> Option<&types::EdgeGateway> {
        self.snapshot.as_ref()
    }

    /// The network of the last uplink interface.
    pub fn uplink(&self) -> Option<&Reference> {
        self.snapshot.as_ref().and_then(|g| g.uplink())
    }

    pub fn nat_rules(&self) -> &[NatRule] {
        self.services()
            .and_then(|s| s.nat_service.as_ref())
            .map(|n| n.rules.as_slice())
            .unwrap_or_default()
    }

    pub fn firewall_rules(&self) -> &[FirewallRule] {
        self.services()
            .and_then(|s| s.firewall_service.as_ref())
            .map(|f| f.rules.as_slice())
            .unwrap_or_default()
    }

    pub fn dhcp_pools(&self) -> &[DhcpPoolService] {
        self.services()
            .and_then(|s| s.gateway_dhcp_service.as_ref())
            .map(|d| d.pools.as_slice())
            .unwrap_or_default()
    }

    fn services(&self) -> Option<&EdgeGatewayServiceConfiguration> {
        self.snapshot.as_ref().and_then(|g| g.services())
    }

    fn label(&self) -> &str {
        self.client.config().label()
    }

    /// Replace the snapshot with the current state of the gateway.
    ///
    /// If the request fails the snapshot is kept. A response that can not be
    /// decoded leaves no snapshot.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let Some(href) = self.href.clone() else {
            return Err(Error::MissingState("gateway href"));
        };
        debug!(node = %self.label(), %href, "fetching edge gateway");
        let res = self
            .client
            .send(Request::get(href))
            .await
            .map_err(|e| e.during("refresh edge gateway"))?;
        self.snapshot = None;
        self.snapshot = Some(from_xml(&res.body)?);
        Ok(())
    }

    /// Replace the DHCP pools of `network` with `pools`.
    ///
    /// Uses the current snapshot. Retried while the gateway is busy.
    pub async fn add_dhcp_pool(
        &mut self,
        network: &Reference,
        pools: &[DhcpPool],
    ) -> Result<Task, Error> {
        let existing = self.require_snapshot()?.services();
        debug!(node = %self.label(), %network, pools = %pools.len(), "replacing dhcp pools");
        let dhcp = merge::dhcp_service(
            existing.and_then(|s| s.gateway_dhcp_service.as_ref()),
            network,
            pools,
        );
        let update = ServiceUpdate::Partial(Section::Dhcp(dhcp));
        self.configure("add dhcp pool", update, Retry::WhileBusy).await
    }

    /// Map `port` of `external_ip` to the same port of `internal_ip`.
    pub async fn add_nat_mapping(
        &mut self,
        t: NatRuleType,
        external_ip: &str,
        internal_ip: &str,
        port: &str,
    ) -> Result<Task, Error> {
        let m = PortMapping::single_port(t, external_ip, internal_ip, port);
        self.add_nat_port_mapping_with_uplink(None, &m).await
    }

    pub async fn add_nat_port_mapping(&mut self, m: &PortMapping) -> Result<Task, Error> {
        self.add_nat_port_mapping_with_uplink(None, m).await
    }

    /// Add a NAT rule on `network`, or on the uplink if no network is given.
    ///
    /// An existing rule identical to the new one is replaced.
    pub async fn add_nat_port_mapping_with_uplink(
        &mut self,
        network: Option<&Reference>,
        m: &PortMapping,
    ) -> Result<Task, Error> {
        let existing = self.require_snapshot()?.services();
        let interface = self.interface(network)?;
        let nat = merge::add_nat_rule(
            existing.and_then(|s| s.nat_service.as_ref()),
            m,
            &interface,
        );
        let update = ServiceUpdate::Partial(Section::Nat(nat));
        self.configure("add nat rule", update, Retry::Never).await
    }

    pub async fn remove_nat_mapping(
        &mut self,
        t: NatRuleType,
        external_ip: &str,
        internal_ip: &str,
        port: &str,
    ) -> Result<Task, Error> {
        let m = PortMapping::single_port(t, external_ip, internal_ip, port);
        self.remove_nat_port_mapping_with_uplink(None, &m).await
    }

    pub async fn remove_nat_port_mapping(&mut self, m: &PortMapping) -> Result<Task, Error> {
        self.remove_nat_port_mapping_with_uplink(None, m).await
    }

    /// Remove every NAT rule on `network` (or the uplink) whose original
    /// endpoint is the external endpoint of `m`.
    ///
    /// The internal endpoint of `m` is not compared.
    pub async fn remove_nat_port_mapping_with_uplink(
        &mut self,
        network: Option<&Reference>,
        m: &PortMapping,
    ) -> Result<Task, Error> {
        let Some(existing) = self
            .require_snapshot()?
            .services()
            .and_then(|s| s.nat_service.as_ref())
        else {
            return Err(Error::MissingState("nat service"));
        };
        let interface = self.interface(network)?;
        let nat = merge::remove_nat_rules(existing, m, &interface);
        let update = ServiceUpdate::Partial(Section::Nat(nat));
        self.configure("remove nat rules", update, Retry::Never).await
    }

    /// Replace all firewall rules.
    ///
    /// Refreshes first. Retried while the gateway is busy.
    pub async fn create_firewall_rules(
        &mut self,
        default_action: FirewallPolicy,
        rules: Vec<FirewallRule>,
    ) -> Result<Task, Error> {
        self.refresh().await?;
        let fw = merge::firewall_service(default_action, rules);
        let update = ServiceUpdate::Partial(Section::Firewall(fw));
        self.configure("replace firewall rules", update, Retry::WhileBusy)
            .await
    }

    /// Map `external` to `internal` on every port and allow all traffic
    /// between them.
    ///
    /// Refreshes first and submits the complete service configuration.
    pub async fn create_one_to_one_mapping(
        &mut self,
        internal: &str,
        external: &str,
        description: &str,
    ) -> Result<Task, Error> {
        self.refresh().await?;
        let uplink = self.interface(None)?;
        let mut services = self.services().cloned().unwrap_or_default();
        merge::add_one_to_one(&mut services, internal, external, description, &uplink);
        let update = ServiceUpdate::Full(services);
        self.configure("create 1:1 mapping", update, Retry::Never).await
    }

    /// Undo [`EdgeGateway::create_one_to_one_mapping`].
    ///
    /// Refreshes first and submits the complete service configuration with
    /// the NAT service enabled.
    pub async fn remove_one_to_one_mapping(
        &mut self,
        internal: &str,
        external: &str,
    ) -> Result<Task, Error> {
        self.refresh().await?;
        let uplink = self.interface(None)?;
        let mut services = self.services().cloned().unwrap_or_default();
        merge::remove_one_to_one(&mut services, internal, external, &uplink);
        let update = ServiceUpdate::Full(services);
        self.configure("remove 1:1 mapping", update, Retry::Never).await
    }

    /// Submit a VPN configuration as given.
    ///
    /// A failed refresh beforehand is logged and otherwise ignored.
    pub async fn add_ipsec_vpn(
        &mut self,
        config: EdgeGatewayServiceConfiguration,
    ) -> Result<Task, Error> {
        if let Err(err) = self.refresh().await {
            warn!(node = %self.label(), %err, "failed to refresh edge gateway");
        }
        let update = ServiceUpdate::Full(config);
        self.configure("add ipsec vpn", update, Retry::Never).await
    }

    fn require_snapshot(&self) -> Result<&types::EdgeGateway, Error> {
        self.snapshot
            .as_ref()
            .ok_or(Error::MissingState("gateway snapshot"))
    }

    /// The href of `network` or else of the uplink network.
    fn interface(&self, network: Option<&Reference>) -> Result<String, Error> {
        if let Some(n) = network {
            return Ok(n.href.clone());
        }
        self.uplink()
            .map(|u| u.href.clone())
            .ok_or(Error::MissingState("uplink interface"))
    }

    /// The `configureServices` action below `href`, keeping any query.
    fn configure_url(href: &Url) -> Result<Url, Error> {
        let mut url = href.clone();
        url.path_segments_mut()
            .map_err(|()| Error::MissingState("gateway href path"))?
            .pop_if_empty()
            .extend(CONFIGURE_SERVICES.split('/'));
        Ok(url)
    }

    async fn configure(
        &mut self,
        op: &'static str,
        update: ServiceUpdate,
        retry: Retry,
    ) -> Result<Task, Error> {
        let Some(href) = &self.href else {
            return Err(Error::MissingState("gateway href"));
        };
        let url = Self::configure_url(href)?;

        let body = format!("{XML_HEADER}{}", to_xml(&update.clone().into_document())?);

        if self.client.config().dump_xml() {
            println!("{body}")
        }

        debug!(
            node    = %self.label(),
            %op,
            %url,
            partial = %update.is_partial(),
            "configuring services"
        );

        let client = &self.client;
        let send = move || {
            client.post::<types::Task>(url.clone(), SERVICE_CONFIG_TYPE, body.clone())
        };

        let task = match retry {
            Retry::WhileBusy => {
                client
                    .config()
                    .retry_policy()
                    .run(client.config().label(), send)
                    .await
            }
            Retry::Never => send().await,
        }
        .map_err(|e| e.during(op))?;

        info!(
            node   = %self.label(),
            task   = %task.href,
            status = %task.status(),
            "services reconfiguration accepted"
        );

        if let Some(gw) = &mut self.snapshot {
            update.apply_to(gw.services_mut())
        }

        Ok(Task::new(self.client.clone(), task))
    }
}
