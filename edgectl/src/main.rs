//! Inspect and reconfigure the network services of an edge gateway.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use edgegw::types::{EdgeGatewayServiceConfiguration, FirewallPolicy, NatRuleType, Reference};
use edgegw::types::from_xml;
use edgegw::{Client, ClientConfig, DhcpPool, EdgeGateway, PortMapping};
use tracing::info;
use url::Url;

use crate::logging::init_logging;
use crate::rules::RulesFile;

mod logging;
mod rules;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Path to the client configuration file.
    #[clap(long, short)]
    config: Option<PathBuf>,

    /// The href of the edge gateway.
    #[clap(long, env = "EDGEGW_HREF")]
    gateway: Url,

    /// Session token. Overrides the one in the configuration file.
    #[clap(long, env = "EDGEGW_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print every configuration document sent to the gateway.
    #[clap(long)]
    dump_xml: bool,

    /// Wait until the gateway has applied the change.
    #[clap(long)]
    wait: bool,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show interfaces, NAT rules, firewall rules and DHCP pools.
    Show,

    /// Manage NAT rules.
    Nat {
        #[clap(subcommand)]
        cmd: NatCommand,
    },

    /// Manage DHCP pools.
    Dhcp {
        #[clap(subcommand)]
        cmd: DhcpCommand,
    },

    /// Manage firewall rules.
    Firewall {
        #[clap(subcommand)]
        cmd: FirewallCommand,
    },

    /// Map an external address to an internal one on all ports.
    Map {
        internal: String,
        external: String,

        #[clap(long, default_value = "")]
        description: String,
    },

    /// Remove a mapping created with `map`.
    Unmap { internal: String, external: String },

    /// Submit an IPsec VPN configuration document.
    Vpn {
        /// XML file with an `EdgeGatewayServiceConfiguration`.
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum NatCommand {
    /// Add a port mapping, replacing an identical one.
    Add(NatArgs),

    /// Remove all rules for the external endpoint.
    Remove(NatArgs),
}

#[derive(Debug, Args)]
struct NatArgs {
    /// SNAT or DNAT.
    #[clap(long = "type")]
    rule_type: NatRuleType,

    #[clap(long)]
    external_ip: String,

    #[clap(long)]
    external_port: String,

    #[clap(long)]
    internal_ip: String,

    /// Defaults to the external port.
    #[clap(long)]
    internal_port: Option<String>,

    /// Network href of the interface. Defaults to the uplink.
    #[clap(long)]
    network: Option<String>,
}

impl NatArgs {
    fn mapping(&self) -> PortMapping {
        PortMapping::new(
            self.rule_type,
            &self.external_ip,
            &self.external_port,
            &self.internal_ip,
            self.internal_port.as_deref().unwrap_or(&self.external_port),
        )
    }

    fn network(&self) -> Option<Reference> {
        self.network.as_deref().map(Reference::new)
    }
}

#[derive(Debug, Subcommand)]
enum DhcpCommand {
    /// Replace the pools of a network with a new pool.
    Add {
        /// Network href.
        #[clap(long)]
        network: String,

        #[clap(long, default_value = "")]
        network_name: String,

        #[clap(long)]
        start: String,

        #[clap(long)]
        end: String,

        /// Seconds.
        #[clap(long)]
        default_lease: Option<u32>,

        /// Seconds.
        #[clap(long)]
        max_lease: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
enum FirewallCommand {
    /// Replace all firewall rules with those from a TOML file.
    Set {
        #[clap(long, default_value = "drop")]
        default_action: FirewallPolicy,

        rules: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut conf = match &cli.config {
        Some(path) => ClientConfig::read(path)
            .with_context(|| format!("reading config file {path:?}"))?,
        None => ClientConfig::default(),
    };
    conf.dump_xml |= cli.dump_xml;

    let config = conf
        .into_config(cli.token)
        .context("loading client configuration")?;
    let client = Client::new(config).context("creating client")?;
    let mut gw = EdgeGateway::with_href(client, cli.gateway.clone());

    let mut task = match cli.cmd {
        Command::Show => {
            gw.refresh().await.context("fetching edge gateway")?;
            show(&gw);
            return Ok(());
        }
        Command::Nat { cmd } => {
            gw.refresh().await.context("fetching edge gateway")?;
            match cmd {
                NatCommand::Add(a) => gw
                    .add_nat_port_mapping_with_uplink(a.network().as_ref(), &a.mapping())
                    .await
                    .context("adding nat rule")?,
                NatCommand::Remove(a) => gw
                    .remove_nat_port_mapping_with_uplink(a.network().as_ref(), &a.mapping())
                    .await
                    .context("removing nat rules")?,
            }
        }
        Command::Dhcp {
            cmd:
                DhcpCommand::Add {
                    network,
                    network_name,
                    start,
                    end,
                    default_lease,
                    max_lease,
                },
        } => {
            gw.refresh().await.context("fetching edge gateway")?;
            let net = Reference::new(network).with_name(network_name);
            let pool = DhcpPool::builder()
                .start_address(start)
                .end_address(end)
                .maybe_default_lease_time(default_lease)
                .maybe_max_lease_time(max_lease)
                .build();
            gw.add_dhcp_pool(&net, &[pool])
                .await
                .context("adding dhcp pool")?
        }
        Command::Firewall {
            cmd: FirewallCommand::Set {
                default_action,
                rules,
            },
        } => {
            let rules = RulesFile::read(&rules)?.into_rules()?;
            gw.create_firewall_rules(default_action, rules)
                .await
                .context("replacing firewall rules")?
        }
        Command::Map {
            internal,
            external,
            description,
        } => gw
            .create_one_to_one_mapping(&internal, &external, &description)
            .await
            .with_context(|| format!("mapping {external} to {internal}"))?,
        Command::Unmap { internal, external } => gw
            .remove_one_to_one_mapping(&internal, &external)
            .await
            .with_context(|| format!("unmapping {external} from {internal}"))?,
        Command::Vpn { file } => {
            let xml = fs::read_to_string(&file).with_context(|| format!("reading {file:?}"))?;
            let doc: EdgeGatewayServiceConfiguration =
                from_xml(&xml).with_context(|| format!("parsing {file:?}"))?;
            gw.add_ipsec_vpn(doc)
                .await
                .context("configuring ipsec vpn")?
        }
    };

    info!(task = %task.href(), status = %task.status(), "reconfiguration queued");

    if cli.wait {
        task.wait().await.context("waiting for task")?;
        info!(task = %task.href(), "reconfiguration done");
    }

    Ok(())
}

fn show(gw: &EdgeGateway) {
    let Some(snapshot) = gw.snapshot() else {
        return;
    };
    println!("{} ({})", snapshot.name, snapshot.href);

    println!("\ninterfaces:");
    for i in snapshot.interfaces() {
        let net = i.network.as_ref().map(|n| n.href.as_str()).unwrap_or_default();
        println!("  {:<10} {:<20} {net}", i.interface_type, i.name);
    }

    println!("\nnat rules:");
    for r in gw.nat_rules() {
        let g = r.gateway();
        println!(
            "  {} {}:{} -> {}:{} {} on {}",
            r.rule_type,
            g.original_ip(),
            g.original_port(),
            g.translated_ip(),
            g.translated_port(),
            g.protocol(),
            g.interface_href()
        );
    }

    println!("\nfirewall rules:");
    for r in gw.firewall_rules() {
        println!(
            "  {:<5} {}:{} -> {}:{} {}",
            r.policy,
            r.source_ip,
            r.source_port_range,
            r.destination_ip,
            r.destination_port_range,
            r.description
        );
    }

    println!("\ndhcp pools:");
    for p in gw.dhcp_pools() {
        println!(
            "  {} - {} on {}",
            p.low_ip_address,
            p.high_ip_address,
            p.network_href()
        );
    }
}
