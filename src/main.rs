use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use tiernet::aws::{AwsContext, Ec2NetworkClient, VpcSelector};
use tiernet::planner::TopologyPlan;
use tiernet::provision::{ProvisionEngine, ProvisionError};
use tiernet::teardown::TeardownEngine;
use tiernet::wait::WaitConfig;

#[derive(Parser)]
#[command(name = "tiernet", version, about = "Provision and tear down multi-AZ VPC network topologies")]
struct Cli {
    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION", default_value = "us-east-2")]
    region: String,

    /// AWS profile to load credentials from
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute and print the topology plan without creating anything
    Plan {
        /// Number of availability zones to span
        #[arg(long, default_value_t = 2)]
        zones: usize,

        /// First two octets of the VPC CIDR (e.g. "10.0" for 10.0.0.0/16)
        #[arg(long, default_value = "10.0")]
        cidr_base: String,
    },

    /// Provision a topology and print it as JSON
    Provision {
        #[arg(long, default_value_t = 2)]
        zones: usize,

        #[arg(long, default_value = "10.0")]
        cidr_base: String,

        /// Name tag for the VPC (gateway names derive from it)
        #[arg(long, default_value = "TierVPC")]
        name: String,

        /// Seconds to wait for the NAT gateway to become available
        #[arg(long, default_value_t = 300)]
        nat_timeout: u64,
    },

    /// Tear down previously provisioned topologies
    Teardown {
        /// Restrict to one topology id
        #[arg(long)]
        topology_id: Option<String>,

        /// Restrict to VPCs with this Name tag (repeatable)
        #[arg(long)]
        name: Vec<String>,

        /// Tear down every topology this tool ever created
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let ctx = AwsContext::new(&cli.region, cli.profile.as_deref()).await;
    let client = Ec2NetworkClient::from_context(&ctx);

    match cli.command {
        Command::Plan { zones, cidr_base } => {
            let available = client.describe_availability_zones().await?;
            let plan = TopologyPlan::plan(zones, &cidr_base, &available)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }

        Command::Provision {
            zones,
            cidr_base,
            name,
            nat_timeout,
        } => {
            let available = client.describe_availability_zones().await?;
            let plan = TopologyPlan::plan(zones, &cidr_base, &available)?;

            let cancel = CancellationToken::new();
            let signal_token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, stopping");
                    signal_token.cancel();
                }
            });

            let engine = ProvisionEngine::new(client)
                .with_nat_wait(WaitConfig::with_timeout(Duration::from_secs(nat_timeout)));

            match engine.provision(&plan, &name, Some(&cancel)).await {
                Ok(topology) => {
                    println!("{}", serde_json::to_string_pretty(&topology)?);
                }
                Err(ProvisionError {
                    step,
                    partial,
                    source,
                }) => {
                    error!(step = %step, "Provisioning failed, dumping partial topology");
                    println!("{}", serde_json::to_string_pretty(&partial)?);
                    return Err(source)
                        .with_context(|| format!("Provisioning failed at step {step}"));
                }
            }
        }

        Command::Teardown {
            topology_id,
            name,
            all,
        } => {
            let selector = match (topology_id, name) {
                (Some(id), _) => VpcSelector::topology(id),
                (None, names) if !names.is_empty() => VpcSelector::names(names),
                (None, _) if all => VpcSelector::all(),
                _ => bail!("Pass --topology-id, --name, or --all to select what to tear down"),
            };

            let engine = TeardownEngine::new(client);
            let report = engine.teardown(&selector).await?;
            println!("{report}");
        }
    }

    Ok(())
}
