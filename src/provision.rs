//! Dependency-ordered topology provisioning
//!
//! Creates resources strictly in dependency order: VPC, then internet
//! gateway, then per-zone public networking, then the NAT gateway
//! (gated on its `available` state), then per-zone private networking.
//! The per-zone phases fan out concurrently; everything else is
//! sequential because a later resource references an earlier one.
//!
//! There is no rollback. A failure surfaces a [`ProvisionError`]
//! carrying the partially-built [`Topology`], including successful
//! siblings of a failed fan-out task, so the caller can hand it to
//! teardown or retry.

use anyhow::anyhow;
use futures::future::join_all;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use crate::aws::NetworkOps;
use crate::planner::{PlannedRouteTable, PlannedSubnet, TopologyPlan};
use crate::topology::{NatState, RouteTable, RouteTarget, Subnet, SubnetTier, Topology};
use crate::wait::{wait_for_state, WaitConfig};

/// Where in the provisioning sequence a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    Vpc,
    InternetGateway,
    PublicZones,
    NatGateway,
    PrivateZones,
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProvisionStep::Vpc => "vpc",
            ProvisionStep::InternetGateway => "internet-gateway",
            ProvisionStep::PublicZones => "public-zones",
            ProvisionStep::NatGateway => "nat-gateway",
            ProvisionStep::PrivateZones => "private-zones",
        };
        f.write_str(s)
    }
}

/// A provisioning failure, carrying everything created before it.
///
/// `partial` lists every resource that was successfully created,
/// including siblings of the failing task in a concurrent phase. None
/// of them are rolled back.
#[derive(Debug, Error)]
#[error("Provisioning topology {} failed at step {step}", partial.topology_id)]
pub struct ProvisionError {
    pub step: ProvisionStep,
    pub partial: Topology,
    #[source]
    pub source: anyhow::Error,
}

/// Outcome of one zone's public-phase fan-out task.
#[derive(Default)]
struct PublicZoneOutcome {
    public_subnet: Option<Subnet>,
    private_subnet: Option<Subnet>,
    route_table: Option<RouteTable>,
    error: Option<anyhow::Error>,
}

/// Outcome of one zone's private-phase fan-out task.
#[derive(Default)]
struct PrivateZoneOutcome {
    route_table: Option<RouteTable>,
    error: Option<anyhow::Error>,
}

/// Orchestrates topology creation against a [`NetworkOps`] backend.
pub struct ProvisionEngine<C> {
    net: C,
    nat_wait: WaitConfig,
}

impl<C: NetworkOps> ProvisionEngine<C> {
    pub fn new(net: C) -> Self {
        Self {
            net,
            nat_wait: WaitConfig::default(),
        }
    }

    /// Override the NAT gateway activation wait.
    pub fn with_nat_wait(mut self, config: WaitConfig) -> Self {
        self.nat_wait = config;
        self
    }

    /// Provision the planned topology.
    ///
    /// `vpc_name` becomes the VPC's `Name` tag and the prefix for the
    /// gateway and address names. Cancellation only interrupts the NAT
    /// activation wait; resources already requested are left in place.
    pub async fn provision(
        &self,
        plan: &TopologyPlan,
        vpc_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Topology, ProvisionError> {
        let topology_id = Uuid::now_v7().to_string();
        let mut topo = Topology::new(&topology_id, &plan.vpc_cidr, &plan.zones);

        info!(
            topology_id = %topology_id,
            zones = plan.zone_count(),
            cidr = %plan.vpc_cidr,
            "Provisioning topology"
        );

        // 1. VPC
        let vpc_id = self
            .net
            .create_vpc(&plan.vpc_cidr, vpc_name, &topology_id)
            .await
            .map_err(|e| self.fail(ProvisionStep::Vpc, &topo, e))?;
        topo.vpc_id = Some(vpc_id.clone());

        // 2. Internet gateway, attached
        let igw_id = self
            .net
            .create_internet_gateway(&format!("{vpc_name}-igw"), &topology_id)
            .await
            .map_err(|e| self.fail(ProvisionStep::InternetGateway, &topo, e))?;
        topo.internet_gateway_id = Some(igw_id.clone());
        self.net
            .attach_internet_gateway(&igw_id, &vpc_id)
            .await
            .map_err(|e| self.fail(ProvisionStep::InternetGateway, &topo, e))?;

        // 3. Per-zone public networking, concurrently
        let outcomes = join_all((0..plan.zone_count()).map(|i| {
            self.provision_public_zone(
                &vpc_id,
                &igw_id,
                &topology_id,
                &plan.public_subnets[i],
                &plan.private_subnets[i],
                &plan.public_route_tables[i],
            )
        }))
        .await;

        let mut first_error = None;
        for outcome in outcomes {
            topo.public_subnets.extend(outcome.public_subnet);
            topo.private_subnets.extend(outcome.private_subnet);
            topo.route_tables.extend(outcome.route_table);
            if first_error.is_none() {
                first_error = outcome.error;
            }
        }
        if let Some(e) = first_error {
            return Err(self.fail(ProvisionStep::PublicZones, &topo, e));
        }

        // 4. One NAT gateway on the first public subnet, waited to available
        let nat_result = self.provision_nat(&mut topo, vpc_name, cancel).await;
        let nat_id = match nat_result {
            Ok(id) => id,
            Err(e) => return Err(self.fail(ProvisionStep::NatGateway, &topo, e)),
        };

        // 5. Per-zone private networking, concurrently
        let outcomes = join_all((0..plan.zone_count()).map(|i| {
            self.provision_private_zone(
                &vpc_id,
                &nat_id,
                &topology_id,
                &topo.private_subnets[i],
                &plan.private_route_tables[i],
            )
        }))
        .await;

        let mut first_error = None;
        for outcome in outcomes {
            topo.route_tables.extend(outcome.route_table);
            if first_error.is_none() {
                first_error = outcome.error;
            }
        }
        if let Some(e) = first_error {
            return Err(self.fail(ProvisionStep::PrivateZones, &topo, e));
        }

        info!(topology_id = %topo.topology_id, vpc_id = %vpc_id, "Topology provisioned");
        debug_assert!(topo.is_complete());
        Ok(topo)
    }

    fn fail(&self, step: ProvisionStep, topo: &Topology, source: anyhow::Error) -> ProvisionError {
        error!(
            topology_id = %topo.topology_id,
            step = %step,
            error = %source,
            "Provisioning failed, partial topology left in place"
        );
        ProvisionError {
            step,
            partial: topo.clone(),
            source,
        }
    }

    async fn provision_public_zone(
        &self,
        vpc_id: &str,
        igw_id: &str,
        topology_id: &str,
        public: &PlannedSubnet,
        private: &PlannedSubnet,
        rt_plan: &PlannedRouteTable,
    ) -> PublicZoneOutcome {
        let mut out = PublicZoneOutcome::default();

        let subnet_id = match self
            .net
            .create_subnet(vpc_id, &public.cidr_block, &public.zone, &public.name, topology_id)
            .await
        {
            Ok(id) => {
                out.public_subnet = Some(Subnet {
                    id: id.clone(),
                    zone: public.zone.clone(),
                    cidr_block: public.cidr_block.clone(),
                    tier: SubnetTier::Public,
                });
                id
            }
            Err(e) => {
                out.error = Some(e);
                return out;
            }
        };

        let rt_id = match self
            .net
            .create_route_table(vpc_id, &rt_plan.name, topology_id)
            .await
        {
            Ok(id) => {
                out.route_table = Some(RouteTable {
                    id: id.clone(),
                    tier: SubnetTier::Public,
                    associated_subnet_id: None,
                    default_route: None,
                });
                id
            }
            Err(e) => {
                out.error = Some(e);
                return out;
            }
        };

        let target = RouteTarget::InternetGateway(igw_id.to_string());
        if let Err(e) = self.net.create_default_route(&rt_id, &target).await {
            out.error = Some(e);
            return out;
        }
        if let Some(rt) = out.route_table.as_mut() {
            rt.default_route = Some(target);
        }

        match self.net.associate_route_table(&rt_id, &subnet_id).await {
            Ok(_association_id) => {
                if let Some(rt) = out.route_table.as_mut() {
                    rt.associated_subnet_id = Some(subnet_id);
                }
            }
            Err(e) => {
                out.error = Some(e);
                return out;
            }
        }

        match self
            .net
            .create_subnet(
                vpc_id,
                &private.cidr_block,
                &private.zone,
                &private.name,
                topology_id,
            )
            .await
        {
            Ok(id) => {
                out.private_subnet = Some(Subnet {
                    id,
                    zone: private.zone.clone(),
                    cidr_block: private.cidr_block.clone(),
                    tier: SubnetTier::Private,
                });
            }
            Err(e) => out.error = Some(e),
        }

        out
    }

    /// Allocate the Elastic IP, create the NAT gateway on the first
    /// public subnet, and wait until it is available.
    async fn provision_nat(
        &self,
        topo: &mut Topology,
        vpc_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> anyhow::Result<String> {
        let topology_id = topo.topology_id.clone();
        let anchor_subnet = topo
            .public_subnets
            .first()
            .ok_or_else(|| anyhow!("No public subnet to anchor the NAT gateway"))?
            .id
            .clone();

        let allocation_id = self
            .net
            .allocate_address(&format!("{vpc_name}-nat-eip"), &topology_id)
            .await?;
        topo.eip_allocation_id = Some(allocation_id.clone());

        let nat_id = self
            .net
            .create_nat_gateway(
                &anchor_subnet,
                &allocation_id,
                &format!("{vpc_name}-nat"),
                &topology_id,
            )
            .await?;
        topo.nat_gateway_id = Some(nat_id.clone());

        info!(nat_gateway_id = %nat_id, "Waiting for NAT gateway to become available");
        let state = wait_for_state(
            self.nat_wait.clone(),
            cancel,
            || async {
                let info = self.net.describe_nat_gateway(&nat_id).await?;
                Ok(info.state)
            },
            NatState::is_terminal,
            &nat_id,
        )
        .await?;

        if state != NatState::Available {
            return Err(anyhow!(
                "NAT gateway {nat_id} entered terminal state {state} instead of available"
            ));
        }

        Ok(nat_id)
    }

    async fn provision_private_zone(
        &self,
        vpc_id: &str,
        nat_id: &str,
        topology_id: &str,
        private_subnet: &Subnet,
        rt_plan: &PlannedRouteTable,
    ) -> PrivateZoneOutcome {
        let mut out = PrivateZoneOutcome::default();

        let rt_id = match self
            .net
            .create_route_table(vpc_id, &rt_plan.name, topology_id)
            .await
        {
            Ok(id) => {
                out.route_table = Some(RouteTable {
                    id: id.clone(),
                    tier: SubnetTier::Private,
                    associated_subnet_id: None,
                    default_route: None,
                });
                id
            }
            Err(e) => {
                out.error = Some(e);
                return out;
            }
        };

        let target = RouteTarget::NatGateway(nat_id.to_string());
        if let Err(e) = self.net.create_default_route(&rt_id, &target).await {
            out.error = Some(e);
            return out;
        }
        if let Some(rt) = out.route_table.as_mut() {
            rt.default_route = Some(target);
        }

        match self
            .net
            .associate_route_table(&rt_id, &private_subnet.id)
            .await
        {
            Ok(_association_id) => {
                if let Some(rt) = out.route_table.as_mut() {
                    rt.associated_subnet_id = Some(private_subnet.id.clone());
                }
            }
            Err(e) => out.error = Some(e),
        }

        out
    }
}
