//! Tag-filtered topology teardown
//!
//! Rediscovers resources from tags (never from a live `Topology`) and
//! deletes them in reverse dependency order: NAT-targeted routes, NAT
//! gateways, Elastic IPs, non-main route tables, subnets, internet
//! gateways, VPC. Every deletion treats "not found" as success, so a
//! teardown interrupted halfway can simply be re-run.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aws::{classify_anyhow_error, NetworkOps, VpcSelector};
use crate::resource_kind::ResourceKind;
use crate::topology::NatState;
use crate::wait::{wait_for_state, WaitConfig, WaitError};

/// Counts of what a teardown run deleted, skipped, or found missing.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TeardownReport {
    pub vpcs_matched: usize,
    pub routes_deleted: usize,
    pub nat_gateways_deleted: usize,
    pub addresses_released: usize,
    pub route_tables_deleted: usize,
    /// Main tables plus any table EC2 refused to delete
    pub route_tables_skipped: usize,
    pub subnets_deleted: usize,
    pub internet_gateways_deleted: usize,
    pub vpcs_deleted: usize,
    /// Resources that were already absent when we tried to delete them
    pub already_gone: usize,
}

impl std::fmt::Display for TeardownReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Teardown report:")?;
        writeln!(f, "  VPCs matched:              {}", self.vpcs_matched)?;
        writeln!(f, "  Routes deleted:            {}", self.routes_deleted)?;
        writeln!(f, "  NAT gateways deleted:      {}", self.nat_gateways_deleted)?;
        writeln!(f, "  Elastic IPs released:      {}", self.addresses_released)?;
        writeln!(f, "  Route tables deleted:      {}", self.route_tables_deleted)?;
        writeln!(f, "  Route tables skipped:      {}", self.route_tables_skipped)?;
        writeln!(f, "  Subnets deleted:           {}", self.subnets_deleted)?;
        writeln!(f, "  Internet gateways deleted: {}", self.internet_gateways_deleted)?;
        writeln!(f, "  VPCs deleted:              {}", self.vpcs_deleted)?;
        write!(f, "  Already gone:              {}", self.already_gone)
    }
}

/// Absorb a "not found" failure as already-deleted.
///
/// Returns `Ok(true)` when the deletion happened, `Ok(false)` when the
/// resource was already gone; any other error propagates.
fn absorb_not_found(result: Result<()>, report: &mut TeardownReport) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if classify_anyhow_error(&e).is_not_found() => {
            report.already_gone += 1;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Deletes every topology matched by a [`VpcSelector`].
pub struct TeardownEngine<C> {
    net: C,
    nat_wait: WaitConfig,
}

impl<C: NetworkOps> TeardownEngine<C> {
    pub fn new(net: C) -> Self {
        Self {
            net,
            // NAT deletion is asynchronous on the provider side; subnet
            // and VPC deletion fail while a gateway is still deleting.
            nat_wait: WaitConfig::fixed_interval(
                std::time::Duration::from_secs(5),
                std::time::Duration::from_secs(180),
            ),
        }
    }

    /// Override the NAT gateway deletion wait.
    pub fn with_nat_wait(mut self, config: WaitConfig) -> Self {
        self.nat_wait = config;
        self
    }

    /// Tear down every VPC (and its dependents) matching the selector.
    ///
    /// An empty match is not an error; the report comes back all-zero.
    pub async fn teardown(&self, selector: &VpcSelector) -> Result<TeardownReport> {
        let mut report = TeardownReport::default();

        let vpc_ids = self.net.find_vpcs(selector).await?;
        report.vpcs_matched = vpc_ids.len();
        if vpc_ids.is_empty() {
            info!(selector = ?selector, "No VPCs matched, nothing to tear down");
            return Ok(report);
        }

        for vpc_id in &vpc_ids {
            self.teardown_vpc(vpc_id, &mut report).await?;
        }

        info!(vpcs = report.vpcs_deleted, "Teardown finished");
        Ok(report)
    }

    async fn teardown_vpc(&self, vpc_id: &str, report: &mut TeardownReport) -> Result<()> {
        info!(vpc_id = %vpc_id, "Tearing down VPC");

        // 1. NAT-targeted routes, so the gateways become deletable
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::Route, "Removing NAT-targeted routes");
        for table in self.net.list_route_tables(vpc_id).await? {
            for route in table.routes.iter().filter(|r| r.targets_nat()) {
                if absorb_not_found(
                    self.net.delete_route(&table.id, &route.destination_cidr).await,
                    report,
                )? {
                    report.routes_deleted += 1;
                }
            }
        }

        // 2. NAT gateways, remembering which addresses they held
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::NatGateway, "Deleting NAT gateways");
        let nat_gateways = self.net.list_nat_gateways(vpc_id).await?;
        let mut allocation_ids: Vec<String> = Vec::new();
        let mut deleting: Vec<String> = Vec::new();
        for nat in &nat_gateways {
            for alloc in &nat.allocation_ids {
                if !allocation_ids.contains(alloc) {
                    allocation_ids.push(alloc.clone());
                }
            }
            if nat.state.is_gone() {
                continue;
            }
            if nat.state != NatState::Deleting {
                if absorb_not_found(self.net.delete_nat_gateway(&nat.id).await, report)? {
                    report.nat_gateways_deleted += 1;
                }
            }
            deleting.push(nat.id.clone());
        }
        for nat_id in &deleting {
            self.wait_nat_gone(nat_id).await?;
        }

        // 3. Exactly the addresses those gateways held
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::ElasticIp, "Releasing NAT addresses");
        for allocation_id in &allocation_ids {
            if absorb_not_found(self.net.release_address(allocation_id).await, report)? {
                report.addresses_released += 1;
            }
        }

        // 4. Non-main route tables: routes, associations, then the table
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::RouteTable, "Deleting route tables");
        for table in self.net.list_route_tables(vpc_id).await? {
            if table.is_main {
                report.route_tables_skipped += 1;
                continue;
            }
            for route in table
                .routes
                .iter()
                .filter(|r| r.targets_igw() || r.targets_nat())
            {
                if absorb_not_found(
                    self.net.delete_route(&table.id, &route.destination_cidr).await,
                    report,
                )? {
                    report.routes_deleted += 1;
                }
            }
            for association_id in &table.association_ids {
                absorb_not_found(
                    self.net.disassociate_route_table(association_id).await,
                    report,
                )?;
            }
            match self.net.delete_route_table(&table.id).await {
                Ok(()) => report.route_tables_deleted += 1,
                Err(e) => {
                    let class = classify_anyhow_error(&e);
                    if class.is_not_found() {
                        report.already_gone += 1;
                    } else if class.is_dependency_violation() {
                        warn!(route_table_id = %table.id, "Route table still in use, skipping");
                        report.route_tables_skipped += 1;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        // 5. Subnets
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::Subnet, "Deleting subnets");
        for subnet_id in self.net.list_subnets(vpc_id).await? {
            if absorb_not_found(self.net.delete_subnet(&subnet_id).await, report)? {
                report.subnets_deleted += 1;
            }
        }

        // 6. Internet gateways, detached first
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::InternetGateway, "Deleting internet gateways");
        for igw_id in self.net.list_internet_gateways(vpc_id).await? {
            absorb_not_found(
                self.net.detach_internet_gateway(&igw_id, vpc_id).await,
                report,
            )?;
            if absorb_not_found(self.net.delete_internet_gateway(&igw_id).await, report)? {
                report.internet_gateways_deleted += 1;
            }
        }

        // 7. The VPC itself
        debug!(vpc_id = %vpc_id, kind = %ResourceKind::Vpc, "Deleting VPC");
        if absorb_not_found(self.net.delete_vpc(vpc_id).await, report)? {
            report.vpcs_deleted += 1;
        }

        Ok(())
    }

    /// Wait for a deleted NAT gateway to actually disappear.
    ///
    /// A timeout here is non-fatal: the dependent deletions proceed and
    /// the caller can re-run teardown if they fail.
    async fn wait_nat_gone(&self, nat_id: &str) -> Result<()> {
        let result = wait_for_state(
            self.nat_wait.clone(),
            None,
            || async {
                match self.net.describe_nat_gateway(nat_id).await {
                    Ok(info) => Ok(info.state),
                    Err(e) if classify_anyhow_error(&e).is_not_found() => Ok(NatState::Deleted),
                    Err(e) => Err(e),
                }
            },
            NatState::is_gone,
            nat_id,
        )
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(WaitError::Timeout { .. }) => {
                warn!(nat_gateway_id = %nat_id, "NAT gateway still deleting, proceeding anyway");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
