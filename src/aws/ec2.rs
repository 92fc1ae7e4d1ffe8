//! EC2 network resource client
//!
//! One method per EC2 network call used by the provisioning and teardown
//! engines. Every create tags the resource (see [`crate::aws::tags`]),
//! every call classifies SDK errors (see [`crate::aws::error`]), and
//! rate-limited calls are retried with backoff before any error is
//! surfaced.

use crate::aws::context::AwsContext;
use crate::aws::error::{classify_anyhow_error, classify_sdk};
use crate::aws::tags::{self, TAG_TOOL, TAG_TOOL_VALUE, TAG_TOPOLOGY_ID};
use crate::topology::{NatState, RouteTarget};
use anyhow::{Context as _, Result};
use aws_sdk_ec2::types::{DomainType, Filter, ResourceType};
use aws_sdk_ec2::Client;
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tag filter selecting the VPC(s) a teardown should operate on.
///
/// Teardown never takes a live `Topology`; it rediscovers resources from
/// tags so it works against previously-provisioned state.
#[derive(Debug, Clone, Default)]
pub struct VpcSelector {
    /// Restrict to a single topology by its `tiernet:topology-id` tag
    pub topology_id: Option<String>,
    /// Restrict to VPCs whose `Name` tag matches one of these values
    pub names: Vec<String>,
}

impl VpcSelector {
    /// Select every VPC created by this tool.
    pub fn all() -> Self {
        Self::default()
    }

    /// Select the VPC(s) of a single topology.
    pub fn topology(topology_id: impl Into<String>) -> Self {
        Self {
            topology_id: Some(topology_id.into()),
            names: Vec::new(),
        }
    }

    /// Select VPCs by `Name` tag values.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topology_id: None,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn filters(&self) -> Vec<Filter> {
        let mut filters = vec![Filter::builder()
            .name(format!("tag:{}", TAG_TOOL))
            .values(TAG_TOOL_VALUE)
            .build()];
        if let Some(ref topology_id) = self.topology_id {
            filters.push(
                Filter::builder()
                    .name(format!("tag:{}", TAG_TOPOLOGY_ID))
                    .values(topology_id)
                    .build(),
            );
        }
        if !self.names.is_empty() {
            let mut filter = Filter::builder().name("tag:Name");
            for name in &self.names {
                filter = filter.values(name);
            }
            filters.push(filter.build());
        }
        filters
    }
}

/// A route discovered inside an existing route table.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub destination_cidr: String,
    pub gateway_id: Option<String>,
    pub nat_gateway_id: Option<String>,
}

impl RouteInfo {
    /// True when this route's target is a NAT gateway.
    pub fn targets_nat(&self) -> bool {
        self.nat_gateway_id.is_some()
    }

    /// True when this route's target is an internet gateway.
    ///
    /// The VPC-local route also carries a `gateway_id` (the literal
    /// "local") and must never be touched.
    pub fn targets_igw(&self) -> bool {
        self.gateway_id
            .as_deref()
            .is_some_and(|g| g.starts_with("igw-"))
    }
}

/// A route table discovered in an existing VPC.
#[derive(Debug, Clone)]
pub struct RouteTableInfo {
    pub id: String,
    /// Set when any association carries the `Main` flag; the main table
    /// is provider-managed and never deleted.
    pub is_main: bool,
    /// Subnet association ids (the main association has none)
    pub association_ids: Vec<String>,
    pub routes: Vec<RouteInfo>,
}

/// A NAT gateway discovered in an existing VPC, or described by id.
#[derive(Debug, Clone)]
pub struct NatGatewayInfo {
    pub id: String,
    pub state: NatState,
    /// Elastic IP allocation ids attached to this gateway
    pub allocation_ids: Vec<String>,
}

/// Retry an EC2 call while it is being rate limited.
///
/// Throttling is transient and never surfaced to the engines; any other
/// error passes through on the first attempt.
async fn retry_throttled<T, F, Fut>(op: &'static str, call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    call.retry(
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(20))
            .with_max_times(6),
    )
    .when(|e: &anyhow::Error| classify_anyhow_error(e).is_throttled())
    .notify(move |e: &anyhow::Error, dur: Duration| {
        warn!(op = op, delay = ?dur, error = %e, "Rate limited, backing off");
    })
    .await
}

/// EC2 client for managing network topology resources
pub struct Ec2NetworkClient {
    client: Client,
}

impl Ec2NetworkClient {
    /// Create a new client (loads AWS config from the environment)
    pub async fn new(region: &str) -> Result<Self> {
        let ctx = AwsContext::new(region, None).await;
        Ok(Self::from_context(&ctx))
    }

    /// Create a client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }

    /// List the names of availability zones usable in this region.
    pub async fn describe_availability_zones(&self) -> Result<Vec<String>> {
        let response = retry_throttled("DescribeAvailabilityZones", || async {
            self.client
                .describe_availability_zones()
                .filters(
                    Filter::builder()
                        .name("state")
                        .values("available")
                        .build(),
                )
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe availability zones")
        })
        .await?;

        let zones: Vec<String> = response
            .availability_zones()
            .iter()
            .filter_map(|az| az.zone_name())
            .map(|z| z.to_string())
            .collect();

        debug!(count = zones.len(), "Found availability zones");
        Ok(zones)
    }

    /// Create a VPC with the given CIDR block.
    pub async fn create_vpc(
        &self,
        cidr_block: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        info!(cidr = %cidr_block, name = %name, "Creating VPC");

        let response = retry_throttled("CreateVpc", || async {
            self.client
                .create_vpc()
                .cidr_block(cidr_block)
                .tag_specifications(tags::tag_spec(ResourceType::Vpc, name, topology_id))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create VPC")
        })
        .await?;

        let vpc_id = response
            .vpc()
            .and_then(|v| v.vpc_id())
            .context("No VPC ID in response")?
            .to_string();

        info!(vpc_id = %vpc_id, "VPC created");
        Ok(vpc_id)
    }

    /// Delete a VPC.
    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        info!(vpc_id = %vpc_id, "Deleting VPC");

        retry_throttled("DeleteVpc", || async {
            self.client
                .delete_vpc()
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete VPC")?;
            Ok(())
        })
        .await
    }

    /// Find VPC ids matching a tag selector.
    pub async fn find_vpcs(&self, selector: &VpcSelector) -> Result<Vec<String>> {
        let response = retry_throttled("DescribeVpcs", || async {
            self.client
                .describe_vpcs()
                .set_filters(Some(selector.filters()))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe VPCs")
        })
        .await?;

        let vpc_ids: Vec<String> = response
            .vpcs()
            .iter()
            .filter_map(|v| v.vpc_id())
            .map(|id| id.to_string())
            .collect();

        debug!(count = vpc_ids.len(), selector = ?selector, "Matched VPCs");
        Ok(vpc_ids)
    }

    /// Create a subnet in the given zone.
    pub async fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        zone: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        info!(vpc_id = %vpc_id, cidr = %cidr_block, zone = %zone, name = %name, "Creating subnet");

        let response = retry_throttled("CreateSubnet", || async {
            self.client
                .create_subnet()
                .vpc_id(vpc_id)
                .cidr_block(cidr_block)
                .availability_zone(zone)
                .tag_specifications(tags::tag_spec(ResourceType::Subnet, name, topology_id))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create subnet")
        })
        .await?;

        let subnet_id = response
            .subnet()
            .and_then(|s| s.subnet_id())
            .context("No subnet ID in response")?
            .to_string();

        info!(subnet_id = %subnet_id, "Subnet created");
        Ok(subnet_id)
    }

    /// Delete a subnet.
    pub async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        info!(subnet_id = %subnet_id, "Deleting subnet");

        retry_throttled("DeleteSubnet", || async {
            self.client
                .delete_subnet()
                .subnet_id(subnet_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete subnet")?;
            Ok(())
        })
        .await
    }

    /// List the subnet ids of a VPC.
    pub async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<String>> {
        let response = retry_throttled("DescribeSubnets", || async {
            self.client
                .describe_subnets()
                .filters(Filter::builder().name("vpc-id").values(vpc_id).build())
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe subnets")
        })
        .await?;

        Ok(response
            .subnets()
            .iter()
            .filter_map(|s| s.subnet_id())
            .map(|id| id.to_string())
            .collect())
    }

    /// Create an internet gateway (not yet attached).
    pub async fn create_internet_gateway(
        &self,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        info!(name = %name, "Creating internet gateway");

        let response = retry_throttled("CreateInternetGateway", || async {
            self.client
                .create_internet_gateway()
                .tag_specifications(tags::tag_spec(
                    ResourceType::InternetGateway,
                    name,
                    topology_id,
                ))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create internet gateway")
        })
        .await?;

        let igw_id = response
            .internet_gateway()
            .and_then(|igw| igw.internet_gateway_id())
            .context("No internet gateway ID in response")?
            .to_string();

        info!(igw_id = %igw_id, "Internet gateway created");
        Ok(igw_id)
    }

    /// Attach an internet gateway to a VPC.
    pub async fn attach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        info!(igw_id = %igw_id, vpc_id = %vpc_id, "Attaching internet gateway");

        retry_throttled("AttachInternetGateway", || async {
            self.client
                .attach_internet_gateway()
                .internet_gateway_id(igw_id)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to attach internet gateway")?;
            Ok(())
        })
        .await
    }

    /// Detach an internet gateway from a VPC.
    pub async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        info!(igw_id = %igw_id, vpc_id = %vpc_id, "Detaching internet gateway");

        retry_throttled("DetachInternetGateway", || async {
            self.client
                .detach_internet_gateway()
                .internet_gateway_id(igw_id)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to detach internet gateway")?;
            Ok(())
        })
        .await
    }

    /// Delete an internet gateway.
    pub async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        info!(igw_id = %igw_id, "Deleting internet gateway");

        retry_throttled("DeleteInternetGateway", || async {
            self.client
                .delete_internet_gateway()
                .internet_gateway_id(igw_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete internet gateway")?;
            Ok(())
        })
        .await
    }

    /// List the internet gateway ids attached to a VPC.
    pub async fn list_internet_gateways(&self, vpc_id: &str) -> Result<Vec<String>> {
        let response = retry_throttled("DescribeInternetGateways", || async {
            self.client
                .describe_internet_gateways()
                .filters(
                    Filter::builder()
                        .name("attachment.vpc-id")
                        .values(vpc_id)
                        .build(),
                )
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe internet gateways")
        })
        .await?;

        Ok(response
            .internet_gateways()
            .iter()
            .filter_map(|igw| igw.internet_gateway_id())
            .map(|id| id.to_string())
            .collect())
    }

    /// Create an empty route table in a VPC.
    pub async fn create_route_table(
        &self,
        vpc_id: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        info!(vpc_id = %vpc_id, name = %name, "Creating route table");

        let response = retry_throttled("CreateRouteTable", || async {
            self.client
                .create_route_table()
                .vpc_id(vpc_id)
                .tag_specifications(tags::tag_spec(ResourceType::RouteTable, name, topology_id))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create route table")
        })
        .await?;

        let rt_id = response
            .route_table()
            .and_then(|rt| rt.route_table_id())
            .context("No route table ID in response")?
            .to_string();

        info!(route_table_id = %rt_id, "Route table created");
        Ok(rt_id)
    }

    /// Delete a route table.
    pub async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        info!(route_table_id = %route_table_id, "Deleting route table");

        retry_throttled("DeleteRouteTable", || async {
            self.client
                .delete_route_table()
                .route_table_id(route_table_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete route table")?;
            Ok(())
        })
        .await
    }

    /// Describe every route table in a VPC, including the main table.
    pub async fn list_route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTableInfo>> {
        let response = retry_throttled("DescribeRouteTables", || async {
            self.client
                .describe_route_tables()
                .filters(Filter::builder().name("vpc-id").values(vpc_id).build())
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe route tables")
        })
        .await?;

        let tables = response
            .route_tables()
            .iter()
            .filter_map(|rt| {
                let id = rt.route_table_id()?.to_string();
                let is_main = rt
                    .associations()
                    .iter()
                    .any(|a| a.main().unwrap_or(false));
                let association_ids = rt
                    .associations()
                    .iter()
                    .filter(|a| !a.main().unwrap_or(false))
                    .filter_map(|a| a.route_table_association_id())
                    .map(|id| id.to_string())
                    .collect();
                let routes = rt
                    .routes()
                    .iter()
                    .filter_map(|r| {
                        Some(RouteInfo {
                            destination_cidr: r.destination_cidr_block()?.to_string(),
                            gateway_id: r.gateway_id().map(|g| g.to_string()),
                            nat_gateway_id: r.nat_gateway_id().map(|n| n.to_string()),
                        })
                    })
                    .collect();
                Some(RouteTableInfo {
                    id,
                    is_main,
                    association_ids,
                    routes,
                })
            })
            .collect();

        Ok(tables)
    }

    /// Add a default (`0.0.0.0/0`) route to a route table.
    pub async fn create_default_route(
        &self,
        route_table_id: &str,
        target: &RouteTarget,
    ) -> Result<()> {
        info!(route_table_id = %route_table_id, target = ?target, "Creating default route");

        retry_throttled("CreateRoute", || async {
            let request = self
                .client
                .create_route()
                .route_table_id(route_table_id)
                .destination_cidr_block("0.0.0.0/0");
            let request = match target {
                RouteTarget::InternetGateway(id) => request.gateway_id(id),
                RouteTarget::NatGateway(id) => request.nat_gateway_id(id),
            };
            request
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create route")?;
            Ok(())
        })
        .await
    }

    /// Delete a route by its destination CIDR.
    pub async fn delete_route(&self, route_table_id: &str, destination_cidr: &str) -> Result<()> {
        info!(route_table_id = %route_table_id, destination = %destination_cidr, "Deleting route");

        retry_throttled("DeleteRoute", || async {
            self.client
                .delete_route()
                .route_table_id(route_table_id)
                .destination_cidr_block(destination_cidr)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete route")?;
            Ok(())
        })
        .await
    }

    /// Associate a route table with a subnet; returns the association id.
    pub async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<String> {
        info!(route_table_id = %route_table_id, subnet_id = %subnet_id, "Associating route table");

        let response = retry_throttled("AssociateRouteTable", || async {
            self.client
                .associate_route_table()
                .route_table_id(route_table_id)
                .subnet_id(subnet_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to associate route table")
        })
        .await?;

        let association_id = response
            .association_id()
            .context("No association ID in response")?
            .to_string();

        Ok(association_id)
    }

    /// Remove a route table association.
    pub async fn disassociate_route_table(&self, association_id: &str) -> Result<()> {
        info!(association_id = %association_id, "Disassociating route table");

        retry_throttled("DisassociateRouteTable", || async {
            self.client
                .disassociate_route_table()
                .association_id(association_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to disassociate route table")?;
            Ok(())
        })
        .await
    }

    /// Allocate a VPC-domain Elastic IP; returns the allocation id.
    pub async fn allocate_address(&self, name: &str, topology_id: &str) -> Result<String> {
        info!(name = %name, "Allocating Elastic IP");

        let response = retry_throttled("AllocateAddress", || async {
            self.client
                .allocate_address()
                .domain(DomainType::Vpc)
                .tag_specifications(tags::tag_spec(ResourceType::ElasticIp, name, topology_id))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to allocate Elastic IP")
        })
        .await?;

        let allocation_id = response
            .allocation_id()
            .context("No allocation ID in response")?
            .to_string();

        info!(allocation_id = %allocation_id, "Elastic IP allocated");
        Ok(allocation_id)
    }

    /// Release an Elastic IP.
    pub async fn release_address(&self, allocation_id: &str) -> Result<()> {
        info!(allocation_id = %allocation_id, "Releasing Elastic IP");

        retry_throttled("ReleaseAddress", || async {
            self.client
                .release_address()
                .allocation_id(allocation_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to release Elastic IP")?;
            Ok(())
        })
        .await
    }

    /// Create a NAT gateway in a subnet, backed by an allocated Elastic IP.
    ///
    /// The gateway starts in `pending` state; callers must wait for
    /// `available` before routing through it.
    pub async fn create_nat_gateway(
        &self,
        subnet_id: &str,
        allocation_id: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        info!(subnet_id = %subnet_id, allocation_id = %allocation_id, name = %name, "Creating NAT gateway");

        let response = retry_throttled("CreateNatGateway", || async {
            self.client
                .create_nat_gateway()
                .subnet_id(subnet_id)
                .allocation_id(allocation_id)
                .tag_specifications(tags::tag_spec(ResourceType::Natgateway, name, topology_id))
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to create NAT gateway")
        })
        .await?;

        let nat_id = response
            .nat_gateway()
            .and_then(|nat| nat.nat_gateway_id())
            .context("No NAT gateway ID in response")?
            .to_string();

        info!(nat_gateway_id = %nat_id, "NAT gateway created");
        Ok(nat_id)
    }

    /// Delete a NAT gateway (asynchronous on the provider side).
    pub async fn delete_nat_gateway(&self, nat_gateway_id: &str) -> Result<()> {
        info!(nat_gateway_id = %nat_gateway_id, "Deleting NAT gateway");

        retry_throttled("DeleteNatGateway", || async {
            self.client
                .delete_nat_gateway()
                .nat_gateway_id(nat_gateway_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to delete NAT gateway")?;
            Ok(())
        })
        .await
    }

    /// Describe a single NAT gateway by id.
    pub async fn describe_nat_gateway(&self, nat_gateway_id: &str) -> Result<NatGatewayInfo> {
        let response = retry_throttled("DescribeNatGateways", || async {
            self.client
                .describe_nat_gateways()
                .nat_gateway_ids(nat_gateway_id)
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe NAT gateway")
        })
        .await?;

        let nat = response
            .nat_gateways()
            .first()
            .context("NAT gateway not in response")?;

        nat_gateway_info(nat)
    }

    /// List every NAT gateway in a VPC, regardless of state.
    pub async fn list_nat_gateways(&self, vpc_id: &str) -> Result<Vec<NatGatewayInfo>> {
        let response = retry_throttled("DescribeNatGateways", || async {
            self.client
                .describe_nat_gateways()
                .filter(Filter::builder().name("vpc-id").values(vpc_id).build())
                .send()
                .await
                .map_err(classify_sdk)
                .context("Failed to describe NAT gateways")
        })
        .await?;

        response
            .nat_gateways()
            .iter()
            .filter(|nat| nat.nat_gateway_id().is_some())
            .map(nat_gateway_info)
            .collect()
    }
}

fn nat_gateway_info(nat: &aws_sdk_ec2::types::NatGateway) -> Result<NatGatewayInfo> {
    let id = nat
        .nat_gateway_id()
        .context("No NAT gateway ID in response")?
        .to_string();
    Ok(NatGatewayInfo {
        id,
        state: nat
            .state()
            .map(NatState::from)
            .unwrap_or(NatState::Pending),
        allocation_ids: nat
            .nat_gateway_addresses()
            .iter()
            .filter_map(|addr| addr.allocation_id())
            .map(|id| id.to_string())
            .collect(),
    })
}

/// Trait over the cloud network calls the engines make.
///
/// Abstracts `Ec2NetworkClient` so the provisioning and teardown engines
/// can be driven by test doubles without hitting real AWS.
pub trait NetworkOps: Send + Sync {
    fn describe_availability_zones(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn create_vpc(
        &self,
        cidr_block: &str,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn delete_vpc(&self, vpc_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn find_vpcs(&self, selector: &VpcSelector)
        -> impl Future<Output = Result<Vec<String>>> + Send;

    fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        zone: &str,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn delete_subnet(&self, subnet_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn list_subnets(&self, vpc_id: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn create_internet_gateway(
        &self,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn attach_internet_gateway(
        &self,
        igw_id: &str,
        vpc_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn detach_internet_gateway(
        &self,
        igw_id: &str,
        vpc_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_internet_gateway(&self, igw_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn list_internet_gateways(
        &self,
        vpc_id: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn create_route_table(
        &self,
        vpc_id: &str,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn delete_route_table(&self, route_table_id: &str)
        -> impl Future<Output = Result<()>> + Send;

    fn list_route_tables(
        &self,
        vpc_id: &str,
    ) -> impl Future<Output = Result<Vec<RouteTableInfo>>> + Send;

    fn create_default_route(
        &self,
        route_table_id: &str,
        target: &RouteTarget,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn disassociate_route_table(
        &self,
        association_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn allocate_address(
        &self,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn release_address(&self, allocation_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn create_nat_gateway(
        &self,
        subnet_id: &str,
        allocation_id: &str,
        name: &str,
        topology_id: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    fn delete_nat_gateway(&self, nat_gateway_id: &str)
        -> impl Future<Output = Result<()>> + Send;

    fn describe_nat_gateway(
        &self,
        nat_gateway_id: &str,
    ) -> impl Future<Output = Result<NatGatewayInfo>> + Send;

    fn list_nat_gateways(
        &self,
        vpc_id: &str,
    ) -> impl Future<Output = Result<Vec<NatGatewayInfo>>> + Send;
}

impl NetworkOps for Ec2NetworkClient {
    async fn describe_availability_zones(&self) -> Result<Vec<String>> {
        Ec2NetworkClient::describe_availability_zones(self).await
    }

    async fn create_vpc(&self, cidr_block: &str, name: &str, topology_id: &str) -> Result<String> {
        Ec2NetworkClient::create_vpc(self, cidr_block, name, topology_id).await
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        Ec2NetworkClient::delete_vpc(self, vpc_id).await
    }

    async fn find_vpcs(&self, selector: &VpcSelector) -> Result<Vec<String>> {
        Ec2NetworkClient::find_vpcs(self, selector).await
    }

    async fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        zone: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        Ec2NetworkClient::create_subnet(self, vpc_id, cidr_block, zone, name, topology_id).await
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        Ec2NetworkClient::delete_subnet(self, subnet_id).await
    }

    async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<String>> {
        Ec2NetworkClient::list_subnets(self, vpc_id).await
    }

    async fn create_internet_gateway(&self, name: &str, topology_id: &str) -> Result<String> {
        Ec2NetworkClient::create_internet_gateway(self, name, topology_id).await
    }

    async fn attach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        Ec2NetworkClient::attach_internet_gateway(self, igw_id, vpc_id).await
    }

    async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        Ec2NetworkClient::detach_internet_gateway(self, igw_id, vpc_id).await
    }

    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        Ec2NetworkClient::delete_internet_gateway(self, igw_id).await
    }

    async fn list_internet_gateways(&self, vpc_id: &str) -> Result<Vec<String>> {
        Ec2NetworkClient::list_internet_gateways(self, vpc_id).await
    }

    async fn create_route_table(
        &self,
        vpc_id: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        Ec2NetworkClient::create_route_table(self, vpc_id, name, topology_id).await
    }

    async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        Ec2NetworkClient::delete_route_table(self, route_table_id).await
    }

    async fn list_route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTableInfo>> {
        Ec2NetworkClient::list_route_tables(self, vpc_id).await
    }

    async fn create_default_route(
        &self,
        route_table_id: &str,
        target: &RouteTarget,
    ) -> Result<()> {
        Ec2NetworkClient::create_default_route(self, route_table_id, target).await
    }

    async fn delete_route(&self, route_table_id: &str, destination_cidr: &str) -> Result<()> {
        Ec2NetworkClient::delete_route(self, route_table_id, destination_cidr).await
    }

    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<String> {
        Ec2NetworkClient::associate_route_table(self, route_table_id, subnet_id).await
    }

    async fn disassociate_route_table(&self, association_id: &str) -> Result<()> {
        Ec2NetworkClient::disassociate_route_table(self, association_id).await
    }

    async fn allocate_address(&self, name: &str, topology_id: &str) -> Result<String> {
        Ec2NetworkClient::allocate_address(self, name, topology_id).await
    }

    async fn release_address(&self, allocation_id: &str) -> Result<()> {
        Ec2NetworkClient::release_address(self, allocation_id).await
    }

    async fn create_nat_gateway(
        &self,
        subnet_id: &str,
        allocation_id: &str,
        name: &str,
        topology_id: &str,
    ) -> Result<String> {
        Ec2NetworkClient::create_nat_gateway(self, subnet_id, allocation_id, name, topology_id)
            .await
    }

    async fn delete_nat_gateway(&self, nat_gateway_id: &str) -> Result<()> {
        Ec2NetworkClient::delete_nat_gateway(self, nat_gateway_id).await
    }

    async fn describe_nat_gateway(&self, nat_gateway_id: &str) -> Result<NatGatewayInfo> {
        Ec2NetworkClient::describe_nat_gateway(self, nat_gateway_id).await
    }

    async fn list_nat_gateways(&self, vpc_id: &str) -> Result<Vec<NatGatewayInfo>> {
        Ec2NetworkClient::list_nat_gateways(self, vpc_id).await
    }
}
