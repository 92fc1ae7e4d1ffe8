//! Network topology records
//!
//! `Topology` is the record handed to downstream tier deployers after
//! provisioning. The engine keeps no reference to it once returned.

use serde::{Deserialize, Serialize};

/// Which traffic tier a subnet or route table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetTier {
    /// Routed to the internet gateway
    Public,
    /// Routed through the NAT gateway
    Private,
}

impl std::fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnetTier::Public => write!(f, "public"),
            SubnetTier::Private => write!(f, "private"),
        }
    }
}

/// A provisioned subnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub zone: String,
    pub cidr_block: String,
    pub tier: SubnetTier,
}

/// Target of a route table's default route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway(String),
    NatGateway(String),
}

impl RouteTarget {
    pub fn id(&self) -> &str {
        match self {
            RouteTarget::InternetGateway(id) | RouteTarget::NatGateway(id) => id,
        }
    }
}

/// A provisioned route table.
///
/// `associated_subnet_id` and `default_route` are `None` only in a
/// partially-built topology, when provisioning aborted between creating
/// the table and wiring it up. Invariant once complete: public tables
/// route to the internet gateway, private tables to the NAT gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    pub id: String,
    pub tier: SubnetTier,
    pub associated_subnet_id: Option<String>,
    pub default_route: Option<RouteTarget>,
}

/// Lifecycle state of a NAT gateway as reported by EC2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatState {
    Pending,
    Available,
    Failed,
    Deleting,
    Deleted,
    /// State string the SDK does not model (forward compatibility)
    Other(String),
}

impl NatState {
    /// Terminal states for activation: the poller stops on any of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NatState::Available | NatState::Failed | NatState::Deleted
        )
    }

    /// True once the gateway is fully gone (teardown's terminal state).
    pub fn is_gone(&self) -> bool {
        matches!(self, NatState::Deleted | NatState::Failed)
    }
}

impl From<&aws_sdk_ec2::types::NatGatewayState> for NatState {
    fn from(state: &aws_sdk_ec2::types::NatGatewayState) -> Self {
        use aws_sdk_ec2::types::NatGatewayState as S;
        match state {
            S::Pending => NatState::Pending,
            S::Available => NatState::Available,
            S::Failed => NatState::Failed,
            S::Deleting => NatState::Deleting,
            S::Deleted => NatState::Deleted,
            other => NatState::Other(other.as_str().to_string()),
        }
    }
}

impl std::fmt::Display for NatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NatState::Pending => write!(f, "pending"),
            NatState::Available => write!(f, "available"),
            NatState::Failed => write!(f, "failed"),
            NatState::Deleting => write!(f, "deleting"),
            NatState::Deleted => write!(f, "deleted"),
            NatState::Other(s) => write!(f, "{s}"),
        }
    }
}

/// The full set of identifiers for a provisioned network topology.
///
/// Gateway and address fields are `None` only when this record describes
/// a partially-built topology surfaced by a provisioning failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub topology_id: String,
    pub vpc_id: Option<String>,
    pub cidr_block: String,
    pub zones: Vec<String>,
    pub public_subnets: Vec<Subnet>,
    pub private_subnets: Vec<Subnet>,
    pub internet_gateway_id: Option<String>,
    pub nat_gateway_id: Option<String>,
    pub eip_allocation_id: Option<String>,
    pub route_tables: Vec<RouteTable>,
}

impl Topology {
    /// Empty topology shell for a plan about to be provisioned.
    pub fn new(topology_id: &str, cidr_block: &str, zones: &[String]) -> Self {
        Self {
            topology_id: topology_id.to_string(),
            vpc_id: None,
            cidr_block: cidr_block.to_string(),
            zones: zones.to_vec(),
            public_subnets: Vec::new(),
            private_subnets: Vec::new(),
            internet_gateway_id: None,
            nat_gateway_id: None,
            eip_allocation_id: None,
            route_tables: Vec::new(),
        }
    }

    /// True when every planned resource was created and wired up.
    pub fn is_complete(&self) -> bool {
        let zone_count = self.zones.len();
        self.vpc_id.is_some()
            && self.internet_gateway_id.is_some()
            && self.nat_gateway_id.is_some()
            && self.eip_allocation_id.is_some()
            && self.public_subnets.len() == zone_count
            && self.private_subnets.len() == zone_count
            && self.route_tables.len() == zone_count * 2
            && self
                .route_tables
                .iter()
                .all(|rt| rt.associated_subnet_id.is_some() && rt.default_route.is_some())
    }
}
