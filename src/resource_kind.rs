//! Managed resource kinds and teardown ordering
//!
//! Resources must be deleted in reverse dependency order: a route
//! referencing a NAT gateway blocks that gateway's deletion, a subnet
//! hosting a NAT gateway blocks the subnet's deletion, and everything
//! blocks the VPC.

use serde::Serialize;

/// Types of network resources managed by tiernet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A default route inside a route table
    Route,
    /// NAT gateway (blocked by routes referencing it)
    NatGateway,
    /// Elastic IP (released only after its NAT gateway is deleted)
    ElasticIp,
    /// Route table (the VPC main table is never managed)
    RouteTable,
    /// Subnet (blocked by the NAT gateway it hosts)
    Subnet,
    /// Internet gateway (detached before deletion)
    InternetGateway,
    /// The VPC itself, deleted last
    Vpc,
}

impl ResourceKind {
    /// Get teardown priority (lower number = delete first)
    ///
    /// - 0: NAT-targeted routes (breaks the NAT dependency edge)
    /// - 1: NAT gateways
    /// - 2: Elastic IPs (not auto-released by NAT deletion)
    /// - 3: Non-main route tables
    /// - 4: Subnets
    /// - 5: Internet gateways
    /// - 6: VPC
    pub fn teardown_priority(self) -> u8 {
        match self {
            ResourceKind::Route => 0,
            ResourceKind::NatGateway => 1,
            ResourceKind::ElasticIp => 2,
            ResourceKind::RouteTable => 3,
            ResourceKind::Subnet => 4,
            ResourceKind::InternetGateway => 5,
            ResourceKind::Vpc => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Route => "route",
            ResourceKind::NatGateway => "nat-gateway",
            ResourceKind::ElasticIp => "elastic-ip",
            ResourceKind::RouteTable => "route-table",
            ResourceKind::Subnet => "subnet",
            ResourceKind::InternetGateway => "internet-gateway",
            ResourceKind::Vpc => "vpc",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
