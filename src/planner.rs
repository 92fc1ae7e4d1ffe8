//! Topology planning
//!
//! Pure computation of the desired topology: which zones to use, the
//! CIDR block of every subnet, and the name of every resource. All
//! validation happens here, before any cloud call is made.

use serde::Serialize;
use thiserror::Error;

use crate::topology::SubnetTier;

/// Private subnets sit at a +100 third-octet offset from their public
/// siblings, so both tiers stay disjoint only up to 100 zones.
pub const MAX_ZONES: usize = 100;

/// Plan validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Zone count must be at least 1")]
    InvalidZoneCount,

    #[error("Requested {requested} zones but only {available} are available")]
    InsufficientZones { requested: usize, available: usize },

    #[error("Zone count {0} exceeds the maximum of {MAX_ZONES}")]
    TooManyZones(usize),

    #[error("CIDR base {0:?} is not two dotted octets (expected e.g. \"10.0\")")]
    InvalidCidrBase(String),
}

/// A planned subnet, before any id exists.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSubnet {
    pub name: String,
    pub zone: String,
    pub cidr_block: String,
    pub tier: SubnetTier,
}

/// A planned route table, keyed to its subnet by index.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRouteTable {
    pub name: String,
    pub tier: SubnetTier,
    /// Index into the matching tier's subnet list
    pub subnet_index: usize,
}

/// The desired topology: everything provisioning will create.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyPlan {
    pub vpc_cidr: String,
    pub zones: Vec<String>,
    pub public_subnets: Vec<PlannedSubnet>,
    pub private_subnets: Vec<PlannedSubnet>,
    pub public_route_tables: Vec<PlannedRouteTable>,
    pub private_route_tables: Vec<PlannedRouteTable>,
}

impl TopologyPlan {
    /// Compute the plan for `zone_count` zones out of `available_zones`.
    ///
    /// Zone `i` (0-based) gets public subnet `{base}.{i}.0/24` and
    /// private subnet `{base}.{i+100}.0/24`; the VPC spans
    /// `{base}.0.0/16`.
    pub fn plan(
        zone_count: usize,
        cidr_base: &str,
        available_zones: &[String],
    ) -> Result<Self, PlanError> {
        if zone_count == 0 {
            return Err(PlanError::InvalidZoneCount);
        }
        if zone_count > MAX_ZONES {
            return Err(PlanError::TooManyZones(zone_count));
        }
        if zone_count > available_zones.len() {
            return Err(PlanError::InsufficientZones {
                requested: zone_count,
                available: available_zones.len(),
            });
        }
        validate_cidr_base(cidr_base)?;

        let zones: Vec<String> = available_zones[..zone_count].to_vec();

        let public_subnets = zones
            .iter()
            .enumerate()
            .map(|(i, zone)| PlannedSubnet {
                name: format!("PublicSubnet-{}", i + 1),
                zone: zone.clone(),
                cidr_block: format!("{cidr_base}.{i}.0/24"),
                tier: SubnetTier::Public,
            })
            .collect();

        let private_subnets = zones
            .iter()
            .enumerate()
            .map(|(i, zone)| PlannedSubnet {
                name: format!("PrivateSubnet-{}", i + 1),
                zone: zone.clone(),
                cidr_block: format!("{}.{}.0/24", cidr_base, i + 100),
                tier: SubnetTier::Private,
            })
            .collect();

        let public_route_tables = (0..zone_count)
            .map(|i| PlannedRouteTable {
                name: format!("PublicRT-{}", i + 1),
                tier: SubnetTier::Public,
                subnet_index: i,
            })
            .collect();

        let private_route_tables = (0..zone_count)
            .map(|i| PlannedRouteTable {
                name: format!("PrivateRT-{}", i + 1),
                tier: SubnetTier::Private,
                subnet_index: i,
            })
            .collect();

        Ok(Self {
            vpc_cidr: format!("{cidr_base}.0.0/16"),
            zones,
            public_subnets,
            private_subnets,
            public_route_tables,
            private_route_tables,
        })
    }

    /// Number of zones this plan spans.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }
}

fn validate_cidr_base(cidr_base: &str) -> Result<(), PlanError> {
    let invalid = || PlanError::InvalidCidrBase(cidr_base.to_string());
    let mut octets = cidr_base.split('.');
    for _ in 0..2 {
        let octet = octets.next().ok_or_else(invalid)?;
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        octet.parse::<u8>().map_err(|_| invalid())?;
    }
    if octets.next().is_some() {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn zones(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("us-east-2{}", (b'a' + i as u8) as char)).collect()
    }

    #[test]
    fn two_zone_plan_cidr_contract() {
        let plan = TopologyPlan::plan(2, "10.0", &zones(3)).unwrap();

        assert_eq!(plan.vpc_cidr, "10.0.0.0/16");
        assert_eq!(plan.zones, ["us-east-2a", "us-east-2b"]);
        assert_eq!(
            plan.public_subnets
                .iter()
                .map(|s| s.cidr_block.as_str())
                .collect::<Vec<_>>(),
            ["10.0.0.0/24", "10.0.1.0/24"]
        );
        assert_eq!(
            plan.private_subnets
                .iter()
                .map(|s| s.cidr_block.as_str())
                .collect::<Vec<_>>(),
            ["10.0.100.0/24", "10.0.101.0/24"]
        );
    }

    #[test]
    fn plan_grid_cidrs_are_disjoint() {
        for zone_count in 1..=6 {
            let plan = TopologyPlan::plan(zone_count, "172.16", &zones(6)).unwrap();

            let mut seen = HashSet::new();
            for subnet in plan.public_subnets.iter().chain(&plan.private_subnets) {
                assert!(
                    seen.insert(subnet.cidr_block.clone()),
                    "duplicate CIDR {} at zone_count {zone_count}",
                    subnet.cidr_block
                );
            }
            assert_eq!(seen.len(), zone_count * 2);

            // i / i+100 third-octet rule
            for (i, subnet) in plan.public_subnets.iter().enumerate() {
                assert_eq!(subnet.cidr_block, format!("172.16.{i}.0/24"));
            }
            for (i, subnet) in plan.private_subnets.iter().enumerate() {
                assert_eq!(subnet.cidr_block, format!("172.16.{}.0/24", i + 100));
            }
        }
    }

    #[test]
    fn names_are_one_based() {
        let plan = TopologyPlan::plan(2, "10.0", &zones(2)).unwrap();
        assert_eq!(plan.public_subnets[0].name, "PublicSubnet-1");
        assert_eq!(plan.private_subnets[1].name, "PrivateSubnet-2");
        assert_eq!(plan.public_route_tables[0].name, "PublicRT-1");
        assert_eq!(plan.private_route_tables[1].name, "PrivateRT-2");
    }

    #[test]
    fn route_tables_pair_with_subnets() {
        let plan = TopologyPlan::plan(3, "10.0", &zones(3)).unwrap();
        for (i, rt) in plan.public_route_tables.iter().enumerate() {
            assert_eq!(rt.subnet_index, i);
            assert_eq!(rt.tier, SubnetTier::Public);
        }
        for (i, rt) in plan.private_route_tables.iter().enumerate() {
            assert_eq!(rt.subnet_index, i);
            assert_eq!(rt.tier, SubnetTier::Private);
        }
    }

    #[test]
    fn insufficient_zones() {
        let err = TopologyPlan::plan(4, "10.0", &zones(2)).unwrap_err();
        assert_eq!(
            err,
            PlanError::InsufficientZones {
                requested: 4,
                available: 2
            }
        );
    }

    #[test]
    fn zero_zones_rejected() {
        assert_eq!(
            TopologyPlan::plan(0, "10.0", &zones(2)).unwrap_err(),
            PlanError::InvalidZoneCount
        );
    }

    #[test]
    fn too_many_zones_rejected() {
        let available: Vec<String> = (0..150).map(|i| format!("zone-{i}")).collect();
        assert_eq!(
            TopologyPlan::plan(101, "10.0", &available).unwrap_err(),
            PlanError::TooManyZones(101)
        );
        assert!(TopologyPlan::plan(100, "10.0", &available).is_ok());
    }

    #[test]
    fn cidr_base_validation() {
        for bad in ["10", "10.0.0", "10.", ".0", "10.x", "256.0", "10.1000", ""] {
            assert_eq!(
                TopologyPlan::plan(1, bad, &zones(1)).unwrap_err(),
                PlanError::InvalidCidrBase(bad.to_string()),
                "expected rejection of {bad:?}"
            );
        }
        for good in ["10.0", "172.16", "192.168", "0.0"] {
            assert!(TopologyPlan::plan(1, good, &zones(1)).is_ok());
        }
    }
}
