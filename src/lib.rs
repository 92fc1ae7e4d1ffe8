//! tiernet — dependency-ordered provisioning and teardown of multi-AZ
//! VPC network topologies.
//!
//! The crate builds the network layer for multi-tier workloads: one VPC,
//! a public and a private subnet per availability zone, per-subnet route
//! tables, an internet gateway, and a single NAT gateway. Provisioning
//! runs strictly in dependency order and returns a [`Topology`] record
//! for downstream tier deployers; teardown rediscovers resources from
//! tags and deletes them in reverse order, idempotently.

pub mod aws;
pub mod planner;
pub mod provision;
pub mod resource_kind;
pub mod teardown;
pub mod topology;
pub mod wait;

pub use aws::{AwsContext, Ec2NetworkClient, NetworkOps, VpcSelector};
pub use planner::{PlanError, TopologyPlan};
pub use provision::{ProvisionEngine, ProvisionError, ProvisionStep};
pub use resource_kind::ResourceKind;
pub use teardown::{TeardownEngine, TeardownReport};
pub use topology::{NatState, RouteTarget, Subnet, SubnetTier, Topology};
pub use wait::{wait_for_state, WaitConfig, WaitError};
