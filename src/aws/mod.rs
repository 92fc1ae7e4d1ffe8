//! AWS integration layer

pub mod context;
pub mod ec2;
pub mod error;
pub mod tags;

pub use context::AwsContext;
pub use ec2::{Ec2NetworkClient, NatGatewayInfo, NetworkOps, RouteInfo, RouteTableInfo, VpcSelector};
pub use error::{classify_anyhow_error, AwsError};
