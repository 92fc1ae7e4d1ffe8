//! AWS resource tag constants for tiernet
//!
//! Every resource the engine creates is tagged at creation time so that
//! teardown can rediscover a topology without the original provisioning
//! output.
//!
//! ## Tag Schema
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `Name` | Human-readable resource name (e.g. `PublicSubnet-1`) |
//! | `tiernet:tool` | Static identifier ("tiernet") |
//! | `tiernet:topology-id` | Unique topology identifier (UUID) |
//! | `tiernet:created-at` | RFC 3339 creation timestamp |

use aws_sdk_ec2::types::{ResourceType, Tag, TagSpecification};

/// Tag key for tool identification - all tiernet resources have this
pub const TAG_TOOL: &str = "tiernet:tool";

/// Tag value for tool identification
pub const TAG_TOOL_VALUE: &str = "tiernet";

/// Tag key for topology ID - unique identifier per provisioned topology
pub const TAG_TOPOLOGY_ID: &str = "tiernet:topology-id";

/// Tag key for creation timestamp (RFC 3339 format)
pub const TAG_CREATED_AT: &str = "tiernet:created-at";

/// Helper to format creation timestamp for tags
pub fn format_created_at(time: chrono::DateTime<chrono::Utc>) -> String {
    time.to_rfc3339()
}

/// Helper to parse creation timestamp from tags
pub fn parse_created_at(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// Build the standard tag specification for a resource created by the engine.
pub fn tag_spec(resource_type: ResourceType, name: &str, topology_id: &str) -> TagSpecification {
    TagSpecification::builder()
        .resource_type(resource_type)
        .tags(Tag::builder().key("Name").value(name).build())
        .tags(Tag::builder().key(TAG_TOOL).value(TAG_TOOL_VALUE).build())
        .tags(
            Tag::builder()
                .key(TAG_TOPOLOGY_ID)
                .value(topology_id)
                .build(),
        )
        .tags(
            Tag::builder()
                .key(TAG_CREATED_AT)
                .value(format_created_at(chrono::Utc::now()))
                .build(),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn format_parse_roundtrip() {
        let now = Utc::now();
        let formatted = format_created_at(now);
        let parsed = parse_created_at(&formatted).unwrap();

        let diff = (now - parsed).num_seconds().abs();
        assert!(diff <= 1, "Roundtrip diff {} > 1 second", diff);
    }

    #[test]
    fn parse_invalid() {
        assert!(parse_created_at("not a timestamp").is_none());
        assert!(parse_created_at("").is_none());
    }

    #[test]
    fn tag_spec_carries_tool_and_topology() {
        let spec = tag_spec(ResourceType::Vpc, "TierVPC", "0193-abc");
        let tags = spec.tags();
        let get = |key: &str| {
            tags.iter()
                .find(|t| t.key() == Some(key))
                .and_then(|t| t.value())
        };
        assert_eq!(get("Name"), Some("TierVPC"));
        assert_eq!(get(TAG_TOOL), Some(TAG_TOOL_VALUE));
        assert_eq!(get(TAG_TOPOLOGY_ID), Some("0193-abc"));
        assert!(get(TAG_CREATED_AT).is_some());
    }
}
