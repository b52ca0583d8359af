// ── Work items ──

use std::fmt;

use super::target::TargetSelector;

/// The three provisioning pipelines. They share loader, resolvers and
/// reconciler and differ only in what they build per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    /// Create one exchange site per router.
    Sites,
    /// Create one IP-subnet resource per router LAN.
    LanResources,
    /// Create one resource per row, type detected from its value.
    Resources,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sites => "sites",
            Self::LanResources => "lan-resources",
            Self::Resources => "resources",
        })
    }
}

/// Pipeline-specific part of a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    /// The site itself is the thing being created.
    Site,
    /// Resources are derived from the router's LANs at run time.
    LocalNetworks,
    /// A single resource value from the row.
    Resource {
        value: String,
        name_override: Option<String>,
    },
}

/// One unit of work parsed from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub target: TargetSelector,
    pub network_id: String,
    /// Explicit site name; when absent the router name is used.
    pub site_name: Option<String>,
    pub payload: ItemPayload,
}
