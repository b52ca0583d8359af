// ── Resource specification ──

use ncx_api::ResourceTarget;

/// A fully derived resource, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    pub target: ResourceTarget,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>, target: ResourceTarget) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Short type label for report lines.
    pub fn kind_label(&self) -> &'static str {
        match self.target {
            ResourceTarget::IpSubnet(_) => "ip_subnet",
            ResourceTarget::Fqdn(_) => "fqdn",
            ResourceTarget::WildcardFqdn(_) => "wildcard_fqdn",
        }
    }
}
