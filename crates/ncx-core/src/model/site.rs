// ── Site domain type ──

use std::collections::BTreeSet;

use super::device::Device;

/// An exchange site that passed association validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    /// `attributes.name`, falling back to `name`, then the raw id.
    pub display_name: String,
    /// Endpoint (router) ids the site is bound to.
    pub associated_device_ids: BTreeSet<String>,
}

impl Site {
    pub fn is_associated_with(&self, device: &Device) -> bool {
        self.associated_device_ids.contains(&device.id)
    }
}
