// ── Run events ──
//
// Everything the runner has to say about a batch is a `RunEvent`. The
// binary renders them as lines; tests collect them into a `Vec`.

use std::fmt;

use crate::error::ItemFailure;
use crate::model::{Device, Pipeline, ResourceSpec, TargetSelector};

/// One reportable step of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Work on one device of a work item begins.
    Started {
        pipeline: Pipeline,
        device: Device,
        network_id: String,
        /// Site name or resource value the device is being provisioned with.
        subject: Option<String>,
    },
    ResourceCreated {
        device: Device,
        site_name: String,
        spec: ResourceSpec,
    },
    /// The exchange already holds an equivalent resource.
    ResourceExists { device: Device, spec: ResourceSpec },
    SiteReady {
        device: Device,
        site_name: String,
        existed: bool,
    },
    /// Site creation succeeded but the lookup afterwards could not confirm
    /// the site is bound to the device.
    SiteUnverified {
        device: Device,
        site_name: String,
        detail: String,
    },
    Failed {
        target: TargetSelector,
        device: Option<Device>,
        subject: Option<String>,
        reason: ItemFailure,
    },
    /// Every derived item for every device of the target succeeded.
    TargetSucceeded { target: TargetSelector },
}

impl RunEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                pipeline,
                device,
                network_id,
                subject,
            } => match (pipeline, subject) {
                (Pipeline::Sites, Some(name)) => write!(
                    f,
                    "Creating NCX site '{name}' for router {device} in network {network_id}..."
                ),
                (Pipeline::Resources, Some(value)) => write!(
                    f,
                    "Creating NCX resource '{value}' for router {device} in network {network_id}..."
                ),
                (Pipeline::LanResources, _) => write!(
                    f,
                    "Creating NCX LAN resources for router {device} in network {network_id}..."
                ),
                (_, None) => write!(
                    f,
                    "Creating NCX {pipeline} for router {device} in network {network_id}..."
                ),
            },
            Self::ResourceCreated {
                device,
                site_name,
                spec,
            } => write!(
                f,
                "Created NCX resource '{}' ({}) for router {device}, site {site_name}. (type={})",
                spec.name,
                spec.target.value(),
                spec.kind_label()
            ),
            Self::ResourceExists { device, spec } => write!(
                f,
                "NCX resource '{}' ({}) already exists for router {device}.",
                spec.name,
                spec.target.value()
            ),
            Self::SiteReady {
                device,
                site_name,
                existed: false,
            } => write!(
                f,
                "Successfully created exchange site '{site_name}' for router {device}"
            ),
            Self::SiteReady {
                device,
                site_name,
                existed: true,
            } => write!(
                f,
                "Exchange site '{site_name}' already exists for router {device}"
            ),
            Self::SiteUnverified {
                device,
                site_name,
                detail,
            } => write!(
                f,
                "Site '{site_name}' created for router {device}; could not verify endpoint ({detail})"
            ),
            Self::Failed {
                target,
                device,
                subject,
                reason,
            } => {
                f.write_str("Error")?;
                match (device, subject) {
                    (Some(device), Some(subject)) => {
                        write!(f, " for router {device}, '{subject}'")?;
                    }
                    (Some(device), None) => write!(f, " for router {device}")?,
                    (None, Some(subject)) => write!(f, " for '{subject}' ({target})")?,
                    (None, None) => write!(f, " for {target}")?,
                }
                write!(f, ": {reason}")
            }
            Self::TargetSucceeded { .. } => f.write_str("Success!"),
        }
    }
}

/// Destination for run events.
pub trait EventSink {
    fn emit(&mut self, event: RunEvent);
}

impl EventSink for Vec<RunEvent> {
    fn emit(&mut self, event: RunEvent) {
        self.push(event);
    }
}
