// ── Domain model ──
//
// Canonical types flowing through the provisioning pipelines. Everything
// here is immutable once built: work items come out of the loader, devices
// and sites out of the resolvers, resource specs out of the builders.

pub mod device;
pub mod resource;
pub mod site;
pub mod target;
pub mod work_item;

pub use device::Device;
pub use resource::ResourceSpec;
pub use site::Site;
pub use target::{TargetMode, TargetSelector};
pub use work_item::{ItemPayload, Pipeline, WorkItem};
