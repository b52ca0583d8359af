// ── Collaborator seams ──
//
// The pipeline talks to the device-management and exchange APIs only
// through these traits; the HTTP clients implement them here and tests
// substitute in-memory fakes.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use ncx_api::{Lan, NcmClient, NcxClient};

use crate::model::{Device, ResourceSpec, TargetMode, TargetSelector};

/// Read access to managed routers.
pub trait DeviceDirectory {
    /// Every device matching `selector`; empty when nothing matches.
    fn find_devices(
        &self,
        selector: &TargetSelector,
    ) -> impl Future<Output = Result<Vec<Device>, ncx_api::Error>> + Send;

    /// Raw LAN listing for one device, in API order.
    fn list_local_networks(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<Lan>, ncx_api::Error>> + Send;
}

/// Exchange site and resource operations. Replies are untyped.
pub trait ExchangeDirectory {
    /// Sites whose name matches exactly. Error replies arrive as string entries.
    fn find_sites(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Value>, ncx_api::Error>> + Send;

    fn create_site(
        &self,
        name: &str,
        network_id: &str,
        device_id: &str,
    ) -> impl Future<Output = Result<Value, ncx_api::Error>> + Send;

    fn create_resource(
        &self,
        site_id: &str,
        spec: &ResourceSpec,
    ) -> impl Future<Output = Result<Value, ncx_api::Error>> + Send;
}

impl DeviceDirectory for NcmClient {
    async fn find_devices(&self, selector: &TargetSelector) -> Result<Vec<Device>, ncx_api::Error> {
        let routers = match selector.mode {
            TargetMode::DeviceId => self.routers_by_id(&selector.identifier).await?,
            TargetMode::GroupId => self.routers_in_group(&selector.identifier).await?,
            TargetMode::GroupName => {
                let groups = self.groups_named(&selector.identifier).await?;
                debug!(name = %selector.identifier, matches = groups.len(), "resolved group name");
                let mut routers = Vec::new();
                for group in groups {
                    routers.extend(self.routers_in_group(&group.id).await?);
                }
                routers
            }
        };
        Ok(routers.into_iter().map(Device::from).collect())
    }

    async fn list_local_networks(&self, device_id: &str) -> Result<Vec<Lan>, ncx_api::Error> {
        self.router_lans(device_id).await
    }
}

impl ExchangeDirectory for NcxClient {
    async fn find_sites(&self, name: &str) -> Result<Vec<Value>, ncx_api::Error> {
        self.get_exchange_sites(name).await
    }

    async fn create_site(
        &self,
        name: &str,
        network_id: &str,
        device_id: &str,
    ) -> Result<Value, ncx_api::Error> {
        self.create_exchange_site(name, network_id, device_id).await
    }

    async fn create_resource(
        &self,
        site_id: &str,
        spec: &ResourceSpec,
    ) -> Result<Value, ncx_api::Error> {
        self.create_exchange_resource(site_id, &spec.name, &spec.target)
            .await
    }
}
