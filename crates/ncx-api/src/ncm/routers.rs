// NCM v2 router, group, and LAN endpoints

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::ncm::client::NcmClient;
use crate::ncm::models::{Group, Lan, Router};

/// Page size requested for group listings; pagination covers the rest.
const GROUP_PAGE_LIMIT: &str = "500";

impl NcmClient {
    /// Look up a single router by exact id.
    ///
    /// `GET /routers/?id__in={id}`
    pub async fn routers_by_id(&self, router_id: &str) -> Result<Vec<Router>, Error> {
        let mut url = self.endpoint(&["routers"])?;
        url.query_pairs_mut().append_pair("id__in", router_id);
        debug!(router_id, "fetching router");
        self.get_all(url).await
    }

    /// Every router in a group, across all pages.
    ///
    /// `GET /routers/?group={group_id}&limit=500`
    pub async fn routers_in_group(&self, group_id: &str) -> Result<Vec<Router>, Error> {
        let mut url = self.endpoint(&["routers"])?;
        url.query_pairs_mut()
            .append_pair("group", group_id)
            .append_pair("limit", GROUP_PAGE_LIMIT);
        debug!(group_id, "fetching group routers");
        self.get_all(url).await
    }

    /// Groups whose name matches exactly.
    ///
    /// `GET /groups/?name={name}`
    pub async fn groups_named(&self, name: &str) -> Result<Vec<Group>, Error> {
        let mut url = self.endpoint(&["groups"])?;
        url.query_pairs_mut().append_pair("name", name);
        debug!(name, "fetching group by name");
        self.get_all(url).await
    }

    /// The router's configured local networks.
    ///
    /// `GET /routers/{id}/lans/`, answered either as a bare array or inside
    /// the usual `data` envelope depending on API revision.
    pub async fn router_lans(&self, router_id: &str) -> Result<Vec<Lan>, Error> {
        let url = self.endpoint(&["routers", router_id, "lans"])?;
        debug!(router_id, "fetching router LANs");
        let body = self.get_json(url).await?;

        let entries = match &body {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => {
                    return Err(Error::Deserialization {
                        message: "LAN listing has no data array".into(),
                        body: body.to_string(),
                    });
                }
            },
            _ => {
                return Err(Error::Deserialization {
                    message: "LAN listing is neither an array nor an object".into(),
                    body: body.to_string(),
                });
            }
        };

        Ok(entries.iter().map(Lan::from_value).collect())
    }
}
